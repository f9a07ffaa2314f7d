use chrono::{DateTime, Utc};

use crate::bson::{Binary, BsonType, ObjectId, Regex, Timestamp};
use crate::errors::{BsonError, BsonResult, ErrorKind};
use crate::serialization::serializers::verify_bson_type;
use crate::serialization::{BsonDeserializationContext, BsonSerializationContext, BsonSerializer};

// A leaf serializer accepts exactly one kind and maps it to one cursor call
// in each direction.
macro_rules! leaf_serializer {
    (
        $(#[$meta:meta])*
        $name:ident, $value:ty, $display:literal, $bson_type:ident,
        read: $read:ident,
        write: |$writer:ident, $v:ident| $write:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl BsonSerializer for $name {
            type Value = $value;

            fn deserialize(
                &self,
                context: &mut BsonDeserializationContext<'_>,
            ) -> BsonResult<$value> {
                verify_bson_type(context, BsonType::$bson_type, $display)?;
                context.reader().$read()
            }

            fn serialize(
                &self,
                context: &mut BsonSerializationContext<'_>,
                value: &$value,
            ) -> BsonResult<()> {
                let $writer = context.writer();
                let $v = value;
                $write
            }
        }
    };
}

leaf_serializer!(
    /// Serializer for [Regex] values.
    BsonRegularExpressionSerializer, Regex, "Regex", RegularExpression,
    read: read_regular_expression,
    write: |writer, value| writer.write_regular_expression(value)
);

leaf_serializer!(
    /// Serializer for [Binary] values of any subtype.
    BsonBinaryDataSerializer, Binary, "Binary", Binary,
    read: read_binary,
    write: |writer, value| writer.write_binary(value)
);

leaf_serializer!(
    ObjectIdSerializer, ObjectId, "ObjectId", ObjectId,
    read: read_object_id,
    write: |writer, value| writer.write_object_id(value)
);

leaf_serializer!(
    BsonTimestampSerializer, Timestamp, "Timestamp", Timestamp,
    read: read_timestamp,
    write: |writer, value| writer.write_timestamp(value)
);

leaf_serializer!(
    /// Serializer for the null value, represented as `()`.
    BsonNullSerializer, (), "()", Null,
    read: read_null,
    write: |writer, _value| writer.write_null()
);

leaf_serializer!(
    Int32Serializer, i32, "i32", Int32,
    read: read_int32,
    write: |writer, value| writer.write_int32(*value)
);

leaf_serializer!(
    Int64Serializer, i64, "i64", Int64,
    read: read_int64,
    write: |writer, value| writer.write_int64(*value)
);

leaf_serializer!(
    DoubleSerializer, f64, "f64", Double,
    read: read_double,
    write: |writer, value| writer.write_double(*value)
);

leaf_serializer!(
    BooleanSerializer, bool, "bool", Boolean,
    read: read_boolean,
    write: |writer, value| writer.write_boolean(*value)
);

leaf_serializer!(
    StringSerializer, String, "String", String,
    read: read_string,
    write: |writer, value| writer.write_string(value)
);

/// Serializer for UTC date times, stored as milliseconds since the epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct BsonDateTimeSerializer;

impl BsonSerializer for BsonDateTimeSerializer {
    type Value = DateTime<Utc>;

    fn deserialize(&self, context: &mut BsonDeserializationContext<'_>) -> BsonResult<DateTime<Utc>> {
        verify_bson_type(context, BsonType::DateTime, "DateTime<Utc>")?;
        let millis = context.reader().read_date_time()?;
        match DateTime::<Utc>::from_timestamp_millis(millis) {
            Some(date_time) => Ok(date_time),
            None => {
                log::error!("DateTime value {} is out of range", millis);
                Err(BsonError::new(
                    &format!("DateTime value {} is out of range", millis),
                    ErrorKind::Format,
                ))
            }
        }
    }

    fn serialize(
        &self,
        context: &mut BsonSerializationContext<'_>,
        value: &DateTime<Utc>,
    ) -> BsonResult<()> {
        context.writer().write_date_time(value.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BsonBinaryReader, BsonBinaryWriter, BsonReader, BsonWriter};
    use crate::serialization::SerializerRegistry;
    use chrono::TimeZone;

    // Writes `value` as the single element "v" of a document.
    fn write_element<S: BsonSerializer>(serializer: &S, value: &S::Value) -> Vec<u8> {
        let registry = SerializerRegistry::new();
        let mut writer = BsonBinaryWriter::new();
        writer.write_start_document().unwrap();
        writer.write_name("v").unwrap();
        {
            let mut context = BsonSerializationContext::new(&mut writer, &registry);
            serializer.serialize(&mut context, value).unwrap();
        }
        writer.write_end_document().unwrap();
        writer.into_inner()
    }

    // Positions a reader on element "v" and deserializes it.
    fn read_element<S: BsonSerializer>(serializer: &S, bytes: &[u8]) -> BsonResult<S::Value> {
        let registry = SerializerRegistry::new();
        let mut reader = BsonBinaryReader::new(bytes);
        reader.read_start_document().unwrap();
        reader.read_bson_type().unwrap();
        reader.read_name().unwrap();
        let mut context = BsonDeserializationContext::new(&mut reader, &registry);
        serializer.deserialize(&mut context)
    }

    #[test]
    fn test_int32_layout() {
        let bytes = write_element(&Int32Serializer, &1);
        assert_eq!(
            bytes,
            vec![0x0C, 0, 0, 0, 0x10, b'v', 0x00, 0x01, 0, 0, 0, 0x00]
        );
        assert_eq!(read_element(&Int32Serializer, &bytes).unwrap(), 1);
    }

    #[test]
    fn test_wrong_kind_is_format_error() {
        let bytes = write_element(&StringSerializer, &"text".to_string());
        let err = read_element(&Int32Serializer, &bytes).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Format);
        assert!(err.message().contains("String"));
        assert!(err.message().contains("Int32"));
    }

    #[test]
    fn test_wrong_kind_consumes_nothing() {
        let bytes = write_element(&BooleanSerializer, &true);
        let registry = SerializerRegistry::new();
        let mut reader = BsonBinaryReader::new(&bytes);
        reader.read_start_document().unwrap();
        reader.read_bson_type().unwrap();
        reader.read_name().unwrap();
        let before = reader.position();
        {
            let mut context = BsonDeserializationContext::new(&mut reader, &registry);
            assert!(DoubleSerializer.deserialize(&mut context).is_err());
        }
        assert_eq!(reader.position(), before);
        assert!(reader.read_boolean().unwrap());
    }

    #[test]
    fn test_regular_expression() {
        let regex = Regex::new("^a.*z$", "mi");
        let bytes = write_element(&BsonRegularExpressionSerializer, &regex);
        let read = read_element(&BsonRegularExpressionSerializer, &bytes).unwrap();
        assert_eq!(read.pattern(), "^a.*z$");
        assert_eq!(read.options(), "im");
    }

    #[test]
    fn test_binary_and_object_id() {
        let binary = Binary::from(vec![1u8, 2, 3]);
        let bytes = write_element(&BsonBinaryDataSerializer, &binary);
        assert_eq!(read_element(&BsonBinaryDataSerializer, &bytes).unwrap(), binary);

        let oid = ObjectId::new();
        let bytes = write_element(&ObjectIdSerializer, &oid);
        assert_eq!(bytes.len(), 4 + 1 + 2 + 12 + 1);
        assert_eq!(read_element(&ObjectIdSerializer, &bytes).unwrap(), oid);
    }

    #[test]
    fn test_timestamp_and_null() {
        let timestamp = Timestamp::new(1_700_000_000, 7);
        let bytes = write_element(&BsonTimestampSerializer, &timestamp);
        assert_eq!(read_element(&BsonTimestampSerializer, &bytes).unwrap(), timestamp);

        let bytes = write_element(&BsonNullSerializer, &());
        assert_eq!(bytes, vec![0x08, 0, 0, 0, 0x0A, b'v', 0x00, 0x00]);
        assert!(read_element(&BsonNullSerializer, &bytes).is_ok());
    }

    #[test]
    fn test_primitives() {
        let bytes = write_element(&Int64Serializer, &-5i64);
        assert_eq!(read_element(&Int64Serializer, &bytes).unwrap(), -5);

        let bytes = write_element(&DoubleSerializer, &2.5f64);
        assert_eq!(read_element(&DoubleSerializer, &bytes).unwrap(), 2.5);

        let bytes = write_element(&StringSerializer, &"héllo".to_string());
        assert_eq!(read_element(&StringSerializer, &bytes).unwrap(), "héllo");
    }

    #[test]
    fn test_date_time() {
        let date_time = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).unwrap();
        let bytes = write_element(&BsonDateTimeSerializer, &date_time);
        assert_eq!(read_element(&BsonDateTimeSerializer, &bytes).unwrap(), date_time);
    }

    #[test]
    fn test_date_time_out_of_range() {
        let mut bytes = write_element(&Int64Serializer, &i64::MAX);
        // retag the element as a date time
        bytes[4] = BsonType::DateTime.tag();
        let err = read_element(&BsonDateTimeSerializer, &bytes).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Format);
    }
}
