use crate::bson::{BsonType, Value};
use crate::errors::{BsonError, BsonResult, ErrorKind};
use crate::serialization::serializers::{BsonArraySerializer, BsonDocumentSerializer};
use crate::serialization::{BsonDeserializationContext, BsonSerializationContext, BsonSerializer};

/// Serializer for values of unknown shape.
///
/// Reading dispatches on the type tag under the cursor, so any well-formed
/// value can be read without knowing its type up front. Nested documents and
/// arrays recurse through [BsonDocumentSerializer] and [BsonArraySerializer].
#[derive(Debug, Default, Clone, Copy)]
pub struct BsonValueSerializer;

impl BsonSerializer for BsonValueSerializer {
    type Value = Value;

    fn deserialize(&self, context: &mut BsonDeserializationContext<'_>) -> BsonResult<Value> {
        let bson_type = context.reader().current_bson_type()?;
        let reader = context.reader();
        let value = match bson_type {
            BsonType::Double => Value::Double(reader.read_double()?),
            BsonType::String => Value::String(reader.read_string()?),
            BsonType::Document => {
                Value::Document(BsonDocumentSerializer::instance().deserialize(context)?)
            }
            BsonType::Array => Value::Array(BsonArraySerializer.deserialize(context)?),
            BsonType::Binary => Value::Binary(reader.read_binary()?),
            BsonType::Undefined => {
                reader.read_undefined()?;
                Value::Undefined
            }
            BsonType::ObjectId => Value::ObjectId(reader.read_object_id()?),
            BsonType::Boolean => Value::Boolean(reader.read_boolean()?),
            BsonType::DateTime => Value::DateTime(reader.read_date_time()?),
            BsonType::Null => {
                reader.read_null()?;
                Value::Null
            }
            BsonType::RegularExpression => Value::RegularExpression(reader.read_regular_expression()?),
            BsonType::JavaScript => Value::JavaScript(reader.read_javascript()?),
            BsonType::Symbol => Value::Symbol(reader.read_symbol()?),
            BsonType::JavaScriptWithScope => {
                let code = reader.read_javascript_with_scope()?;
                let scope = BsonDocumentSerializer::instance().deserialize(context)?;
                Value::JavaScriptWithScope { code, scope }
            }
            BsonType::Int32 => Value::Int32(reader.read_int32()?),
            BsonType::Timestamp => Value::Timestamp(reader.read_timestamp()?),
            BsonType::Int64 => Value::Int64(reader.read_int64()?),
            BsonType::Decimal128 => Value::Decimal128(reader.read_decimal128()?),
            BsonType::MinKey => {
                reader.read_min_key()?;
                Value::MinKey
            }
            BsonType::MaxKey => {
                reader.read_max_key()?;
                Value::MaxKey
            }
            BsonType::EndOfDocument => {
                log::error!("Cannot deserialize Value from BsonType EndOfDocument.");
                return Err(BsonError::new(
                    "Cannot deserialize Value from BsonType EndOfDocument.",
                    ErrorKind::Format,
                ));
            }
        };
        Ok(value)
    }

    fn serialize(&self, context: &mut BsonSerializationContext<'_>, value: &Value) -> BsonResult<()> {
        let writer = context.writer();
        match value {
            Value::Double(v) => writer.write_double(*v),
            Value::String(v) => writer.write_string(v),
            Value::Document(document) => BsonDocumentSerializer::instance().serialize(context, document),
            Value::Array(values) => BsonArraySerializer.serialize(context, values),
            Value::Binary(binary) => writer.write_binary(binary),
            Value::Undefined => writer.write_undefined(),
            Value::ObjectId(oid) => writer.write_object_id(oid),
            Value::Boolean(v) => writer.write_boolean(*v),
            Value::DateTime(millis) => writer.write_date_time(*millis),
            Value::Null => writer.write_null(),
            Value::RegularExpression(regex) => writer.write_regular_expression(regex),
            Value::JavaScript(code) => writer.write_javascript(code),
            Value::Symbol(symbol) => writer.write_symbol(symbol),
            Value::JavaScriptWithScope { code, scope } => {
                writer.write_javascript_with_scope(code)?;
                BsonDocumentSerializer::instance().serialize(context, scope)
            }
            Value::Int32(v) => writer.write_int32(*v),
            Value::Timestamp(timestamp) => writer.write_timestamp(timestamp),
            Value::Int64(v) => writer.write_int64(*v),
            Value::Decimal128(bytes) => writer.write_decimal128(bytes),
            Value::MinKey => writer.write_min_key(),
            Value::MaxKey => writer.write_max_key(),
        }
    }
}
