use crate::bson::{BsonType, Value};
use crate::errors::BsonResult;
use crate::serialization::serializers::{verify_bson_type, BsonValueSerializer};
use crate::serialization::{BsonDeserializationContext, BsonSerializationContext, BsonSerializer};

/// Serializer for arrays of arbitrary values.
#[derive(Debug, Default, Clone, Copy)]
pub struct BsonArraySerializer;

impl BsonSerializer for BsonArraySerializer {
    type Value = Vec<Value>;

    fn deserialize(&self, context: &mut BsonDeserializationContext<'_>) -> BsonResult<Vec<Value>> {
        verify_bson_type(context, BsonType::Array, "Vec<Value>")?;

        context.reader().read_start_array()?;
        let mut values = Vec::new();
        while context.reader().read_bson_type()? != BsonType::EndOfDocument {
            values.push(context.deserialize_with_child_context(&BsonValueSerializer)?);
        }
        context.reader().read_end_array()?;
        Ok(values)
    }

    fn serialize(&self, context: &mut BsonSerializationContext<'_>, value: &Vec<Value>) -> BsonResult<()> {
        context.writer().write_start_array()?;
        for item in value {
            context.serialize_with_child_context(&BsonValueSerializer, item)?;
        }
        context.writer().write_end_array()
    }
}
