use std::any::Any;
use std::sync::Arc;

use crate::common::TypeKey;
use crate::errors::{BsonError, BsonResult, ErrorKind};
use crate::serialization::{BsonDeserializationContext, BsonSerializationContext};

/// Encoding and decoding logic for one Rust type.
///
/// Implementations read from the context's reader and write to its writer;
/// nested values are handled by calling other serializers through
/// [BsonDeserializationContext::deserialize_with_child_context] and
/// [BsonSerializationContext::serialize_with_child_context].
///
/// The trait is object safe: bindings are stored and shared as
/// `Arc<dyn BsonSerializer<Value = T>>`.
pub trait BsonSerializer: Send + Sync + 'static {
    type Value: 'static;

    /// The type this serializer produces and consumes.
    fn value_type(&self) -> TypeKey {
        TypeKey::of::<Self::Value>()
    }

    fn deserialize(&self, context: &mut BsonDeserializationContext<'_>) -> BsonResult<Self::Value>;

    fn serialize(
        &self,
        context: &mut BsonSerializationContext<'_>,
        value: &Self::Value,
    ) -> BsonResult<()>;
}

/// A serializer whose value type is only known at runtime.
pub trait ErasedBsonSerializer: Send + Sync {
    fn value_type(&self) -> TypeKey;

    fn deserialize_any(
        &self,
        context: &mut BsonDeserializationContext<'_>,
    ) -> BsonResult<Box<dyn Any>>;

    /// Serializes `value`, which must be of [ErasedBsonSerializer::value_type].
    fn serialize_any(
        &self,
        context: &mut BsonSerializationContext<'_>,
        value: &dyn Any,
    ) -> BsonResult<()>;
}

struct ErasedSerializer<T: 'static> {
    inner: Arc<dyn BsonSerializer<Value = T>>,
}

impl<T: 'static> ErasedBsonSerializer for ErasedSerializer<T> {
    fn value_type(&self) -> TypeKey {
        self.inner.value_type()
    }

    fn deserialize_any(
        &self,
        context: &mut BsonDeserializationContext<'_>,
    ) -> BsonResult<Box<dyn Any>> {
        Ok(Box::new(self.inner.deserialize(context)?))
    }

    fn serialize_any(
        &self,
        context: &mut BsonSerializationContext<'_>,
        value: &dyn Any,
    ) -> BsonResult<()> {
        match value.downcast_ref::<T>() {
            Some(value) => self.inner.serialize(context, value),
            None => {
                log::error!(
                    "Serializer for {} cannot serialize a value of another type",
                    self.inner.value_type()
                );
                Err(BsonError::new(
                    &format!(
                        "Serializer for {} cannot serialize a value of another type",
                        self.inner.value_type()
                    ),
                    ErrorKind::Argument,
                ))
            }
        }
    }
}

/// A registered serializer, reachable both typed and type-erased.
#[derive(Clone)]
pub struct SerializerBinding {
    value_type: TypeKey,
    typed: Arc<dyn Any + Send + Sync>,
    erased: Arc<dyn ErasedBsonSerializer>,
}

impl SerializerBinding {
    pub fn new<T: 'static>(serializer: Arc<dyn BsonSerializer<Value = T>>) -> Self {
        SerializerBinding {
            value_type: TypeKey::of::<T>(),
            typed: Arc::new(serializer.clone()),
            erased: Arc::new(ErasedSerializer { inner: serializer }),
        }
    }

    pub fn value_type(&self) -> TypeKey {
        self.value_type
    }

    /// Returns the typed serializer if this binding is for `T`.
    pub fn typed<T: 'static>(&self) -> Option<Arc<dyn BsonSerializer<Value = T>>> {
        self.typed
            .downcast_ref::<Arc<dyn BsonSerializer<Value = T>>>()
            .cloned()
    }

    pub fn erased(&self) -> Arc<dyn ErasedBsonSerializer> {
        self.erased.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BsonBinaryReader, BsonBinaryWriter};
    use crate::serialization::{Int32Serializer, SerializerRegistry, StringSerializer};

    #[test]
    fn test_binding_typed_access() {
        let binding = SerializerBinding::new(Arc::new(Int32Serializer) as Arc<dyn BsonSerializer<Value = i32>>);
        assert_eq!(binding.value_type(), TypeKey::of::<i32>());
        assert!(binding.typed::<i32>().is_some());
        assert!(binding.typed::<i64>().is_none());
        assert_eq!(binding.erased().value_type(), TypeKey::of::<i32>());
    }

    #[test]
    fn test_erased_serializer_rejects_wrong_type() {
        let binding = SerializerBinding::new(Arc::new(StringSerializer) as Arc<dyn BsonSerializer<Value = String>>);
        let registry = SerializerRegistry::new();
        let mut writer = BsonBinaryWriter::new();
        let mut context = BsonSerializationContext::new(&mut writer, &registry);
        let err = binding.erased().serialize_any(&mut context, &5i32).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Argument);
    }

    #[test]
    fn test_erased_round_trip_through_document() {
        use crate::io::{BsonReader, BsonWriter};

        let binding = SerializerBinding::new(Arc::new(Int32Serializer) as Arc<dyn BsonSerializer<Value = i32>>);
        let registry = SerializerRegistry::new();

        let mut writer = BsonBinaryWriter::new();
        writer.write_start_document().unwrap();
        writer.write_name("n").unwrap();
        {
            let mut context = BsonSerializationContext::new(&mut writer, &registry);
            binding.erased().serialize_any(&mut context, &42i32).unwrap();
        }
        writer.write_end_document().unwrap();
        let bytes = writer.into_inner();

        let mut reader = BsonBinaryReader::new(&bytes);
        reader.read_start_document().unwrap();
        reader.read_bson_type().unwrap();
        reader.read_name().unwrap();
        let mut context = BsonDeserializationContext::new(&mut reader, &registry);
        let value = binding.erased().deserialize_any(&mut context).unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
    }
}
