use crate::bson::Document;
use crate::common::TypeKey;
use crate::errors::BsonResult;
use crate::io::{BsonReader, BsonWriter};
use crate::serialization::{BsonSerializer, SerializerRegistry};

/// State threaded through one deserialization call tree.
///
/// A context exclusively borrows the reader. Serializers reading nested
/// values create a child with [BsonDeserializationContext::create_child],
/// which reborrows the same reader and inherits the configuration; only the
/// nominal type changes.
pub struct BsonDeserializationContext<'r> {
    reader: &'r mut dyn BsonReader,
    registry: &'r SerializerRegistry,
    allow_duplicate_element_names: bool,
    nominal_type: TypeKey,
}

impl<'r> BsonDeserializationContext<'r> {
    /// Creates a root context with duplicate element names rejected and
    /// [Document] as the nominal type.
    pub fn new(reader: &'r mut dyn BsonReader, registry: &'r SerializerRegistry) -> Self {
        BsonDeserializationContext {
            reader,
            registry,
            allow_duplicate_element_names: false,
            nominal_type: TypeKey::of::<Document>(),
        }
    }

    pub fn with_allow_duplicate_element_names(mut self, allow: bool) -> Self {
        self.allow_duplicate_element_names = allow;
        self
    }

    pub fn with_nominal_type(mut self, nominal_type: TypeKey) -> Self {
        self.nominal_type = nominal_type;
        self
    }

    pub fn reader(&mut self) -> &mut dyn BsonReader {
        &mut *self.reader
    }

    pub fn registry(&self) -> &'r SerializerRegistry {
        self.registry
    }

    pub fn allow_duplicate_element_names(&self) -> bool {
        self.allow_duplicate_element_names
    }

    pub fn nominal_type(&self) -> TypeKey {
        self.nominal_type
    }

    pub fn create_child(&mut self, nominal_type: TypeKey) -> BsonDeserializationContext<'_> {
        BsonDeserializationContext {
            reader: &mut *self.reader,
            registry: self.registry,
            allow_duplicate_element_names: self.allow_duplicate_element_names,
            nominal_type,
        }
    }

    /// Deserializes the next value with `serializer` in a child context whose
    /// nominal type is the serializer's value type.
    pub fn deserialize_with_child_context<S>(&mut self, serializer: &S) -> BsonResult<S::Value>
    where
        S: BsonSerializer + ?Sized,
    {
        let mut child = self.create_child(serializer.value_type());
        serializer.deserialize(&mut child)
    }
}

/// State threaded through one serialization call tree.
///
/// Children created with [BsonSerializationContext::create_child] reborrow
/// the writer and inherit `serialize_as_nominal_type` and
/// `serialize_id_first`.
pub struct BsonSerializationContext<'w> {
    writer: &'w mut dyn BsonWriter,
    registry: &'w SerializerRegistry,
    nominal_type: TypeKey,
    serialize_as_nominal_type: bool,
    serialize_id_first: bool,
}

impl<'w> BsonSerializationContext<'w> {
    pub fn new(writer: &'w mut dyn BsonWriter, registry: &'w SerializerRegistry) -> Self {
        BsonSerializationContext {
            writer,
            registry,
            nominal_type: TypeKey::of::<Document>(),
            serialize_as_nominal_type: false,
            serialize_id_first: false,
        }
    }

    pub fn with_nominal_type(mut self, nominal_type: TypeKey) -> Self {
        self.nominal_type = nominal_type;
        self
    }

    /// When set, values are written by the serializer of their nominal type
    /// even if their runtime type has a binding of its own.
    pub fn with_serialize_as_nominal_type(mut self, serialize_as_nominal_type: bool) -> Self {
        self.serialize_as_nominal_type = serialize_as_nominal_type;
        self
    }

    /// When set, a document's `_id` element is written before all others.
    pub fn with_serialize_id_first(mut self, serialize_id_first: bool) -> Self {
        self.serialize_id_first = serialize_id_first;
        self
    }

    pub fn writer(&mut self) -> &mut dyn BsonWriter {
        &mut *self.writer
    }

    pub fn registry(&self) -> &'w SerializerRegistry {
        self.registry
    }

    pub fn nominal_type(&self) -> TypeKey {
        self.nominal_type
    }

    pub fn serialize_as_nominal_type(&self) -> bool {
        self.serialize_as_nominal_type
    }

    pub fn serialize_id_first(&self) -> bool {
        self.serialize_id_first
    }

    pub fn create_child(&mut self, nominal_type: TypeKey) -> BsonSerializationContext<'_> {
        BsonSerializationContext {
            writer: &mut *self.writer,
            registry: self.registry,
            nominal_type,
            serialize_as_nominal_type: self.serialize_as_nominal_type,
            serialize_id_first: self.serialize_id_first,
        }
    }

    pub fn serialize_with_child_context<S>(&mut self, serializer: &S, value: &S::Value) -> BsonResult<()>
    where
        S: BsonSerializer + ?Sized,
    {
        let mut child = self.create_child(serializer.value_type());
        serializer.serialize(&mut child, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BsonBinaryReader, BsonBinaryWriter};

    #[test]
    fn test_deserialization_child_inherits_flags() {
        let registry = SerializerRegistry::new();
        let bytes = [0x05, 0x00, 0x00, 0x00, 0x00];
        let mut reader = BsonBinaryReader::new(&bytes);
        let mut context = BsonDeserializationContext::new(&mut reader, &registry)
            .with_allow_duplicate_element_names(true);

        assert_eq!(context.nominal_type(), TypeKey::of::<Document>());
        let child = context.create_child(TypeKey::of::<i32>());
        assert!(child.allow_duplicate_element_names());
        assert_eq!(child.nominal_type(), TypeKey::of::<i32>());
    }

    #[test]
    fn test_child_reborrows_the_same_reader() {
        let registry = SerializerRegistry::new();
        let bytes = [0x05, 0x00, 0x00, 0x00, 0x00];
        let mut reader = BsonBinaryReader::new(&bytes);
        let mut context = BsonDeserializationContext::new(&mut reader, &registry);
        {
            let mut child = context.create_child(TypeKey::of::<Document>());
            child.reader().read_start_document().unwrap();
        }
        context.reader().read_end_document().unwrap();
        assert_eq!(context.reader().position(), 5);
    }

    #[test]
    fn test_serialization_child_inherits_flags() {
        let registry = SerializerRegistry::new();
        let mut writer = BsonBinaryWriter::new();
        let mut context = BsonSerializationContext::new(&mut writer, &registry)
            .with_serialize_id_first(true)
            .with_serialize_as_nominal_type(true);

        let child = context.create_child(TypeKey::of::<String>());
        assert!(child.serialize_id_first());
        assert!(child.serialize_as_nominal_type());
        assert_eq!(child.nominal_type(), TypeKey::of::<String>());
    }
}
