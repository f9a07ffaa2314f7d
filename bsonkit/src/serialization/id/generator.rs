use std::any::Any;
use std::sync::Arc;

use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::bson::{Binary, GuidRepresentation, ObjectId, Value};
use crate::errors::BsonResult;

/// Produces identity values for documents that lack one.
pub trait IdGenerator: Send + Sync {
    /// Generates a new id for `document`, stored in `container`.
    ///
    /// Both arguments are passed through for generators that derive the id
    /// from context; the built-in generators ignore them.
    fn generate_id(&self, container: &dyn Any, document: &dyn Any) -> BsonResult<Value>;

    /// Returns true if `id` is the "not yet assigned" value for this generator.
    fn is_empty(&self, id: &Value) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// Generates a fresh [ObjectId].
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectIdGenerator;

static OBJECT_ID_GENERATOR: Lazy<Arc<dyn IdGenerator>> = Lazy::new(|| Arc::new(ObjectIdGenerator));

impl ObjectIdGenerator {
    pub fn instance() -> Arc<dyn IdGenerator> {
        OBJECT_ID_GENERATOR.clone()
    }
}

impl IdGenerator for ObjectIdGenerator {
    fn generate_id(&self, _container: &dyn Any, _document: &dyn Any) -> BsonResult<Value> {
        Ok(Value::ObjectId(ObjectId::new()))
    }

    fn is_empty(&self, id: &Value) -> bool {
        match id {
            Value::Null => true,
            Value::ObjectId(oid) => oid.is_empty(),
            _ => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Generates a random UUID encoded as a binary value with a fixed
/// representation.
#[derive(Debug, Clone, Copy)]
pub struct BinaryDataGuidGenerator {
    guid_representation: GuidRepresentation,
}

static GUID_GENERATORS: Lazy<[Arc<dyn IdGenerator>; 5]> = Lazy::new(|| {
    [
        Arc::new(BinaryDataGuidGenerator::new(GuidRepresentation::Unspecified)),
        Arc::new(BinaryDataGuidGenerator::new(GuidRepresentation::Standard)),
        Arc::new(BinaryDataGuidGenerator::new(GuidRepresentation::CSharpLegacy)),
        Arc::new(BinaryDataGuidGenerator::new(GuidRepresentation::JavaLegacy)),
        Arc::new(BinaryDataGuidGenerator::new(GuidRepresentation::PythonLegacy)),
    ]
});

impl BinaryDataGuidGenerator {
    pub fn new(guid_representation: GuidRepresentation) -> Self {
        BinaryDataGuidGenerator { guid_representation }
    }

    /// Returns the shared generator for `guid_representation`.
    pub fn instance(guid_representation: GuidRepresentation) -> Arc<dyn IdGenerator> {
        let index = match guid_representation {
            GuidRepresentation::Unspecified => 0,
            GuidRepresentation::Standard => 1,
            GuidRepresentation::CSharpLegacy => 2,
            GuidRepresentation::JavaLegacy => 3,
            GuidRepresentation::PythonLegacy => 4,
        };
        GUID_GENERATORS[index].clone()
    }

    pub fn guid_representation(&self) -> GuidRepresentation {
        self.guid_representation
    }
}

impl IdGenerator for BinaryDataGuidGenerator {
    fn generate_id(&self, _container: &dyn Any, _document: &dyn Any) -> BsonResult<Value> {
        let binary = Binary::from_uuid(Uuid::new_v4(), self.guid_representation)?;
        Ok(Value::Binary(binary))
    }

    fn is_empty(&self, id: &Value) -> bool {
        match id {
            Value::Null => true,
            Value::Binary(binary) if binary.subtype().is_uuid() => {
                binary.bytes().iter().all(|b| *b == 0)
            }
            _ => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bson::BinarySubType;
    use crate::errors::ErrorKind;

    #[test]
    fn test_object_id_generator() {
        let generator = ObjectIdGenerator::instance();
        let id = generator.generate_id(&(), &()).unwrap();
        assert!(matches!(id, Value::ObjectId(_)));
        assert!(!generator.is_empty(&id));
        assert!(generator.is_empty(&Value::Null));
        assert!(generator.is_empty(&Value::ObjectId(ObjectId::empty())));
        assert!(!generator.is_empty(&Value::Int32(0)));
    }

    #[test]
    fn test_guid_generator_standard() {
        let generator = BinaryDataGuidGenerator::instance(GuidRepresentation::Standard);
        let id = generator.generate_id(&(), &()).unwrap();
        let binary = id.as_binary().unwrap();
        assert_eq!(binary.subtype(), BinarySubType::UuidStandard);
        assert_eq!(binary.bytes().len(), 16);
        assert!(!generator.is_empty(&id));
    }

    #[test]
    fn test_guid_generator_legacy() {
        let generator = BinaryDataGuidGenerator::instance(GuidRepresentation::JavaLegacy);
        let id = generator.generate_id(&(), &()).unwrap();
        let binary = id.as_binary().unwrap();
        assert_eq!(binary.subtype(), BinarySubType::UuidLegacy);
        assert_eq!(binary.guid_representation(), GuidRepresentation::JavaLegacy);
    }

    #[test]
    fn test_guid_generator_unspecified_fails() {
        let generator = BinaryDataGuidGenerator::instance(GuidRepresentation::Unspecified);
        let err = generator.generate_id(&(), &()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Argument);
    }

    #[test]
    fn test_guid_generator_empty_detection() {
        let generator = BinaryDataGuidGenerator::instance(GuidRepresentation::Standard);
        let zero = Binary::new(BinarySubType::UuidStandard, vec![0; 16]);
        assert!(generator.is_empty(&Value::Binary(zero)));
        assert!(generator.is_empty(&Value::Null));
        assert!(!generator.is_empty(&Value::Binary(Binary::from(vec![0u8; 16]))));
    }

    #[test]
    fn test_instances_are_shared() {
        let a = BinaryDataGuidGenerator::instance(GuidRepresentation::CSharpLegacy);
        let b = BinaryDataGuidGenerator::instance(GuidRepresentation::CSharpLegacy);
        assert!(Arc::ptr_eq(&a, &b));
        let typed = a.as_any().downcast_ref::<BinaryDataGuidGenerator>().unwrap();
        assert_eq!(typed.guid_representation(), GuidRepresentation::CSharpLegacy);
    }
}
