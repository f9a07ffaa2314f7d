use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::bson::{GuidRepresentation, ObjectId};
use crate::common::TypeKey;
use crate::serialization::id::{BinaryDataGuidGenerator, IdGenerator, ObjectIdGenerator};

static GLOBAL_ID_GENERATORS: Lazy<IdGeneratorRegistry> = Lazy::new(IdGeneratorRegistry::new);

/// Maps an id's runtime type to the generator that produces values of it.
///
/// Clones share the same underlying map.
#[derive(Clone)]
pub struct IdGeneratorRegistry {
    inner: Arc<DashMap<TypeKey, Arc<dyn IdGenerator>>>,
}

impl IdGeneratorRegistry {
    /// Creates a registry with generators for [ObjectId] and [Uuid].
    ///
    /// Binary ids have no registered generator: the document serializer
    /// resolves UUID binaries from their guid representation instead.
    pub fn new() -> Self {
        let registry = IdGeneratorRegistry::empty();
        registry.register_id_generator(TypeKey::of::<ObjectId>(), ObjectIdGenerator::instance());
        registry.register_id_generator(
            TypeKey::of::<Uuid>(),
            BinaryDataGuidGenerator::instance(GuidRepresentation::Standard),
        );
        registry
    }

    pub fn empty() -> Self {
        IdGeneratorRegistry {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// The process-wide registry used by default serializers.
    pub fn global() -> IdGeneratorRegistry {
        GLOBAL_ID_GENERATORS.clone()
    }

    /// Registers `generator` for ids of `id_type`, replacing any previous one.
    pub fn register_id_generator(&self, id_type: TypeKey, generator: Arc<dyn IdGenerator>) {
        if self.inner.insert(id_type, generator).is_some() {
            log::debug!("Replaced id generator for {}", id_type);
        }
    }

    pub fn lookup_id_generator(&self, id_type: TypeKey) -> Option<Arc<dyn IdGenerator>> {
        self.inner.get(&id_type).map(|entry| entry.value().clone())
    }
}

impl Default for IdGeneratorRegistry {
    fn default() -> Self {
        IdGeneratorRegistry::new()
    }
}
