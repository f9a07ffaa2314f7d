use crate::errors::BsonResult;
use crate::serialization::SerializerRegistry;

/// A bundle of serializers contributed by an extension crate.
///
/// Modules are loaded with [SerializerRegistry::load_module]; `load` is called
/// once and should register every serializer the module provides. A module
/// that registers a type already bound in the registry fails the load.
pub trait SerializerModule: Send + Sync {
    fn load(&self, registry: &SerializerRegistry) -> BsonResult<()>;
}
