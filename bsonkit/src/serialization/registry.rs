use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::bson::Document;
use crate::common::{GenericTypeKey, TypeKey};
use crate::errors::{BsonError, BsonResult, ErrorKind};
use crate::serialization::id::IdGeneratorRegistry;
use crate::serialization::{
    BooleanSerializer, BsonArraySerializer, BsonBinaryDataSerializer, BsonDateTimeSerializer,
    BsonDocumentSerializer, BsonNullSerializer, BsonRegularExpressionSerializer, BsonSerializer,
    BsonTimestampSerializer, BsonValueSerializer, DoubleSerializer, ErasedBsonSerializer,
    Int32Serializer, Int64Serializer, ObjectIdSerializer, SerializerBinding, SerializerModule,
    StringSerializer,
};

static GLOBAL_REGISTRY: Lazy<SerializerRegistry> =
    Lazy::new(|| SerializerRegistry::with_id_generators(IdGeneratorRegistry::global()));

/// A type constructor whose serializer depends on its type argument.
///
/// The registry builds one serializer per concrete argument on first use and
/// caches it under `(CONSTRUCTOR, Argument)`.
///
/// ```rust,ignore
/// struct Wrapped<T>(PhantomData<T>);
///
/// impl<T: Send + Sync + 'static> GenericBsonType for Wrapped<T> {
///     type Argument = T;
///     type Value = Vec<T>;
///     const CONSTRUCTOR: &'static str = "Wrapped";
///
///     fn create_serializer(registry: &SerializerRegistry)
///         -> BsonResult<Arc<dyn BsonSerializer<Value = Vec<T>>>> {
///         let element = registry.lookup::<T>()?;
///         Ok(Arc::new(VecSerializer::new(element)))
///     }
/// }
/// ```
pub trait GenericBsonType: 'static {
    type Argument: 'static;
    type Value: 'static;

    const CONSTRUCTOR: &'static str;

    fn create_serializer(
        registry: &SerializerRegistry,
    ) -> BsonResult<Arc<dyn BsonSerializer<Value = Self::Value>>>;
}

/// Maps Rust types to their serializers.
///
/// The registry is cheap to clone; clones share the same bindings. Reads go
/// through `dashmap` shards without a global lock, so a registry can be used
/// from many threads at once.
///
/// # Examples
///
/// ```rust
/// use bsonkit::serialization::SerializerRegistry;
///
/// let registry = SerializerRegistry::new();
/// assert!(registry.lookup::<i32>().is_ok());
/// assert!(registry.lookup::<u128>().is_err());
/// ```
#[derive(Clone)]
pub struct SerializerRegistry {
    inner: Arc<SerializerRegistryInner>,
}

struct SerializerRegistryInner {
    bindings: DashMap<TypeKey, SerializerBinding>,
    generic_bindings: DashMap<GenericTypeKey, SerializerBinding>,
    id_generators: IdGeneratorRegistry,
}

impl SerializerRegistry {
    /// Creates a registry with the built-in serializers for the value model
    /// and the primitive types.
    pub fn new() -> Self {
        SerializerRegistry::with_id_generators(IdGeneratorRegistry::global())
    }

    /// Like [SerializerRegistry::new], with a custom identity generator registry.
    pub fn with_id_generators(id_generators: IdGeneratorRegistry) -> Self {
        let registry = SerializerRegistry::empty_with(id_generators.clone());
        registry.bind(Arc::new(BsonDocumentSerializer::with_id_generators(id_generators)));
        registry.bind(Arc::new(BsonValueSerializer));
        registry.bind(Arc::new(BsonArraySerializer));
        registry.bind(Arc::new(BsonRegularExpressionSerializer));
        registry.bind(Arc::new(BsonBinaryDataSerializer));
        registry.bind(Arc::new(ObjectIdSerializer));
        registry.bind(Arc::new(BsonTimestampSerializer));
        registry.bind(Arc::new(BsonDateTimeSerializer));
        registry.bind(Arc::new(BsonNullSerializer));
        registry.bind(Arc::new(Int32Serializer));
        registry.bind(Arc::new(Int64Serializer));
        registry.bind(Arc::new(DoubleSerializer));
        registry.bind(Arc::new(BooleanSerializer));
        registry.bind(Arc::new(StringSerializer));
        registry
    }

    /// Creates a registry without any bindings.
    pub fn empty() -> Self {
        SerializerRegistry::empty_with(IdGeneratorRegistry::global())
    }

    fn empty_with(id_generators: IdGeneratorRegistry) -> Self {
        SerializerRegistry {
            inner: Arc::new(SerializerRegistryInner {
                bindings: DashMap::new(),
                generic_bindings: DashMap::new(),
                id_generators,
            }),
        }
    }

    /// The process-wide registry with the built-in serializers.
    pub fn global() -> SerializerRegistry {
        GLOBAL_REGISTRY.clone()
    }

    fn bind<T: 'static>(&self, serializer: Arc<dyn BsonSerializer<Value = T>>) {
        let binding = SerializerBinding::new(serializer);
        self.inner.bindings.insert(binding.value_type(), binding);
    }

    /// Registers `serializer` for its value type.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::InvalidOperation` if the type already has a
    /// serializer; the existing binding is kept.
    pub fn register<S: BsonSerializer>(&self, serializer: S) -> BsonResult<()> {
        self.register_arc(Arc::new(serializer))
    }

    pub fn register_arc<T: 'static>(
        &self,
        serializer: Arc<dyn BsonSerializer<Value = T>>,
    ) -> BsonResult<()> {
        let binding = SerializerBinding::new(serializer);
        let key = binding.value_type();
        match self.inner.bindings.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                log::error!("A serializer is already registered for type {}", key);
                Err(BsonError::new(
                    &format!("A serializer is already registered for type {}", key),
                    ErrorKind::InvalidOperation,
                ))
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                log::debug!("Registered serializer for type {}", key);
                entry.insert(binding);
                Ok(())
            }
        }
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.inner.bindings.contains_key(&TypeKey::of::<T>())
    }

    /// Returns the serializer registered for `T`.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Lookup` if no serializer is registered.
    pub fn lookup<T: 'static>(&self) -> BsonResult<Arc<dyn BsonSerializer<Value = T>>> {
        let key = TypeKey::of::<T>();
        match self.inner.bindings.get(&key).and_then(|b| b.typed::<T>()) {
            Some(serializer) => Ok(serializer),
            None => {
                log::error!("No serializer found for type {}", key);
                Err(BsonError::new(
                    &format!("No serializer found for type {}", key),
                    ErrorKind::Lookup,
                ))
            }
        }
    }

    /// Returns the serializer registered for a type known only at runtime.
    pub fn lookup_by_key(&self, key: TypeKey) -> BsonResult<Arc<dyn ErasedBsonSerializer>> {
        match self.inner.bindings.get(&key) {
            Some(binding) => Ok(binding.erased()),
            None => {
                log::error!("No serializer found for type {}", key);
                Err(BsonError::new(
                    &format!("No serializer found for type {}", key),
                    ErrorKind::Lookup,
                ))
            }
        }
    }

    /// Returns the serializer for the generic type `G`, building and caching
    /// it on first use.
    ///
    /// The serializer is built without holding any lock, so building may
    /// recursively look up other generic serializers. When two threads race on
    /// the first lookup, both build, one instance is published and both
    /// callers receive that published instance.
    pub fn lookup_generic<G: GenericBsonType>(
        &self,
    ) -> BsonResult<Arc<dyn BsonSerializer<Value = G::Value>>> {
        let key = GenericTypeKey::new(G::CONSTRUCTOR, TypeKey::of::<G::Argument>());

        let cached = self.inner.generic_bindings.get(&key).map(|b| b.value().clone());
        let binding = match cached {
            Some(binding) => binding,
            None => {
                log::debug!("Creating serializer for generic type {}", key);
                let created = SerializerBinding::new(G::create_serializer(self)?);
                let published = self
                    .inner
                    .generic_bindings
                    .entry(key)
                    .or_insert(created)
                    .value()
                    .clone();
                self.inner
                    .bindings
                    .entry(published.value_type())
                    .or_insert_with(|| published.clone());
                published
            }
        };

        match binding.typed::<G::Value>() {
            Some(serializer) => Ok(serializer),
            None => {
                log::error!("Serializer cached for {} has an unexpected value type", key);
                Err(BsonError::new(
                    &format!("Serializer cached for {} has an unexpected value type", key),
                    ErrorKind::Internal,
                ))
            }
        }
    }

    /// Loads all serializers contributed by `module`.
    pub fn load_module<M: SerializerModule + 'static>(&self, module: M) -> BsonResult<()> {
        module.load(self)?;
        log::debug!("Loaded serializer module {}", std::any::type_name::<M>());
        Ok(())
    }

    pub fn id_generators(&self) -> &IdGeneratorRegistry {
        &self.inner.id_generators
    }

    /// Returns the built-in serializer for [Document].
    pub fn document_serializer(&self) -> BsonResult<Arc<dyn BsonSerializer<Value = Document>>> {
        self.lookup::<Document>()
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        SerializerRegistry::new()
    }
}
