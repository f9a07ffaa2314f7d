use std::sync::Arc;

use crate::bson::GuidRepresentation;
use crate::common::DEFAULT_MAX_DOCUMENT_SIZE;
use crate::errors::{BsonError, BsonResult, ErrorKind};
use crate::io::BinarySettings;
use crate::serialization::{SerializerModule, SerializerRegistry};

/// Settings for encoding and decoding documents.
///
/// `CodecConfig` is immutable once built and cheap to clone. Build one with
/// [CodecConfig::builder]; [CodecConfig::default] uses the global registry,
/// the C# legacy guid representation and a 16 MiB document limit.
///
/// # Examples
///
/// ```rust
/// use bsonkit::codec_config::CodecConfig;
/// use bsonkit::bson::GuidRepresentation;
///
/// let config = CodecConfig::builder()
///     .guid_representation(GuidRepresentation::Standard)
///     .serialize_id_first(true)
///     .build()
///     .unwrap();
/// assert!(config.serialize_id_first());
/// ```
#[derive(Clone)]
pub struct CodecConfig {
    inner: Arc<CodecConfigInner>,
}

struct CodecConfigInner {
    guid_representation: GuidRepresentation,
    max_document_size: usize,
    allow_duplicate_element_names: bool,
    serialize_id_first: bool,
    registry: SerializerRegistry,
}

impl CodecConfig {
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::new()
    }

    pub fn guid_representation(&self) -> GuidRepresentation {
        self.inner.guid_representation
    }

    pub fn max_document_size(&self) -> usize {
        self.inner.max_document_size
    }

    pub fn allow_duplicate_element_names(&self) -> bool {
        self.inner.allow_duplicate_element_names
    }

    pub fn serialize_id_first(&self) -> bool {
        self.inner.serialize_id_first
    }

    pub fn registry(&self) -> &SerializerRegistry {
        &self.inner.registry
    }

    /// Settings for the binary reader and writer.
    pub fn binary_settings(&self) -> BinarySettings {
        BinarySettings::new(self.inner.guid_representation, self.inner.max_document_size)
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            inner: Arc::new(CodecConfigInner {
                guid_representation: GuidRepresentation::default(),
                max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
                allow_duplicate_element_names: false,
                serialize_id_first: false,
                registry: SerializerRegistry::global(),
            }),
        }
    }
}

/// Fluent builder for [CodecConfig].
///
/// The first invalid setting is remembered and reported by
/// [CodecConfigBuilder::build]; later settings are ignored.
pub struct CodecConfigBuilder {
    error: Option<BsonError>,
    guid_representation: GuidRepresentation,
    max_document_size: usize,
    allow_duplicate_element_names: bool,
    serialize_id_first: bool,
    registry: Option<SerializerRegistry>,
}

impl CodecConfigBuilder {
    pub fn new() -> Self {
        CodecConfigBuilder {
            error: None,
            guid_representation: GuidRepresentation::default(),
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
            allow_duplicate_element_names: false,
            serialize_id_first: false,
            registry: None,
        }
    }

    pub fn guid_representation(mut self, guid_representation: GuidRepresentation) -> Self {
        self.guid_representation = guid_representation;
        self
    }

    pub fn max_document_size(mut self, max_document_size: usize) -> Self {
        if self.error.is_none() && max_document_size < crate::common::MIN_DOCUMENT_SIZE {
            log::error!("Maximum document size {} is too small", max_document_size);
            self.error = Some(BsonError::new(
                &format!("Maximum document size {} is too small", max_document_size),
                ErrorKind::Argument,
            ));
        }
        self.max_document_size = max_document_size;
        self
    }

    pub fn allow_duplicate_element_names(mut self, allow: bool) -> Self {
        self.allow_duplicate_element_names = allow;
        self
    }

    pub fn serialize_id_first(mut self, serialize_id_first: bool) -> Self {
        self.serialize_id_first = serialize_id_first;
        self
    }

    /// Uses `registry` instead of the global registry.
    pub fn registry(mut self, registry: SerializerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Loads `module` into the configured registry.
    ///
    /// Without an explicit registry, a fresh registry with the built-in
    /// serializers is created so the global one is left untouched.
    pub fn load_module<M: SerializerModule + 'static>(mut self, module: M) -> Self {
        if self.error.is_none() {
            let registry = self.registry.get_or_insert_with(SerializerRegistry::new);
            if let Err(e) = registry.load_module(module) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn build(self) -> BsonResult<CodecConfig> {
        if let Some(error) = self.error {
            return Err(error);
        }

        Ok(CodecConfig {
            inner: Arc::new(CodecConfigInner {
                guid_representation: self.guid_representation,
                max_document_size: self.max_document_size,
                allow_duplicate_element_names: self.allow_duplicate_element_names,
                serialize_id_first: self.serialize_id_first,
                registry: self.registry.unwrap_or_else(SerializerRegistry::global),
            }),
        })
    }
}

impl Default for CodecConfigBuilder {
    fn default() -> Self {
        CodecConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::BsonSerializer;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.guid_representation(), GuidRepresentation::CSharpLegacy);
        assert_eq!(config.max_document_size(), DEFAULT_MAX_DOCUMENT_SIZE);
        assert!(!config.allow_duplicate_element_names());
        assert!(!config.serialize_id_first());
        assert_eq!(config.binary_settings(), BinarySettings::default());
    }

    #[test]
    fn test_builder_sets_values() {
        let config = CodecConfig::builder()
            .guid_representation(GuidRepresentation::PythonLegacy)
            .max_document_size(1024)
            .allow_duplicate_element_names(true)
            .serialize_id_first(true)
            .build()
            .unwrap();
        assert_eq!(config.guid_representation(), GuidRepresentation::PythonLegacy);
        assert_eq!(config.binary_settings().max_document_size, 1024);
        assert!(config.allow_duplicate_element_names());
        assert!(config.serialize_id_first());
    }

    #[test]
    fn test_builder_keeps_first_error() {
        let result = CodecConfig::builder()
            .max_document_size(0)
            .max_document_size(1)
            .build();
        let err = result.err().unwrap();
        assert_eq!(err.kind(), &ErrorKind::Argument);
        assert!(err.message().contains(" 0 "));
    }

    struct Marker;

    struct MarkerSerializer;

    impl BsonSerializer for MarkerSerializer {
        type Value = Marker;

        fn deserialize(
            &self,
            context: &mut crate::serialization::BsonDeserializationContext<'_>,
        ) -> BsonResult<Marker> {
            context.reader().read_null()?;
            Ok(Marker)
        }

        fn serialize(
            &self,
            context: &mut crate::serialization::BsonSerializationContext<'_>,
            _value: &Marker,
        ) -> BsonResult<()> {
            context.writer().write_null()
        }
    }

    struct MarkerModule;

    impl SerializerModule for MarkerModule {
        fn load(&self, registry: &SerializerRegistry) -> BsonResult<()> {
            registry.register(MarkerSerializer)
        }
    }

    #[test]
    fn test_builder_loads_module_into_private_registry() {
        let config = CodecConfig::builder().load_module(MarkerModule).build().unwrap();
        assert!(config.registry().contains::<Marker>());
        assert!(config.registry().contains::<i32>());
        assert!(!SerializerRegistry::global().contains::<Marker>());
    }

    #[test]
    fn test_builder_reports_module_error() {
        let result = CodecConfig::builder()
            .load_module(MarkerModule)
            .load_module(MarkerModule)
            .build();
        assert_eq!(result.err().unwrap().kind(), &ErrorKind::InvalidOperation);
    }
}
