use bsonkit::bson::Document;
use bsonkit::codec_config::CodecConfig;
use bsonkit::errors::{BsonError, BsonResult, ErrorKind};
use bsonkit::io::{BsonBinaryReader, BsonBinaryWriter, BsonReader};
use bsonkit::serialization::{BsonDeserializationContext, BsonSerializationContext, BsonSerializer};
use bsonkit_geojson::GeoJsonModule;
use std::time::Instant;

/// Codec configuration shared by one test.
#[derive(Clone)]
pub struct TestContext {
    config: CodecConfig,
}

impl TestContext {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

/// A context with a private registry that has the GeoJSON module loaded.
pub fn create_test_context() -> BsonResult<TestContext> {
    let config = CodecConfig::builder().load_module(GeoJsonModule).build()?;
    Ok(TestContext::new(config))
}

/// A context that writes `_id` first.
pub fn create_id_first_test_context() -> BsonResult<TestContext> {
    let config = CodecConfig::builder()
        .load_module(GeoJsonModule)
        .serialize_id_first(true)
        .build()?;
    Ok(TestContext::new(config))
}

/// Runs `test` with the context built by `before` and reports any error
/// with the elapsed time.
pub fn run_test<T, B>(before: B, test: T)
where
    T: Fn(TestContext) -> BsonResult<()>,
    B: Fn() -> BsonResult<TestContext>,
{
    let start_time = Instant::now();
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };
    if let Err(e) = test(ctx) {
        panic!("Test failed after {:?}: {:?}", start_time.elapsed(), e);
    }
}

/// Encodes a top-level value with `serializer`.
pub fn encode<S>(serializer: &S, value: &S::Value, config: &CodecConfig) -> BsonResult<Vec<u8>>
where
    S: BsonSerializer + ?Sized,
{
    let mut writer = BsonBinaryWriter::with_settings(config.binary_settings());
    {
        let mut context = BsonSerializationContext::new(&mut writer, config.registry())
            .with_serialize_id_first(config.serialize_id_first());
        serializer.serialize(&mut context, value)?;
    }
    Ok(writer.into_inner())
}

/// Decodes a top-level value with `serializer`; `bytes` must hold exactly
/// one value.
pub fn decode<S>(serializer: &S, bytes: &[u8], config: &CodecConfig) -> BsonResult<S::Value>
where
    S: BsonSerializer + ?Sized,
{
    let mut reader = BsonBinaryReader::with_settings(bytes, config.binary_settings());
    let value = {
        let mut context = BsonDeserializationContext::new(&mut reader, config.registry())
            .with_allow_duplicate_element_names(config.allow_duplicate_element_names());
        serializer.deserialize(&mut context)?
    };
    if reader.position() != bytes.len() {
        return Err(BsonError::new(
            "Unexpected bytes after the end of the value",
            ErrorKind::Format,
        ));
    }
    Ok(value)
}

/// Encodes and decodes `document` with `config`.
pub fn round_trip(document: &Document, config: &CodecConfig) -> BsonResult<Document> {
    let bytes = bsonkit::to_vec_with(document, config)?;
    bsonkit::from_slice_with(&bytes, config)
}

/// Names of `document`'s elements in order.
pub fn names(document: &Document) -> Vec<String> {
    document.names().map(|name| name.to_string()).collect()
}
