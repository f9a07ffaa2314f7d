#![allow(clippy::ptr_arg, clippy::new_without_default)]
//! # bsonkit - BSON codec with a pluggable serializer registry
//!
//! bsonkit maps between the self-describing binary document format and
//! typed Rust values. Every type is read and written by a serializer looked
//! up in a registry, so extension crates can plug in their own types and
//! composite serializers recurse through the same machinery as the built-in
//! ones.
//!
//! ## Quick Start
//!
//! ```rust
//! use bsonkit::doc;
//!
//! let document = doc! {
//!     "_id": 1,
//!     name: "Alice",
//!     tags: ["admin", "ops"],
//!     address: { city: "Paris" },
//! };
//!
//! let bytes = bsonkit::to_vec(&document).unwrap();
//! let decoded = bsonkit::from_slice(&bytes).unwrap();
//! assert_eq!(decoded, document);
//! ```
//!
//! ## Module Organization
//!
//! - [`bson`] - Value model: [`bson::Document`], [`bson::Value`] and the scalar types
//! - [`io`] - Stream cursor traits and the binary reader and writer
//! - [`serialization`] - Serializer registry, contexts, built-in serializers and id generators
//! - [`codec_config`] - Codec settings and builder
//! - [`common`] - Shared types and constants
//! - [`errors`] - Error types and result definitions

use crate::bson::Document;
use crate::codec_config::CodecConfig;
use crate::errors::{BsonError, BsonResult, ErrorKind};
use crate::io::{BsonBinaryReader, BsonBinaryWriter};
use crate::serialization::{BsonDeserializationContext, BsonSerializationContext, BsonSerializer};

pub mod bson;
pub mod codec_config;
pub mod common;
pub mod errors;
pub mod io;
pub mod serialization;

/// Encodes `document` with the default configuration.
pub fn to_vec(document: &Document) -> BsonResult<Vec<u8>> {
    to_vec_with(document, &CodecConfig::default())
}

/// Encodes `document` with the serializer registered for [Document] in
/// `config`'s registry.
pub fn to_vec_with(document: &Document, config: &CodecConfig) -> BsonResult<Vec<u8>> {
    let serializer = config.registry().lookup::<Document>()?;
    let mut writer = BsonBinaryWriter::with_settings(config.binary_settings());
    {
        let mut context = BsonSerializationContext::new(&mut writer, config.registry())
            .with_serialize_id_first(config.serialize_id_first());
        serializer.serialize(&mut context, document)?;
    }
    Ok(writer.into_inner())
}

/// Decodes one document with the default configuration.
pub fn from_slice(bytes: &[u8]) -> BsonResult<Document> {
    from_slice_with(bytes, &CodecConfig::default())
}

/// Decodes one document; `bytes` must hold exactly one encoded document.
pub fn from_slice_with(bytes: &[u8], config: &CodecConfig) -> BsonResult<Document> {
    let serializer = config.registry().lookup::<Document>()?;
    let mut reader = BsonBinaryReader::with_settings(bytes, config.binary_settings());
    let document = {
        let mut context = BsonDeserializationContext::new(&mut reader, config.registry())
            .with_allow_duplicate_element_names(config.allow_duplicate_element_names());
        serializer.deserialize(&mut context)?
    };

    if !reader.is_at_end() {
        log::error!("Unexpected bytes after the end of the document");
        return Err(BsonError::new(
            "Unexpected bytes after the end of the document",
            ErrorKind::Format,
        ));
    }
    Ok(document)
}
