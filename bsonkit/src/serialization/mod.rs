//! Typed (de)serialization on top of the stream cursor.
//!
//! A [SerializerRegistry] maps Rust types to [BsonSerializer]s. Serializers
//! read and write through a context that carries the cursor and the
//! per-operation flags, and recurse into nested values through child
//! contexts.
mod context;
pub mod id;
mod module;
mod registry;
mod serializer;
mod serializers;

pub use context::*;
pub use module::*;
pub use registry::*;
pub use serializer::*;
pub use serializers::*;
