//! # bsonkit wire - request and reply framing
//!
//! Builds the binary messages a driver sends to a document database server
//! and parses its replies. Documents inside messages are encoded and decoded
//! with a bsonkit [CodecConfig](bsonkit::codec_config::CodecConfig).
//!
//! Every message starts with a 16-byte [MessageHeader]. Requests implement
//! [RequestMessage], which frames the body and fills in the final length.
//!
//! ## Module Organization
//!
//! - [`header`] - Message header, opcodes and request ids
//! - [`flags`] - Query, insert and response flag sets
//! - [`query`] - [QueryMessage]
//! - [`insert`] - [InsertMessage] with id assignment
//! - [`reply`] - [ReplyMessage] parsing
//! - [`settings`] - [MessageSettings]

pub mod flags;
pub mod header;
pub mod insert;
pub mod query;
pub mod reply;
mod request;
pub mod settings;

pub use flags::*;
pub use header::*;
pub use insert::*;
pub use query::*;
pub use reply::*;
pub use request::RequestMessage;
pub use settings::*;
