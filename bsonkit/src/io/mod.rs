//! Stream cursor over the binary document format.
//!
//! [BsonReader] and [BsonWriter] are the cursor contracts serializers are
//! written against; [BsonBinaryReader] and [BsonBinaryWriter] implement them
//! over byte buffers.

mod binary_reader;
mod binary_writer;
mod reader;
mod settings;
mod writer;

pub use binary_reader::*;
pub use binary_writer::*;
pub use reader::*;
pub use settings::*;
pub use writer::*;
