use crate::bson::GuidRepresentation;
use crate::common::DEFAULT_MAX_DOCUMENT_SIZE;

/// Settings shared by the binary reader and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinarySettings {
    /// Representation assigned to subtype 3 binaries when they are read.
    pub guid_representation: GuidRepresentation,
    /// Largest document, in bytes, the reader accepts and the writer produces.
    pub max_document_size: usize,
}

impl BinarySettings {
    pub fn new(guid_representation: GuidRepresentation, max_document_size: usize) -> Self {
        BinarySettings {
            guid_representation,
            max_document_size,
        }
    }
}

impl Default for BinarySettings {
    fn default() -> Self {
        BinarySettings {
            guid_representation: GuidRepresentation::default(),
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }
}
