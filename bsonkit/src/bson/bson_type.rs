use std::fmt::{Display, Formatter};

use crate::errors::{BsonError, BsonResult, ErrorKind};

/// The one-byte type tag that precedes every element in the binary format.
///
/// `EndOfDocument` is the reserved tag that terminates documents and arrays;
/// readers return it as the loop sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BsonType {
    EndOfDocument = 0x00,
    Double = 0x01,
    String = 0x02,
    Document = 0x03,
    Array = 0x04,
    Binary = 0x05,
    Undefined = 0x06,
    ObjectId = 0x07,
    Boolean = 0x08,
    DateTime = 0x09,
    Null = 0x0A,
    RegularExpression = 0x0B,
    JavaScript = 0x0D,
    Symbol = 0x0E,
    JavaScriptWithScope = 0x0F,
    Int32 = 0x10,
    Timestamp = 0x11,
    Int64 = 0x12,
    Decimal128 = 0x13,
    MinKey = 0xFF,
    MaxKey = 0x7F,
}

impl BsonType {
    /// Returns the tag byte.
    #[inline]
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    /// Parses a tag byte read from a stream.
    ///
    /// The deprecated DBPointer tag (`0x0C`) is rejected like any other unknown tag.
    pub fn from_tag(tag: u8) -> BsonResult<BsonType> {
        let bson_type = match tag {
            0x00 => BsonType::EndOfDocument,
            0x01 => BsonType::Double,
            0x02 => BsonType::String,
            0x03 => BsonType::Document,
            0x04 => BsonType::Array,
            0x05 => BsonType::Binary,
            0x06 => BsonType::Undefined,
            0x07 => BsonType::ObjectId,
            0x08 => BsonType::Boolean,
            0x09 => BsonType::DateTime,
            0x0A => BsonType::Null,
            0x0B => BsonType::RegularExpression,
            0x0D => BsonType::JavaScript,
            0x0E => BsonType::Symbol,
            0x0F => BsonType::JavaScriptWithScope,
            0x10 => BsonType::Int32,
            0x11 => BsonType::Timestamp,
            0x12 => BsonType::Int64,
            0x13 => BsonType::Decimal128,
            0xFF => BsonType::MinKey,
            0x7F => BsonType::MaxKey,
            _ => {
                log::error!("Unsupported BSON type tag 0x{:02X}", tag);
                return Err(BsonError::new(
                    &format!("Unsupported BSON type tag 0x{:02X}", tag),
                    ErrorKind::Format,
                ));
            }
        };
        Ok(bson_type)
    }
}

impl Display for BsonType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BsonType::EndOfDocument => "EndOfDocument",
            BsonType::Double => "Double",
            BsonType::String => "String",
            BsonType::Document => "Document",
            BsonType::Array => "Array",
            BsonType::Binary => "Binary",
            BsonType::Undefined => "Undefined",
            BsonType::ObjectId => "ObjectId",
            BsonType::Boolean => "Boolean",
            BsonType::DateTime => "DateTime",
            BsonType::Null => "Null",
            BsonType::RegularExpression => "RegularExpression",
            BsonType::JavaScript => "JavaScript",
            BsonType::Symbol => "Symbol",
            BsonType::JavaScriptWithScope => "JavaScriptWithScope",
            BsonType::Int32 => "Int32",
            BsonType::Timestamp => "Timestamp",
            BsonType::Int64 => "Int64",
            BsonType::Decimal128 => "Decimal128",
            BsonType::MinKey => "MinKey",
            BsonType::MaxKey => "MaxKey",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trips_for_every_kind() {
        let kinds = [
            BsonType::EndOfDocument,
            BsonType::Double,
            BsonType::String,
            BsonType::Document,
            BsonType::Array,
            BsonType::Binary,
            BsonType::Undefined,
            BsonType::ObjectId,
            BsonType::Boolean,
            BsonType::DateTime,
            BsonType::Null,
            BsonType::RegularExpression,
            BsonType::JavaScript,
            BsonType::Symbol,
            BsonType::JavaScriptWithScope,
            BsonType::Int32,
            BsonType::Timestamp,
            BsonType::Int64,
            BsonType::Decimal128,
            BsonType::MinKey,
            BsonType::MaxKey,
        ];
        for kind in kinds {
            assert_eq!(BsonType::from_tag(kind.tag()).unwrap(), kind);
        }
    }

    #[test]
    fn test_db_pointer_is_rejected() {
        let err = BsonType::from_tag(0x0C).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Format);
        assert!(err.message().contains("0x0C"));
    }

    #[test]
    fn test_display() {
        assert_eq!(BsonType::RegularExpression.to_string(), "RegularExpression");
        assert_eq!(BsonType::Int32.to_string(), "Int32");
    }
}
