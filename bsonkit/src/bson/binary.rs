use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use uuid::Uuid;

use crate::errors::{BsonError, BsonResult, ErrorKind};

/// Binary subtype byte stored after the length of a binary payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinarySubType {
    Generic,
    Function,
    OldBinary,
    UuidLegacy,
    UuidStandard,
    Md5,
    Encrypted,
    Column,
    Sensitive,
    /// Subtypes in the user-defined range `0x80..=0xFF`.
    UserDefined(u8),
}

impl BinarySubType {
    pub fn tag(&self) -> u8 {
        match self {
            BinarySubType::Generic => 0x00,
            BinarySubType::Function => 0x01,
            BinarySubType::OldBinary => 0x02,
            BinarySubType::UuidLegacy => 0x03,
            BinarySubType::UuidStandard => 0x04,
            BinarySubType::Md5 => 0x05,
            BinarySubType::Encrypted => 0x06,
            BinarySubType::Column => 0x07,
            BinarySubType::Sensitive => 0x08,
            BinarySubType::UserDefined(tag) => *tag,
        }
    }

    pub fn from_tag(tag: u8) -> BsonResult<BinarySubType> {
        let subtype = match tag {
            0x00 => BinarySubType::Generic,
            0x01 => BinarySubType::Function,
            0x02 => BinarySubType::OldBinary,
            0x03 => BinarySubType::UuidLegacy,
            0x04 => BinarySubType::UuidStandard,
            0x05 => BinarySubType::Md5,
            0x06 => BinarySubType::Encrypted,
            0x07 => BinarySubType::Column,
            0x08 => BinarySubType::Sensitive,
            0x80..=0xFF => BinarySubType::UserDefined(tag),
            _ => {
                log::error!("Unsupported binary subtype 0x{:02X}", tag);
                return Err(BsonError::new(
                    &format!("Unsupported binary subtype 0x{:02X}", tag),
                    ErrorKind::Format,
                ));
            }
        };
        Ok(subtype)
    }

    /// Returns true for the two subtypes that carry a 16-byte UUID.
    pub fn is_uuid(&self) -> bool {
        matches!(self, BinarySubType::UuidLegacy | BinarySubType::UuidStandard)
    }
}

/// Byte order used to store a UUID in a binary value.
///
/// `Standard` is RFC 4122 order with subtype 4. The legacy representations
/// all use subtype 3 and differ only in byte order, so a subtype 3 binary
/// cannot be decoded without knowing which one was used to write it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GuidRepresentation {
    Unspecified,
    Standard,
    #[default]
    CSharpLegacy,
    JavaLegacy,
    PythonLegacy,
}

impl GuidRepresentation {
    fn is_legacy(&self) -> bool {
        matches!(
            self,
            GuidRepresentation::CSharpLegacy
                | GuidRepresentation::JavaLegacy
                | GuidRepresentation::PythonLegacy
        )
    }
}

/// A binary blob tagged with a subtype.
///
/// Equality and hashing consider the subtype and the bytes, which is what
/// reaches the wire; the guid representation is interpretation metadata.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binary {
    subtype: BinarySubType,
    bytes: Vec<u8>,
    guid_representation: GuidRepresentation,
}

impl Binary {
    /// Creates a binary value. Subtype 3 defaults to the C# legacy
    /// representation and subtype 4 to the standard one.
    pub fn new(subtype: BinarySubType, bytes: Vec<u8>) -> Self {
        let guid_representation = match subtype {
            BinarySubType::UuidLegacy => GuidRepresentation::CSharpLegacy,
            BinarySubType::UuidStandard => GuidRepresentation::Standard,
            _ => GuidRepresentation::Unspecified,
        };
        Binary {
            subtype,
            bytes,
            guid_representation,
        }
    }

    /// Creates a binary value with an explicit guid representation.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Argument` if a UUID subtype does not carry exactly
    /// 16 bytes or if the representation contradicts the subtype.
    pub fn with_guid_representation(
        subtype: BinarySubType,
        bytes: Vec<u8>,
        guid_representation: GuidRepresentation,
    ) -> BsonResult<Self> {
        if subtype.is_uuid() && bytes.len() != 16 {
            log::error!("UUID binary data must be 16 bytes, got {}", bytes.len());
            return Err(BsonError::new(
                &format!("UUID binary data must be 16 bytes, got {}", bytes.len()),
                ErrorKind::Argument,
            ));
        }

        let consistent = match subtype {
            BinarySubType::UuidStandard => guid_representation == GuidRepresentation::Standard,
            BinarySubType::UuidLegacy => {
                guid_representation.is_legacy()
                    || guid_representation == GuidRepresentation::Unspecified
            }
            _ => guid_representation == GuidRepresentation::Unspecified,
        };
        if !consistent {
            log::error!(
                "Guid representation {:?} is not valid for binary subtype {:?}",
                guid_representation,
                subtype
            );
            return Err(BsonError::new(
                &format!(
                    "Guid representation {:?} is not valid for binary subtype {:?}",
                    guid_representation, subtype
                ),
                ErrorKind::Argument,
            ));
        }

        Ok(Binary {
            subtype,
            bytes,
            guid_representation,
        })
    }

    /// Encodes a UUID using the given representation.
    pub fn from_uuid(uuid: Uuid, guid_representation: GuidRepresentation) -> BsonResult<Self> {
        let mut bytes = *uuid.as_bytes();
        let subtype = match guid_representation {
            GuidRepresentation::Standard => BinarySubType::UuidStandard,
            GuidRepresentation::CSharpLegacy => {
                swap_csharp_byte_order(&mut bytes);
                BinarySubType::UuidLegacy
            }
            GuidRepresentation::JavaLegacy => {
                swap_java_byte_order(&mut bytes);
                BinarySubType::UuidLegacy
            }
            GuidRepresentation::PythonLegacy => BinarySubType::UuidLegacy,
            GuidRepresentation::Unspecified => {
                log::error!("Cannot encode a UUID with an unspecified guid representation");
                return Err(BsonError::new(
                    "Cannot encode a UUID with an unspecified guid representation",
                    ErrorKind::Argument,
                ));
            }
        };
        Binary::with_guid_representation(subtype, bytes.to_vec(), guid_representation)
    }

    /// Decodes the UUID held by a subtype 3 or 4 binary.
    pub fn to_uuid(&self) -> BsonResult<Uuid> {
        if !self.subtype.is_uuid() || self.bytes.len() != 16 {
            log::error!("Binary subtype {:?} does not hold a UUID", self.subtype);
            return Err(BsonError::new(
                &format!("Binary subtype {:?} does not hold a UUID", self.subtype),
                ErrorKind::Argument,
            ));
        }

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&self.bytes);
        match self.guid_representation {
            GuidRepresentation::Standard | GuidRepresentation::PythonLegacy => {}
            GuidRepresentation::CSharpLegacy => swap_csharp_byte_order(&mut bytes),
            GuidRepresentation::JavaLegacy => swap_java_byte_order(&mut bytes),
            GuidRepresentation::Unspecified => {
                log::error!("Cannot decode a UUID with an unspecified guid representation");
                return Err(BsonError::new(
                    "Cannot decode a UUID with an unspecified guid representation",
                    ErrorKind::Argument,
                ));
            }
        }
        Ok(Uuid::from_bytes(bytes))
    }

    pub fn subtype(&self) -> BinarySubType {
        self.subtype
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn guid_representation(&self) -> GuidRepresentation {
        self.guid_representation
    }
}

// The C# layout stores the first three UUID fields little-endian.
fn swap_csharp_byte_order(bytes: &mut [u8; 16]) {
    bytes[0..4].reverse();
    bytes[4..6].reverse();
    bytes[6..8].reverse();
}

// The Java layout stores each 8-byte half reversed.
fn swap_java_byte_order(bytes: &mut [u8; 16]) {
    bytes[0..8].reverse();
    bytes[8..16].reverse();
}

impl PartialEq for Binary {
    fn eq(&self, other: &Self) -> bool {
        self.subtype == other.subtype && self.bytes == other.bytes
    }
}

impl Eq for Binary {}

impl Hash for Binary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subtype.hash(state);
        self.bytes.hash(state);
    }
}

impl Display for Binary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Binary(0x{:02X}, ", self.subtype.tag())?;
        for byte in &self.bytes {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Binary::new(BinarySubType::Generic, bytes)
    }
}
