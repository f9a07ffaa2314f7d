use crate::errors::{BsonError, BsonResult, ErrorKind};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::Rng;
use std::fmt::{Debug, Display};
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const COUNTER_MASK: u32 = 0x00FF_FFFF;

// Process-unique bytes, fixed for the lifetime of the process.
static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| {
    let mut bytes = [0u8; 5];
    OsRng.fill(&mut bytes);
    log::debug!("Initialized object id process bytes");
    bytes
});

static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(OsRng.gen_range(0..=COUNTER_MASK)));

/// A 12-byte document identifier.
///
/// The layout is a 4-byte big-endian seconds timestamp, 5 process-unique
/// random bytes and a 3-byte big-endian counter. Ids generated by the same
/// process within one second are strictly ordered by the counter.
///
/// # Examples
///
/// ```rust
/// use bsonkit::bson::ObjectId;
///
/// let id = ObjectId::new();
/// let parsed: ObjectId = id.to_hex().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId {
    bytes: [u8; 12],
}

impl ObjectId {
    /// Generates a new unique id.
    pub fn new() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        ObjectId { bytes }
    }

    /// Creates an id from its raw bytes.
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        ObjectId { bytes }
    }

    /// The all-zero id, used as the empty value by identity generators.
    pub fn empty() -> Self {
        ObjectId { bytes: [0u8; 12] }
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes == [0u8; 12]
    }

    /// Seconds since the Unix epoch at creation time.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Parses a 24 character hex string.
    pub fn parse_str(text: &str) -> BsonResult<Self> {
        if text.len() != 24 || !text.is_ascii() {
            log::error!("Invalid object id string: {}", text);
            return Err(BsonError::new(
                &format!("'{}' is not a valid 24 digit hex object id", text),
                ErrorKind::Argument,
            ));
        }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&text[i * 2..i * 2 + 2], 16).map_err(|_| {
                log::error!("Invalid object id string: {}", text);
                BsonError::new(
                    &format!("'{}' is not a valid 24 digit hex object id", text),
                    ErrorKind::Argument,
                )
            })?;
        }
        Ok(ObjectId { bytes })
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::new()
    }
}

impl FromStr for ObjectId {
    type Err = BsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}
