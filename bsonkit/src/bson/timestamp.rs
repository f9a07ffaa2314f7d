use std::fmt::{Display, Formatter};

/// Internal replication timestamp: seconds plus an ordinal within the second.
///
/// On the wire the increment occupies the low four bytes and the time the
/// high four bytes of a little-endian 64-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    pub time: u32,
    pub increment: u32,
}

impl Timestamp {
    pub fn new(time: u32, increment: u32) -> Self {
        Timestamp { time, increment }
    }

    pub fn to_u64(&self) -> u64 {
        ((self.time as u64) << 32) | self.increment as u64
    }

    pub fn from_u64(value: u64) -> Self {
        Timestamp {
            time: (value >> 32) as u32,
            increment: value as u32,
        }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timestamp({}, {})", self.time, self.increment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing() {
        let ts = Timestamp::new(1, 2);
        assert_eq!(ts.to_u64(), (1u64 << 32) | 2);
        assert_eq!(Timestamp::from_u64(ts.to_u64()), ts);
    }

    #[test]
    fn test_ordering_uses_time_first() {
        assert!(Timestamp::new(1, 100) < Timestamp::new(2, 0));
        assert!(Timestamp::new(1, 1) < Timestamp::new(1, 2));
    }
}
