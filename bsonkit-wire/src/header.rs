use bsonkit::errors::{BsonError, BsonResult, ErrorKind};
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicI32, Ordering};

/// Size of [MessageHeader] on the wire.
pub const HEADER_SIZE: usize = 16;

static NEXT_REQUEST_ID: AtomicI32 = AtomicI32::new(1);

/// Returns a process-wide unique request id.
pub fn next_request_id() -> i32 {
    NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)
}

/// Operation code in a message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MessageOpcode {
    Reply = 1,
    Update = 2001,
    Insert = 2002,
    Query = 2004,
    GetMore = 2005,
    Delete = 2006,
    KillCursors = 2007,
}

impl MessageOpcode {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn from_code(code: i32) -> Option<MessageOpcode> {
        match code {
            1 => Some(MessageOpcode::Reply),
            2001 => Some(MessageOpcode::Update),
            2002 => Some(MessageOpcode::Insert),
            2004 => Some(MessageOpcode::Query),
            2005 => Some(MessageOpcode::GetMore),
            2006 => Some(MessageOpcode::Delete),
            2007 => Some(MessageOpcode::KillCursors),
            _ => None,
        }
    }
}

impl Display for MessageOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

/// The 16-byte prefix of every message.
///
/// `message_length` counts the whole message, header included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub message_length: i32,
    pub request_id: i32,
    pub response_to: i32,
    pub opcode: MessageOpcode,
}

impl MessageHeader {
    pub fn new(request_id: i32, response_to: i32, opcode: MessageOpcode) -> Self {
        MessageHeader {
            message_length: 0,
            request_id,
            response_to,
            opcode,
        }
    }

    pub fn write_to(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&self.message_length.to_le_bytes());
        buffer.extend_from_slice(&self.request_id.to_le_bytes());
        buffer.extend_from_slice(&self.response_to.to_le_bytes());
        buffer.extend_from_slice(&self.opcode.code().to_le_bytes());
    }

    pub fn read_from(bytes: &[u8]) -> BsonResult<MessageHeader> {
        let message_length = read_i32(bytes, 0)?;
        let request_id = read_i32(bytes, 4)?;
        let response_to = read_i32(bytes, 8)?;
        let code = read_i32(bytes, 12)?;
        let opcode = match MessageOpcode::from_code(code) {
            Some(opcode) => opcode,
            None => {
                log::error!("Unknown message opcode {}", code);
                return Err(BsonError::new(
                    &format!("Unknown message opcode {}", code),
                    ErrorKind::Format,
                ));
            }
        };

        Ok(MessageHeader {
            message_length,
            request_id,
            response_to,
            opcode,
        })
    }
}

fn read_bytes<const N: usize>(bytes: &[u8], offset: usize) -> BsonResult<[u8; N]> {
    match offset.checked_add(N).and_then(|end| bytes.get(offset..end)) {
        Some(slice) => {
            let mut value = [0u8; N];
            value.copy_from_slice(slice);
            Ok(value)
        }
        None => {
            log::error!(
                "Unexpected end of message: needed {} bytes at offset {}, message has {}",
                N,
                offset,
                bytes.len()
            );
            Err(BsonError::new(
                &format!("Unexpected end of message: needed {} bytes at offset {}", N, offset),
                ErrorKind::Stream,
            ))
        }
    }
}

pub(crate) fn read_i32(bytes: &[u8], offset: usize) -> BsonResult<i32> {
    read_bytes::<4>(bytes, offset).map(i32::from_le_bytes)
}

pub(crate) fn read_i64(bytes: &[u8], offset: usize) -> BsonResult<i64> {
    read_bytes::<8>(bytes, offset).map(i64::from_le_bytes)
}
