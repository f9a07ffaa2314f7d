use bsonkit::bson::Document;
use bsonkit::errors::{BsonError, BsonResult, ErrorKind};
use bsonkit::io::BsonBinaryReader;
use bsonkit::serialization::{BsonDeserializationContext, BsonSerializer};

use crate::header::{read_i32, read_i64};
use crate::{MessageHeader, MessageOpcode, MessageSettings, ResponseFlags, HEADER_SIZE};

// header, response flags, cursor id, starting from, number returned
const REPLY_PREFIX_SIZE: usize = HEADER_SIZE + 4 + 8 + 4 + 4;

/// A reply from the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyMessage {
    pub header: MessageHeader,
    pub response_flags: ResponseFlags,
    pub cursor_id: i64,
    pub starting_from: i32,
    pub documents: Vec<Document>,
}

fn format_error(message: &str) -> BsonError {
    log::error!("{}", message);
    BsonError::new(message, ErrorKind::Format)
}

impl ReplyMessage {
    /// Parses one complete reply from `bytes`.
    ///
    /// # Errors
    ///
    /// - `ErrorKind::InvalidOperation` if the declared length exceeds the
    ///   maximum message size
    /// - `ErrorKind::Format` for a wrong opcode, a length that disagrees with
    ///   `bytes`, or a document count that disagrees with the body
    /// - any error raised while decoding the documents
    pub fn read_from(bytes: &[u8], settings: &MessageSettings) -> BsonResult<ReplyMessage> {
        let header = MessageHeader::read_from(bytes)?;
        if header.opcode != MessageOpcode::Reply {
            return Err(format_error(&format!(
                "Expected a reply message but found opcode {}",
                header.opcode
            )));
        }

        let length = usize::try_from(header.message_length).unwrap_or(0);
        if length > settings.max_message_size() {
            log::error!(
                "Message length {} is larger than the maximum message length {}",
                length,
                settings.max_message_size()
            );
            return Err(BsonError::new(
                &format!(
                    "Message length {} is larger than the maximum message length {}",
                    length,
                    settings.max_message_size()
                ),
                ErrorKind::InvalidOperation,
            ));
        }
        if length < REPLY_PREFIX_SIZE || length != bytes.len() {
            return Err(format_error(&format!(
                "Reply message length {} does not match the {} bytes received",
                header.message_length,
                bytes.len()
            )));
        }

        let response_flags = ResponseFlags::from_bits_retain(read_i32(bytes, HEADER_SIZE)? as u32);
        let cursor_id = read_i64(bytes, HEADER_SIZE + 4)?;
        let starting_from = read_i32(bytes, HEADER_SIZE + 12)?;
        let number_returned = read_i32(bytes, HEADER_SIZE + 16)?;
        if number_returned < 0 {
            return Err(format_error(&format!(
                "Reply declares a negative document count {}",
                number_returned
            )));
        }

        let documents = read_documents(&bytes[REPLY_PREFIX_SIZE..], number_returned as usize, settings)?;
        Ok(ReplyMessage {
            header,
            response_flags,
            cursor_id,
            starting_from,
            documents,
        })
    }

    pub fn number_returned(&self) -> usize {
        self.documents.len()
    }
}

fn read_documents(body: &[u8], count: usize, settings: &MessageSettings) -> BsonResult<Vec<Document>> {
    let codec = settings.codec();
    let serializer = codec.registry().lookup::<Document>()?;
    let mut reader = BsonBinaryReader::with_settings(body, codec.binary_settings());
    let mut documents = Vec::with_capacity(count.min(body.len() / 5));

    for _ in 0..count {
        if reader.is_at_end() {
            return Err(format_error(&format!(
                "Reply declares {} documents but contains only {}",
                count,
                documents.len()
            )));
        }
        let mut context = BsonDeserializationContext::new(&mut reader, codec.registry())
            .with_allow_duplicate_element_names(codec.allow_duplicate_element_names());
        documents.push(serializer.deserialize(&mut context)?);
    }

    if !reader.is_at_end() {
        return Err(format_error("Unexpected bytes after the last document of the reply"));
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsonkit::doc;

    fn reply_bytes(flags: u32, cursor_id: i64, documents: &[Document], declared: i32) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut header = MessageHeader::new(11, 42, MessageOpcode::Reply);
        header.write_to(&mut bytes);
        bytes.extend_from_slice(&flags.to_le_bytes());
        bytes.extend_from_slice(&cursor_id.to_le_bytes());
        bytes.extend_from_slice(&3i32.to_le_bytes());
        bytes.extend_from_slice(&declared.to_le_bytes());
        for document in documents {
            bytes.extend_from_slice(&bsonkit::to_vec(document).unwrap());
        }
        header.message_length = bytes.len() as i32;
        bytes[..4].copy_from_slice(&header.message_length.to_le_bytes());
        bytes
    }

    #[test]
    fn test_read_reply() {
        let documents = vec![doc! { "_id": 1, ok: true }, doc! { "_id": 2, tags: ["x"] }];
        let bytes = reply_bytes(8, 12345, &documents, 2);

        let reply = ReplyMessage::read_from(&bytes, &MessageSettings::default()).unwrap();
        assert_eq!(reply.header.response_to, 42);
        assert_eq!(reply.response_flags, ResponseFlags::AWAIT_CAPABLE);
        assert_eq!(reply.cursor_id, 12345);
        assert_eq!(reply.starting_from, 3);
        assert_eq!(reply.number_returned(), 2);
        assert_eq!(reply.documents, documents);
    }

    #[test]
    fn test_empty_reply() {
        let bytes = reply_bytes(0, 0, &[], 0);
        let reply = ReplyMessage::read_from(&bytes, &MessageSettings::default()).unwrap();
        assert!(reply.documents.is_empty());
    }

    #[test]
    fn test_count_mismatch() {
        let documents = vec![doc! { a: 1 }];
        let settings = MessageSettings::default();

        let too_many = reply_bytes(0, 0, &documents, 2);
        assert_eq!(
            ReplyMessage::read_from(&too_many, &settings).unwrap_err().kind(),
            &ErrorKind::Format
        );

        let too_few = reply_bytes(0, 0, &documents, 0);
        assert_eq!(
            ReplyMessage::read_from(&too_few, &settings).unwrap_err().kind(),
            &ErrorKind::Format
        );
    }

    #[test]
    fn test_wrong_opcode() {
        let mut bytes = reply_bytes(0, 0, &[], 0);
        bytes[12..16].copy_from_slice(&MessageOpcode::Query.code().to_le_bytes());
        assert_eq!(
            ReplyMessage::read_from(&bytes, &MessageSettings::default()).unwrap_err().kind(),
            &ErrorKind::Format
        );
    }

    #[test]
    fn test_truncated_reply() {
        let bytes = reply_bytes(0, 0, &[doc! { a: 1 }], 1);
        let truncated = &bytes[..bytes.len() - 3];
        assert!(ReplyMessage::read_from(truncated, &MessageSettings::default()).is_err());
    }

    #[test]
    fn test_reply_too_large() {
        let bytes = reply_bytes(0, 0, &[doc! { a: 1 }], 1);
        let settings = MessageSettings::default().with_max_message_size(REPLY_PREFIX_SIZE);
        assert_eq!(
            ReplyMessage::read_from(&bytes, &settings).unwrap_err().kind(),
            &ErrorKind::InvalidOperation
        );
    }
}
