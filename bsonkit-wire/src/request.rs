use bsonkit::bson::Document;
use bsonkit::errors::{BsonError, BsonResult, ErrorKind};
use bsonkit::io::BsonBinaryWriter;
use bsonkit::serialization::{BsonSerializationContext, BsonSerializer};

use crate::{MessageHeader, MessageOpcode, MessageSettings, HEADER_SIZE};

/// A message sent from client to server.
///
/// Implementations write only their body; [RequestMessage::to_bytes] frames
/// it with a header and fills in the final length.
pub trait RequestMessage {
    fn opcode(&self) -> MessageOpcode;

    fn request_id(&self) -> i32;

    fn write_body_to(&self, buffer: &mut Vec<u8>, settings: &MessageSettings) -> BsonResult<()>;

    fn to_bytes(&self, settings: &MessageSettings) -> BsonResult<Vec<u8>> {
        let mut buffer = Vec::new();
        MessageHeader::new(self.request_id(), 0, self.opcode()).write_to(&mut buffer);
        self.write_body_to(&mut buffer, settings)?;

        let length = buffer.len();
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

        let length = i32::try_from(length)?;
        buffer[..4].copy_from_slice(&length.to_le_bytes());
        Ok(buffer)
    }
}

pub(crate) fn write_int32(buffer: &mut Vec<u8>, value: i32) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn write_cstring(buffer: &mut Vec<u8>, value: &str) -> BsonResult<()> {
    if value.contains('\0') {
        log::error!("C string '{}' contains a null byte", value.escape_default());
        return Err(BsonError::new(
            &format!("C string '{}' contains a null byte", value.escape_default()),
            ErrorKind::Encoding,
        ));
    }
    buffer.extend_from_slice(value.as_bytes());
    buffer.push(0);
    Ok(())
}

/// Appends `document` to `buffer` with the codec's document serializer.
pub(crate) fn write_document(
    buffer: &mut Vec<u8>,
    document: &Document,
    settings: &MessageSettings,
    serialize_id_first: bool,
) -> BsonResult<()> {
    let codec = settings.codec();
    let serializer = codec.registry().lookup::<Document>()?;
    let mut writer = BsonBinaryWriter::with_buffer(std::mem::take(buffer), codec.binary_settings());
    let result = {
        let mut context = BsonSerializationContext::new(&mut writer, codec.registry())
            .with_serialize_id_first(serialize_id_first);
        serializer.serialize(&mut context, document)
    };
    *buffer = writer.into_inner();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsonkit::doc;

    struct PingMessage {
        payload: Document,
    }

    impl RequestMessage for PingMessage {
        fn opcode(&self) -> MessageOpcode {
            MessageOpcode::Query
        }

        fn request_id(&self) -> i32 {
            99
        }

        fn write_body_to(&self, buffer: &mut Vec<u8>, settings: &MessageSettings) -> BsonResult<()> {
            write_int32(buffer, 0);
            write_document(buffer, &self.payload, settings, false)
        }
    }

    #[test]
    fn test_length_is_back_patched() {
        let message = PingMessage {
            payload: doc! { ping: 1 },
        };
        let bytes = message.to_bytes(&MessageSettings::default()).unwrap();
        let header = MessageHeader::read_from(&bytes).unwrap();
        assert_eq!(header.message_length as usize, bytes.len());
        assert_eq!(header.request_id, 99);
        assert_eq!(header.response_to, 0);
        assert_eq!(bytes.len(), HEADER_SIZE + 4 + 15);
    }

    #[test]
    fn test_message_too_large() {
        let message = PingMessage {
            payload: doc! { ping: 1 },
        };
        let settings = MessageSettings::default().with_max_message_size(HEADER_SIZE + 4);
        let err = message.to_bytes(&settings).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_cstring_rejects_nul() {
        let mut buffer = Vec::new();
        write_cstring(&mut buffer, "db.items").unwrap();
        assert_eq!(buffer, b"db.items\0".to_vec());
        let err = write_cstring(&mut buffer, "db\0items").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Encoding);
    }
}
