use bsonkit::bson::{Document, Value};
use bsonkit::codec_config::CodecConfig;
use bsonkit::errors::{BsonError, BsonResult, ErrorKind};
use bsonkit::serialization::{BsonDocumentSerializer, BsonIdProvider};

use crate::request::{write_cstring, write_document, write_int32};
use crate::{next_request_id, InsertFlags, MessageOpcode, MessageSettings, RequestMessage};

/// An insert request carrying one or more documents.
///
/// Documents added without an `_id`, or with an id the generator considers
/// unassigned, get a generated id. Documents are always written with `_id`
/// first.
#[derive(Debug, Clone)]
pub struct InsertMessage {
    request_id: i32,
    collection_full_name: String,
    flags: InsertFlags,
    documents: Vec<Document>,
}

impl InsertMessage {
    pub fn new(collection_full_name: &str, flags: InsertFlags) -> Self {
        InsertMessage {
            request_id: next_request_id(),
            collection_full_name: collection_full_name.to_string(),
            flags,
            documents: Vec::new(),
        }
    }

    /// Adds `document`, assigning an id from the generator `config`'s
    /// registry resolves for it. Returns the document's id.
    pub fn add_document(&mut self, mut document: Document, config: &CodecConfig) -> BsonResult<Value> {
        let provider = BsonDocumentSerializer::with_id_generators(config.registry().id_generators().clone());
        let info = provider.get_document_id(&document);

        let generator = info.id_generator;
        let existing = info
            .id
            .filter(|id| generator.as_ref().map_or(true, |generator| !generator.is_empty(id)));

        let id = match (existing, generator) {
            (Some(id), _) => id,
            (None, Some(generator)) => {
                let id = generator.generate_id(&self.collection_full_name, &document)?;
                provider.set_document_id(&mut document, &id)?;
                log::debug!("Assigned id {} to a document for {}", id, self.collection_full_name);
                id
            }
            (None, None) => {
                log::error!("No id generator found for a document without an id");
                return Err(BsonError::new(
                    "No id generator found for a document without an id",
                    ErrorKind::Lookup,
                ));
            }
        };

        self.documents.push(document);
        Ok(id)
    }

    pub fn collection_full_name(&self) -> &str {
        &self.collection_full_name
    }

    pub fn flags(&self) -> InsertFlags {
        self.flags
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

impl RequestMessage for InsertMessage {
    fn opcode(&self) -> MessageOpcode {
        MessageOpcode::Insert
    }

    fn request_id(&self) -> i32 {
        self.request_id
    }

    fn write_body_to(&self, buffer: &mut Vec<u8>, settings: &MessageSettings) -> BsonResult<()> {
        write_int32(buffer, self.flags.bits() as i32);
        write_cstring(buffer, &self.collection_full_name)?;
        for document in &self.documents {
            write_document(buffer, document, settings, true)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MessageHeader, HEADER_SIZE};
    use bsonkit::bson::ObjectId;
    use bsonkit::doc;
    use bsonkit::io::{BsonBinaryReader, BsonReader};
    use bsonkit::serialization::{BsonDeserializationContext, BsonSerializer, SerializerRegistry};

    fn read_documents(bytes: &[u8]) -> Vec<Document> {
        let registry = SerializerRegistry::new();
        let mut reader = BsonBinaryReader::new(bytes);
        let mut documents = Vec::new();
        while !reader.is_at_end() {
            let mut context = BsonDeserializationContext::new(&mut reader, &registry);
            documents.push(BsonDocumentSerializer::instance().deserialize(&mut context).unwrap());
        }
        assert_eq!(reader.position(), bytes.len());
        documents
    }

    #[test]
    fn test_missing_id_is_generated_first() {
        let config = CodecConfig::default();
        let mut message = InsertMessage::new("db.c", InsertFlags::empty());
        let id = message.add_document(doc! { name: "a" }, &config).unwrap();

        assert!(matches!(id, Value::ObjectId(_)));
        let document = &message.documents()[0];
        assert_eq!(document.names().collect::<Vec<_>>(), vec!["_id", "name"]);
        assert_eq!(document.get("_id"), Some(&id));
    }

    #[test]
    fn test_existing_id_is_kept() {
        let config = CodecConfig::default();
        let mut message = InsertMessage::new("db.c", InsertFlags::empty());
        let id = message.add_document(doc! { name: "a", "_id": 7 }, &config).unwrap();
        assert_eq!(id, Value::Int32(7));
        assert_eq!(message.documents()[0].get("_id"), Some(&Value::Int32(7)));
    }

    #[test]
    fn test_empty_object_id_is_replaced_in_place() {
        let config = CodecConfig::default();
        let mut message = InsertMessage::new("db.c", InsertFlags::empty());
        let document = doc! { name: "a", "_id": (ObjectId::empty()) };
        let id = message.add_document(document, &config).unwrap();

        assert_ne!(id, Value::ObjectId(ObjectId::empty()));
        assert_eq!(
            message.documents()[0].names().collect::<Vec<_>>(),
            vec!["name", "_id"]
        );
    }

    #[test]
    fn test_body_writes_id_first() {
        let config = CodecConfig::default();
        let mut message = InsertMessage::new("db.c", InsertFlags::CONTINUE_ON_ERROR);
        message.add_document(doc! { a: 1, "_id": 1 }, &config).unwrap();
        message.add_document(doc! { b: 2 }, &config).unwrap();

        let bytes = message.to_bytes(&MessageSettings::new(config)).unwrap();
        let header = MessageHeader::read_from(&bytes).unwrap();
        assert_eq!(header.opcode, MessageOpcode::Insert);
        assert_eq!(header.message_length as usize, bytes.len());

        let body = &bytes[HEADER_SIZE..];
        assert_eq!(&body[..4], &1i32.to_le_bytes());
        assert_eq!(&body[4..9], b"db.c\0");

        let documents = read_documents(&body[9..]);
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].names().collect::<Vec<_>>(), vec!["_id", "a"]);
        assert_eq!(documents[1].names().collect::<Vec<_>>(), vec!["_id", "b"]);
    }
}
