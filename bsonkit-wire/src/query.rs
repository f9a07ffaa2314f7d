use bsonkit::bson::Document;
use bsonkit::errors::BsonResult;

use crate::request::{write_cstring, write_document, write_int32};
use crate::{next_request_id, MessageOpcode, MessageSettings, QueryFlags, RequestMessage};

/// A query request.
///
/// The body is laid out as flags, the full collection name, the number of
/// documents to skip and to return, the query document and, only when set,
/// the field projection. A missing query is sent as an empty document.
///
/// # Examples
///
/// ```rust
/// use bsonkit::doc;
/// use bsonkit_wire::{MessageSettings, QueryFlags, QueryMessage, RequestMessage};
///
/// let message = QueryMessage::new(
///     "app.users",
///     QueryFlags::SLAVE_OK,
///     0,
///     10,
///     Some(doc! { name: "Alice" }),
///     None,
/// );
/// let bytes = message.to_bytes(&MessageSettings::default()).unwrap();
/// assert_eq!(i32::from_le_bytes(bytes[..4].try_into().unwrap()) as usize, bytes.len());
/// ```
#[derive(Debug, Clone)]
pub struct QueryMessage {
    request_id: i32,
    collection_full_name: String,
    flags: QueryFlags,
    number_to_skip: i32,
    number_to_return: i32,
    query: Option<Document>,
    fields: Option<Document>,
}

impl QueryMessage {
    pub fn new(
        collection_full_name: &str,
        flags: QueryFlags,
        number_to_skip: i32,
        number_to_return: i32,
        query: Option<Document>,
        fields: Option<Document>,
    ) -> Self {
        QueryMessage {
            request_id: next_request_id(),
            collection_full_name: collection_full_name.to_string(),
            flags,
            number_to_skip,
            number_to_return,
            query,
            fields,
        }
    }

    pub fn collection_full_name(&self) -> &str {
        &self.collection_full_name
    }

    pub fn flags(&self) -> QueryFlags {
        self.flags
    }

    pub fn number_to_skip(&self) -> i32 {
        self.number_to_skip
    }

    pub fn number_to_return(&self) -> i32 {
        self.number_to_return
    }

    pub fn query(&self) -> Option<&Document> {
        self.query.as_ref()
    }

    pub fn fields(&self) -> Option<&Document> {
        self.fields.as_ref()
    }
}

impl RequestMessage for QueryMessage {
    fn opcode(&self) -> MessageOpcode {
        MessageOpcode::Query
    }

    fn request_id(&self) -> i32 {
        self.request_id
    }

    fn write_body_to(&self, buffer: &mut Vec<u8>, settings: &MessageSettings) -> BsonResult<()> {
        let id_first = settings.codec().serialize_id_first();
        write_int32(buffer, self.flags.bits() as i32);
        write_cstring(buffer, &self.collection_full_name)?;
        write_int32(buffer, self.number_to_skip);
        write_int32(buffer, self.number_to_return);

        match &self.query {
            Some(query) => write_document(buffer, query, settings, id_first)?,
            None => write_document(buffer, &Document::new(), settings, id_first)?,
        }
        if let Some(fields) = &self.fields {
            write_document(buffer, fields, settings, id_first)?;
        }
        Ok(())
    }
}
