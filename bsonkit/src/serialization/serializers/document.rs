use std::any::Any;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::bson::{BsonType, Document, Value};
use crate::common::{TypeKey, DOC_ID};
use crate::errors::{BsonError, BsonResult, ErrorKind};
use crate::serialization::id::{BinaryDataGuidGenerator, IdGenerator, IdGeneratorRegistry, ObjectIdGenerator};
use crate::serialization::serializers::BsonValueSerializer;
use crate::serialization::{BsonDeserializationContext, BsonSerializationContext, BsonSerializer};

static DOCUMENT_SERIALIZER: Lazy<BsonDocumentSerializer> =
    Lazy::new(|| BsonDocumentSerializer::with_id_generators(IdGeneratorRegistry::global()));

/// A value that is written as a document.
///
/// [Document] is the plain case. Other types wrap a document and can be
/// given their own serializer in the registry; [BsonDocumentSerializer::serialize_dyn]
/// routes them to it based on their runtime type.
pub trait DocumentValue: Any + Send + Sync {
    fn document(&self) -> &Document;

    fn as_any(&self) -> &dyn Any;

    fn value_type(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }
}

impl DocumentValue for Document {
    fn document(&self) -> &Document {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// What a document reports about its identity.
#[derive(Clone)]
pub struct DocumentIdInfo {
    /// The `_id` value, or `None` if the document has no `_id` element.
    pub id: Option<Value>,
    /// The declared type of the id slot. Documents are untyped, so this is
    /// always [Value].
    pub id_nominal_type: TypeKey,
    /// The generator able to produce a new id, if one could be resolved.
    pub id_generator: Option<Arc<dyn IdGenerator>>,
}

/// Identity extraction and injection for a document-like type.
pub trait BsonIdProvider {
    type Document;

    /// Reports the document's id and the generator for new ids. Never fails.
    fn get_document_id(&self, document: &Self::Document) -> DocumentIdInfo;

    /// Stores `id` as the document's identity.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Argument` if `id` is `()` or `None`, or a type that
    /// has no [Value] representation.
    fn set_document_id(&self, document: &mut Self::Document, id: &dyn Any) -> BsonResult<()>;
}

/// Serializer for [Document].
///
/// Elements are written in order through [BsonValueSerializer]. When the
/// context asks for it, the `_id` element is moved to the front; the slot it
/// came from is skipped, so another element with an equal value is still
/// written.
///
/// # Examples
///
/// ```rust
/// use bsonkit::doc;
/// use bsonkit::serialization::{BsonDocumentSerializer, BsonIdProvider};
///
/// let serializer = BsonDocumentSerializer::instance();
/// let mut document = doc! { "name": "a" };
/// assert!(serializer.get_document_id(&document).id.is_none());
///
/// serializer.set_document_id(&mut document, &42i32).unwrap();
/// assert_eq!(document.names().next(), Some("_id"));
/// ```
#[derive(Clone)]
pub struct BsonDocumentSerializer {
    id_generators: IdGeneratorRegistry,
}

impl BsonDocumentSerializer {
    /// The shared serializer backed by the global id generator registry.
    pub fn instance() -> &'static BsonDocumentSerializer {
        &DOCUMENT_SERIALIZER
    }

    pub fn with_id_generators(id_generators: IdGeneratorRegistry) -> Self {
        BsonDocumentSerializer { id_generators }
    }

    /// Serializes any document-like value.
    ///
    /// If the runtime type of `value` is not [Document] and the context is not
    /// pinned to the nominal type, the serializer registered for the runtime
    /// type writes the value instead.
    pub fn serialize_dyn(
        &self,
        context: &mut BsonSerializationContext<'_>,
        value: &dyn DocumentValue,
    ) -> BsonResult<()> {
        let actual_type = value.value_type();
        if actual_type != TypeKey::of::<Document>() && !context.serialize_as_nominal_type() {
            let serializer = context.registry().lookup_by_key(actual_type)?;
            return serializer.serialize_any(context, value.as_any());
        }
        self.serialize(context, value.document())
    }
}

impl Default for BsonDocumentSerializer {
    fn default() -> Self {
        BsonDocumentSerializer::instance().clone()
    }
}

impl BsonSerializer for BsonDocumentSerializer {
    type Value = Document;

    fn deserialize(&self, context: &mut BsonDeserializationContext<'_>) -> BsonResult<Document> {
        let bson_type = context.reader().current_bson_type()?;
        if bson_type != BsonType::Document {
            log::error!("Cannot deserialize Document from BsonType {}.", bson_type);
            return Err(BsonError::new(
                &format!("Cannot deserialize Document from BsonType {}.", bson_type),
                ErrorKind::Format,
            ));
        }

        context.reader().read_start_document()?;
        let mut document = Document::with_options(context.allow_duplicate_element_names());
        while context.reader().read_bson_type()? != BsonType::EndOfDocument {
            let name = context.reader().read_name()?;
            let value = context.deserialize_with_child_context(&BsonValueSerializer)?;
            document.insert(&name, value)?;
        }
        context.reader().read_end_document()?;
        Ok(document)
    }

    fn serialize(&self, context: &mut BsonSerializationContext<'_>, value: &Document) -> BsonResult<()> {
        context.writer().write_start_document()?;

        let id_slot = if context.serialize_id_first() {
            value.position(DOC_ID)
        } else {
            None
        };
        if let Some(element) = id_slot.and_then(|index| value.element_at(index)) {
            context.writer().write_name(element.name())?;
            context.serialize_with_child_context(&BsonValueSerializer, element.value())?;
        }

        for (index, element) in value.iter().enumerate() {
            if id_slot == Some(index) {
                continue;
            }
            context.writer().write_name(element.name())?;
            context.serialize_with_child_context(&BsonValueSerializer, element.value())?;
        }

        context.writer().write_end_document()
    }
}

impl BsonIdProvider for BsonDocumentSerializer {
    type Document = Document;

    fn get_document_id(&self, document: &Document) -> DocumentIdInfo {
        let (id, id_generator) = match document.get(DOC_ID) {
            Some(id) => {
                let generator = self
                    .id_generators
                    .lookup_id_generator(id.runtime_type())
                    .or_else(|| match id {
                        Value::Binary(binary) if binary.subtype().is_uuid() => Some(
                            BinaryDataGuidGenerator::instance(binary.guid_representation()),
                        ),
                        _ => None,
                    });
                (Some(id.clone()), generator)
            }
            None => (None, Some(ObjectIdGenerator::instance())),
        };

        DocumentIdInfo {
            id,
            id_nominal_type: TypeKey::of::<Value>(),
            id_generator,
        }
    }

    fn set_document_id(&self, document: &mut Document, id: &dyn Any) -> BsonResult<()> {
        let missing = id.is::<()>()
            || id
                .downcast_ref::<Option<Value>>()
                .is_some_and(|value| value.is_none());
        if missing {
            log::error!("Document id cannot be null");
            return Err(BsonError::new("Document id cannot be null", ErrorKind::Argument));
        }

        let id = Value::from_any(id)?;
        match document.get_mut(DOC_ID) {
            Some(slot) => {
                *slot = id;
                Ok(())
            }
            None => document.insert_at(0, DOC_ID, id),
        }
    }
}
