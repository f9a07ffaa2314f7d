use std::any::Any;
use std::fmt::{Debug, Display, Formatter};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::bson::{Binary, BinarySubType, BsonType, Document, ObjectId, Regex, Timestamp};
use crate::common::TypeKey;
use crate::errors::{BsonError, BsonResult, ErrorKind};

/// A single value of the binary document format.
///
/// There is one variant per BSON kind, so a value always knows which type tag
/// it is written with (see [Value::bson_type]). Values form a tree: documents
/// and arrays own their children.
///
/// Create values with the `From` conversions or the [doc!](crate::doc) macro:
/// ```rust
/// use bsonkit::bson::Value;
/// use bsonkit::doc;
///
/// let v: Value = 42.into();
/// assert_eq!(v, Value::Int32(42));
///
/// let document = doc! { "name": "Alice", "tags": ["a", "b"] };
/// assert_eq!(document.get("name"), Some(&Value::String("Alice".to_string())));
/// ```
#[derive(Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// 64-bit IEEE 754 floating point.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Embedded document.
    Document(Document),
    /// Array of values; element names on the wire are decimal indexes.
    Array(Vec<Value>),
    /// Binary data with a subtype.
    Binary(Binary),
    /// Deprecated undefined value.
    Undefined,
    /// 12-byte object id.
    ObjectId(ObjectId),
    Boolean(bool),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    #[default]
    Null,
    RegularExpression(Regex),
    JavaScript(String),
    Symbol(String),
    /// JavaScript code with a scope document.
    JavaScriptWithScope { code: String, scope: Document },
    Int32(i32),
    Timestamp(Timestamp),
    Int64(i64),
    /// IEEE 754-2008 decimal, kept as its 16 little-endian bytes.
    Decimal128([u8; 16]),
    MinKey,
    MaxKey,
}

impl Value {
    /// Converts a runtime-typed value.
    ///
    /// Accepts every type with a `From` conversion into [Value], plus
    /// `Value` itself, `&'static str` and the small integer types, which are
    /// widened. `()` and `Option::<Value>::None` are treated as a missing
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Argument` for a missing value or an unsupported type.
    pub fn from_any(value: &dyn Any) -> BsonResult<Value> {
        if value.is::<()>() || matches!(value.downcast_ref::<Option<Value>>(), Some(None)) {
            log::error!("Value is missing");
            return Err(BsonError::new("Value is missing", ErrorKind::Argument));
        }

        if let Some(v) = value.downcast_ref::<Value>() {
            Ok(v.clone())
        } else if let Some(Some(v)) = value.downcast_ref::<Option<Value>>() {
            Ok(v.clone())
        } else if let Some(v) = value.downcast_ref::<bool>() {
            Ok(Value::Boolean(*v))
        } else if let Some(v) = value.downcast_ref::<i8>() {
            Ok(Value::Int32(*v as i32))
        } else if let Some(v) = value.downcast_ref::<u8>() {
            Ok(Value::Int32(*v as i32))
        } else if let Some(v) = value.downcast_ref::<i16>() {
            Ok(Value::Int32(*v as i32))
        } else if let Some(v) = value.downcast_ref::<u16>() {
            Ok(Value::Int32(*v as i32))
        } else if let Some(v) = value.downcast_ref::<i32>() {
            Ok(Value::Int32(*v))
        } else if let Some(v) = value.downcast_ref::<u32>() {
            Ok(Value::Int64(*v as i64))
        } else if let Some(v) = value.downcast_ref::<i64>() {
            Ok(Value::Int64(*v))
        } else if let Some(v) = value.downcast_ref::<f32>() {
            Ok(Value::Double(*v as f64))
        } else if let Some(v) = value.downcast_ref::<f64>() {
            Ok(Value::Double(*v))
        } else if let Some(v) = value.downcast_ref::<String>() {
            Ok(Value::String(v.clone()))
        } else if let Some(v) = value.downcast_ref::<&'static str>() {
            Ok(Value::String(v.to_string()))
        } else if let Some(v) = value.downcast_ref::<Document>() {
            Ok(Value::Document(v.clone()))
        } else if let Some(v) = value.downcast_ref::<Vec<Value>>() {
            Ok(Value::Array(v.clone()))
        } else if let Some(v) = value.downcast_ref::<ObjectId>() {
            Ok(Value::ObjectId(*v))
        } else if let Some(v) = value.downcast_ref::<Binary>() {
            Ok(Value::Binary(v.clone()))
        } else if let Some(v) = value.downcast_ref::<Regex>() {
            Ok(Value::RegularExpression(v.clone()))
        } else if let Some(v) = value.downcast_ref::<Timestamp>() {
            Ok(Value::Timestamp(*v))
        } else if let Some(v) = value.downcast_ref::<Uuid>() {
            Ok(Value::from(*v))
        } else if let Some(v) = value.downcast_ref::<DateTime<Utc>>() {
            Ok(Value::from(*v))
        } else {
            log::error!("Unsupported type to convert to Value");
            Err(BsonError::new(
                "Unsupported type to convert to Value",
                ErrorKind::Argument,
            ))
        }
    }

    /// Creates a new [Value] from the vector of values.
    pub fn from_vec<T: Into<Value>>(values: Vec<T>) -> Value {
        Value::Array(values.into_iter().map(|v| v.into()).collect())
    }

    /// The type tag this value is written with.
    pub fn bson_type(&self) -> BsonType {
        match self {
            Value::Double(_) => BsonType::Double,
            Value::String(_) => BsonType::String,
            Value::Document(_) => BsonType::Document,
            Value::Array(_) => BsonType::Array,
            Value::Binary(_) => BsonType::Binary,
            Value::Undefined => BsonType::Undefined,
            Value::ObjectId(_) => BsonType::ObjectId,
            Value::Boolean(_) => BsonType::Boolean,
            Value::DateTime(_) => BsonType::DateTime,
            Value::Null => BsonType::Null,
            Value::RegularExpression(_) => BsonType::RegularExpression,
            Value::JavaScript(_) => BsonType::JavaScript,
            Value::Symbol(_) => BsonType::Symbol,
            Value::JavaScriptWithScope { .. } => BsonType::JavaScriptWithScope,
            Value::Int32(_) => BsonType::Int32,
            Value::Timestamp(_) => BsonType::Timestamp,
            Value::Int64(_) => BsonType::Int64,
            Value::Decimal128(_) => BsonType::Decimal128,
            Value::MinKey => BsonType::MinKey,
            Value::MaxKey => BsonType::MaxKey,
        }
    }

    /// The Rust type of the payload carried by this variant.
    ///
    /// Used to resolve identity generators for an `_id` value. Variants
    /// without a payload report `Value`, except `Null` which reports `()`.
    pub fn runtime_type(&self) -> TypeKey {
        match self {
            Value::Double(_) => TypeKey::of::<f64>(),
            Value::String(_) | Value::JavaScript(_) | Value::Symbol(_) => TypeKey::of::<String>(),
            Value::Document(_) => TypeKey::of::<Document>(),
            Value::Array(_) => TypeKey::of::<Vec<Value>>(),
            Value::Binary(_) => TypeKey::of::<Binary>(),
            Value::ObjectId(_) => TypeKey::of::<ObjectId>(),
            Value::Boolean(_) => TypeKey::of::<bool>(),
            Value::DateTime(_) => TypeKey::of::<DateTime<Utc>>(),
            Value::Null => TypeKey::of::<()>(),
            Value::RegularExpression(_) => TypeKey::of::<Regex>(),
            Value::JavaScriptWithScope { .. } => TypeKey::of::<(String, Document)>(),
            Value::Int32(_) => TypeKey::of::<i32>(),
            Value::Timestamp(_) => TypeKey::of::<Timestamp>(),
            Value::Int64(_) => TypeKey::of::<i64>(),
            Value::Decimal128(_) => TypeKey::of::<[u8; 16]>(),
            Value::Undefined | Value::MinKey | Value::MaxKey => TypeKey::of::<Value>(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns any numeric value widened to `f64`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Int32(v) => Some(*v as f64),
            Value::Int64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Value::Binary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            Value::ObjectId(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Moves the value out, leaving [Value::Null] behind.
    pub fn take(&mut self) -> Value {
        std::mem::replace(self, Value::Null)
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        match self {
            Value::Double(v) => v.to_string(),
            Value::String(v) | Value::Symbol(v) => format!("\"{}\"", v),
            Value::Document(v) => v.to_pretty_json(indent),
            Value::Array(v) => {
                if v.is_empty() {
                    return "[]".to_string();
                }

                let mut json_str = String::new();
                json_str.push_str("[\n");
                let indent_str = " ".repeat(indent + 2);
                for value in v {
                    json_str.push_str(&format!(
                        "{}{},\n",
                        indent_str,
                        value.to_pretty_json(indent + 2)
                    ));
                }
                json_str.pop(); // remove last comma
                json_str.pop(); // remove last newline
                json_str.push_str(&format!("\n{}]", " ".repeat(indent)));
                json_str
            }
            Value::Binary(v) => format!("\"{}\"", v),
            Value::Undefined => "undefined".to_string(),
            Value::ObjectId(v) => format!("ObjectId(\"{}\")", v),
            Value::Boolean(v) => v.to_string(),
            Value::DateTime(v) => format!("ISODate({})", v),
            Value::Null => "null".to_string(),
            Value::RegularExpression(v) => v.to_string(),
            Value::JavaScript(v) => format!("function(\"{}\")", v),
            Value::JavaScriptWithScope { code, scope } => {
                format!("function(\"{}\", {})", code, scope.to_pretty_json(indent))
            }
            Value::Int32(v) => v.to_string(),
            Value::Timestamp(v) => v.to_string(),
            Value::Int64(v) => format!("NumberLong({})", v),
            Value::Decimal128(v) => format!("NumberDecimal({})", hex_string(v)),
            Value::MinKey => "MinKey".to_string(),
            Value::MaxKey => "MaxKey".to_string(),
        }
    }

    pub(crate) fn to_debug_string(&self, indent: usize) -> String {
        match self {
            Value::Double(v) => format!("double({})", v),
            Value::String(v) => format!("string(\"{}\")", v),
            Value::Document(v) => format!("document({})", v.to_debug_string(indent)),
            Value::Array(v) => {
                if v.is_empty() {
                    return "array([])".to_string();
                }

                let mut debug_str = String::new();
                debug_str.push_str("array([\n");
                let indent_str = " ".repeat(indent + 2);
                for value in v {
                    debug_str.push_str(&format!(
                        "{}{},\n",
                        indent_str,
                        value.to_debug_string(indent + 2)
                    ));
                }
                debug_str.pop(); // remove last comma
                debug_str.pop(); // remove last newline
                debug_str.push_str(&format!("\n{}])", " ".repeat(indent)));
                debug_str
            }
            Value::Binary(v) => format!("binary({})", v),
            Value::Undefined => "undefined".to_string(),
            Value::ObjectId(v) => format!("object_id(\"{}\")", v),
            Value::Boolean(v) => format!("bool({})", v),
            Value::DateTime(v) => format!("date_time({})", v),
            Value::Null => "null".to_string(),
            Value::RegularExpression(v) => format!("regex(\"{}\")", v),
            Value::JavaScript(v) => format!("javascript(\"{}\")", v),
            Value::Symbol(v) => format!("symbol(\"{}\")", v),
            Value::JavaScriptWithScope { code, scope } => format!(
                "javascript_with_scope(\"{}\", {})",
                code,
                scope.to_debug_string(indent)
            ),
            Value::Int32(v) => format!("i32({})", v),
            Value::Timestamp(v) => format!("timestamp({}, {})", v.time, v.increment),
            Value::Int64(v) => format!("i64({})", v),
            Value::Decimal128(v) => format!("decimal128({})", hex_string(v)),
            Value::MinKey => "min_key".to_string(),
            Value::MaxKey => "max_key".to_string(),
        }
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string(0))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(|v| v.into()).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Value::ObjectId(value)
    }
}

impl From<Binary> for Value {
    fn from(value: Binary) -> Self {
        Value::Binary(value)
    }
}

impl From<Regex> for Value {
    fn from(value: Regex) -> Self {
        Value::RegularExpression(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        // subtype 4 is always paired with the standard byte order
        Value::Binary(Binary::new(
            BinarySubType::UuidStandard,
            value.as_bytes().to_vec(),
        ))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value.timestamp_millis())
    }
}

/// A macro to create a `Value` from a given expression.
///
/// ```rust
/// use bsonkit::bson::Value;
/// use bsonkit::val;
///
/// assert_eq!(val!(42), Value::Int32(42));
/// assert_eq!(val!("hello"), Value::String("hello".to_string()));
/// ```
#[macro_export]
macro_rules! val {
    ($value:expr) => {
        $crate::bson::Value::from($value)
    };
}
