use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for bsonkit operations
///
/// Each kind describes one category of failure so callers can match on the
/// category without parsing messages.
///
/// # Examples
///
/// ```rust
/// use bsonkit::errors::{BsonError, ErrorKind, BsonResult};
///
/// fn example() -> BsonResult<()> {
///     Err(BsonError::new("Cannot deserialize Document from BsonType Int32.", ErrorKind::Format))
/// }
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::Format);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Codec Errors - raised by serializers
    /// The stream's type tag does not match what the target type expects
    Format,
    /// A missing or invalid argument was supplied by the caller
    Argument,
    /// No serializer or identity generator is registered for a type
    Lookup,
    /// A duplicate element name was inserted into a document that rejects duplicates
    DuplicateName,

    // Stream Errors - raised by the binary reader and writer
    /// The byte stream is exhausted or its length prefixes are inconsistent
    Stream,
    /// Invalid UTF-8, or a name that cannot be written as a C string
    Encoding,

    // Operation Errors
    /// The operation is not valid in the current state
    InvalidOperation,
    /// Error bridging to or from serde
    ObjectMapping,

    // Extension Errors - allows external crates to plug in their own error types
    // The String contains the extension name (e.g., "geojson", "wire")
    /// Error from an extension crate
    Extension(String),

    /// Internal error (usually indicates a bug)
    Internal,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Format => write!(f, "Format error"),
            ErrorKind::Argument => write!(f, "Argument error"),
            ErrorKind::Lookup => write!(f, "Lookup error"),
            ErrorKind::DuplicateName => write!(f, "Duplicate element name"),
            ErrorKind::Stream => write!(f, "Stream error"),
            ErrorKind::Encoding => write!(f, "Encoding error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::ObjectMapping => write!(f, "Object mapping error"),
            ErrorKind::Extension(name) => write!(f, "{} error", name),
            ErrorKind::Internal => write!(f, "Internal error"),
        }
    }
}

/// Custom bsonkit error type.
///
/// `BsonError` carries a message, a kind and an optional cause. A backtrace is
/// captured on construction and printed by the `Debug` implementation.
///
/// # Examples
///
/// ```rust
/// use bsonkit::errors::{BsonError, ErrorKind};
///
/// let cause = BsonError::new("Unexpected end of stream", ErrorKind::Stream);
/// let err = BsonError::new_with_cause("Failed to read reply", ErrorKind::Format, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct BsonError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<BsonError>>,
    backtrace: Atomic<Backtrace>,
}

impl BsonError {
    /// Creates a new `BsonError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        BsonError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `BsonError` chained to the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: BsonError) -> Self {
        BsonError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&BsonError> {
        self.cause.as_deref()
    }
}

impl Display for BsonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for BsonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for BsonError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for bsonkit operations.
pub type BsonResult<T> = Result<T, BsonError>;

#[cfg(feature = "serde")]
impl serde::de::Error for BsonError {
    fn custom<T: Display>(msg: T) -> Self {
        BsonError::new(&msg.to_string(), ErrorKind::ObjectMapping)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for BsonError {
    fn custom<T: Display>(msg: T) -> Self {
        BsonError::new(&msg.to_string(), ErrorKind::ObjectMapping)
    }
}

impl From<std::io::Error> for BsonError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::UnexpectedEof => ErrorKind::Stream,
            std::io::ErrorKind::InvalidData => ErrorKind::Encoding,
            _ => ErrorKind::Stream,
        };
        BsonError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<std::string::FromUtf8Error> for BsonError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        BsonError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::Encoding,
        )
    }
}

impl From<std::str::Utf8Error> for BsonError {
    fn from(err: std::str::Utf8Error) -> Self {
        BsonError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::Encoding,
        )
    }
}

impl From<std::num::TryFromIntError> for BsonError {
    fn from(err: std::num::TryFromIntError) -> Self {
        BsonError::new(
            &format!("Integer conversion error: {}", err),
            ErrorKind::InvalidOperation,
        )
    }
}

impl From<String> for BsonError {
    fn from(msg: String) -> Self {
        BsonError::new(&msg, ErrorKind::Internal)
    }
}

impl From<&str> for BsonError {
    fn from(msg: &str) -> Self {
        BsonError::new(msg, ErrorKind::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bson_error_new_creates_error() {
        let error = BsonError::new("An error occurred", ErrorKind::Format);
        assert_eq!(error.message, "An error occurred");
        assert_eq!(error.error_kind, ErrorKind::Format);
        assert!(error.cause.is_none());
    }

    #[test]
    fn bson_error_new_with_cause_creates_error() {
        let cause = BsonError::new("Unexpected end of stream", ErrorKind::Stream);
        let error = BsonError::new_with_cause("Failed to read", ErrorKind::Format, cause);
        assert_eq!(error.kind(), &ErrorKind::Format);
        assert_eq!(error.cause().map(|c| c.kind().clone()), Some(ErrorKind::Stream));
    }

    #[test]
    fn bson_error_display_formats_message_only() {
        let error = BsonError::new("An error occurred", ErrorKind::Lookup);
        assert_eq!(format!("{}", error), "An error occurred");
    }

    #[test]
    fn bson_error_debug_formats_with_cause() {
        let cause = BsonError::new("root", ErrorKind::Stream);
        let error = BsonError::new_with_cause("top", ErrorKind::Format, cause);
        let formatted = format!("{:?}", error);
        assert!(formatted.contains("top"));
        assert!(formatted.contains("Caused by:"));
    }

    #[test]
    fn bson_error_source_follows_cause() {
        let error = BsonError::new("no cause", ErrorKind::Argument);
        assert!(error.source().is_none());

        let chained = BsonError::new_with_cause("outer", ErrorKind::Argument, error);
        assert!(chained.source().is_some());
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::DuplicateName.to_string(), "Duplicate element name");
        assert_eq!(
            ErrorKind::Extension("geojson".to_string()).to_string(),
            "geojson error"
        );
    }

    #[test]
    fn test_from_io_error_eof_maps_to_stream() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: BsonError = io_err.into();
        assert_eq!(err.kind(), &ErrorKind::Stream);
        assert!(err.message().contains("IO error"));
    }

    #[test]
    fn test_from_utf8_error() {
        let utf8_err = String::from_utf8(vec![0xFF, 0xFE]).unwrap_err();
        let err: BsonError = utf8_err.into();
        assert_eq!(err.kind(), &ErrorKind::Encoding);
        assert!(err.message().contains("UTF-8"));
    }

    #[test]
    fn test_from_try_from_int_error() {
        let int_err = i32::try_from(u64::MAX).unwrap_err();
        let err: BsonError = int_err.into();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_from_str_and_string() {
        let err: BsonError = "plain".into();
        assert_eq!(err.kind(), &ErrorKind::Internal);
        let err: BsonError = String::from("owned").into();
        assert_eq!(err.message(), "owned");
    }

    #[test]
    fn test_question_mark_operator_with_from() {
        fn decode(bytes: Vec<u8>) -> BsonResult<String> {
            Ok(String::from_utf8(bytes)?)
        }

        assert_eq!(decode(b"abc".to_vec()).unwrap(), "abc");
        assert_eq!(decode(vec![0xC3]).unwrap_err().kind(), &ErrorKind::Encoding);
    }
}
