use smallvec::SmallVec;

use crate::bson::{Binary, BinarySubType, BsonType, GuidRepresentation, ObjectId, Regex, Timestamp};
use crate::common::MIN_DOCUMENT_SIZE;
use crate::errors::{BsonError, BsonResult, ErrorKind};
use crate::io::{BinarySettings, BsonReader};

// code-with-scope: total size, an empty string and an empty document
const MIN_CODE_WITH_SCOPE_SIZE: usize = 4 + 5 + MIN_DOCUMENT_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContextType {
    Document,
    Array,
    JavaScriptWithScope,
}

#[derive(Debug, Clone, Copy)]
struct ReadFrame {
    context: ContextType,
    start: usize,
    size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Initial,
    Type,
    Name,
    Value,
    ScopeDocument,
    EndOfDocument,
    EndOfArray,
    Done,
}

/// [BsonReader] over a byte slice.
///
/// Every length prefix is checked against the bytes that remain and against
/// the configured maximum document size before anything is allocated, and
/// the declared size of each document is compared with the bytes actually
/// consumed when it ends. Truncated or inconsistent input therefore ends in
/// an error rather than a hang or an out-of-bounds read.
///
/// Several documents laid out back to back can be read in sequence: after a
/// top-level document ends the reader is ready for the next one.
pub struct BsonBinaryReader<'a> {
    buffer: &'a [u8],
    position: usize,
    settings: BinarySettings,
    state: ReaderState,
    current_type: BsonType,
    frames: SmallVec<[ReadFrame; 8]>,
}

impl<'a> BsonBinaryReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        BsonBinaryReader::with_settings(buffer, BinarySettings::default())
    }

    pub fn with_settings(buffer: &'a [u8], settings: BinarySettings) -> Self {
        BsonBinaryReader {
            buffer,
            position: 0,
            settings,
            state: ReaderState::Initial,
            current_type: BsonType::Document,
            frames: SmallVec::new(),
        }
    }

    pub fn settings(&self) -> &BinarySettings {
        &self.settings
    }

    /// Returns true once every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.buffer.len()
    }

    fn take(&mut self, len: usize) -> BsonResult<&'a [u8]> {
        let end = self.position.checked_add(len).filter(|end| *end <= self.buffer.len());
        match end {
            Some(end) => {
                let buffer = self.buffer;
                let bytes = &buffer[self.position..end];
                self.position = end;
                Ok(bytes)
            }
            None => {
                log::error!(
                    "Unexpected end of stream: needed {} bytes at position {}, {} available",
                    len,
                    self.position,
                    self.buffer.len().saturating_sub(self.position)
                );
                Err(BsonError::new(
                    &format!(
                        "Unexpected end of stream: needed {} bytes at position {}",
                        len, self.position
                    ),
                    ErrorKind::Stream,
                ))
            }
        }
    }

    fn take_array<const N: usize>(&mut self) -> BsonResult<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take(N)?);
        Ok(bytes)
    }

    fn read_u8(&mut self) -> BsonResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_i32_raw(&mut self) -> BsonResult<i32> {
        Ok(i32::from_le_bytes(self.take_array::<4>()?))
    }

    fn read_i64_raw(&mut self) -> BsonResult<i64> {
        Ok(i64::from_le_bytes(self.take_array::<8>()?))
    }

    fn read_length(&mut self) -> BsonResult<usize> {
        let length = self.read_i32_raw()?;
        usize::try_from(length).map_err(|_| {
            log::error!("Negative length {} at position {}", length, self.position - 4);
            BsonError::new(
                &format!("Negative length {} at position {}", length, self.position - 4),
                ErrorKind::Format,
            )
        })
    }

    // Reads a size prefix that covers itself, starting at `start`.
    fn read_frame_size(&mut self, start: usize, min_size: usize) -> BsonResult<usize> {
        let size = self.read_length()?;
        if size < min_size {
            log::error!("Invalid size {} at position {}", size, start);
            return Err(BsonError::new(
                &format!("Invalid size {} at position {}", size, start),
                ErrorKind::Format,
            ));
        }
        if size > self.settings.max_document_size {
            log::error!(
                "Size {} is larger than the maximum document size {}",
                size,
                self.settings.max_document_size
            );
            return Err(BsonError::new(
                &format!(
                    "Size {} is larger than the maximum document size {}",
                    size, self.settings.max_document_size
                ),
                ErrorKind::Format,
            ));
        }
        if start + size > self.buffer.len() {
            log::error!(
                "Size {} at position {} exceeds the {} bytes in the stream",
                size,
                start,
                self.buffer.len()
            );
            return Err(BsonError::new(
                &format!(
                    "Size {} at position {} exceeds the {} bytes in the stream",
                    size,
                    start,
                    self.buffer.len()
                ),
                ErrorKind::Stream,
            ));
        }
        Ok(size)
    }

    fn read_cstring(&mut self) -> BsonResult<String> {
        let remaining = &self.buffer[self.position.min(self.buffer.len())..];
        match remaining.iter().position(|b| *b == 0) {
            Some(len) => {
                let bytes = self.take(len + 1)?;
                Ok(std::str::from_utf8(&bytes[..len])?.to_string())
            }
            None => {
                log::error!("Unterminated C string at position {}", self.position);
                Err(BsonError::new(
                    &format!("Unterminated C string at position {}", self.position),
                    ErrorKind::Stream,
                ))
            }
        }
    }

    fn read_string_raw(&mut self) -> BsonResult<String> {
        let length = self.read_length()?;
        if length == 0 {
            log::error!("Invalid string length 0 at position {}", self.position - 4);
            return Err(BsonError::new(
                &format!("Invalid string length 0 at position {}", self.position - 4),
                ErrorKind::Format,
            ));
        }

        let bytes = self.take(length)?;
        if bytes[length - 1] != 0 {
            log::error!("String is missing its null terminator");
            return Err(BsonError::new(
                "String is missing its null terminator",
                ErrorKind::Format,
            ));
        }
        Ok(String::from_utf8(bytes[..length - 1].to_vec())?)
    }

    fn verify_value(&self, method: &str, expected: BsonType) -> BsonResult<()> {
        if self.state != ReaderState::Value {
            log::error!(
                "{} can only be called when State is Value, not when State is {:?}.",
                method,
                self.state
            );
            return Err(BsonError::new(
                &format!(
                    "{} can only be called when State is Value, not when State is {:?}.",
                    method, self.state
                ),
                ErrorKind::InvalidOperation,
            ));
        }
        if self.current_type != expected {
            log::error!(
                "{} can only be called when CurrentBsonType is {}, not when CurrentBsonType is {}.",
                method,
                expected,
                self.current_type
            );
            return Err(BsonError::new(
                &format!(
                    "{} can only be called when CurrentBsonType is {}, not when CurrentBsonType is {}.",
                    method, expected, self.current_type
                ),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn invalid_state(&self, method: &str) -> BsonError {
        log::error!("{} cannot be called when State is {:?}.", method, self.state);
        BsonError::new(
            &format!("{} cannot be called when State is {:?}.", method, self.state),
            ErrorKind::InvalidOperation,
        )
    }

    fn after_value(&mut self) {
        self.state = if self.frames.is_empty() {
            ReaderState::Done
        } else {
            ReaderState::Type
        };
    }

    fn pop_frame(&mut self, method: &str, expected: ContextType) -> BsonResult<()> {
        let frame = match self.frames.pop() {
            Some(frame) if frame.context == expected => frame,
            _ => return Err(self.invalid_state(method)),
        };
        self.verify_frame_size(&frame)?;

        if expected == ContextType::Document {
            if let Some(parent) = self.frames.last().copied() {
                if parent.context == ContextType::JavaScriptWithScope {
                    self.frames.pop();
                    self.verify_frame_size(&parent)?;
                }
            }
        }
        Ok(())
    }

    fn verify_frame_size(&self, frame: &ReadFrame) -> BsonResult<()> {
        let consumed = self.position - frame.start;
        if consumed != frame.size {
            log::error!(
                "Size {} of {:?} at position {} does not match the {} bytes read",
                frame.size,
                frame.context,
                frame.start,
                consumed
            );
            return Err(BsonError::new(
                &format!(
                    "Size {} of {:?} at position {} does not match the {} bytes read",
                    frame.size, frame.context, frame.start, consumed
                ),
                ErrorKind::Format,
            ));
        }
        Ok(())
    }
}

impl<'a> BsonReader for BsonBinaryReader<'a> {
    fn current_bson_type(&mut self) -> BsonResult<BsonType> {
        match self.state {
            ReaderState::Initial | ReaderState::Done | ReaderState::ScopeDocument => {
                Ok(BsonType::Document)
            }
            ReaderState::Name | ReaderState::Value => Ok(self.current_type),
            ReaderState::EndOfDocument | ReaderState::EndOfArray => Ok(BsonType::EndOfDocument),
            ReaderState::Type => Err(self.invalid_state("current_bson_type")),
        }
    }

    fn read_bson_type(&mut self) -> BsonResult<BsonType> {
        match self.state {
            ReaderState::Initial | ReaderState::Done | ReaderState::ScopeDocument => {
                self.current_type = BsonType::Document;
                self.state = ReaderState::Value;
                return Ok(BsonType::Document);
            }
            ReaderState::Type => {}
            _ => return Err(self.invalid_state("read_bson_type")),
        }

        let tag = self.read_u8()?;
        if tag == 0 {
            self.current_type = BsonType::EndOfDocument;
            self.state = match self.frames.last().map(|frame| frame.context) {
                Some(ContextType::Array) => ReaderState::EndOfArray,
                _ => ReaderState::EndOfDocument,
            };
            return Ok(BsonType::EndOfDocument);
        }

        self.current_type = BsonType::from_tag(tag)?;
        if self.frames.last().map(|frame| frame.context) == Some(ContextType::Array) {
            // array element names are implied by position
            self.read_cstring()?;
            self.state = ReaderState::Value;
        } else {
            self.state = ReaderState::Name;
        }
        Ok(self.current_type)
    }

    fn read_name(&mut self) -> BsonResult<String> {
        if self.state != ReaderState::Name {
            return Err(self.invalid_state("read_name"));
        }
        let name = self.read_cstring()?;
        self.state = ReaderState::Value;
        Ok(name)
    }

    fn read_start_document(&mut self) -> BsonResult<()> {
        match self.state {
            ReaderState::Initial | ReaderState::Done | ReaderState::ScopeDocument => {}
            ReaderState::Value => self.verify_value("read_start_document", BsonType::Document)?,
            _ => return Err(self.invalid_state("read_start_document")),
        }

        let start = self.position;
        let size = self.read_frame_size(start, MIN_DOCUMENT_SIZE)?;
        self.frames.push(ReadFrame {
            context: ContextType::Document,
            start,
            size,
        });
        self.state = ReaderState::Type;
        Ok(())
    }

    fn read_end_document(&mut self) -> BsonResult<()> {
        if self.state == ReaderState::Type && self.read_bson_type()? != BsonType::EndOfDocument {
            return Err(self.invalid_state("read_end_document"));
        }
        if self.state != ReaderState::EndOfDocument {
            return Err(self.invalid_state("read_end_document"));
        }

        self.pop_frame("read_end_document", ContextType::Document)?;
        self.after_value();
        Ok(())
    }

    fn read_start_array(&mut self) -> BsonResult<()> {
        self.verify_value("read_start_array", BsonType::Array)?;

        let start = self.position;
        let size = self.read_frame_size(start, MIN_DOCUMENT_SIZE)?;
        self.frames.push(ReadFrame {
            context: ContextType::Array,
            start,
            size,
        });
        self.state = ReaderState::Type;
        Ok(())
    }

    fn read_end_array(&mut self) -> BsonResult<()> {
        if self.state == ReaderState::Type && self.read_bson_type()? != BsonType::EndOfDocument {
            return Err(self.invalid_state("read_end_array"));
        }
        if self.state != ReaderState::EndOfArray {
            return Err(self.invalid_state("read_end_array"));
        }

        self.pop_frame("read_end_array", ContextType::Array)?;
        self.after_value();
        Ok(())
    }

    fn read_double(&mut self) -> BsonResult<f64> {
        self.verify_value("read_double", BsonType::Double)?;
        let value = f64::from_le_bytes(self.take_array::<8>()?);
        self.after_value();
        Ok(value)
    }

    fn read_string(&mut self) -> BsonResult<String> {
        self.verify_value("read_string", BsonType::String)?;
        let value = self.read_string_raw()?;
        self.after_value();
        Ok(value)
    }

    fn read_binary(&mut self) -> BsonResult<Binary> {
        self.verify_value("read_binary", BsonType::Binary)?;

        let mut size = self.read_length()?;
        let subtype = BinarySubType::from_tag(self.read_u8()?)?;
        if subtype == BinarySubType::OldBinary {
            let inner = self.read_length()?;
            if inner + 4 != size {
                log::error!("Old binary inner size {} does not match outer size {}", inner, size);
                return Err(BsonError::new(
                    &format!(
                        "Old binary inner size {} does not match outer size {}",
                        inner, size
                    ),
                    ErrorKind::Format,
                ));
            }
            size = inner;
        }

        let bytes = self.take(size)?.to_vec();
        let binary = match subtype {
            BinarySubType::UuidStandard | BinarySubType::UuidLegacy => {
                let guid_representation = match subtype {
                    BinarySubType::UuidStandard => GuidRepresentation::Standard,
                    _ => match self.settings.guid_representation {
                        GuidRepresentation::Standard => GuidRepresentation::Unspecified,
                        other => other,
                    },
                };
                Binary::with_guid_representation(subtype, bytes, guid_representation).map_err(
                    |e| BsonError::new_with_cause("Invalid UUID binary data", ErrorKind::Format, e),
                )?
            }
            _ => Binary::new(subtype, bytes),
        };

        self.after_value();
        Ok(binary)
    }

    fn read_undefined(&mut self) -> BsonResult<()> {
        self.verify_value("read_undefined", BsonType::Undefined)?;
        self.after_value();
        Ok(())
    }

    fn read_object_id(&mut self) -> BsonResult<ObjectId> {
        self.verify_value("read_object_id", BsonType::ObjectId)?;
        let value = ObjectId::from_bytes(self.take_array::<12>()?);
        self.after_value();
        Ok(value)
    }

    fn read_boolean(&mut self) -> BsonResult<bool> {
        self.verify_value("read_boolean", BsonType::Boolean)?;
        let value = match self.read_u8()? {
            0 => false,
            1 => true,
            other => {
                log::error!("Invalid boolean byte 0x{:02X}", other);
                return Err(BsonError::new(
                    &format!("Invalid boolean byte 0x{:02X}", other),
                    ErrorKind::Format,
                ));
            }
        };
        self.after_value();
        Ok(value)
    }

    fn read_date_time(&mut self) -> BsonResult<i64> {
        self.verify_value("read_date_time", BsonType::DateTime)?;
        let value = self.read_i64_raw()?;
        self.after_value();
        Ok(value)
    }

    fn read_null(&mut self) -> BsonResult<()> {
        self.verify_value("read_null", BsonType::Null)?;
        self.after_value();
        Ok(())
    }

    fn read_regular_expression(&mut self) -> BsonResult<Regex> {
        self.verify_value("read_regular_expression", BsonType::RegularExpression)?;
        let pattern = self.read_cstring()?;
        let options = self.read_cstring()?;
        self.after_value();
        Ok(Regex::new(&pattern, &options))
    }

    fn read_javascript(&mut self) -> BsonResult<String> {
        self.verify_value("read_javascript", BsonType::JavaScript)?;
        let value = self.read_string_raw()?;
        self.after_value();
        Ok(value)
    }

    fn read_symbol(&mut self) -> BsonResult<String> {
        self.verify_value("read_symbol", BsonType::Symbol)?;
        let value = self.read_string_raw()?;
        self.after_value();
        Ok(value)
    }

    fn read_javascript_with_scope(&mut self) -> BsonResult<String> {
        self.verify_value("read_javascript_with_scope", BsonType::JavaScriptWithScope)?;

        let start = self.position;
        let size = self.read_frame_size(start, MIN_CODE_WITH_SCOPE_SIZE)?;
        self.frames.push(ReadFrame {
            context: ContextType::JavaScriptWithScope,
            start,
            size,
        });
        let code = self.read_string_raw()?;
        self.state = ReaderState::ScopeDocument;
        Ok(code)
    }

    fn read_int32(&mut self) -> BsonResult<i32> {
        self.verify_value("read_int32", BsonType::Int32)?;
        let value = self.read_i32_raw()?;
        self.after_value();
        Ok(value)
    }

    fn read_timestamp(&mut self) -> BsonResult<Timestamp> {
        self.verify_value("read_timestamp", BsonType::Timestamp)?;
        let value = Timestamp::from_u64(u64::from_le_bytes(self.take_array::<8>()?));
        self.after_value();
        Ok(value)
    }

    fn read_int64(&mut self) -> BsonResult<i64> {
        self.verify_value("read_int64", BsonType::Int64)?;
        let value = self.read_i64_raw()?;
        self.after_value();
        Ok(value)
    }

    fn read_decimal128(&mut self) -> BsonResult<[u8; 16]> {
        self.verify_value("read_decimal128", BsonType::Decimal128)?;
        let value = self.take_array::<16>()?;
        self.after_value();
        Ok(value)
    }

    fn read_min_key(&mut self) -> BsonResult<()> {
        self.verify_value("read_min_key", BsonType::MinKey)?;
        self.after_value();
        Ok(())
    }

    fn read_max_key(&mut self) -> BsonResult<()> {
        self.verify_value("read_max_key", BsonType::MaxKey)?;
        self.after_value();
        Ok(())
    }

    fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // {"a": 1}
    const INT_DOCUMENT: [u8; 12] = [
        0x0C, 0x00, 0x00, 0x00, 0x10, b'a', 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];

    // {"x": [true]}
    const ARRAY_DOCUMENT: [u8; 17] = [
        0x11, 0x00, 0x00, 0x00, 0x04, b'x', 0x00, 0x09, 0x00, 0x00, 0x00, 0x08, b'0', 0x00,
        0x01, 0x00, 0x00,
    ];

    #[test]
    fn test_read_simple_document() {
        let mut reader = BsonBinaryReader::new(&INT_DOCUMENT);
        assert_eq!(reader.current_bson_type().unwrap(), BsonType::Document);
        reader.read_start_document().unwrap();
        assert_eq!(reader.read_bson_type().unwrap(), BsonType::Int32);
        assert_eq!(reader.read_name().unwrap(), "a");
        assert_eq!(reader.current_bson_type().unwrap(), BsonType::Int32);
        assert_eq!(reader.read_int32().unwrap(), 1);
        assert_eq!(reader.read_bson_type().unwrap(), BsonType::EndOfDocument);
        reader.read_end_document().unwrap();
        assert!(reader.is_at_end());
        assert_eq!(reader.position(), 12);
    }

    #[test]
    fn test_read_array() {
        let mut reader = BsonBinaryReader::new(&ARRAY_DOCUMENT);
        reader.read_start_document().unwrap();
        assert_eq!(reader.read_bson_type().unwrap(), BsonType::Array);
        assert_eq!(reader.read_name().unwrap(), "x");
        reader.read_start_array().unwrap();
        assert_eq!(reader.read_bson_type().unwrap(), BsonType::Boolean);
        assert!(reader.read_boolean().unwrap());
        assert_eq!(reader.read_bson_type().unwrap(), BsonType::EndOfDocument);
        reader.read_end_array().unwrap();
        reader.read_end_document().unwrap();
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_current_bson_type_does_not_consume() {
        let mut reader = BsonBinaryReader::new(&INT_DOCUMENT);
        reader.read_start_document().unwrap();
        reader.read_bson_type().unwrap();
        reader.read_name().unwrap();
        let before = reader.position();
        reader.current_bson_type().unwrap();
        reader.current_bson_type().unwrap();
        assert_eq!(reader.position(), before);
    }

    #[test]
    fn test_read_wrong_kind_is_invalid_operation() {
        let mut reader = BsonBinaryReader::new(&INT_DOCUMENT);
        reader.read_start_document().unwrap();
        reader.read_bson_type().unwrap();
        reader.read_name().unwrap();
        let before = reader.position();
        let err = reader.read_string().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
        assert_eq!(reader.position(), before);
    }

    #[test]
    fn test_truncated_document_is_rejected() {
        let mut reader = BsonBinaryReader::new(&INT_DOCUMENT[..8]);
        let err = reader.read_start_document().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Stream);
    }

    #[test]
    fn test_size_smaller_than_minimum_is_rejected() {
        let bytes = [0x03, 0x00, 0x00, 0x00, 0x00];
        let mut reader = BsonBinaryReader::new(&bytes);
        assert_eq!(reader.read_start_document().unwrap_err().kind(), &ErrorKind::Format);
    }

    #[test]
    fn test_negative_size_is_rejected() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x00];
        let mut reader = BsonBinaryReader::new(&bytes);
        assert_eq!(reader.read_start_document().unwrap_err().kind(), &ErrorKind::Format);
    }

    #[test]
    fn test_size_larger_than_maximum_is_rejected() {
        let settings = BinarySettings::new(GuidRepresentation::Standard, 8);
        let mut reader = BsonBinaryReader::with_settings(&INT_DOCUMENT, settings);
        assert_eq!(reader.read_start_document().unwrap_err().kind(), &ErrorKind::Format);
    }

    #[test]
    fn test_size_mismatch_is_detected_at_end() {
        // declares 13 bytes but the terminator is at offset 11
        let mut bytes = INT_DOCUMENT.to_vec();
        bytes[0] = 0x0D;
        bytes.push(0x00);
        let mut reader = BsonBinaryReader::new(&bytes);
        reader.read_start_document().unwrap();
        reader.read_bson_type().unwrap();
        reader.read_name().unwrap();
        reader.read_int32().unwrap();
        reader.read_bson_type().unwrap();
        assert_eq!(reader.read_end_document().unwrap_err().kind(), &ErrorKind::Format);
    }

    #[test]
    fn test_unknown_type_tag_is_rejected() {
        let bytes = [0x08, 0x00, 0x00, 0x00, 0x0C, b'a', 0x00, 0x00];
        let mut reader = BsonBinaryReader::new(&bytes);
        reader.read_start_document().unwrap();
        assert_eq!(reader.read_bson_type().unwrap_err().kind(), &ErrorKind::Format);
    }

    #[test]
    fn test_unterminated_name_is_rejected() {
        let bytes = [0x07, 0x00, 0x00, 0x00, 0x10, b'a', b'b'];
        let mut reader = BsonBinaryReader::new(&bytes);
        reader.read_start_document().unwrap();
        reader.read_bson_type().unwrap();
        assert_eq!(reader.read_name().unwrap_err().kind(), &ErrorKind::Stream);
    }

    #[test]
    fn test_invalid_utf8_string_is_rejected() {
        // {"s": "\xff"}
        let bytes = [
            0x0F, 0x00, 0x00, 0x00, 0x02, b's', 0x00, 0x02, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00,
            0x00,
        ];
        let mut reader = BsonBinaryReader::new(&bytes);
        reader.read_start_document().unwrap();
        reader.read_bson_type().unwrap();
        reader.read_name().unwrap();
        assert_eq!(reader.read_string().unwrap_err().kind(), &ErrorKind::Encoding);
    }

    #[test]
    fn test_legacy_uuid_takes_representation_from_settings() {
        // {"u": Binary(3, 16 bytes)}
        let mut bytes = vec![0x1D, 0x00, 0x00, 0x00, 0x05, b'u', 0x00, 0x10, 0x00, 0x00, 0x00, 0x03];
        bytes.extend_from_slice(&[7u8; 16]);
        bytes.push(0x00);
        assert_eq!(bytes.len(), 0x1D);

        let settings = BinarySettings::new(GuidRepresentation::JavaLegacy, 1024);
        let mut reader = BsonBinaryReader::with_settings(&bytes, settings);
        reader.read_start_document().unwrap();
        reader.read_bson_type().unwrap();
        reader.read_name().unwrap();
        let binary = reader.read_binary().unwrap();
        assert_eq!(binary.subtype(), BinarySubType::UuidLegacy);
        assert_eq!(binary.guid_representation(), GuidRepresentation::JavaLegacy);
    }

    #[test]
    fn test_reads_consecutive_documents() {
        let mut bytes = INT_DOCUMENT.to_vec();
        bytes.extend_from_slice(&INT_DOCUMENT);
        let mut reader = BsonBinaryReader::new(&bytes);
        for _ in 0..2 {
            reader.read_start_document().unwrap();
            reader.read_bson_type().unwrap();
            reader.read_name().unwrap();
            reader.read_int32().unwrap();
            reader.read_end_document().unwrap();
        }
        assert!(reader.is_at_end());
    }
}
