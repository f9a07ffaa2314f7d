use smallvec::SmallVec;

use crate::bson::{Binary, BinarySubType, BsonType, ObjectId, Regex, Timestamp};
use crate::errors::{BsonError, BsonResult, ErrorKind};
use crate::io::binary_reader::ContextType;
use crate::io::{BinarySettings, BsonWriter};

#[derive(Debug, Clone, Copy)]
struct WriteFrame {
    context: ContextType,
    start: usize,
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Initial,
    Name,
    Value,
    ScopeDocument,
    Done,
}

/// [BsonWriter] that appends to a byte buffer.
///
/// Sizes are written as placeholders and patched when the enclosing
/// document, array or code-with-scope value ends. Several top-level
/// documents may be written one after another.
///
/// # Examples
///
/// ```rust
/// use bsonkit::io::{BsonBinaryWriter, BsonWriter};
///
/// let mut writer = BsonBinaryWriter::new();
/// writer.write_start_document().unwrap();
/// writer.write_name("a").unwrap();
/// writer.write_int32(1).unwrap();
/// writer.write_end_document().unwrap();
/// assert_eq!(
///     writer.into_inner(),
///     vec![0x0C, 0, 0, 0, 0x10, b'a', 0, 1, 0, 0, 0, 0]
/// );
/// ```
pub struct BsonBinaryWriter {
    buffer: Vec<u8>,
    settings: BinarySettings,
    state: WriterState,
    frames: SmallVec<[WriteFrame; 8]>,
    name: Option<String>,
}

impl BsonBinaryWriter {
    pub fn new() -> Self {
        BsonBinaryWriter::with_buffer(Vec::new(), BinarySettings::default())
    }

    pub fn with_settings(settings: BinarySettings) -> Self {
        BsonBinaryWriter::with_buffer(Vec::new(), settings)
    }

    /// Creates a writer that appends after the existing content of `buffer`.
    pub fn with_buffer(buffer: Vec<u8>, settings: BinarySettings) -> Self {
        BsonBinaryWriter {
            buffer,
            settings,
            state: WriterState::Initial,
            frames: SmallVec::new(),
            name: None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    fn invalid_state(&self, method: &str) -> BsonError {
        log::error!("{} cannot be called when State is {:?}.", method, self.state);
        BsonError::new(
            &format!("{} cannot be called when State is {:?}.", method, self.state),
            ErrorKind::InvalidOperation,
        )
    }

    fn check_cstring(value: &str) -> BsonResult<()> {
        if value.contains('\0') {
            log::error!("C string '{}' contains a null byte", value.escape_default());
            return Err(BsonError::new(
                &format!("C string '{}' contains a null byte", value.escape_default()),
                ErrorKind::Encoding,
            ));
        }
        Ok(())
    }

    fn write_cstring(&mut self, value: &str) -> BsonResult<()> {
        BsonBinaryWriter::check_cstring(value)?;
        self.buffer.extend_from_slice(value.as_bytes());
        self.buffer.push(0);
        Ok(())
    }

    fn write_string_raw(&mut self, value: &str) -> BsonResult<()> {
        let length = i32::try_from(value.len() + 1)?;
        self.buffer.extend_from_slice(&length.to_le_bytes());
        self.buffer.extend_from_slice(value.as_bytes());
        self.buffer.push(0);
        Ok(())
    }

    // Writes the type tag and element name that precede every value.
    fn write_header(&mut self, method: &str, bson_type: BsonType) -> BsonResult<()> {
        if self.state != WriterState::Value {
            return Err(self.invalid_state(method));
        }

        let name = match self.frames.last().map(|frame| frame.context) {
            Some(ContextType::Array) => {
                let index = self.frames.last().map(|frame| frame.index).unwrap_or(0);
                if let Some(frame) = self.frames.last_mut() {
                    frame.index += 1;
                }
                index.to_string()
            }
            Some(ContextType::Document) => match self.name.take() {
                Some(name) => name,
                None => return Err(self.invalid_state(method)),
            },
            _ => return Err(self.invalid_state(method)),
        };

        self.buffer.push(bson_type.tag());
        self.write_cstring(&name)
    }

    fn after_value(&mut self) {
        self.state = match self.frames.last().map(|frame| frame.context) {
            Some(ContextType::Array) => WriterState::Value,
            Some(_) => WriterState::Name,
            None => WriterState::Done,
        };
    }

    fn push_frame(&mut self, context: ContextType) {
        self.frames.push(WriteFrame {
            context,
            start: self.buffer.len(),
            index: 0,
        });
        self.buffer.extend_from_slice(&[0u8; 4]);
    }

    fn back_patch_size(&mut self, start: usize) -> BsonResult<()> {
        let size = self.buffer.len() - start;
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
                ErrorKind::InvalidOperation,
            ));
        }

        let size = i32::try_from(size)?;
        self.buffer[start..start + 4].copy_from_slice(&size.to_le_bytes());
        Ok(())
    }

    fn write_scalar(&mut self, method: &str, bson_type: BsonType, payload: &[u8]) -> BsonResult<()> {
        self.write_header(method, bson_type)?;
        self.buffer.extend_from_slice(payload);
        self.after_value();
        Ok(())
    }
}

impl Default for BsonBinaryWriter {
    fn default() -> Self {
        BsonBinaryWriter::new()
    }
}

impl BsonWriter for BsonBinaryWriter {
    fn write_name(&mut self, name: &str) -> BsonResult<()> {
        if self.state != WriterState::Name {
            return Err(self.invalid_state("write_name"));
        }
        BsonBinaryWriter::check_cstring(name)?;
        self.name = Some(name.to_string());
        self.state = WriterState::Value;
        Ok(())
    }

    fn write_start_document(&mut self) -> BsonResult<()> {
        match self.state {
            WriterState::Initial | WriterState::Done | WriterState::ScopeDocument => {}
            WriterState::Value => self.write_header("write_start_document", BsonType::Document)?,
            WriterState::Name => return Err(self.invalid_state("write_start_document")),
        }

        self.push_frame(ContextType::Document);
        self.state = WriterState::Name;
        Ok(())
    }

    fn write_end_document(&mut self) -> BsonResult<()> {
        let frame = match self.frames.last() {
            Some(frame) if self.state == WriterState::Name && frame.context == ContextType::Document => *frame,
            _ => return Err(self.invalid_state("write_end_document")),
        };

        self.buffer.push(0);
        self.back_patch_size(frame.start)?;
        self.frames.pop();

        if let Some(parent) = self.frames.last().copied() {
            if parent.context == ContextType::JavaScriptWithScope {
                self.back_patch_size(parent.start)?;
                self.frames.pop();
            }
        }
        self.after_value();
        Ok(())
    }

    fn write_start_array(&mut self) -> BsonResult<()> {
        self.write_header("write_start_array", BsonType::Array)?;
        self.push_frame(ContextType::Array);
        self.state = WriterState::Value;
        Ok(())
    }

    fn write_end_array(&mut self) -> BsonResult<()> {
        let frame = match self.frames.last() {
            Some(frame) if self.state == WriterState::Value && frame.context == ContextType::Array => *frame,
            _ => return Err(self.invalid_state("write_end_array")),
        };

        self.buffer.push(0);
        self.back_patch_size(frame.start)?;
        self.frames.pop();
        self.after_value();
        Ok(())
    }

    fn write_double(&mut self, value: f64) -> BsonResult<()> {
        self.write_scalar("write_double", BsonType::Double, &value.to_le_bytes())
    }

    fn write_string(&mut self, value: &str) -> BsonResult<()> {
        self.write_header("write_string", BsonType::String)?;
        self.write_string_raw(value)?;
        self.after_value();
        Ok(())
    }

    fn write_binary(&mut self, value: &Binary) -> BsonResult<()> {
        let bytes = value.bytes();
        if value.subtype().is_uuid() && bytes.len() != 16 {
            log::error!("UUID binary data must be 16 bytes, got {}", bytes.len());
            return Err(BsonError::new(
                &format!("UUID binary data must be 16 bytes, got {}", bytes.len()),
                ErrorKind::Argument,
            ));
        }
        let length = i32::try_from(bytes.len())?;
        let old_binary_size = match value.subtype() {
            BinarySubType::OldBinary => Some(old_binary_size(length)?),
            _ => None,
        };

        self.write_header("write_binary", BsonType::Binary)?;
        if let Some(size) = old_binary_size {
            self.buffer.extend_from_slice(&size.to_le_bytes());
            self.buffer.push(value.subtype().tag());
            self.buffer.extend_from_slice(&length.to_le_bytes());
        } else {
            self.buffer.extend_from_slice(&length.to_le_bytes());
            self.buffer.push(value.subtype().tag());
        }
        self.buffer.extend_from_slice(bytes);
        self.after_value();
        Ok(())
    }

    fn write_undefined(&mut self) -> BsonResult<()> {
        self.write_scalar("write_undefined", BsonType::Undefined, &[])
    }

    fn write_object_id(&mut self, value: &ObjectId) -> BsonResult<()> {
        self.write_scalar("write_object_id", BsonType::ObjectId, &value.bytes())
    }

    fn write_boolean(&mut self, value: bool) -> BsonResult<()> {
        self.write_scalar("write_boolean", BsonType::Boolean, &[value as u8])
    }

    fn write_date_time(&mut self, millis: i64) -> BsonResult<()> {
        self.write_scalar("write_date_time", BsonType::DateTime, &millis.to_le_bytes())
    }

    fn write_null(&mut self) -> BsonResult<()> {
        self.write_scalar("write_null", BsonType::Null, &[])
    }

    fn write_regular_expression(&mut self, value: &Regex) -> BsonResult<()> {
        BsonBinaryWriter::check_cstring(value.pattern())?;
        BsonBinaryWriter::check_cstring(value.options())?;

        self.write_header("write_regular_expression", BsonType::RegularExpression)?;
        self.write_cstring(value.pattern())?;
        self.write_cstring(value.options())?;
        self.after_value();
        Ok(())
    }

    fn write_javascript(&mut self, code: &str) -> BsonResult<()> {
        self.write_header("write_javascript", BsonType::JavaScript)?;
        self.write_string_raw(code)?;
        self.after_value();
        Ok(())
    }

    fn write_symbol(&mut self, value: &str) -> BsonResult<()> {
        self.write_header("write_symbol", BsonType::Symbol)?;
        self.write_string_raw(value)?;
        self.after_value();
        Ok(())
    }

    fn write_javascript_with_scope(&mut self, code: &str) -> BsonResult<()> {
        self.write_header("write_javascript_with_scope", BsonType::JavaScriptWithScope)?;
        self.push_frame(ContextType::JavaScriptWithScope);
        self.write_string_raw(code)?;
        self.state = WriterState::ScopeDocument;
        Ok(())
    }

    fn write_int32(&mut self, value: i32) -> BsonResult<()> {
        self.write_scalar("write_int32", BsonType::Int32, &value.to_le_bytes())
    }

    fn write_timestamp(&mut self, value: &Timestamp) -> BsonResult<()> {
        self.write_scalar("write_timestamp", BsonType::Timestamp, &value.to_u64().to_le_bytes())
    }

    fn write_int64(&mut self, value: i64) -> BsonResult<()> {
        self.write_scalar("write_int64", BsonType::Int64, &value.to_le_bytes())
    }

    fn write_decimal128(&mut self, value: &[u8; 16]) -> BsonResult<()> {
        self.write_scalar("write_decimal128", BsonType::Decimal128, value)
    }

    fn write_min_key(&mut self) -> BsonResult<()> {
        self.write_scalar("write_min_key", BsonType::MinKey, &[])
    }

    fn write_max_key(&mut self) -> BsonResult<()> {
        self.write_scalar("write_max_key", BsonType::MaxKey, &[])
    }

    fn position(&self) -> usize {
        self.buffer.len()
    }
}

// Outer size of a subtype 2 payload, which repeats its length inside.
fn old_binary_size(length: i32) -> BsonResult<i32> {
    match length.checked_add(4) {
        Some(size) => Ok(size),
        None => {
            log::error!("Old binary payload of {} bytes is too large", length);
            Err(BsonError::new(
                &format!("Old binary payload of {} bytes is too large", length),
                ErrorKind::Argument,
            ))
        }
    }
}
