use crate::bson::{Binary, ObjectId, Regex, Timestamp};
use crate::errors::BsonResult;

/// A forward-only cursor producing an encoded document.
///
/// Inside a document every value is preceded by [BsonWriter::write_name];
/// inside an array names are generated from the element index and
/// `write_name` is not called. Calls that do not match the writer's state
/// fail with `ErrorKind::InvalidOperation`.
pub trait BsonWriter {
    fn write_name(&mut self, name: &str) -> BsonResult<()>;

    fn write_start_document(&mut self) -> BsonResult<()>;

    fn write_end_document(&mut self) -> BsonResult<()>;

    fn write_start_array(&mut self) -> BsonResult<()>;

    fn write_end_array(&mut self) -> BsonResult<()>;

    fn write_double(&mut self, value: f64) -> BsonResult<()>;

    fn write_string(&mut self, value: &str) -> BsonResult<()>;

    fn write_binary(&mut self, value: &Binary) -> BsonResult<()>;

    fn write_undefined(&mut self) -> BsonResult<()>;

    fn write_object_id(&mut self, value: &ObjectId) -> BsonResult<()>;

    fn write_boolean(&mut self, value: bool) -> BsonResult<()>;

    fn write_date_time(&mut self, millis: i64) -> BsonResult<()>;

    fn write_null(&mut self) -> BsonResult<()>;

    fn write_regular_expression(&mut self, value: &Regex) -> BsonResult<()>;

    fn write_javascript(&mut self, code: &str) -> BsonResult<()>;

    fn write_symbol(&mut self, value: &str) -> BsonResult<()>;

    /// Writes the code of a code-with-scope value; the scope document must
    /// be written next with [BsonWriter::write_start_document].
    fn write_javascript_with_scope(&mut self, code: &str) -> BsonResult<()>;

    fn write_int32(&mut self, value: i32) -> BsonResult<()>;

    fn write_timestamp(&mut self, value: &Timestamp) -> BsonResult<()>;

    fn write_int64(&mut self, value: i64) -> BsonResult<()>;

    fn write_decimal128(&mut self, value: &[u8; 16]) -> BsonResult<()>;

    fn write_min_key(&mut self) -> BsonResult<()>;

    fn write_max_key(&mut self) -> BsonResult<()>;

    /// Number of bytes in the output buffer.
    fn position(&self) -> usize;
}
