use crate::bson::{Binary, BsonType, ObjectId, Regex, Timestamp};
use crate::errors::BsonResult;

/// A forward-only cursor over an encoded document.
///
/// Elements are read as a type tag, a name and a value:
///
/// ```text
/// read_start_document
/// while read_bson_type() != EndOfDocument {
///     read_name
///     read_<kind> | read_start_document .. | read_start_array ..
/// }
/// read_end_document
/// ```
///
/// Arrays follow the same shape, except that inside an array
/// [BsonReader::read_bson_type] also consumes the element's index name and
/// `read_name` is not called.
/// Every method that does not match the cursor's current state fails with
/// `ErrorKind::InvalidOperation`; malformed bytes fail with
/// `ErrorKind::Format`, `ErrorKind::Stream` or `ErrorKind::Encoding`.
pub trait BsonReader {
    /// Returns the kind of the value under the cursor without consuming
    /// anything. At the top level, before a document is started, this is
    /// always `Document`.
    fn current_bson_type(&mut self) -> BsonResult<BsonType>;

    /// Reads the next type tag. Returns `EndOfDocument` at the end of the
    /// enclosing document or array.
    fn read_bson_type(&mut self) -> BsonResult<BsonType>;

    fn read_name(&mut self) -> BsonResult<String>;

    fn read_start_document(&mut self) -> BsonResult<()>;

    fn read_end_document(&mut self) -> BsonResult<()>;

    fn read_start_array(&mut self) -> BsonResult<()>;

    fn read_end_array(&mut self) -> BsonResult<()>;

    fn read_double(&mut self) -> BsonResult<f64>;

    fn read_string(&mut self) -> BsonResult<String>;

    fn read_binary(&mut self) -> BsonResult<Binary>;

    fn read_undefined(&mut self) -> BsonResult<()>;

    fn read_object_id(&mut self) -> BsonResult<ObjectId>;

    fn read_boolean(&mut self) -> BsonResult<bool>;

    /// Milliseconds since the Unix epoch.
    fn read_date_time(&mut self) -> BsonResult<i64>;

    fn read_null(&mut self) -> BsonResult<()>;

    fn read_regular_expression(&mut self) -> BsonResult<Regex>;

    fn read_javascript(&mut self) -> BsonResult<String>;

    fn read_symbol(&mut self) -> BsonResult<String>;

    /// Reads the code of a code-with-scope value and leaves the cursor on the
    /// scope document, which the caller reads next with
    /// [BsonReader::read_start_document].
    fn read_javascript_with_scope(&mut self) -> BsonResult<String>;

    fn read_int32(&mut self) -> BsonResult<i32>;

    fn read_timestamp(&mut self) -> BsonResult<Timestamp>;

    fn read_int64(&mut self) -> BsonResult<i64>;

    fn read_decimal128(&mut self) -> BsonResult<[u8; 16]>;

    fn read_min_key(&mut self) -> BsonResult<()>;

    fn read_max_key(&mut self) -> BsonResult<()>;

    /// Number of bytes consumed so far.
    fn position(&self) -> usize;
}
