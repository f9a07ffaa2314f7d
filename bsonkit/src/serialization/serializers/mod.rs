mod array;
mod document;
mod leaf;
mod value;

pub use array::*;
pub use document::*;
pub use leaf::*;
pub use value::*;

use crate::bson::BsonType;
use crate::errors::{BsonError, BsonResult, ErrorKind};
use crate::serialization::BsonDeserializationContext;

/// Fails with `ErrorKind::Format` unless the value under the cursor is of
/// kind `expected`. Nothing is consumed.
pub fn verify_bson_type(
    context: &mut BsonDeserializationContext<'_>,
    expected: BsonType,
    target: &str,
) -> BsonResult<()> {
    let actual = context.reader().current_bson_type()?;
    if actual != expected {
        log::error!(
            "Cannot deserialize {} from BsonType {}, expected BsonType {}.",
            target,
            actual,
            expected
        );
        return Err(BsonError::new(
            &format!(
                "Cannot deserialize {} from BsonType {}, expected BsonType {}.",
                target, actual, expected
            ),
            ErrorKind::Format,
        ));
    }
    Ok(())
}
