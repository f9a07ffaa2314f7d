mod composites;
mod coordinates;
mod objects;

pub use composites::*;
pub use coordinates::*;
pub use objects::*;

use bsonkit::bson::BsonType;
use bsonkit::common::TypeKey;
use bsonkit::errors::{BsonError, BsonResult, ErrorKind};
use bsonkit::serialization::{
    verify_bson_type, BsonDeserializationContext, BsonSerializationContext, BsonSerializer,
};

/// Reads and writes a non-null coordinate payload.
///
/// Geometry objects embed their coordinates through this trait; the
/// registered serializers add null handling on top of it.
pub trait GeoJsonCoordinatesCodec<T>: Send + Sync {
    fn read_coordinates(&self, context: &mut BsonDeserializationContext<'_>) -> BsonResult<T>;

    fn write_coordinates(
        &self,
        context: &mut BsonSerializationContext<'_>,
        coordinates: &T,
    ) -> BsonResult<()>;
}

/// Reads a null token as `None`, otherwise the payload through `codec`.
pub(crate) fn read_nullable<T>(
    context: &mut BsonDeserializationContext<'_>,
    codec: &dyn GeoJsonCoordinatesCodec<T>,
) -> BsonResult<Option<T>> {
    if context.reader().current_bson_type()? == BsonType::Null {
        context.reader().read_null()?;
        return Ok(None);
    }
    codec.read_coordinates(context).map(Some)
}

pub(crate) fn write_nullable<T>(
    context: &mut BsonSerializationContext<'_>,
    codec: &dyn GeoJsonCoordinatesCodec<T>,
    value: &Option<T>,
) -> BsonResult<()> {
    match value {
        None => context.writer().write_null(),
        Some(coordinates) => codec.write_coordinates(context, coordinates),
    }
}

/// Reads every element of the array under the cursor through a child context.
pub(crate) fn read_elements<S>(
    context: &mut BsonDeserializationContext<'_>,
    element: &S,
    target: &str,
) -> BsonResult<Vec<S::Value>>
where
    S: BsonSerializer + ?Sized,
{
    verify_bson_type(context, BsonType::Array, target)?;
    context.reader().read_start_array()?;
    let mut elements = Vec::new();
    while context.reader().read_bson_type()? != BsonType::EndOfDocument {
        elements.push(context.deserialize_with_child_context(element)?);
    }
    context.reader().read_end_array()?;
    Ok(elements)
}

pub(crate) fn write_elements<'a, S, I>(
    context: &mut BsonSerializationContext<'_>,
    element: &S,
    elements: I,
) -> BsonResult<()>
where
    S: BsonSerializer + ?Sized,
    S::Value: 'a,
    I: IntoIterator<Item = &'a S::Value>,
{
    context.writer().write_start_array()?;
    for value in elements {
        context.serialize_with_child_context(element, value)?;
    }
    context.writer().write_end_array()
}

/// Writes every element through `codec`, each in a child context nominally
/// typed as the nullable element.
pub(crate) fn write_codec_elements<'a, T, I>(
    context: &mut BsonSerializationContext<'_>,
    codec: &dyn GeoJsonCoordinatesCodec<T>,
    elements: I,
) -> BsonResult<()>
where
    T: 'static,
    I: IntoIterator<Item = &'a T>,
{
    context.writer().write_start_array()?;
    for value in elements {
        let mut child = context.create_child(TypeKey::of::<Option<T>>());
        codec.write_coordinates(&mut child, value)?;
    }
    context.writer().write_end_array()
}

/// Unwraps elements read by a nullable serializer; a null element is a
/// format error.
pub(crate) fn require_elements<T>(elements: Vec<Option<T>>, target: &str) -> BsonResult<Vec<T>> {
    elements
        .into_iter()
        .map(|element| match element {
            Some(value) => Ok(value),
            None => {
                log::error!("Cannot deserialize {} from BsonType Null.", target);
                Err(BsonError::new(
                    &format!("Cannot deserialize {} from BsonType Null.", target),
                    ErrorKind::Format,
                ))
            }
        })
        .collect()
}

/// Reads an array of numbers, accepting doubles, int32 and int64 values.
pub(crate) fn read_numbers(
    context: &mut BsonDeserializationContext<'_>,
    target: &str,
) -> BsonResult<Vec<f64>> {
    verify_bson_type(context, BsonType::Array, target)?;
    let reader = context.reader();
    reader.read_start_array()?;
    let mut values = Vec::new();
    loop {
        let value = match reader.read_bson_type()? {
            BsonType::EndOfDocument => break,
            BsonType::Double => reader.read_double()?,
            BsonType::Int32 => reader.read_int32()? as f64,
            BsonType::Int64 => reader.read_int64()? as f64,
            other => {
                log::error!("Cannot deserialize a {} value from BsonType {}.", target, other);
                return Err(BsonError::new(
                    &format!("Cannot deserialize a {} value from BsonType {}.", target, other),
                    ErrorKind::Format,
                ));
            }
        };
        values.push(value);
    }
    reader.read_end_array()?;
    Ok(values)
}

pub(crate) fn write_numbers(
    context: &mut BsonSerializationContext<'_>,
    values: &[f64],
) -> BsonResult<()> {
    let writer = context.writer();
    writer.write_start_array()?;
    for value in values {
        writer.write_double(*value)?;
    }
    writer.write_end_array()
}
