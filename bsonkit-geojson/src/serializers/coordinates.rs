use bsonkit::errors::BsonResult;
use bsonkit::serialization::{BsonDeserializationContext, BsonSerializationContext, BsonSerializer};
use std::any::type_name;
use std::marker::PhantomData;

use crate::serializers::{read_numbers, write_numbers, GeoJsonCoordinatesCodec};
use crate::GeoJsonCoordinates;

/// Leaf serializer for a single position.
#[derive(Debug)]
pub struct GeoJsonCoordinatesSerializer<C> {
    _marker: PhantomData<fn() -> C>,
}

impl<C: GeoJsonCoordinates> GeoJsonCoordinatesSerializer<C> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<C: GeoJsonCoordinates> Default for GeoJsonCoordinatesSerializer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: GeoJsonCoordinates> GeoJsonCoordinatesCodec<C> for GeoJsonCoordinatesSerializer<C> {
    fn read_coordinates(&self, context: &mut BsonDeserializationContext<'_>) -> BsonResult<C> {
        let values = read_numbers(context, type_name::<C>())?;
        Ok(C::from_values(&values)?)
    }

    fn write_coordinates(
        &self,
        context: &mut BsonSerializationContext<'_>,
        coordinates: &C,
    ) -> BsonResult<()> {
        write_numbers(context, &coordinates.values())
    }
}

impl<C: GeoJsonCoordinates> BsonSerializer for GeoJsonCoordinatesSerializer<C> {
    type Value = C;

    fn deserialize(&self, context: &mut BsonDeserializationContext<'_>) -> BsonResult<C> {
        self.read_coordinates(context)
    }

    fn serialize(&self, context: &mut BsonSerializationContext<'_>, value: &C) -> BsonResult<()> {
        self.write_coordinates(context, value)
    }
}
