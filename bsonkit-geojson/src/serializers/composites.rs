//! Serializers for the composite coordinate types.
//!
//! Every composite serializer reads a null token as `None`. Arrays are read
//! element by element, each element through a child context with the
//! element serializer found in the registry, and the collected elements are
//! handed to the composite's constructor.

use bsonkit::errors::BsonResult;
use bsonkit::serialization::{
    BsonDeserializationContext, BsonSerializationContext, BsonSerializer, GenericBsonType,
    SerializerRegistry,
};
use std::sync::Arc;

use crate::serializers::{
    read_elements, read_nullable, require_elements, write_codec_elements, write_elements,
    write_nullable, GeoJsonCoordinatesCodec,
};
use crate::{
    GeoJsonCoordinates, GeoJsonLineStringCoordinates, GeoJsonLinearRingCoordinates,
    GeoJsonMultiPointCoordinates, GeoJsonMultiPolygonCoordinates, GeoJsonPolygonCoordinates,
};

macro_rules! nullable_composite {
    ($serializer:ident, $composite:ident, $constructor:literal) => {
        impl<C: GeoJsonCoordinates> BsonSerializer for $serializer<C> {
            type Value = Option<$composite<C>>;

            fn deserialize(
                &self,
                context: &mut BsonDeserializationContext<'_>,
            ) -> BsonResult<Option<$composite<C>>> {
                read_nullable(context, self)
            }

            fn serialize(
                &self,
                context: &mut BsonSerializationContext<'_>,
                value: &Option<$composite<C>>,
            ) -> BsonResult<()> {
                write_nullable(context, self, value)
            }
        }

        impl<C: GeoJsonCoordinates> GenericBsonType for $composite<C> {
            type Argument = C;
            type Value = Option<$composite<C>>;

            const CONSTRUCTOR: &'static str = $constructor;

            fn create_serializer(
                registry: &SerializerRegistry,
            ) -> BsonResult<Arc<dyn BsonSerializer<Value = Option<$composite<C>>>>> {
                Ok(Arc::new($serializer::new(registry)?))
            }
        }
    };
}

/// Serializer for [GeoJsonLineStringCoordinates].
pub struct GeoJsonLineStringCoordinatesSerializer<C> {
    position: Arc<dyn BsonSerializer<Value = C>>,
}

impl<C: GeoJsonCoordinates> GeoJsonLineStringCoordinatesSerializer<C> {
    pub fn new(registry: &SerializerRegistry) -> BsonResult<Self> {
        Ok(Self {
            position: registry.lookup::<C>()?,
        })
    }
}

impl<C: GeoJsonCoordinates> GeoJsonCoordinatesCodec<GeoJsonLineStringCoordinates<C>>
    for GeoJsonLineStringCoordinatesSerializer<C>
{
    fn read_coordinates(
        &self,
        context: &mut BsonDeserializationContext<'_>,
    ) -> BsonResult<GeoJsonLineStringCoordinates<C>> {
        let positions = read_elements(context, &*self.position, "GeoJsonLineStringCoordinates")?;
        Ok(GeoJsonLineStringCoordinates::new(positions)?)
    }

    fn write_coordinates(
        &self,
        context: &mut BsonSerializationContext<'_>,
        coordinates: &GeoJsonLineStringCoordinates<C>,
    ) -> BsonResult<()> {
        write_elements(context, &*self.position, coordinates.positions())
    }
}

nullable_composite!(
    GeoJsonLineStringCoordinatesSerializer,
    GeoJsonLineStringCoordinates,
    "GeoJsonLineStringCoordinates"
);

/// Serializer for [GeoJsonLinearRingCoordinates].
pub struct GeoJsonLinearRingCoordinatesSerializer<C> {
    position: Arc<dyn BsonSerializer<Value = C>>,
}

impl<C: GeoJsonCoordinates> GeoJsonLinearRingCoordinatesSerializer<C> {
    pub fn new(registry: &SerializerRegistry) -> BsonResult<Self> {
        Ok(Self {
            position: registry.lookup::<C>()?,
        })
    }
}

impl<C: GeoJsonCoordinates> GeoJsonCoordinatesCodec<GeoJsonLinearRingCoordinates<C>>
    for GeoJsonLinearRingCoordinatesSerializer<C>
{
    fn read_coordinates(
        &self,
        context: &mut BsonDeserializationContext<'_>,
    ) -> BsonResult<GeoJsonLinearRingCoordinates<C>> {
        let positions = read_elements(context, &*self.position, "GeoJsonLinearRingCoordinates")?;
        Ok(GeoJsonLinearRingCoordinates::new(positions)?)
    }

    fn write_coordinates(
        &self,
        context: &mut BsonSerializationContext<'_>,
        coordinates: &GeoJsonLinearRingCoordinates<C>,
    ) -> BsonResult<()> {
        write_elements(context, &*self.position, coordinates.positions())
    }
}

nullable_composite!(
    GeoJsonLinearRingCoordinatesSerializer,
    GeoJsonLinearRingCoordinates,
    "GeoJsonLinearRingCoordinates"
);

/// Serializer for [GeoJsonMultiPointCoordinates].
pub struct GeoJsonMultiPointCoordinatesSerializer<C> {
    position: Arc<dyn BsonSerializer<Value = C>>,
}

impl<C: GeoJsonCoordinates> GeoJsonMultiPointCoordinatesSerializer<C> {
    pub fn new(registry: &SerializerRegistry) -> BsonResult<Self> {
        Ok(Self {
            position: registry.lookup::<C>()?,
        })
    }
}

impl<C: GeoJsonCoordinates> GeoJsonCoordinatesCodec<GeoJsonMultiPointCoordinates<C>>
    for GeoJsonMultiPointCoordinatesSerializer<C>
{
    fn read_coordinates(
        &self,
        context: &mut BsonDeserializationContext<'_>,
    ) -> BsonResult<GeoJsonMultiPointCoordinates<C>> {
        let positions = read_elements(context, &*self.position, "GeoJsonMultiPointCoordinates")?;
        Ok(GeoJsonMultiPointCoordinates::new(positions))
    }

    fn write_coordinates(
        &self,
        context: &mut BsonSerializationContext<'_>,
        coordinates: &GeoJsonMultiPointCoordinates<C>,
    ) -> BsonResult<()> {
        write_elements(context, &*self.position, coordinates.positions())
    }
}

nullable_composite!(
    GeoJsonMultiPointCoordinatesSerializer,
    GeoJsonMultiPointCoordinates,
    "GeoJsonMultiPointCoordinates"
);

/// Serializer for [GeoJsonPolygonCoordinates]; rings are read through the
/// registry's linear ring serializer and written through its codec.
pub struct GeoJsonPolygonCoordinatesSerializer<C> {
    ring: Arc<dyn BsonSerializer<Value = Option<GeoJsonLinearRingCoordinates<C>>>>,
    ring_codec: GeoJsonLinearRingCoordinatesSerializer<C>,
}

impl<C: GeoJsonCoordinates> GeoJsonPolygonCoordinatesSerializer<C> {
    pub fn new(registry: &SerializerRegistry) -> BsonResult<Self> {
        Ok(Self {
            ring: registry.lookup_generic::<GeoJsonLinearRingCoordinates<C>>()?,
            ring_codec: GeoJsonLinearRingCoordinatesSerializer::new(registry)?,
        })
    }
}

impl<C: GeoJsonCoordinates> GeoJsonCoordinatesCodec<GeoJsonPolygonCoordinates<C>>
    for GeoJsonPolygonCoordinatesSerializer<C>
{
    fn read_coordinates(
        &self,
        context: &mut BsonDeserializationContext<'_>,
    ) -> BsonResult<GeoJsonPolygonCoordinates<C>> {
        let rings = read_elements(context, &*self.ring, "GeoJsonPolygonCoordinates")?;
        let rings = require_elements(rings, "GeoJsonLinearRingCoordinates")?;
        Ok(GeoJsonPolygonCoordinates::from_rings(rings)?)
    }

    fn write_coordinates(
        &self,
        context: &mut BsonSerializationContext<'_>,
        coordinates: &GeoJsonPolygonCoordinates<C>,
    ) -> BsonResult<()> {
        write_codec_elements(context, &self.ring_codec, coordinates.rings())
    }
}

nullable_composite!(
    GeoJsonPolygonCoordinatesSerializer,
    GeoJsonPolygonCoordinates,
    "GeoJsonPolygonCoordinates"
);

/// Serializer for [GeoJsonMultiPolygonCoordinates]; polygons are read
/// through the registry's polygon coordinates serializer and written
/// through its codec.
pub struct GeoJsonMultiPolygonCoordinatesSerializer<C> {
    polygon: Arc<dyn BsonSerializer<Value = Option<GeoJsonPolygonCoordinates<C>>>>,
    polygon_codec: GeoJsonPolygonCoordinatesSerializer<C>,
}

impl<C: GeoJsonCoordinates> GeoJsonMultiPolygonCoordinatesSerializer<C> {
    pub fn new(registry: &SerializerRegistry) -> BsonResult<Self> {
        Ok(Self {
            polygon: registry.lookup_generic::<GeoJsonPolygonCoordinates<C>>()?,
            polygon_codec: GeoJsonPolygonCoordinatesSerializer::new(registry)?,
        })
    }
}

impl<C: GeoJsonCoordinates> GeoJsonCoordinatesCodec<GeoJsonMultiPolygonCoordinates<C>>
    for GeoJsonMultiPolygonCoordinatesSerializer<C>
{
    fn read_coordinates(
        &self,
        context: &mut BsonDeserializationContext<'_>,
    ) -> BsonResult<GeoJsonMultiPolygonCoordinates<C>> {
        let polygons = read_elements(context, &*self.polygon, "GeoJsonMultiPolygonCoordinates")?;
        let polygons = require_elements(polygons, "GeoJsonPolygonCoordinates")?;
        Ok(GeoJsonMultiPolygonCoordinates::new(polygons))
    }

    fn write_coordinates(
        &self,
        context: &mut BsonSerializationContext<'_>,
        coordinates: &GeoJsonMultiPolygonCoordinates<C>,
    ) -> BsonResult<()> {
        write_codec_elements(context, &self.polygon_codec, coordinates.polygons())
    }
}

nullable_composite!(
    GeoJsonMultiPolygonCoordinatesSerializer,
    GeoJsonMultiPolygonCoordinates,
    "GeoJsonMultiPolygonCoordinates"
);
