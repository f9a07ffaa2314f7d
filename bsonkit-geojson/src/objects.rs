//! GeoJSON geometry objects.

use bsonkit::bson::Document;
use std::fmt::{self, Display};

use crate::{
    GeoJsonCoordinates, GeoJsonBoundingBox, GeoJsonLineStringCoordinates,
    GeoJsonMultiPointCoordinates, GeoJsonMultiPolygonCoordinates, GeoJsonPolygonCoordinates,
};

/// The `type` discriminator of a geometry object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoJsonObjectType {
    Point,
    LineString,
    MultiPoint,
    Polygon,
    MultiPolygon,
}

impl GeoJsonObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoJsonObjectType::Point => "Point",
            GeoJsonObjectType::LineString => "LineString",
            GeoJsonObjectType::MultiPoint => "MultiPoint",
            GeoJsonObjectType::Polygon => "Polygon",
            GeoJsonObjectType::MultiPolygon => "MultiPolygon",
        }
    }
}

impl Display for GeoJsonObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Members shared by every geometry object.
///
/// `extra_members` keeps any member that is not part of the GeoJSON
/// geometry model, in encounter order, so it survives a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonObjectArgs<C> {
    pub bounding_box: Option<GeoJsonBoundingBox<C>>,
    pub coordinate_reference_system: Option<Document>,
    pub extra_members: Document,
}

impl<C> Default for GeoJsonObjectArgs<C> {
    fn default() -> Self {
        Self {
            bounding_box: None,
            coordinate_reference_system: None,
            extra_members: Document::new(),
        }
    }
}

/// A geometry object: common members plus a geometry-specific payload.
///
/// The shared object serializer handles the common members and calls back
/// into the implementation for `coordinates`.
pub trait GeoJsonGeometry: Sized + Send + Sync + 'static {
    type Coordinates: GeoJsonCoordinates;
    type Payload: Send + Sync + 'static;

    const OBJECT_TYPE: GeoJsonObjectType;

    fn from_parts(args: GeoJsonObjectArgs<Self::Coordinates>, coordinates: Self::Payload) -> Self;

    fn args(&self) -> &GeoJsonObjectArgs<Self::Coordinates>;

    fn coordinates(&self) -> &Self::Payload;
}

macro_rules! geometry_object {
    ($(#[$meta:meta])* $name:ident, $object_type:ident, $payload:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name<C> {
            args: GeoJsonObjectArgs<C>,
            coordinates: $payload,
        }

        impl<C: GeoJsonCoordinates> $name<C> {
            pub fn new(coordinates: $payload) -> Self {
                Self::with_args(GeoJsonObjectArgs::default(), coordinates)
            }

            pub fn with_args(args: GeoJsonObjectArgs<C>, coordinates: $payload) -> Self {
                Self { args, coordinates }
            }
        }

        impl<C: GeoJsonCoordinates> GeoJsonGeometry for $name<C> {
            type Coordinates = C;
            type Payload = $payload;

            const OBJECT_TYPE: GeoJsonObjectType = GeoJsonObjectType::$object_type;

            fn from_parts(args: GeoJsonObjectArgs<C>, coordinates: $payload) -> Self {
                Self::with_args(args, coordinates)
            }

            fn args(&self) -> &GeoJsonObjectArgs<C> {
                &self.args
            }

            fn coordinates(&self) -> &$payload {
                &self.coordinates
            }
        }
    };
}

geometry_object!(
    /// A single position.
    GeoJsonPoint,
    Point,
    C
);
geometry_object!(GeoJsonLineString, LineString, GeoJsonLineStringCoordinates<C>);
geometry_object!(GeoJsonMultiPoint, MultiPoint, GeoJsonMultiPointCoordinates<C>);
geometry_object!(
    /// An exterior ring with optional holes.
    GeoJsonPolygon,
    Polygon,
    GeoJsonPolygonCoordinates<C>
);
geometry_object!(GeoJsonMultiPolygon, MultiPolygon, GeoJsonMultiPolygonCoordinates<C>);
