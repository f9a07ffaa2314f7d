use bsonkit::bson::{BsonType, Document};
use bsonkit::common::TypeKey;
use bsonkit::errors::{BsonError, BsonResult};
use bsonkit::serialization::{
    verify_bson_type, BsonDeserializationContext, BsonDocumentSerializer, BsonSerializationContext,
    BsonSerializer, BsonValueSerializer, GenericBsonType, SerializerRegistry,
};
use std::sync::Arc;

use crate::serializers::{
    read_numbers, write_numbers, GeoJsonCoordinatesCodec, GeoJsonLineStringCoordinatesSerializer, GeoJsonMultiPointCoordinatesSerializer,
    GeoJsonMultiPolygonCoordinatesSerializer, GeoJsonPolygonCoordinatesSerializer,
};
use crate::{
    GeoJsonBoundingBox, GeoJsonCoordinates, GeoJsonError, GeoJsonGeometry, GeoJsonLineString,
    GeoJsonMultiPoint, GeoJsonMultiPolygon, GeoJsonObjectArgs, GeoJsonPoint, GeoJsonPolygon,
};

const TYPE_MEMBER: &str = "type";
const BBOX_MEMBER: &str = "bbox";
const CRS_MEMBER: &str = "crs";
const COORDINATES_MEMBER: &str = "coordinates";

/// Serializer for a geometry object.
///
/// The member loop is shared by all geometries: `type`, `bbox` and `crs`
/// are handled here, `coordinates` is delegated to the geometry's codec and
/// any other member is kept in [GeoJsonObjectArgs::extra_members].
pub struct GeoJsonGeometrySerializer<G: GeoJsonGeometry> {
    coordinates: Arc<dyn GeoJsonCoordinatesCodec<G::Payload>>,
}

impl<G: GeoJsonGeometry> GeoJsonGeometrySerializer<G> {
    pub fn new(coordinates: Arc<dyn GeoJsonCoordinatesCodec<G::Payload>>) -> Self {
        Self { coordinates }
    }

    fn deserialize_member(
        &self,
        context: &mut BsonDeserializationContext<'_>,
        name: &str,
        args: &mut GeoJsonObjectArgs<G::Coordinates>,
        type_seen: &mut bool,
    ) -> BsonResult<()> {
        match name {
            TYPE_MEMBER => {
                verify_bson_type(context, BsonType::String, "GeoJSON type")?;
                let actual = context.reader().read_string()?;
                if actual != G::OBJECT_TYPE.as_str() {
                    log::error!(
                        "Invalid GeoJSON type {}, expected {}",
                        actual,
                        G::OBJECT_TYPE
                    );
                    return Err(GeoJsonError::UnexpectedType {
                        expected: G::OBJECT_TYPE.to_string(),
                        actual,
                    }
                    .into());
                }
                *type_seen = true;
            }
            BBOX_MEMBER => {
                let values = read_numbers(context, "GeoJsonBoundingBox")?;
                args.bounding_box = Some(GeoJsonBoundingBox::from_values(&values)?);
            }
            CRS_MEMBER => {
                let crs = context.deserialize_with_child_context(BsonDocumentSerializer::instance())?;
                args.coordinate_reference_system = Some(crs);
            }
            _ => {
                let value = context.deserialize_with_child_context(&BsonValueSerializer)?;
                args.extra_members.insert(name, value)?;
            }
        }
        Ok(())
    }

    fn serialize_members(
        &self,
        context: &mut BsonSerializationContext<'_>,
        args: &GeoJsonObjectArgs<G::Coordinates>,
    ) -> BsonResult<()> {
        if let Some(bounding_box) = &args.bounding_box {
            context.writer().write_name(BBOX_MEMBER)?;
            write_numbers(context, &bounding_box.values())?;
        }
        if let Some(crs) = &args.coordinate_reference_system {
            context.writer().write_name(CRS_MEMBER)?;
            context.serialize_with_child_context(BsonDocumentSerializer::instance(), crs)?;
        }
        Ok(())
    }
}

fn missing_member(name: &str) -> BsonError {
    log::error!("Missing GeoJSON member {}", name);
    GeoJsonError::MissingMember(name.to_string()).into()
}

// Position payload of a point, through the registry's binding for C.
struct RegisteredPositionCodec<C: 'static> {
    position: Arc<dyn BsonSerializer<Value = C>>,
}

impl<C: GeoJsonCoordinates> GeoJsonCoordinatesCodec<C> for RegisteredPositionCodec<C> {
    fn read_coordinates(&self, context: &mut BsonDeserializationContext<'_>) -> BsonResult<C> {
        self.position.deserialize(context)
    }

    fn write_coordinates(
        &self,
        context: &mut BsonSerializationContext<'_>,
        coordinates: &C,
    ) -> BsonResult<()> {
        self.position.serialize(context, coordinates)
    }
}

impl<G: GeoJsonGeometry> BsonSerializer for GeoJsonGeometrySerializer<G> {
    type Value = G;

    fn deserialize(&self, context: &mut BsonDeserializationContext<'_>) -> BsonResult<G> {
        verify_bson_type(context, BsonType::Document, G::OBJECT_TYPE.as_str())?;
        context.reader().read_start_document()?;

        let mut args = GeoJsonObjectArgs::default();
        let mut coordinates = None;
        let mut type_seen = false;
        while context.reader().read_bson_type()? != BsonType::EndOfDocument {
            let name = context.reader().read_name()?;
            if name == COORDINATES_MEMBER {
                let mut child = context.create_child(TypeKey::of::<G::Payload>());
                coordinates = Some(self.coordinates.read_coordinates(&mut child)?);
            } else {
                self.deserialize_member(context, &name, &mut args, &mut type_seen)?;
            }
        }
        context.reader().read_end_document()?;

        if !type_seen {
            return Err(missing_member(TYPE_MEMBER));
        }
        match coordinates {
            Some(coordinates) => Ok(G::from_parts(args, coordinates)),
            None => Err(missing_member(COORDINATES_MEMBER)),
        }
    }

    fn serialize(&self, context: &mut BsonSerializationContext<'_>, value: &G) -> BsonResult<()> {
        context.writer().write_start_document()?;
        context.writer().write_name(TYPE_MEMBER)?;
        context.writer().write_string(G::OBJECT_TYPE.as_str())?;
        self.serialize_members(context, value.args())?;

        context.writer().write_name(COORDINATES_MEMBER)?;
        {
            let mut child = context.create_child(TypeKey::of::<G::Payload>());
            self.coordinates.write_coordinates(&mut child, value.coordinates())?;
        }

        for element in value.args().extra_members.iter() {
            context.writer().write_name(element.name())?;
            context.serialize_with_child_context(&BsonValueSerializer, element.value())?;
        }
        context.writer().write_end_document()
    }
}

macro_rules! generic_geometry {
    ($geometry:ident, $codec:ident, $constructor:literal) => {
        impl<C: GeoJsonCoordinates> GenericBsonType for $geometry<C> {
            type Argument = C;
            type Value = $geometry<C>;

            const CONSTRUCTOR: &'static str = $constructor;

            fn create_serializer(
                registry: &SerializerRegistry,
            ) -> BsonResult<Arc<dyn BsonSerializer<Value = $geometry<C>>>> {
                let codec = $codec::<C>::new(registry)?;
                Ok(Arc::new(GeoJsonGeometrySerializer::<$geometry<C>>::new(Arc::new(codec))))
            }
        }
    };
}

impl<C: GeoJsonCoordinates> GenericBsonType for GeoJsonPoint<C> {
    type Argument = C;
    type Value = GeoJsonPoint<C>;

    const CONSTRUCTOR: &'static str = "GeoJsonPoint";

    fn create_serializer(
        registry: &SerializerRegistry,
    ) -> BsonResult<Arc<dyn BsonSerializer<Value = GeoJsonPoint<C>>>> {
        let codec = RegisteredPositionCodec {
            position: registry.lookup::<C>()?,
        };
        Ok(Arc::new(GeoJsonGeometrySerializer::<GeoJsonPoint<C>>::new(Arc::new(codec))))
    }
}

generic_geometry!(GeoJsonLineString, GeoJsonLineStringCoordinatesSerializer, "GeoJsonLineString");
generic_geometry!(GeoJsonMultiPoint, GeoJsonMultiPointCoordinatesSerializer, "GeoJsonMultiPoint");
generic_geometry!(GeoJsonPolygon, GeoJsonPolygonCoordinatesSerializer, "GeoJsonPolygon");
generic_geometry!(
    GeoJsonMultiPolygon,
    GeoJsonMultiPolygonCoordinatesSerializer,
    "GeoJsonMultiPolygon"
);

/// Returns the `type` member of an encoded geometry object.
pub fn geometry_type(document: &Document) -> Option<&str> {
    document.get(TYPE_MEMBER).and_then(|value| value.as_str())
}
