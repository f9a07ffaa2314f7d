use bsonkit::bson::{Document, Value};
use bsonkit::doc;
use bsonkit::errors::ErrorKind;
use bsonkit::io::{BsonBinaryReader, BsonBinaryWriter, BsonReader, BsonWriter};
use bsonkit::serialization::{BsonDeserializationContext, BsonSerializationContext};
use bsonkit_geojson::{
    geometry_type, GeoJson2DCoordinates, GeoJson2DGeographicCoordinates, GeoJson3DCoordinates,
    GeoJsonBoundingBox, GeoJsonGeometry, GeoJsonLineString, GeoJsonLineStringCoordinates,
    GeoJsonLinearRingCoordinates, GeoJsonMultiPolygon, GeoJsonMultiPolygonCoordinates,
    GeoJsonObjectArgs, GeoJsonPoint, GeoJsonPolygon, GeoJsonPolygonCoordinates,
};
use bsonkit_int_test::test_util::{create_test_context, decode, encode, names, run_test};

#[ctor::ctor]
fn init() {
    colog::init();
}

fn square(size: f64) -> GeoJsonLinearRingCoordinates<GeoJson2DCoordinates> {
    GeoJsonLinearRingCoordinates::new(vec![
        GeoJson2DCoordinates::new(0.0, 0.0),
        GeoJson2DCoordinates::new(0.0, size),
        GeoJson2DCoordinates::new(size, size),
        GeoJson2DCoordinates::new(0.0, 0.0),
    ])
    .unwrap()
}

#[test]
fn test_point_as_document() {
    run_test(create_test_context, |ctx| {
        let serializer = ctx
            .config()
            .registry()
            .lookup_generic::<GeoJsonPoint<GeoJson2DGeographicCoordinates>>()?;
        let point = GeoJsonPoint::new(GeoJson2DGeographicCoordinates::new(2.35, 48.85));

        let bytes = encode(serializer.as_ref(), &point, ctx.config())?;
        let document = bsonkit::from_slice_with(&bytes, ctx.config())?;
        assert_eq!(geometry_type(&document), Some("Point"));
        assert_eq!(
            document,
            doc! { type: "Point", coordinates: [2.35, 48.85] }
        );

        assert_eq!(decode(serializer.as_ref(), &bytes, ctx.config())?, point);
        Ok(())
    })
}

#[test]
fn test_geometry_from_plain_document() {
    run_test(create_test_context, |ctx| {
        // integer coordinates and unknown members written by another producer
        let document = doc! {
            source: "survey",
            coordinates: [[0, 0], [3, 4]],
            type: "LineString",
        };
        let bytes = bsonkit::to_vec_with(&document, ctx.config())?;

        let serializer = ctx
            .config()
            .registry()
            .lookup_generic::<GeoJsonLineString<GeoJson2DCoordinates>>()?;
        let line = decode(serializer.as_ref(), &bytes, ctx.config())?;
        assert_eq!(
            line.coordinates(),
            &GeoJsonLineStringCoordinates::new(vec![
                GeoJson2DCoordinates::new(0.0, 0.0),
                GeoJson2DCoordinates::new(3.0, 4.0),
            ])
            .unwrap()
        );
        assert_eq!(line.args().extra_members, doc! { source: "survey" });

        let rewritten = bsonkit::from_slice_with(
            &encode(serializer.as_ref(), &line, ctx.config())?,
            ctx.config(),
        )?;
        assert_eq!(names(&rewritten), vec!["type", "coordinates", "source"]);
        Ok(())
    })
}

#[test]
fn test_multi_polygon_layout() {
    run_test(create_test_context, |ctx| {
        let polygon = GeoJsonPolygonCoordinates::new(square(1.0));
        let multi_polygon = GeoJsonMultiPolygon::new(GeoJsonMultiPolygonCoordinates::new(vec![
            polygon.clone(),
            polygon,
        ]));
        let serializer = ctx
            .config()
            .registry()
            .lookup_generic::<GeoJsonMultiPolygon<GeoJson2DCoordinates>>()?;

        let bytes = encode(serializer.as_ref(), &multi_polygon, ctx.config())?;
        let document = bsonkit::from_slice_with(&bytes, ctx.config())?;
        assert_eq!(
            document,
            doc! {
                type: "MultiPolygon",
                coordinates: [
                    [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]],
                    [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]],
                ],
            }
        );
        assert_eq!(decode(serializer.as_ref(), &bytes, ctx.config())?, multi_polygon);
        Ok(())
    })
}

#[test]
fn test_polygon_with_members() {
    run_test(create_test_context, |ctx| {
        let args = GeoJsonObjectArgs {
            bounding_box: Some(GeoJsonBoundingBox::new(
                GeoJson2DCoordinates::new(0.0, 0.0),
                GeoJson2DCoordinates::new(4.0, 4.0),
            )),
            coordinate_reference_system: Some(doc! {
                type: "name",
                properties: { name: "EPSG:4326" },
            }),
            extra_members: doc! { label: "plot", area: 16 },
        };
        let polygon = GeoJsonPolygon::with_args(
            args,
            GeoJsonPolygonCoordinates::with_holes(square(4.0), vec![square(1.0)]),
        );
        let serializer = ctx
            .config()
            .registry()
            .lookup_generic::<GeoJsonPolygon<GeoJson2DCoordinates>>()?;

        let bytes = encode(serializer.as_ref(), &polygon, ctx.config())?;
        let document = bsonkit::from_slice_with(&bytes, ctx.config())?;
        assert_eq!(
            names(&document),
            vec!["type", "bbox", "crs", "coordinates", "label", "area"]
        );
        assert_eq!(
            document.get("bbox"),
            Some(&Value::from(vec![0.0, 0.0, 4.0, 4.0]))
        );
        assert_eq!(decode(serializer.as_ref(), &bytes, ctx.config())?, polygon);
        Ok(())
    })
}

#[test]
fn test_wrong_geometry_type() {
    run_test(create_test_context, |ctx| {
        let bytes = bsonkit::to_vec_with(
            &doc! { type: "Point", coordinates: [1.0, 2.0, 3.0] },
            ctx.config(),
        )?;

        let point = ctx
            .config()
            .registry()
            .lookup_generic::<GeoJsonPoint<GeoJson3DCoordinates>>()?;
        let decoded = decode(point.as_ref(), &bytes, ctx.config())?;
        assert_eq!(decoded.coordinates(), &GeoJson3DCoordinates::new(1.0, 2.0, 3.0));

        let line = ctx
            .config()
            .registry()
            .lookup_generic::<GeoJsonLineString<GeoJson3DCoordinates>>()?;
        let err = decode(line.as_ref(), &bytes, ctx.config()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Format);

        // a 2D position cannot hold three values
        let flat = ctx
            .config()
            .registry()
            .lookup_generic::<GeoJsonPoint<GeoJson2DCoordinates>>()?;
        let err = decode(flat.as_ref(), &bytes, ctx.config()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Format);
        Ok(())
    })
}

#[test]
fn test_nullable_coordinates_in_document() {
    run_test(create_test_context, |ctx| {
        let registry = ctx.config().registry();
        let serializer =
            registry.lookup_generic::<GeoJsonPolygonCoordinates<GeoJson2DCoordinates>>()?;
        let polygon = Some(GeoJsonPolygonCoordinates::new(square(2.0)));

        let mut writer = BsonBinaryWriter::new();
        writer.write_start_document()?;
        writer.write_name("present")?;
        {
            let mut context = BsonSerializationContext::new(&mut writer, registry);
            context.serialize_with_child_context(serializer.as_ref(), &polygon)?;
        }
        writer.write_name("absent")?;
        {
            let mut context = BsonSerializationContext::new(&mut writer, registry);
            context.serialize_with_child_context(serializer.as_ref(), &None)?;
        }
        writer.write_end_document()?;
        let bytes = writer.into_inner();

        let document = bsonkit::from_slice_with(&bytes, ctx.config())?;
        assert_eq!(document.get("absent"), Some(&Value::Null));

        let mut reader = BsonBinaryReader::new(&bytes);
        reader.read_start_document()?;
        let mut values = Vec::new();
        while reader.read_bson_type()? != bsonkit::bson::BsonType::EndOfDocument {
            reader.read_name()?;
            let mut context = BsonDeserializationContext::new(&mut reader, registry);
            values.push(context.deserialize_with_child_context(serializer.as_ref())?);
        }
        reader.read_end_document()?;
        assert_eq!(values, vec![polygon, None]);
        Ok(())
    })
}

#[test]
fn test_missing_members() {
    run_test(create_test_context, |ctx| {
        let serializer = ctx
            .config()
            .registry()
            .lookup_generic::<GeoJsonPoint<GeoJson2DCoordinates>>()?;
        let empty = bsonkit::to_vec_with(&Document::new(), ctx.config())?;
        let err = decode(serializer.as_ref(), &empty, ctx.config()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Format);
        Ok(())
    })
}
