use bsonkit::errors::BsonResult;
use bsonkit::serialization::{SerializerModule, SerializerRegistry};

use crate::serializers::GeoJsonCoordinatesSerializer;
use crate::{GeoJson2DCoordinates, GeoJson2DGeographicCoordinates, GeoJson3DCoordinates};

/// Serializer module for the GeoJSON object model.
///
/// Registers the position serializers. Composite and geometry serializers
/// are built on first use through
/// [SerializerRegistry::lookup_generic] and cached by the registry.
///
/// ## Example
///
/// ```rust
/// use bsonkit::serialization::SerializerRegistry;
/// use bsonkit_geojson::{GeoJson2DCoordinates, GeoJsonModule, GeoJsonPolygon};
///
/// let registry = SerializerRegistry::new();
/// registry.load_module(GeoJsonModule).unwrap();
/// assert!(registry.lookup_generic::<GeoJsonPolygon<GeoJson2DCoordinates>>().is_ok());
/// ```
pub struct GeoJsonModule;

impl Default for GeoJsonModule {
    fn default() -> Self {
        Self
    }
}

impl SerializerModule for GeoJsonModule {
    fn load(&self, registry: &SerializerRegistry) -> BsonResult<()> {
        registry.register(GeoJsonCoordinatesSerializer::<GeoJson2DCoordinates>::new())?;
        registry.register(GeoJsonCoordinatesSerializer::<GeoJson3DCoordinates>::new())?;
        registry.register(GeoJsonCoordinatesSerializer::<GeoJson2DGeographicCoordinates>::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsonkit::errors::ErrorKind;

    #[test]
    fn test_module_registers_positions() {
        let registry = SerializerRegistry::new();
        registry.load_module(GeoJsonModule).unwrap();
        assert!(registry.contains::<GeoJson2DCoordinates>());
        assert!(registry.contains::<GeoJson3DCoordinates>());
        assert!(registry.contains::<GeoJson2DGeographicCoordinates>());
    }

    #[test]
    fn test_module_loads_once() {
        let registry = SerializerRegistry::new();
        registry.load_module(GeoJsonModule).unwrap();
        let err = registry.load_module(GeoJsonModule).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }
}
