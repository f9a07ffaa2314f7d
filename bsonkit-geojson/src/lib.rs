//! # bsonkit GeoJSON - GeoJSON object model for bsonkit
//!
//! This crate adds GeoJSON positions, coordinate composites and geometry
//! objects to a bsonkit [SerializerRegistry](bsonkit::serialization::SerializerRegistry).
//!
//! ## Features
//!
//! - **Positions**: 2D, 3D and 2D geographic coordinates encoded as arrays of doubles
//! - **Composites**: line strings, linear rings, multi-points, polygons and multi-polygons
//! - **Nullable**: composite serializers map a null token to `None`
//! - **Geometry Objects**: `type`, `bbox`, `crs` and unknown members preserved across a round trip
//! - **Generic Lookup**: serializers built once per coordinate type and cached by the registry
//!
//! ## Quick Start
//!
//! ```rust
//! use bsonkit::codec_config::CodecConfig;
//! use bsonkit_geojson::{GeoJson2DGeographicCoordinates, GeoJsonModule, GeoJsonPoint};
//!
//! let config = CodecConfig::builder().load_module(GeoJsonModule).build().unwrap();
//! let registry = config.registry();
//! assert!(registry
//!     .lookup_generic::<GeoJsonPoint<GeoJson2DGeographicCoordinates>>()
//!     .is_ok());
//! assert!(registry.contains::<GeoJsonPoint<GeoJson2DGeographicCoordinates>>());
//! ```

pub mod coordinates;
pub mod error;
pub mod geojson_module;
pub mod objects;
pub mod serializers;

pub use coordinates::*;
pub use error::*;
pub use geojson_module::*;
pub use objects::*;
pub use serializers::*;
