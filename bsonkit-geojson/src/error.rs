use bsonkit::errors::{BsonError, ErrorKind};
use thiserror::Error;

/// Errors raised while building or decoding GeoJSON values.
#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid GeoJSON type {actual}, expected {expected}")]
    UnexpectedType { expected: String, actual: String },

    #[error("Missing GeoJSON member {0}")]
    MissingMember(String),

    #[error(transparent)]
    Bson(#[from] BsonError),
}

pub type GeoJsonResult<T> = Result<T, GeoJsonError>;

impl From<GeoJsonError> for BsonError {
    fn from(err: GeoJsonError) -> Self {
        match err {
            GeoJsonError::Bson(bson_err) => bson_err,
            GeoJsonError::InvalidGeometry(msg) => {
                BsonError::new(&msg, ErrorKind::Extension("geojson".to_string()))
            }
            other @ (GeoJsonError::InvalidCoordinates(_)
            | GeoJsonError::UnexpectedType { .. }
            | GeoJsonError::MissingMember(_)) => {
                BsonError::new(&other.to_string(), ErrorKind::Format)
            }
        }
    }
}
