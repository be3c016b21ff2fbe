pub mod geojson;

pub use geojson::{CollectionWriter, GeoJsonSink};

use geo::{Coord, Point};
use thiserror::Error;

/// Geometry type of an output collection. Every collection holds exactly one
/// kind; mixing kinds is a sink error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Polygon,
}

/// Failures reported by the geometry store.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("unsupported spatial reference {0:?} (output is always WGS 84)")]
    UnsupportedSpatialReference(String),

    #[error("collection {name:?} holds {expected:?} geometry, tried to insert {got:?}")]
    GeometryMismatch {
        name: String,
        expected: GeometryKind,
        got: GeometryKind,
    },

    #[error("I/O failure on collection {name:?}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode collection {name:?}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The minimal write interface the extractors depend on. One record per call;
/// records land in the collection in insertion order. Every record carries a
/// single `LocName` text attribute.
pub trait FeatureWriter {
    fn insert_point(&mut self, position: Point<f64>, loc_name: &str) -> Result<(), SinkError>;

    /// Insert a polygon from an open ring of corners. The implementation is
    /// expected to close the ring back to the first vertex.
    fn insert_polygon(&mut self, ring: &[Coord<f64>], loc_name: &str) -> Result<(), SinkError>;
}
