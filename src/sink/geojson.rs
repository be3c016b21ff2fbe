use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use geo::{Coord, LineString, Point, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, Value};

use super::{FeatureWriter, GeometryKind, SinkError};

/// Spatial reference names accepted as WGS 84. GeoJSON cannot represent any
/// other reference system, so everything else is rejected up front.
const WGS84_ALIASES: &[&str] = &[
    "wgs84",
    "wgs 84",
    "epsg:4326",
    "gcs_wgs_1984",
    "crs84",
    "urn:ogc:def:crs:ogc:1.3:crs84",
];

/// Geometry store backed by one GeoJSON FeatureCollection file per collection,
/// all inside a single workspace directory.
#[derive(Debug)]
pub struct GeoJsonSink {
    workspace: PathBuf,
}

impl GeoJsonSink {
    /// Open a sink rooted at `workspace`, creating the directory if needed.
    pub fn new(workspace: &Path, spatial_reference: &str) -> Result<Self, SinkError> {
        if !WGS84_ALIASES.contains(&spatial_reference.to_ascii_lowercase().as_str()) {
            return Err(SinkError::UnsupportedSpatialReference(
                spatial_reference.to_string(),
            ));
        }
        fs::create_dir_all(workspace).map_err(|e| SinkError::Io {
            name: workspace.display().to_string(),
            source: e,
        })?;
        Ok(Self {
            workspace: workspace.to_path_buf(),
        })
    }

    /// Delete any previous collection with this name and open a fresh writer
    /// for it. The collection file only appears on `finish`.
    pub fn create_collection(
        &self,
        name: &str,
        kind: GeometryKind,
    ) -> Result<CollectionWriter, SinkError> {
        let path = self.workspace.join(format!("{}.geojson", name));
        if path.exists() {
            fs::remove_file(&path).map_err(|e| SinkError::Io {
                name: name.to_string(),
                source: e,
            })?;
        }
        Ok(CollectionWriter {
            name: name.to_string(),
            path,
            kind,
            features: Vec::new(),
        })
    }
}

/// A scoped write session for one collection. Records accumulate in memory and
/// are written out by `finish`, which must run even after a failed pass so that
/// records inserted before the failure are persisted.
#[derive(Debug)]
pub struct CollectionWriter {
    name: String,
    path: PathBuf,
    kind: GeometryKind,
    features: Vec<Feature>,
}

impl CollectionWriter {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn check_kind(&self, got: GeometryKind) -> Result<(), SinkError> {
        if self.kind != got {
            return Err(SinkError::GeometryMismatch {
                name: self.name.clone(),
                expected: self.kind,
                got,
            });
        }
        Ok(())
    }

    fn push(&mut self, geometry: Geometry, loc_name: &str) {
        let mut feature = Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("LocName", loc_name);
        self.features.push(feature);
    }

    /// Encode everything inserted so far and write the collection file.
    pub fn finish(self) -> Result<PathBuf, SinkError> {
        let collection = FeatureCollection {
            bbox: None,
            features: self.features,
            foreign_members: None,
        };

        let file = File::create(&self.path).map_err(|e| SinkError::Io {
            name: self.name.clone(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &collection).map_err(|e| SinkError::Encode {
            name: self.name.clone(),
            source: e,
        })?;
        writer.flush().map_err(|e| SinkError::Io {
            name: self.name.clone(),
            source: e,
        })?;

        Ok(self.path)
    }
}

impl FeatureWriter for CollectionWriter {
    fn insert_point(&mut self, position: Point<f64>, loc_name: &str) -> Result<(), SinkError> {
        self.check_kind(GeometryKind::Point)?;
        self.push(Geometry::new(Value::from(&position)), loc_name);
        Ok(())
    }

    fn insert_polygon(&mut self, ring: &[Coord<f64>], loc_name: &str) -> Result<(), SinkError> {
        self.check_kind(GeometryKind::Polygon)?;
        // Polygon::new closes an open ring back to its first vertex.
        let polygon = Polygon::new(LineString::from(ring.to_vec()), Vec::new());
        self.push(Geometry::new(Value::from(&polygon)), loc_name);
        Ok(())
    }
}
