//! GeoJSON dataset loading
//!
//! Reads the processed municipal exports: one FeatureCollection per
//! collection, WGS84 coordinates, a `global_id` property per feature.

use std::fs;
use std::path::{Path, PathBuf};

use geojson::{GeoJson, Value};
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};

use super::DatasetSource;
use crate::config::DataConfig;
use crate::error::AccessError;
use crate::models::{Facility, GeoPoint, TransitStop};

/// Dataset source backed by three GeoJSON files
#[derive(Debug, Clone)]
pub struct GeoJsonFiles {
    sports_path: PathBuf,
    medical_path: PathBuf,
    stops_path: PathBuf,
}

impl GeoJsonFiles {
    pub fn new(
        sports_path: impl Into<PathBuf>,
        medical_path: impl Into<PathBuf>,
        stops_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sports_path: sports_path.into(),
            medical_path: medical_path.into(),
            stops_path: stops_path.into(),
        }
    }

    #[must_use]
    pub fn from_config(data: &DataConfig) -> Self {
        Self::new(&data.sports_path, &data.medical_path, &data.stops_path)
    }
}

impl DatasetSource for GeoJsonFiles {
    fn load_sports(&self) -> Result<Vec<Facility>, AccessError> {
        load_collection("sports", &self.sports_path, Facility::new)
    }

    fn load_medical(&self) -> Result<Vec<Facility>, AccessError> {
        load_collection("medical", &self.medical_path, Facility::new)
    }

    fn load_stops(&self) -> Result<Vec<TransitStop>, AccessError> {
        load_collection("stops", &self.stops_path, TransitStop::new)
    }
}

#[derive(Debug, Default)]
struct SkipCounts {
    missing_id: usize,
    missing_geometry: usize,
}

#[instrument(skip(path, make), fields(path = %path.display()))]
fn load_collection<T>(
    collection: &str,
    path: &Path,
    make: fn(i64, GeoPoint) -> T,
) -> Result<Vec<T>, AccessError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        AccessError::dataset(format!(
            "failed to read {collection} dataset {}: {e}",
            path.display()
        ))
    })?;
    parse_collection(collection, &contents, make)
}

/// Parse a GeoJSON document into records, skipping unusable features
pub fn parse_collection<T>(
    collection: &str,
    contents: &str,
    make: fn(i64, GeoPoint) -> T,
) -> Result<Vec<T>, AccessError> {
    let parsed: GeoJson = contents.parse().map_err(|e: geojson::Error| {
        AccessError::dataset(format!("{collection} dataset is not valid GeoJSON: {e}"))
    })?;

    let features = match parsed {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(AccessError::dataset(format!(
                "{collection} dataset must be a FeatureCollection"
            )));
        }
    };

    let mut skipped = SkipCounts::default();
    let mut items = Vec::with_capacity(features.len());

    for (position, feature) in features.iter().enumerate() {
        let Some(global_id) = feature.property("global_id").and_then(parse_global_id) else {
            debug!("Skipping {} feature #{}: no usable global_id", collection, position);
            skipped.missing_id += 1;
            continue;
        };

        let location = feature
            .geometry
            .as_ref()
            .and_then(|geometry| first_position(&geometry.value))
            .and_then(position_to_point);

        let Some(location) = location else {
            debug!(
                "Skipping {} feature {}: no usable point geometry",
                collection, global_id
            );
            skipped.missing_geometry += 1;
            continue;
        };

        items.push(make(global_id, location));
    }

    if skipped.missing_id + skipped.missing_geometry > 0 {
        warn!(
            "Skipped {} {} features ({} without id, {} without geometry)",
            skipped.missing_id + skipped.missing_geometry,
            collection,
            skipped.missing_id,
            skipped.missing_geometry
        );
    }

    info!("Loaded {} {} records", items.len(), collection);
    Ok(items)
}

/// Integer ids arrive as integers, integral floats or numeric strings
fn parse_global_id(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(number) => number.as_i64().or_else(|| number.as_f64().and_then(integral)),
        JsonValue::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(value: f64) -> Option<i64> {
    // 2^63 as f64; values at or above it do not fit
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.is_finite() && value.fract() == 0.0 && value >= -LIMIT && value < LIMIT {
        Some(value as i64)
    } else {
        None
    }
}

/// A point geometry's position, or the first vertex of any other geometry
fn first_position(value: &Value) -> Option<&[f64]> {
    match value {
        Value::Point(position) => Some(position.as_slice()),
        Value::MultiPoint(positions) | Value::LineString(positions) => {
            positions.first().map(Vec::as_slice)
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.first()?.first().map(Vec::as_slice)
        }
        Value::MultiPolygon(polygons) => polygons.first()?.first()?.first().map(Vec::as_slice),
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .find_map(|geometry| first_position(&geometry.value)),
    }
}

fn position_to_point(position: &[f64]) -> Option<GeoPoint> {
    match position {
        [lon, lat, ..] => GeoPoint::new(*lon, *lat).ok(),
        _ => None,
    }
}
