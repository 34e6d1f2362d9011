//! HTTP query surface
//!
//! Handlers resolve everything against the snapshot current at the start of
//! the request and never mutate it; `/admin/reload` swaps in a new one.

pub mod dto;
pub mod error;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    classifier::{AccessibilityClassifier, DiagnosticsMode},
    dataset::{DataSnapshot, DatasetSource, SnapshotHandle},
    error::AccessError,
    geometry::IndexStrategy,
    models::GeoPoint,
};

pub use dto::{ApiFacility, HealthResponse, NearestFacilityResponse, PredictResponse};

type ApiResult<T> = Result<Json<T>, AccessError>;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotHandle,
    pub classifier: AccessibilityClassifier,
    pub source: Arc<dyn DatasetSource>,
    pub index: IndexStrategy,
}

impl AppState {
    pub fn new(
        snapshots: SnapshotHandle,
        classifier: AccessibilityClassifier,
        source: Arc<dyn DatasetSource>,
        index: IndexStrategy,
    ) -> Self {
        Self {
            snapshots,
            classifier,
            source,
            index,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    pub sport_id: Option<String>,
    pub diagnostics: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NearestParams {
    pub lon: Option<String>,
    pub lat: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", get(predict))
        .route("/facilities", get(list_facilities))
        .route("/facilities/nearest", get(nearest_facility))
        .route("/health", get(health))
        .route("/admin/reload", post(reload))
        .with_state(state)
}

async fn predict(
    State(state): State<AppState>,
    params: Result<Query<PredictParams>, QueryRejection>,
) -> ApiResult<PredictResponse> {
    let params = query_params(params)?;
    let sport_id = parse_sport_id(params.sport_id.as_deref())?;
    let mode = match params.diagnostics.as_deref() {
        Some(value) => value.parse::<DiagnosticsMode>()?,
        None => state.classifier.diagnostics(),
    };

    let snapshot = state.snapshots.current();
    let result = snapshot.classify(&state.classifier, sport_id, mode)?;
    let response = PredictResponse::try_from(&result)?;

    info!(sport_id, status = result.status().as_str(), "Classified sports facility");
    Ok(Json(response))
}

async fn list_facilities(State(state): State<AppState>) -> ApiResult<Vec<ApiFacility>> {
    let snapshot = state.snapshots.current();
    let facilities = snapshot.sports().into_iter().map(ApiFacility::from).collect();
    Ok(Json(facilities))
}

async fn nearest_facility(
    State(state): State<AppState>,
    params: Result<Query<NearestParams>, QueryRejection>,
) -> ApiResult<NearestFacilityResponse> {
    let params = query_params(params)?;
    let lon = parse_coordinate("lon", params.lon.as_deref())?;
    let lat = parse_coordinate("lat", params.lat.as_deref())?;
    let point = GeoPoint::new(lon, lat)?;

    let nearest = state.snapshots.current().nearest_sport(&point)?;
    debug!(
        "Nearest sports facility to {} is {}",
        point.format_coordinates(),
        nearest.global_id
    );
    Ok(Json(NearestFacilityResponse::from(&nearest)))
}

async fn health(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    Ok(Json(HealthResponse::from_snapshot(&state.snapshots.current())))
}

async fn reload(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    let source = Arc::clone(&state.source);
    let index = state.index;

    let loaded = tokio::task::spawn_blocking(move || DataSnapshot::load(source.as_ref(), index))
        .await
        .map_err(|e| AccessError::dataset(format!("reload task failed: {e}")))?;

    let snapshot = match loaded {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("Reload failed, keeping current snapshot: {}", err);
            return Err(err);
        }
    };

    let response = HealthResponse::from_snapshot(&snapshot);
    state.snapshots.replace(snapshot);
    info!("Datasets reloaded");
    Ok(Json(response))
}

/// Query strings axum cannot deserialize still get the JSON error body
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AccessError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AccessError::invalid_request(rejection.body_text()))
}

fn parse_sport_id(raw: Option<&str>) -> Result<i64, AccessError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AccessError::invalid_request("missing required query parameter 'sport_id'"))?;

    raw.parse::<i64>().map_err(|_| {
        AccessError::invalid_request(format!("sport_id must be an integer, got '{raw}'"))
    })
}

fn parse_coordinate(name: &str, raw: Option<&str>) -> Result<f64, AccessError> {
    let raw = raw
        .map(str::trim)
        .ok_or_else(|| AccessError::invalid_request(format!("missing required query parameter '{name}'")))?;

    raw.parse::<f64>()
        .map_err(|_| AccessError::invalid_request(format!("{name} must be a number, got '{raw}'")))
}
