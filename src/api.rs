// 🌐 HTTP API - validation, provider fetch, ranking, JSON envelope
//
// GET /health
// GET /cafes/distance?lat1&lon1&lat2&lon2
// GET /cafes/nearest?lat&lon
// GET /cafes/top?lat&lon[&limit]   (alias: /cafes/top5)

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::error::RankingError;
use crate::filter::CafeFilter;
use crate::geo::{round_meters, Coordinate};
use crate::places::{PlacesError, PlacesProvider};
use crate::ranking::RankingEngine;
use crate::venue::VenueSummary;

/// Message attached to an empty (but successful) ranking
pub const NO_CAFES_MESSAGE: &str = "no cafes found nearby";

// ============================================================================
// STATE
// ============================================================================

/// Shared application state
pub struct AppState<P> {
    pub engine: Arc<RankingEngine>,
    pub places: Arc<P>,
    pub filter: Arc<CafeFilter>,
    /// Default limit for /cafes/top
    pub top_n: usize,
}

impl<P> AppState<P> {
    pub fn new(engine: RankingEngine, places: P, top_n: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            places: Arc::new(places),
            filter: Arc::new(CafeFilter::default()),
            top_n,
        }
    }
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            places: Arc::clone(&self.places),
            filter: Arc::clone(&self.filter),
            top_n: self.top_n,
        }
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }
}

impl ApiResponse<Vec<VenueSummary>> {
    /// Ranked list; an empty list carries an explanatory message
    fn ranked(venues: Vec<VenueSummary>) -> Self {
        let message = venues.is_empty().then(|| NO_CAFES_MESSAGE.to_string());
        Self {
            message,
            ..Self::ok(venues)
        }
    }
}

impl ApiResponse<()> {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DistanceResponse {
    pub distance_meters: f64,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing required parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error(transparent)]
    InvalidInput(#[from] RankingError),

    #[error(transparent)]
    ProviderUnavailable(#[from] PlacesError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingParameter(_)
            | ApiError::InvalidParameter { .. }
            | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        (status, Json(ApiResponse::<()>::failure(self.to_string()))).into_response()
    }
}

// ============================================================================
// QUERIES
// ============================================================================

/// Raw strings so non-numeric input is reported by name, not by axum's rejection
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    lat: Option<String>,
    lon: Option<String>,
    limit: Option<String>,
}

impl LocationQuery {
    fn origin(&self) -> Result<Coordinate, ApiError> {
        let lat = required("lat", &self.lat)?;
        let lon = required("lon", &self.lon)?;
        Ok(Coordinate::parse(lat, lon)?)
    }

    fn limit(&self, default: usize) -> Result<usize, ApiError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => raw.parse().map_err(|_| ApiError::InvalidParameter {
                field: "limit",
                reason: format!("not a positive integer: {:?}", raw),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DistanceQuery {
    lat1: Option<String>,
    lon1: Option<String>,
    lat2: Option<String>,
    lon2: Option<String>,
}

fn required<'a>(name: &'static str, value: &'a Option<String>) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::MissingParameter(name)),
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /cafes/distance - Great-circle distance between two points
async fn distance_between(Query(query): Query<DistanceQuery>) -> Result<Json<ApiResponse<DistanceResponse>>, ApiError> {
    let from = Coordinate::parse_named(
        ("lat1", required("lat1", &query.lat1)?),
        ("lon1", required("lon1", &query.lon1)?),
    )?;
    let to = Coordinate::parse_named(
        ("lat2", required("lat2", &query.lat2)?),
        ("lon2", required("lon2", &query.lon2)?),
    )?;

    let meters = from.distance_to(&to);

    Ok(Json(ApiResponse::ok(DistanceResponse {
        distance_meters: round_meters(meters),
    })))
}

/// GET /cafes/nearest - The two closest unique cafes
async fn nearest_cafes<P: PlacesProvider + 'static>(
    State(state): State<AppState<P>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ApiResponse<Vec<VenueSummary>>>, ApiError> {
    let origin = query.origin()?;

    let venues = state.places.nearby_cafes(origin).await?;
    let candidates = state.filter.apply(&venues);
    let nearest = state.engine.select_nearest_two_unique(origin, &candidates);

    info!(fetched = venues.len(), returned = nearest.len(), "Served nearest cafes");

    let summaries: Vec<VenueSummary> = nearest.iter().map(|r| r.summary(false)).collect();
    Ok(Json(ApiResponse::ranked(summaries)))
}

/// GET /cafes/top - Priority-first top-N cafes
async fn top_cafes<P: PlacesProvider + 'static>(
    State(state): State<AppState<P>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ApiResponse<Vec<VenueSummary>>>, ApiError> {
    let origin = query.origin()?;
    let limit = query.limit(state.top_n)?;

    let venues = state.places.nearby_cafes(origin).await?;
    let candidates = state.filter.apply(&venues);
    let ranked = state.engine.rank_top_n(origin, &candidates, limit)?;

    info!(fetched = venues.len(), returned = ranked.len(), limit, "Served top cafes");

    let summaries: Vec<VenueSummary> = ranked.iter().map(|r| r.summary(true)).collect();
    Ok(Json(ApiResponse::ranked(summaries)))
}

/// Build the API router
pub fn router<P: PlacesProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/cafes/distance", get(distance_between))
        .route("/cafes/nearest", get(nearest_cafes::<P>))
        .route("/cafes/top", get(top_cafes::<P>))
        .route("/cafes/top5", get(top_cafes::<P>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================
