//! Places Provider
//!
//! Fetches raw venue records around a coordinate. The ranking core never calls
//! this itself: the HTTP layer fetches, then hands the venues to the engine.
//!
//! Outcomes are kept apart on purpose:
//! - `Ok(vec![])` → the provider answered, nothing is nearby (`ZERO_RESULTS`)
//! - `Err(PlacesError)` → the provider is unavailable or rejected the request

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::geo::Coordinate;
use crate::venue::{venues_from_payload, Venue};

/// Provider category the nearby search is restricted to
pub const PLACE_TYPE: &str = "cafe";

/// Fixed search radius around the caller
pub const SEARCH_RADIUS_METERS: u32 = 2000;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Places provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Places provider returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Places provider rejected the request ({status}): {message}")]
    Rejected { status: String, message: String },
}

/// Source of nearby venues (Google Places in production, stubs in tests)
pub trait PlacesProvider: Send + Sync {
    fn nearby_cafes(&self, origin: Coordinate) -> impl Future<Output = Result<Vec<Venue>, PlacesError>> + Send;
}

/// Status reported when the response envelope itself cannot be decoded
pub const MALFORMED_STATUS: &str = "MALFORMED_RESPONSE";

/// Nearby-search response envelope
#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,

    #[serde(default)]
    error_message: Option<String>,
}

/// Interpret a nearby-search JSON body
pub fn parse_nearby_search(body: &Value) -> Result<Vec<Venue>, PlacesError> {
    let envelope = NearbySearchResponse::deserialize(body).map_err(|e| PlacesError::Rejected {
        status: MALFORMED_STATUS.to_string(),
        message: e.to_string(),
    })?;

    match envelope.status.as_str() {
        "OK" | "ZERO_RESULTS" => Ok(venues_from_payload(body)),
        other => Err(PlacesError::Rejected {
            status: other.to_string(),
            message: envelope
                .error_message
                .unwrap_or_else(|| "no error message".to_string()),
        }),
    }
}

// ============================================================================
// GOOGLE PLACES CLIENT
// ============================================================================

pub struct GooglePlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    radius_meters: u32,
}

impl GooglePlacesClient {
    pub fn new(base_url: &str, api_key: &str, radius_meters: u32, timeout: Duration) -> Result<Self, PlacesError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            radius_meters,
        })
    }

    /// Client built from the loaded configuration; the API key is mandatory here
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config
            .google_maps_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("GOOGLE_MAPS_API_KEY is not set"))?;

        Ok(Self::new(
            &config.places_base_url,
            api_key,
            SEARCH_RADIUS_METERS,
            Duration::from_secs(config.provider_timeout_secs),
        )?)
    }
}

impl PlacesProvider for GooglePlacesClient {
    async fn nearby_cafes(&self, origin: Coordinate) -> Result<Vec<Venue>, PlacesError> {
        let location = format!("{},{}", origin.latitude(), origin.longitude());
        let radius = self.radius_meters.to_string();

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", PLACE_TYPE),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Nearby search failed");
            return Err(PlacesError::HttpStatus(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let venues = parse_nearby_search(&body)?;

        debug!(count = venues.len(), %location, radius = self.radius_meters, "Fetched nearby venues");

        Ok(venues)
    }
}

// ============================================================================
// TESTS
// ============================================================================
