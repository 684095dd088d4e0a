// ☕ Venue Model - records from the places provider + ranked output
//
// The provider's schema is not fully trusted:
// - Missing name/types → kept here, dropped later by the filter
// - Missing/malformed location → `location: None`, never ranked
// - Missing place_id → dropped at decode time (cannot dedup or link it)

use serde::Serialize;
use serde_json::Value;

use crate::geo::{round_meters, Coordinate};

/// Placeholder used when the provider sends no address
pub const ADDRESS_PLACEHOLDER: &str = "Address unavailable";

/// Map link template, parameterized by the venue identity
pub const MAPS_LINK_PREFIX: &str = "https://www.google.com/maps/place/?q=place_id:";

// ============================================================================
// VENUE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    /// Provider-assigned identity, unique per physical place
    pub identity: String,

    pub display_name: Option<String>,

    /// Provider-defined tags (e.g. "cafe", "restaurant")
    pub categories: Option<Vec<String>>,

    pub address: Option<String>,

    /// None when the provider omitted it or sent garbage
    pub location: Option<Coordinate>,

    /// Untouched provider record
    pub raw: Value,
}

impl Venue {
    /// Build a venue by hand (tests, fixtures)
    pub fn new(
        identity: &str,
        display_name: &str,
        categories: &[&str],
        location: Option<Coordinate>,
    ) -> Self {
        Venue {
            identity: identity.to_string(),
            display_name: Some(display_name.to_string()),
            categories: Some(categories.iter().map(|c| c.to_string()).collect()),
            address: None,
            location,
            raw: Value::Null,
        }
    }

    /// Decode one nearby-search record
    ///
    /// Returns None only when `place_id` is missing or not a string.
    pub fn from_provider(record: &Value) -> Option<Venue> {
        let identity = record.get("place_id")?.as_str()?.to_string();

        let display_name = record
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);

        let categories = record.get("types").and_then(Value::as_array).map(|types| {
            types
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        });

        let address = record
            .get("vicinity")
            .and_then(Value::as_str)
            .map(str::to_string);

        let location = record
            .get("geometry")
            .and_then(|g| g.get("location"))
            .and_then(decode_location);

        Some(Venue {
            identity,
            display_name,
            categories,
            address,
            location,
            raw: record.clone(),
        })
    }

    /// Link to this venue on Google Maps
    pub fn maps_link(&self) -> String {
        maps_link(&self.identity)
    }
}

fn decode_location(location: &Value) -> Option<Coordinate> {
    let lat = location.get("lat")?.as_f64()?;
    let lng = location.get("lng")?.as_f64()?;
    Coordinate::new(lat, lng).ok()
}

/// Build the map link for a venue identity
pub fn maps_link(identity: &str) -> String {
    format!("{}{}", MAPS_LINK_PREFIX, urlencoding::encode(identity))
}

/// Decode every usable record from a provider payload
///
/// Accepts either a full nearby-search response (`{"results": [...]}`) or a bare array.
/// Records without an identity are skipped, order is preserved.
pub fn venues_from_payload(payload: &Value) -> Vec<Venue> {
    let records = match payload {
        Value::Array(items) => items.as_slice(),
        other => match other.get("results").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => &[],
        },
    };

    let venues: Vec<Venue> = records.iter().filter_map(Venue::from_provider).collect();

    if venues.len() < records.len() {
        tracing::debug!(
            skipped = records.len() - venues.len(),
            "Skipped provider records without place_id"
        );
    }

    venues
}

// ============================================================================
// RANKED VENUE
// ============================================================================

/// A venue with its distance from the ranking origin
///
/// Lives only for the duration of one ranking call.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedVenue {
    pub venue: Venue,
    pub distance_meters: f64,
    pub is_priority: bool,
}

impl RankedVenue {
    pub fn identity(&self) -> &str {
        &self.venue.identity
    }

    /// Output record; `with_priority` controls whether the flag is emitted
    pub fn summary(&self, with_priority: bool) -> VenueSummary {
        VenueSummary {
            name: self.venue.display_name.clone().unwrap_or_default(),
            address: self
                .venue
                .address
                .clone()
                .unwrap_or_else(|| ADDRESS_PLACEHOLDER.to_string()),
            distance_meters: round_meters(self.distance_meters),
            google_maps_link: self.venue.maps_link(),
            priority: with_priority.then_some(self.is_priority),
        }
    }
}

/// Record returned to callers (HTTP JSON, CLI CSV)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueSummary {
    pub name: String,
    pub address: String,
    pub distance_meters: f64,
    pub google_maps_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<bool>,
}

// ============================================================================
// TESTS
// ============================================================================
