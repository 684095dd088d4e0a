// Cafe Ranker - Core Library
// Nearby cafe recommendation: filter → distance → priority-aware ranking.
// Exposes the ranking core for the CLI, the API server and tests.

pub mod error;
pub mod geo;
pub mod venue;
pub mod filter;
pub mod priority;
pub mod ranking;
pub mod config;

#[cfg(feature = "server")]
pub mod places;
#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use error::RankingError;
pub use geo::{distance, round_meters, Coordinate, EARTH_RADIUS_METERS};
pub use venue::{
    maps_link, venues_from_payload,
    Venue, RankedVenue, VenueSummary, ADDRESS_PLACEHOLDER,
};
pub use filter::{filter_cafe_like, CafeFilter, CAFE_CATEGORY, CAFE_KEYWORDS};
pub use priority::{PriorityRegistry, DEFAULT_PRIORITY_IDS};
pub use ranking::{RankingEngine, NEAREST_PAIR};
pub use config::Config;

#[cfg(feature = "server")]
pub use places::{GooglePlacesClient, PlacesError, PlacesProvider};
#[cfg(feature = "server")]
pub use api::{router, ApiError, ApiResponse, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
