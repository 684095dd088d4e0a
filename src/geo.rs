// 🌍 Geodesic Distance - haversine on a spherical Earth
// Ranking aid, not a surveying tool: no ellipsoidal correction.

use serde::Serialize;

use crate::error::RankingError;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

// ============================================================================
// COORDINATE
// ============================================================================

/// Validated latitude/longitude pair in degrees
///
/// Fields are private so every `Coordinate` in the system went through
/// `Coordinate::new` (finite, latitude in [-90, 90], longitude in [-180, 180]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range degrees
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, RankingError> {
        Coordinate::named(("lat", latitude), ("lon", longitude))
    }

    /// Like `new`, with caller-chosen field names for errors (e.g. "lat2", "lon2")
    pub fn named(latitude: (&str, f64), longitude: (&str, f64)) -> Result<Self, RankingError> {
        check_degrees(latitude.0, latitude.1, 90.0)?;
        check_degrees(longitude.0, longitude.1, 180.0)?;

        Ok(Coordinate {
            latitude: latitude.1,
            longitude: longitude.1,
        })
    }

    /// Parse a coordinate from numeric-parseable strings (query parameters, CLI args)
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, RankingError> {
        Coordinate::parse_named(("lat", latitude), ("lon", longitude))
    }

    /// Like `parse`, with caller-chosen field names for errors
    pub fn parse_named(latitude: (&str, &str), longitude: (&str, &str)) -> Result<Self, RankingError> {
        let lat = parse_degrees(latitude.0, latitude.1)?;
        let lon = parse_degrees(longitude.0, longitude.1)?;
        Coordinate::named((latitude.0, lat), (longitude.0, lon))
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another coordinate in meters
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_meters(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Parse one degree value, naming `field` in the error
pub fn parse_degrees(field: &str, raw: &str) -> Result<f64, RankingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RankingError::invalid_coordinate(field, "value is empty"));
    }

    trimmed
        .parse::<f64>()
        .map_err(|_| RankingError::invalid_coordinate(field, format!("not a number: {:?}", raw)))
}

fn check_degrees(field: &str, value: f64, limit: f64) -> Result<(), RankingError> {
    if !value.is_finite() {
        return Err(RankingError::invalid_coordinate(
            field,
            format!("{} is not a finite number", value),
        ));
    }

    if value.abs() > limit {
        return Err(RankingError::invalid_coordinate(
            field,
            format!("{} is outside [-{}, {}]", value, limit, limit),
        ));
    }

    Ok(())
}

// ============================================================================
// DISTANCE
// ============================================================================

/// Haversine distance in meters between two points given in degrees
///
/// Fails with `InvalidCoordinate` if any input is NaN, infinite or out of range.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64, RankingError> {
    let a = Coordinate::named(("lat1", lat1), ("lon1", lon1))?;
    let b = Coordinate::named(("lat2", lat2), ("lon2", lon2))?;
    Ok(a.distance_to(&b))
}

fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Round a distance to 2 decimal places for output records
pub fn round_meters(meters: f64) -> f64 {
    (meters * 100.0).round() / 100.0
}

// ============================================================================
// TESTS
// ============================================================================
