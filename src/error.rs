// ⚠️ Ranking Errors - typed failures raised before any computation runs
// Malformed venue records are NOT errors: they are skipped by the filter/ranker.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    /// Latitude/longitude that is non-numeric, non-finite or out of range
    #[error("Invalid coordinate `{field}`: {reason}")]
    InvalidCoordinate { field: String, reason: String },

    /// Top-N ranking needs at least one slot
    #[error("Invalid result limit {0}: must be at least 1")]
    InvalidLimit(usize),
}

impl RankingError {
    pub fn invalid_coordinate(field: &str, reason: impl Into<String>) -> Self {
        RankingError::InvalidCoordinate {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
