// ⚙️ Configuration - environment variables with logged defaults

use anyhow::{Context, Result};
use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::priority::PriorityRegistry;

/// Google Places nearby-search endpoint
pub const DEFAULT_PLACES_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub google_maps_api_key: Option<String>,
    pub places_base_url: String,
    pub top_n: usize,
    pub priority_file: Option<PathBuf>,
    pub provider_timeout_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = Self {
            port: try_load("PORT", "8080")?,
            google_maps_api_key: var("GOOGLE_MAPS_API_KEY"),
            places_base_url: try_load("PLACES_BASE_URL", DEFAULT_PLACES_URL)?,
            top_n: try_load("TOP_N", "5")?,
            priority_file: var("PRIORITY_CAFES_FILE").map(PathBuf::from),
            provider_timeout_secs: try_load("PROVIDER_TIMEOUT_SECS", "10")?,
        };

        if config.top_n == 0 {
            anyhow::bail!("TOP_N must be at least 1");
        }

        Ok(config)
    }

    /// Registry from `PRIORITY_CAFES_FILE`, or the built-in defaults
    pub fn priority_registry(&self) -> Result<PriorityRegistry> {
        match &self.priority_file {
            Some(path) => PriorityRegistry::from_file(path),
            None => {
                info!("PRIORITY_CAFES_FILE not set, using built-in priority venues");
                Ok(PriorityRegistry::with_defaults())
            }
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            anyhow::anyhow!("{e}")
        })
        .with_context(|| format!("Environment misconfigured: {key}={raw}"))
}
