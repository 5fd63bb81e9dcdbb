//! Startup configuration read from the environment and an optional `.env` file.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

pub const SERVICE_URL_KEY: &str = "NAVIQORE_SERVICE_URL";
/// Accepted when [`SERVICE_URL_KEY`] is not set
pub const LEGACY_SERVICE_URL_KEY: &str = "NAVIQORE_HOST_URL";
pub const WALKING_SPEED_KEY: &str = "WALKING_SPEED";

/// km/h
pub const DEFAULT_WALKING_SPEED: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(
        "no service url: set NAVIQORE_SERVICE_URL in the environment or .env, or pass --service-url"
    )]
    MissingServiceUrl,
    #[error("WALKING_SPEED must be a positive number of km/h, got {0:?}")]
    InvalidWalkingSpeed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub service_url: String,
    /// km/h
    pub walking_speed: f64,
}

/// Variables from `.env` in the working directory, empty when there is none
fn read_env_file() -> HashMap<String, String> {
    let pairs = match dotenv::dotenv_iter() {
        Ok(pairs) => pairs,
        Err(err) => {
            debug!(%err, "no environment file loaded");
            return HashMap::new();
        }
    };

    let vars: HashMap<String, String> = pairs
        .filter_map(|pair| match pair {
            Ok(pair) => Some(pair),
            Err(err) => {
                warn!(%err, "skipping unreadable line in environment file");
                None
            }
        })
        .collect();
    debug!(count = vars.len(), "loaded environment file");
    vars
}

/// Lookup that answers from `file` first and falls back to `fallback`
fn env_file_first(
    file: HashMap<String, String>,
    fallback: impl Fn(&str) -> Option<String>,
) -> impl Fn(&str) -> Option<String> {
    move |key| file.get(key).cloned().or_else(|| fallback(key))
}

impl Config {
    /// Resolves the configuration from `.env` and the process environment,
    /// `.env` winning when both set a key. `service_url` takes precedence
    /// over both.
    pub fn load(service_url: Option<String>) -> Result<Self, ConfigError> {
        let lookup = env_file_first(read_env_file(), |key| std::env::var(key).ok());
        Self::from_lookup(service_url, lookup)
    }

    pub fn from_lookup(
        service_url: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let service_url = service_url
            .or_else(|| lookup(SERVICE_URL_KEY))
            .or_else(|| lookup(LEGACY_SERVICE_URL_KEY))
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingServiceUrl)?;

        let walking_speed = match lookup(WALKING_SPEED_KEY) {
            None => DEFAULT_WALKING_SPEED,
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|speed| speed.is_finite() && *speed > 0.0)
                .ok_or(ConfigError::InvalidWalkingSpeed(raw))?,
        };

        Ok(Self {
            service_url,
            walking_speed,
        })
    }

    /// Walking speed in metres per minute
    pub fn walking_speed_m_per_min(&self) -> f64 {
        self.walking_speed * 1000.0 / 60.0
    }
}
