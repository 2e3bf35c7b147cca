use std::env;
use std::path::PathBuf;

use travel_tools_forecast::{ForecastConfig, ForecastConfigBuilder};

/// Database file used when `TRAVEL_TOOLS_DB` is not set.
pub const DEFAULT_DB_PATH: &str = "trips_database.db";

/// Runtime configuration of the toolset, read from the environment.
///
/// | Variable | Meaning |
/// |---|---|
/// | `TRAVEL_TOOLS_DB` | trip database file, default [`DEFAULT_DB_PATH`] |
/// | `TRAVEL_TOOLS_FORECAST_URL` | forecast endpoint override |
/// | `TRAVEL_TOOLS_USER_AGENT` | `User-Agent` sent to the forecast provider |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Path of the trip database file.
    pub db_path: PathBuf,
    /// Forecast endpoint, or `None` for the default one.
    pub forecast_endpoint: Option<String>,
    /// Forecast `User-Agent`, or `None` for the default one.
    pub user_agent: Option<String>,
}

impl Config {
    /// Reads the configuration from the process environment.
    #[inline]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            db_path: var("TRAVEL_TOOLS_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            forecast_endpoint: var("TRAVEL_TOOLS_FORECAST_URL"),
            user_agent: var("TRAVEL_TOOLS_USER_AGENT"),
        }
    }

    /// Builds the forecast client configuration.
    pub fn forecast_config(&self) -> ForecastConfig {
        let mut builder = ForecastConfigBuilder::new();
        if let Some(endpoint) = &self.forecast_endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.with_user_agent(user_agent);
        }
        builder.build()
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
