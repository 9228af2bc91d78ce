use crate::core::{DEVELOPMENT_TOLERANCE_M, PLANT_INTERACTION_RADIUS_M, PRODUCTION_TOLERANCE_M};
use crate::sensor::WatchOptions;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const ENV_ENVIRONMENT: &str = "GEOGARDEN_ENV";
pub const ENV_API_BASE_URL: &str = "GEOGARDEN_API_BASE_URL";
pub const ENV_TOLERANCE: &str = "GEOLOCATION_INACCURACY_TOLERANCE";

pub const PRODUCTION_API_BASE_URL: &str = "https://api.moota.app/api";
pub const DEVELOPMENT_API_BASE_URL: &str = "http://localhost:8080/api";

pub const DISALLOWED_ROUTE: &str = "/geolocation-disallowed";
pub const LOW_ACCURACY_ROUTE: &str = "/low-geolocation-accuracy";

/// Build environment the client runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "development" | "dev" => Some(Environment::Development),
            _ => None,
        }
    }
}

/// Client-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub environment: Environment,
    /// Largest accuracy radius still usable for location-gated actions (meters)
    pub tolerance_m: f64,
    /// Care actions are enabled within this distance of a plant (meters)
    pub interaction_radius_m: f64,
    /// Backend base URL, including the `/api` prefix
    pub api_base_url: String,
    /// Routes that stay reachable when location permission is denied
    pub location_independent_routes: Vec<String>,
    /// Redirect target on permission denial
    pub disallowed_route: String,
    /// Redirect target for views that need an accurate fix
    pub low_accuracy_route: String,
    /// Options for the gate's continuous watch
    pub watch: WatchOptions,
    /// Options for one-shot accuracy re-checks
    pub recheck: WatchOptions,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ClientConfig {
    /// Defaults for the given environment
    pub fn for_environment(environment: Environment) -> Self {
        let (tolerance_m, api_base_url) = match environment {
            Environment::Production => (PRODUCTION_TOLERANCE_M, PRODUCTION_API_BASE_URL),
            Environment::Development => (DEVELOPMENT_TOLERANCE_M, DEVELOPMENT_API_BASE_URL),
        };

        Self {
            environment,
            tolerance_m,
            interaction_radius_m: PLANT_INTERACTION_RADIUS_M,
            api_base_url: api_base_url.to_string(),
            location_independent_routes: vec![
                "/".to_string(),
                "/settings".to_string(),
                "/plants/graveyard".to_string(),
            ],
            disallowed_route: DISALLOWED_ROUTE.to_string(),
            low_accuracy_route: LOW_ACCURACY_ROUTE.to_string(),
            watch: WatchOptions::continuous(),
            recheck: WatchOptions::recheck(),
        }
    }

    pub fn production() -> Self {
        Self::for_environment(Environment::Production)
    }

    pub fn development() -> Self {
        Self::for_environment(Environment::Development)
    }

    /// Load from the process environment, reading a `.env` file first if present
    pub fn from_env() -> ConfigResult<Self> {
        if dotenv::dotenv().is_ok() {
            debug!("loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// The tolerance override is honoured in development only; production
    /// always uses the fixed production tolerance.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup(ENV_ENVIRONMENT) {
            Some(value) => Environment::parse(&value).ok_or_else(|| ConfigError::InvalidParameter {
                parameter: ENV_ENVIRONMENT.to_string(),
                value: value.clone(),
                reason: "expected 'production' or 'development'".to_string(),
            })?,
            None => Environment::Development,
        };

        let mut config = Self::for_environment(environment);

        if let Some(url) = lookup(ENV_API_BASE_URL) {
            config.api_base_url = url;
        }

        if let Some(raw) = lookup(ENV_TOLERANCE) {
            if environment == Environment::Production {
                warn!("{} is ignored in production", ENV_TOLERANCE);
            } else {
                config.tolerance_m = raw.trim().parse().map_err(|_| ConfigError::InvalidParameter {
                    parameter: ENV_TOLERANCE.to_string(),
                    value: raw.clone(),
                    reason: "not a number".to_string(),
                })?;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })?;

        let config: ClientConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.tolerance_m.is_finite() || self.tolerance_m <= 0.0 {
            return Err(invalid("tolerance_m", self.tolerance_m, "must be a positive number of meters"));
        }

        if !self.interaction_radius_m.is_finite() || self.interaction_radius_m <= 0.0 {
            return Err(invalid(
                "interaction_radius_m",
                self.interaction_radius_m,
                "must be a positive number of meters",
            ));
        }

        if url::Url::parse(&self.api_base_url).is_err() {
            return Err(invalid("api_base_url", &self.api_base_url, "not an absolute URL"));
        }

        for (name, options) in [("watch", &self.watch), ("recheck", &self.recheck)] {
            if !options.timeout_in_range() {
                return Err(invalid(
                    &format!("{}.timeout_ms", name),
                    options.timeout_ms,
                    "must be between 1000 and 10000",
                ));
            }
        }

        for route in [&self.disallowed_route, &self.low_accuracy_route]
            .into_iter()
            .chain(self.location_independent_routes.iter())
        {
            if !route.starts_with('/') {
                return Err(invalid("route", route, "routes must start with '/'"));
            }
        }

        Ok(())
    }

    pub fn with_tolerance(mut self, tolerance_m: f64) -> Self {
        self.tolerance_m = tolerance_m;
        self
    }

    pub fn with_interaction_radius(mut self, radius_m: f64) -> Self {
        self.interaction_radius_m = radius_m;
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_location_independent_route(mut self, route: impl Into<String>) -> Self {
        self.location_independent_routes.push(route.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn invalid(parameter: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
