//! Process configuration, read once from the environment at startup.

use cinescope_catalog::{CatalogAuth, CatalogConfig, DEFAULT_BASE_URL, DetailStrategy};
use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:8097";
pub const DEFAULT_CAST_LIMIT: usize = cinescope_catalog::details::DEFAULT_CAST_LIMIT;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("set TMDB_READ_TOKEN or TMDB_API_KEY")]
    MissingCredentials,
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub catalog: CatalogConfig,
    pub embed_base: Option<String>,
    pub cast_limit: usize,
    pub details_mode: DetailStrategy,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. A bearer token wins over an API key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let auth = match (get("TMDB_READ_TOKEN"), get("TMDB_API_KEY")) {
            (Some(token), _) => CatalogAuth::Bearer(token),
            (None, Some(key)) => CatalogAuth::ApiKey(key),
            (None, None) => return Err(ConfigError::MissingCredentials),
        };

        let catalog = CatalogConfig {
            base_url: get("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            auth,
            language: get("TMDB_LANGUAGE"),
        };

        let cast_limit = match get("CINESCOPE_CAST_LIMIT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                name: "CINESCOPE_CAST_LIMIT",
                value: v,
            })?,
            None => DEFAULT_CAST_LIMIT,
        };

        let details_mode = match get("CINESCOPE_DETAILS_MODE") {
            Some(v) => DetailStrategy::from_str(&v).ok_or(ConfigError::Invalid {
                name: "CINESCOPE_DETAILS_MODE",
                value: v,
            })?,
            None => DetailStrategy::default(),
        };

        Ok(Self {
            bind: get("CINESCOPE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            catalog,
            embed_base: get("CINESCOPE_EMBED_BASE"),
            cast_limit,
            details_mode,
        })
    }
}
