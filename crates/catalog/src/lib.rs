#![allow(clippy::should_implement_trait)]
pub mod details;
pub mod fetcher;
pub mod normalize;
pub mod request;
pub mod tmdb;
pub mod transport;

use thiserror::Error;

pub use details::{DetailStrategy, DetailsLookup};
pub use fetcher::CatalogFetcher;
pub use request::{BrowseSource, CatalogRequest, Endpoint, SearchScope, TrendingScope, build_request};
pub use transport::{CatalogTransport, RawResponse};

/// Default upstream base, TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Upstream answered with a non-success status (or a `success: false` envelope).
    #[error("upstream returned {status}: {message}")]
    Fetch { status: u16, message: String },
    #[error("malformed response: {0}")]
    Parse(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Fetch { status: 404, .. })
    }
}

/// How requests authenticate against the upstream catalog.
#[derive(Clone, PartialEq, Eq)]
pub enum CatalogAuth {
    /// v3 key sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token sent as `Authorization: Bearer …`.
    Bearer(String),
}

impl std::fmt::Debug for CatalogAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Connection settings for the upstream catalog. Built by the caller and
/// handed to the transport; nothing in this crate reads the environment.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub auth: CatalogAuth,
    pub language: Option<String>,
}

impl CatalogConfig {
    pub fn new(auth: CatalogAuth) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth,
            language: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
