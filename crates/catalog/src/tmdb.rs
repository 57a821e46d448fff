//! TMDB (The Movie Database) transport.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use tracing::debug;

use crate::request::CatalogRequest;
use crate::transport::{CatalogTransport, RawResponse};
use crate::{CatalogAuth, CatalogConfig, CatalogError};

pub struct TmdbTransport {
    config: CatalogConfig,
    client: reqwest::Client,
}

impl TmdbTransport {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, request: &CatalogRequest) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            request.path()
        )
    }
}

#[async_trait::async_trait]
impl CatalogTransport for TmdbTransport {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn execute(&self, request: &CatalogRequest) -> Result<RawResponse, CatalogError> {
        let url = self.url(request);
        debug!(url = %url, params = ?request.params, "TMDB request");

        let mut query: Vec<(&str, &str)> = request
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let Some(ref language) = self.config.language {
            query.push(("language", language.as_str()));
        }

        let mut builder = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        builder = match &self.config.auth {
            CatalogAuth::ApiKey(key) => {
                query.push(("api_key", key.as_str()));
                builder
            }
            CatalogAuth::Bearer(token) => builder.bearer_auth(token),
        };

        let resp = builder
            .query(&query)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| CatalogError::Network(format!("read body: {e}")))?;

        debug!(url = %url, status, bytes = body.len(), "TMDB response");
        Ok(RawResponse::new(status, body.to_vec()))
    }
}
