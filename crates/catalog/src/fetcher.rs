use std::sync::Arc;

use cinescope_core::types::{CastMember, DetailInfo, Genre, MediaKind, ResultPage};
use tracing::debug;

use crate::CatalogError;
use crate::normalize;
use crate::request::CatalogRequest;
use crate::transport::CatalogTransport;

/// Stateless fetcher: a request goes out, a validated value comes back.
/// Every call is a fresh round-trip.
#[derive(Clone)]
pub struct CatalogFetcher {
    transport: Arc<dyn CatalogTransport>,
}

impl CatalogFetcher {
    pub fn new(transport: Arc<dyn CatalogTransport>) -> Self {
        Self { transport }
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Fetch one page of a search, discover or trending listing.
    pub async fn fetch_page(&self, request: &CatalogRequest) -> Result<ResultPage, CatalogError> {
        if !request.endpoint.is_listing() {
            return Err(CatalogError::InvalidRequest(format!(
                "{} is not a listing endpoint",
                request.path()
            )));
        }

        let raw = self.transport.execute(request).await?;
        let page = normalize::normalize(&raw, request.endpoint.implied_kind())?;
        debug!(
            path = %request.path(),
            page = page.page,
            total_pages = page.total_pages,
            results = page.results.len(),
            "listing page fetched"
        );
        Ok(page)
    }

    pub async fn fetch_detail(
        &self,
        kind: MediaKind,
        id: u64,
        cast_limit: usize,
    ) -> Result<DetailInfo, CatalogError> {
        let raw = self
            .transport
            .execute(&CatalogRequest::detail_with_credits(kind, id))
            .await?;
        normalize::normalize_detail(&raw, cast_limit)
    }

    pub async fn fetch_credits(
        &self,
        kind: MediaKind,
        id: u64,
        cast_limit: usize,
    ) -> Result<Vec<CastMember>, CatalogError> {
        let raw = self
            .transport
            .execute(&CatalogRequest::credits(kind, id))
            .await?;
        normalize::normalize_credits(&raw, cast_limit)
    }

    pub async fn fetch_genres(&self, kind: MediaKind) -> Result<Vec<Genre>, CatalogError> {
        let raw = self
            .transport
            .execute(&CatalogRequest::genre_list(kind))
            .await?;
        normalize::normalize_genres(&raw)
    }
}
