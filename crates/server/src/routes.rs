use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use cinescope_browse::pagination::{DEFAULT_WINDOW, PageWindow, page_window};
use cinescope_catalog::{CatalogRequest, SearchScope, TrendingScope, build_request};
use cinescope_core::embed::embed_url;
use cinescope_core::error::ApiError;
use cinescope_core::types::{CastMember, Genre, MediaItem, MediaKind, ResultPage};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Upstream refuses pages past this.
pub const MAX_PAGE: u32 = 500;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/discover", get(discover))
        .route("/providers/{provider_id}", get(by_provider))
        .route("/trending", get(trending))
        .route("/genres/{kind}", get(genres))
        .route("/items/{kind}/{id}", get(item_details))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    catalog: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        catalog: state.fetcher.transport_name().to_string(),
    })
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ListingResponse {
    page: u32,
    total_pages: u32,
    results: Vec<MediaItem>,
    pager: PageWindow,
}

impl From<ResultPage> for ListingResponse {
    fn from(p: ResultPage) -> Self {
        Self {
            pager: page_window(p.page, p.total_pages, DEFAULT_WINDOW),
            page: p.page,
            total_pages: p.total_pages,
            results: p.results,
        }
    }
}

fn page_param(page: Option<u32>) -> Result<u32, ApiError> {
    let page = page.unwrap_or(1);
    if !(1..=MAX_PAGE).contains(&page) {
        return Err(ApiError::BadRequest(format!(
            "page must be between 1 and {MAX_PAGE}"
        )));
    }
    Ok(page)
}

fn kind_param(kind: &str) -> Result<MediaKind, ApiError> {
    MediaKind::from_str(kind).ok_or_else(|| ApiError::BadRequest(format!("unknown media kind: {kind}")))
}

async fn fetch_listing(
    state: &AppState,
    request: CatalogRequest,
) -> Result<Json<ListingResponse>, AppError> {
    let page = state.fetcher.fetch_page(&request).await?;
    Ok(Json(page.into()))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
    page: Option<u32>,
    scope: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ListingResponse>, AppError> {
    let page = page_param(params.page)?;
    let scope = match params.scope.as_deref() {
        Some(s) => SearchScope::from_str(s)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown search scope: {s}")))?,
        None => state.search_scope,
    };
    let request = build_request(&params.query, page, scope, &state.fallback);
    fetch_listing(&state, request).await
}

#[derive(Deserialize)]
struct DiscoverParams {
    page: Option<u32>,
    kind: Option<String>,
    sort_by: Option<String>,
    with_genres: Option<String>,
}

async fn discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> Result<Json<ListingResponse>, AppError> {
    let page = page_param(params.page)?;
    let kind = match params.kind.as_deref() {
        Some(k) => kind_param(k)?,
        None => MediaKind::Movie,
    };
    let mut request = CatalogRequest::discover(kind, page).param(
        "sort_by",
        params.sort_by.as_deref().unwrap_or("popularity.desc"),
    );
    if let Some(genres) = params.with_genres {
        request = request.param("with_genres", genres);
    }
    fetch_listing(&state, request).await
}

#[derive(Deserialize)]
struct ProviderParams {
    page: Option<u32>,
    region: Option<String>,
}

async fn by_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<u64>,
    Query(params): Query<ProviderParams>,
) -> Result<Json<ListingResponse>, AppError> {
    let page = page_param(params.page)?;
    let request = CatalogRequest::by_provider(provider_id, params.region.as_deref(), page);
    fetch_listing(&state, request).await
}

#[derive(Deserialize)]
struct TrendingParams {
    page: Option<u32>,
    scope: Option<String>,
}

async fn trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<ListingResponse>, AppError> {
    let page = page_param(params.page)?;
    let scope = match params.scope.as_deref() {
        Some(s) => TrendingScope::from_str(s)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown trending scope: {s}")))?,
        None => TrendingScope::All,
    };
    fetch_listing(&state, CatalogRequest::trending(scope, page)).await
}

async fn genres(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<Genre>>, AppError> {
    let kind = kind_param(&kind)?;
    Ok(Json(state.fetcher.fetch_genres(kind).await?))
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DetailsParams {
    /// Comma-separated genre ids of the listing entry.
    genre_ids: Option<String>,
}

#[derive(Serialize)]
struct DetailsResponse {
    genres: Vec<Genre>,
    cast: Vec<CastMember>,
    player_url: Option<String>,
}

fn parse_genre_ids(raw: Option<&str>) -> Result<BTreeSet<u64>, ApiError> {
    let Some(raw) = raw else {
        return Ok(BTreeSet::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| ApiError::BadRequest(format!("invalid genre id: {s}")))
        })
        .collect()
}

async fn item_details(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, u64)>,
    Query(params): Query<DetailsParams>,
) -> Result<Json<DetailsResponse>, AppError> {
    let kind = kind_param(&kind)?;
    let genre_ids = parse_genre_ids(params.genre_ids.as_deref())?;
    let info = state.details.lookup_by_id(kind, id, &genre_ids).await?;

    Ok(Json(DetailsResponse {
        genres: info.genres,
        cast: info.cast,
        player_url: state
            .embed_base
            .as_deref()
            .map(|base| embed_url(base, kind, id)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds() {
        assert_eq!(page_param(None).unwrap(), 1);
        assert_eq!(page_param(Some(500)).unwrap(), 500);
        assert!(page_param(Some(0)).is_err());
        assert!(page_param(Some(501)).is_err());
    }

    #[test]
    fn genre_id_lists() {
        assert!(parse_genre_ids(None).unwrap().is_empty());
        assert_eq!(
            parse_genre_ids(Some("18, 53,")).unwrap(),
            BTreeSet::from([18, 53])
        );
        assert!(parse_genre_ids(Some("18,drama")).is_err());
    }
}
