//! Request descriptors for the upstream catalog.
//!
//! A [`CatalogRequest`] is a plain value: an endpoint plus pass-through query
//! parameters. Transports turn it into an actual round-trip.

use cinescope_core::types::MediaKind;
use serde::{Deserialize, Serialize};

/// Which title index a text search hits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    Movie,
    Tv,
    /// Movies and TV in one listing.
    Multi,
}

impl SearchScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Multi => "multi",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            "multi" => Some(Self::Multi),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendingScope {
    #[default]
    All,
    Movie,
    Tv,
}

impl TrendingScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            _ => None,
        }
    }
}

/// Listing shown when there is no search text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum BrowseSource {
    #[default]
    Popular,
    Trending { scope: TrendingScope },
    Provider {
        provider_id: u64,
        region: Option<String>,
    },
    Genre { genre_id: u64 },
}

impl BrowseSource {
    pub fn request(&self, page: u32) -> CatalogRequest {
        match self {
            Self::Popular => CatalogRequest::popular(page),
            Self::Trending { scope } => CatalogRequest::trending(*scope, page),
            Self::Provider {
                provider_id,
                region,
            } => CatalogRequest::by_provider(*provider_id, region.as_deref(), page),
            Self::Genre { genre_id } => CatalogRequest::by_genre(*genre_id, page),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Search { scope: SearchScope },
    Discover { kind: MediaKind },
    Trending { scope: TrendingScope },
    /// Item detail with credits appended.
    Detail { kind: MediaKind, id: u64 },
    Credits { kind: MediaKind, id: u64 },
    GenreList { kind: MediaKind },
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Self::Search { scope } => format!("/search/{}", scope.as_str()),
            Self::Discover { kind } => format!("/discover/{kind}"),
            Self::Trending { scope } => format!("/trending/{}/week", scope.as_str()),
            Self::Detail { kind, id } => format!("/{kind}/{id}"),
            Self::Credits { kind, id } => format!("/{kind}/{id}/credits"),
            Self::GenreList { kind } => format!("/genre/{kind}/list"),
        }
    }

    /// Kind assumed for listing entries that carry no `media_type` of their own.
    pub fn implied_kind(&self) -> MediaKind {
        match self {
            Self::Search {
                scope: SearchScope::Tv,
            }
            | Self::Trending {
                scope: TrendingScope::Tv,
            } => MediaKind::Tv,
            Self::Discover { kind }
            | Self::Detail { kind, .. }
            | Self::Credits { kind, .. }
            | Self::GenreList { kind } => *kind,
            _ => MediaKind::Movie,
        }
    }

    pub fn is_listing(&self) -> bool {
        matches!(
            self,
            Self::Search { .. } | Self::Discover { .. } | Self::Trending { .. }
        )
    }
}

/// One upstream call: endpoint plus query parameters, passed through as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub endpoint: Endpoint,
    pub params: Vec<(String, String)>,
}

impl CatalogRequest {
    fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn search(scope: SearchScope, query: &str, page: u32) -> Self {
        Self::new(Endpoint::Search { scope })
            .param("query", query)
            .param("page", page)
    }

    pub fn discover(kind: MediaKind, page: u32) -> Self {
        Self::new(Endpoint::Discover { kind }).param("page", page)
    }

    pub fn popular(page: u32) -> Self {
        Self::discover(MediaKind::Movie, page).param("sort_by", "popularity.desc")
    }

    pub fn by_provider(provider_id: u64, region: Option<&str>, page: u32) -> Self {
        let req = Self::discover(MediaKind::Movie, page)
            .param("sort_by", "popularity.desc")
            .param("with_watch_providers", provider_id);
        match region {
            Some(r) => req.param("watch_region", r),
            None => req,
        }
    }

    pub fn by_genre(genre_id: u64, page: u32) -> Self {
        Self::discover(MediaKind::Movie, page)
            .param("sort_by", "popularity.desc")
            .param("with_genres", genre_id)
    }

    pub fn trending(scope: TrendingScope, page: u32) -> Self {
        Self::new(Endpoint::Trending { scope }).param("page", page)
    }

    pub fn detail_with_credits(kind: MediaKind, id: u64) -> Self {
        Self::new(Endpoint::Detail { kind, id }).param("append_to_response", "credits")
    }

    pub fn credits(kind: MediaKind, id: u64) -> Self {
        Self::new(Endpoint::Credits { kind, id })
    }

    pub fn genre_list(kind: MediaKind) -> Self {
        Self::new(Endpoint::GenreList { kind })
    }

    pub fn path(&self) -> String {
        self.endpoint.path()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn page(&self) -> Option<u32> {
        self.get("page").and_then(|p| p.parse().ok())
    }

    pub fn is_search(&self) -> bool {
        matches!(self.endpoint, Endpoint::Search { .. })
    }
}

/// Pick the listing request for a query: a title search when the query has
/// any non-whitespace text, otherwise the fallback browse listing.
pub fn build_request(
    query: &str,
    page: u32,
    scope: SearchScope,
    fallback: &BrowseSource,
) -> CatalogRequest {
    if query.trim().is_empty() {
        fallback.request(page)
    } else {
        CatalogRequest::search(scope, query, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_query_builds_search() {
        let req = build_request("batman", 1, SearchScope::Movie, &BrowseSource::Popular);
        assert!(req.is_search());
        assert_eq!(req.path(), "/search/movie");
        assert_eq!(req.get("query"), Some("batman"));
        assert_eq!(req.page(), Some(1));
    }

    #[test]
    fn search_text_is_sent_as_typed() {
        let req = build_request(" the batman ", 1, SearchScope::Movie, &BrowseSource::Popular);
        assert!(req.is_search());
        assert_eq!(req.get("query"), Some(" the batman "));
    }

    #[test]
    fn blank_query_falls_back_to_discover() {
        let req = build_request("   ", 3, SearchScope::Movie, &BrowseSource::Popular);
        assert!(!req.is_search());
        assert_eq!(req.path(), "/discover/movie");
        assert_eq!(req.get("sort_by"), Some("popularity.desc"));
        assert_eq!(req.page(), Some(3));
    }

    #[test]
    fn blank_query_uses_configured_fallback() {
        let trending = BrowseSource::Trending {
            scope: TrendingScope::All,
        };
        let req = build_request("", 2, SearchScope::Multi, &trending);
        assert_eq!(req.path(), "/trending/all/week");
        assert_eq!(req.page(), Some(2));
    }

    #[test]
    fn provider_and_genre_parameters_pass_through() {
        let req = CatalogRequest::by_provider(8, Some("US"), 1);
        assert_eq!(req.get("with_watch_providers"), Some("8"));
        assert_eq!(req.get("watch_region"), Some("US"));

        let req = CatalogRequest::by_provider(337, None, 4);
        assert_eq!(req.get("watch_region"), None);
        assert_eq!(req.page(), Some(4));

        let req = CatalogRequest::by_genre(28, 1);
        assert_eq!(req.get("with_genres"), Some("28"));
    }

    #[test]
    fn detail_paths() {
        assert_eq!(
            CatalogRequest::detail_with_credits(MediaKind::Tv, 1396).path(),
            "/tv/1396"
        );
        assert_eq!(
            CatalogRequest::credits(MediaKind::Movie, 550).path(),
            "/movie/550/credits"
        );
        assert_eq!(
            CatalogRequest::genre_list(MediaKind::Movie).path(),
            "/genre/movie/list"
        );
    }

    #[test]
    fn implied_kind_follows_scope() {
        assert_eq!(
            Endpoint::Search {
                scope: SearchScope::Tv
            }
            .implied_kind(),
            MediaKind::Tv
        );
        assert_eq!(
            Endpoint::Trending {
                scope: TrendingScope::All
            }
            .implied_kind(),
            MediaKind::Movie
        );
    }
}
