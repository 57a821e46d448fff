use cinescope_catalog::{BrowseSource, CatalogFetcher, DetailsLookup, SearchScope};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: CatalogFetcher,
    pub details: DetailsLookup,
    pub search_scope: SearchScope,
    /// Listing served for a blank search.
    pub fallback: BrowseSource,
    pub embed_base: Option<String>,
}
