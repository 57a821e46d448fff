//! Search-and-browse controller.
//!
//! Owns the search text, its debounced form, the page cursor and the
//! accumulated results, and decides when the catalog is asked for more.

pub mod controller;
pub mod debounce;
pub mod details;
pub mod pagination;
pub mod state;

use std::time::Duration;

use cinescope_catalog::{BrowseSource, SearchScope};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use controller::{BrowseController, BrowseHandle, BrowseView};
pub use details::{DetailStatus, DetailsPanel};
pub use pagination::{PageWindow, page_window};
pub use state::{Applied, FetchTicket, SearchState};

/// Message shown when a listing fetch fails.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch movies.";
/// Message shown when a details lookup fails.
pub const DETAILS_FAILED_MESSAGE: &str = "Failed to load details.";

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("browse controller has stopped")]
    Closed,
}

/// How pages after the first combine with what is already shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagingMode {
    /// Infinite scroll: later pages append.
    #[default]
    Append,
    /// Numbered pagination: every page replaces the list.
    Replace,
}

#[derive(Debug, Clone)]
pub struct BrowseConfig {
    pub debounce: Duration,
    pub paging: PagingMode,
    pub search_scope: SearchScope,
    /// Listing used while the search text is blank.
    pub fallback: BrowseSource,
    /// Base for embedded player URLs; no player URL when unset.
    pub embed_base: Option<String>,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            paging: PagingMode::default(),
            search_scope: SearchScope::default(),
            fallback: BrowseSource::default(),
            embed_base: None,
        }
    }
}
