//! Listing state machine.
//!
//! `Idle -> Loading -> Idle`, with the last failure kept in `error`. Every
//! fetch is issued under a fresh token and only the latest token may land;
//! an older response that arrives late is dropped untouched.

use cinescope_catalog::{BrowseSource, CatalogError, CatalogRequest, SearchScope, build_request};
use cinescope_core::types::{MediaItem, ResultPage};
use tracing::{debug, warn};

use crate::{BrowseConfig, FETCH_FAILED_MESSAGE, PagingMode};

/// A fetch the caller must run, then hand back to [`SearchState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub token: u64,
    pub request: CatalogRequest,
}

/// What [`SearchState::apply`] did with a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Replaced,
    Appended,
    Failed,
    /// A newer fetch was issued since; state untouched.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub raw_query: String,
    pub debounced_query: String,
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<MediaItem>,
    pub is_loading: bool,
    pub error: Option<String>,
    paging: PagingMode,
    scope: SearchScope,
    fallback: BrowseSource,
    latest_token: u64,
    // Page whose results are on screen, and whether the in-flight fetch only
    // moved the page cursor.
    loaded_page: u32,
    page_move: bool,
    // False after page 1 of `debounced_query` failed: the results on screen
    // belong to an earlier query and `total_pages` says nothing about this one.
    listing_current: bool,
}

impl SearchState {
    pub fn new(config: &BrowseConfig) -> Self {
        Self {
            raw_query: String::new(),
            debounced_query: String::new(),
            page: 1,
            total_pages: 1,
            results: Vec::new(),
            is_loading: false,
            error: None,
            paging: config.paging,
            scope: config.search_scope,
            fallback: config.fallback.clone(),
            latest_token: 0,
            loaded_page: 1,
            page_move: false,
            listing_current: true,
        }
    }

    /// Record new search text. Has no network effect on its own.
    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.raw_query = text.into();
    }

    /// Fetch for the listing as it stands, used once when browsing starts.
    pub fn initial_load(&mut self) -> FetchTicket {
        self.page_move = false;
        self.issue()
    }

    /// Debounce expiry: adopt the raw text and go back to page 1.
    ///
    /// Returns `None` when neither the query nor the page changes.
    pub fn commit_debounced(&mut self) -> Option<FetchTicket> {
        if self.debounced_query == self.raw_query && self.page == 1 {
            return None;
        }
        self.debounced_query = self.raw_query.clone();
        self.page = 1;
        self.page_move = false;
        Some(self.issue())
    }

    pub fn has_next_page(&self) -> bool {
        self.listing_current && self.page < self.total_pages
    }

    /// Advance one page. Refused while a fetch is in flight or on the last page.
    ///
    /// If page 1 of the current query never landed, page 1 is fetched again
    /// instead.
    pub fn request_next_page(&mut self) -> Option<FetchTicket> {
        if self.is_loading {
            return None;
        }
        if !self.listing_current {
            self.page = 1;
            self.page_move = false;
            return Some(self.issue());
        }
        if !self.has_next_page() {
            return None;
        }
        Some(self.move_to(self.page + 1))
    }

    /// Step back one page. Numbered pagination only.
    pub fn request_previous_page(&mut self) -> Option<FetchTicket> {
        if self.paging != PagingMode::Replace
            || self.is_loading
            || !self.listing_current
            || self.page <= 1
        {
            return None;
        }
        Some(self.move_to(self.page - 1))
    }

    /// Jump to `page`. Numbered pagination only; `page` must be a known page.
    pub fn go_to_page(&mut self, page: u32) -> Option<FetchTicket> {
        if self.paging != PagingMode::Replace
            || self.is_loading
            || !self.listing_current
            || page == self.page
            || !(1..=self.total_pages).contains(&page)
        {
            return None;
        }
        Some(self.move_to(page))
    }

    fn move_to(&mut self, page: u32) -> FetchTicket {
        self.page = page;
        self.page_move = true;
        self.issue()
    }

    fn issue(&mut self) -> FetchTicket {
        self.latest_token += 1;
        self.is_loading = true;
        self.error = None;
        FetchTicket {
            token: self.latest_token,
            request: build_request(&self.debounced_query, self.page, self.scope, &self.fallback),
        }
    }

    /// Land a completed fetch. Only the most recently issued token counts.
    pub fn apply(&mut self, token: u64, result: Result<ResultPage, CatalogError>) -> Applied {
        if token != self.latest_token {
            debug!(token, latest = self.latest_token, "dropping stale listing response");
            return Applied::Stale;
        }
        self.is_loading = false;

        match result {
            Ok(page) => {
                self.total_pages = page.total_pages.max(1);
                self.loaded_page = self.page;
                self.listing_current = true;
                if self.page == 1 || self.paging == PagingMode::Replace {
                    self.results = page.results;
                    Applied::Replaced
                } else {
                    for item in page.results {
                        if !self.results.iter().any(|r| r.id == item.id) {
                            self.results.push(item);
                        }
                    }
                    Applied::Appended
                }
            }
            Err(e) => {
                warn!(error = %e, query = %self.debounced_query, page = self.page, "listing fetch failed");
                if self.page_move {
                    self.page = self.loaded_page;
                } else {
                    self.page = 1;
                    self.loaded_page = 1;
                    self.listing_current = false;
                }
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
                Applied::Failed
            }
        }
    }
}
