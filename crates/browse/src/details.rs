//! Details overlay state.
//!
//! Info is fetched fresh on every selection and thrown away on close. A
//! response for an item that is no longer selected is ignored.

use cinescope_catalog::CatalogError;
use cinescope_core::embed::embed_url;
use cinescope_core::types::{DetailInfo, MediaItem};
use tracing::{debug, warn};

use crate::DETAILS_FAILED_MESSAGE;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailStatus {
    #[default]
    Closed,
    Loading,
    Loaded(DetailInfo),
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsPanel {
    pub selected: Option<MediaItem>,
    pub status: DetailStatus,
    pub player_url: Option<String>,
    token: u64,
}

impl DetailsPanel {
    /// Open the panel for `item`. Returns the token the lookup must carry.
    pub fn select(&mut self, item: MediaItem, embed_base: Option<&str>) -> u64 {
        self.token += 1;
        self.player_url = embed_base.map(|base| embed_url(base, item.kind, item.id));
        self.selected = Some(item);
        self.status = DetailStatus::Loading;
        self.token
    }

    pub fn close(&mut self) {
        // Bump so an in-flight lookup cannot reopen the panel.
        self.token += 1;
        self.selected = None;
        self.player_url = None;
        self.status = DetailStatus::Closed;
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn info(&self) -> Option<&DetailInfo> {
        match &self.status {
            DetailStatus::Loaded(info) => Some(info),
            _ => None,
        }
    }

    /// Land a lookup result. Returns false if the token is outdated.
    pub fn apply(&mut self, token: u64, result: Result<DetailInfo, CatalogError>) -> bool {
        if token != self.token {
            debug!(token, latest = self.token, "dropping stale details response");
            return false;
        }
        self.status = match result {
            Ok(info) => DetailStatus::Loaded(info),
            Err(e) => {
                warn!(error = %e, "details lookup failed");
                DetailStatus::Failed(DETAILS_FAILED_MESSAGE.to_string())
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use cinescope_core::types::{Genre, MediaKind};

    use super::*;

    fn show(id: u64) -> MediaItem {
        MediaItem {
            id,
            kind: MediaKind::Tv,
            title: "Show".into(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            rating: 7.5,
            genre_ids: BTreeSet::new(),
        }
    }

    fn info() -> DetailInfo {
        DetailInfo {
            genres: vec![Genre {
                id: 18,
                name: "Drama".into(),
            }],
            cast: vec![],
        }
    }

    #[test]
    fn select_then_load() {
        let mut panel = DetailsPanel::default();
        let token = panel.select(show(1396), Some("https://player.test/embed"));
        assert_eq!(panel.status, DetailStatus::Loading);
        assert_eq!(
            panel.player_url.as_deref(),
            Some("https://player.test/embed/tv/1396")
        );
        assert!(panel.apply(token, Ok(info())));
        assert_eq!(panel.info().unwrap().genres[0].name, "Drama");
    }

    #[test]
    fn failure_reports_single_message() {
        let mut panel = DetailsPanel::default();
        let token = panel.select(show(1), None);
        panel.apply(token, Err(CatalogError::Parse("bad".into())));
        assert_eq!(
            panel.status,
            DetailStatus::Failed(DETAILS_FAILED_MESSAGE.to_string())
        );
        assert!(panel.info().is_none());
        assert_eq!(panel.player_url, None);
    }

    #[test]
    fn late_response_for_previous_selection_is_dropped() {
        let mut panel = DetailsPanel::default();
        let first = panel.select(show(1), None);
        let second = panel.select(show(2), None);
        assert!(!panel.apply(first, Ok(info())));
        assert_eq!(panel.status, DetailStatus::Loading);
        assert!(panel.apply(second, Ok(DetailInfo::default())));
    }

    #[test]
    fn close_discards_and_ignores_in_flight_lookup() {
        let mut panel = DetailsPanel::default();
        let token = panel.select(show(1), None);
        panel.close();
        assert!(!panel.apply(token, Ok(info())));
        assert!(!panel.is_open());
        assert_eq!(panel.status, DetailStatus::Closed);
    }
}
