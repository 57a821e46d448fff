//! Details lookup for a selected item.
//!
//! Either half failing fails the whole lookup; a caller never sees genres
//! without cast or the other way round.

use std::collections::BTreeSet;

use cinescope_core::types::{DetailInfo, Genre, MediaItem, MediaKind};
use futures::try_join;
use serde::{Deserialize, Serialize};

use crate::CatalogError;
use crate::fetcher::CatalogFetcher;

pub const DEFAULT_CAST_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailStrategy {
    /// One request: item detail with credits appended.
    #[default]
    DetailWithCredits,
    /// Two concurrent requests: credits plus the genre list, with genre names
    /// resolved from the item's own genre ids.
    CreditsAndGenreList,
}

impl DetailStrategy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "detail" => Some(Self::DetailWithCredits),
            "credits" => Some(Self::CreditsAndGenreList),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct DetailsLookup {
    fetcher: CatalogFetcher,
    strategy: DetailStrategy,
    cast_limit: usize,
}

impl DetailsLookup {
    pub fn new(fetcher: CatalogFetcher, strategy: DetailStrategy) -> Self {
        Self {
            fetcher,
            strategy,
            cast_limit: DEFAULT_CAST_LIMIT,
        }
    }

    pub fn with_cast_limit(mut self, cast_limit: usize) -> Self {
        self.cast_limit = cast_limit;
        self
    }

    pub async fn lookup(&self, item: &MediaItem) -> Result<DetailInfo, CatalogError> {
        self.lookup_by_id(item.kind, item.id, &item.genre_ids).await
    }

    /// Lookup without a listing entry at hand. `genre_ids` only matters for
    /// [`DetailStrategy::CreditsAndGenreList`].
    pub async fn lookup_by_id(
        &self,
        kind: MediaKind,
        id: u64,
        genre_ids: &BTreeSet<u64>,
    ) -> Result<DetailInfo, CatalogError> {
        match self.strategy {
            DetailStrategy::DetailWithCredits => {
                self.fetcher.fetch_detail(kind, id, self.cast_limit).await
            }
            DetailStrategy::CreditsAndGenreList => {
                let (cast, all_genres) = try_join!(
                    self.fetcher.fetch_credits(kind, id, self.cast_limit),
                    self.fetcher.fetch_genres(kind),
                )?;
                Ok(DetailInfo {
                    genres: resolve_genres(genre_ids, all_genres),
                    cast,
                })
            }
        }
    }
}

/// Keep the genres an item is tagged with, in genre-list order.
fn resolve_genres(genre_ids: &BTreeSet<u64>, all: Vec<Genre>) -> Vec<Genre> {
    all.into_iter()
        .filter(|g| genre_ids.contains(&g.id))
        .collect()
}
