//! Response validation.
//!
//! Every upstream body passes through an explicit schema here. The result is
//! either well-typed domain values or a [`CatalogError`]; nothing downstream
//! has to guess at missing fields.

use std::collections::BTreeSet;

use cinescope_core::types::{CastMember, DetailInfo, Genre, MediaItem, MediaKind, ResultPage};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::CatalogError;
use crate::transport::RawResponse;

const MAX_RATING: f64 = 10.0;

#[derive(Deserialize)]
struct RawPage {
    page: Option<u32>,
    total_pages: Option<u32>,
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize)]
struct RawMediaItem {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    genre_ids: Option<Vec<u64>>,
}

#[derive(Deserialize)]
struct RawGenre {
    id: u64,
    name: String,
}

#[derive(Deserialize)]
struct RawGenreList {
    genres: Option<Vec<RawGenre>>,
}

#[derive(Deserialize)]
struct RawCast {
    id: u64,
    name: String,
    character: Option<String>,
    profile_path: Option<String>,
}

#[derive(Deserialize)]
struct RawCredits {
    cast: Option<Vec<RawCast>>,
}

#[derive(Deserialize)]
struct RawDetail {
    genres: Option<Vec<RawGenre>>,
    credits: Option<RawCredits>,
}

/// Turn a listing response into a [`ResultPage`].
///
/// A missing `results` array is an empty page and a missing `total_pages`
/// counts as 1. Person entries from mixed listings are dropped.
pub fn normalize(raw: &RawResponse, implied_kind: MediaKind) -> Result<ResultPage, CatalogError> {
    let page: RawPage = decode(raw)?;

    let mut results = Vec::new();
    for entry in page.results.unwrap_or_default() {
        if entry.get("media_type").and_then(|t| t.as_str()) == Some("person") {
            continue;
        }
        let item: RawMediaItem = serde_json::from_value(entry)
            .map_err(|e| CatalogError::Parse(format!("result entry: {e}")))?;
        results.push(media_item(item, implied_kind)?);
    }

    Ok(ResultPage {
        page: page.page.unwrap_or(1).max(1),
        total_pages: page.total_pages.unwrap_or(1).max(1),
        results,
    })
}

/// Genres and cast from an item detail fetched with `append_to_response=credits`.
pub fn normalize_detail(raw: &RawResponse, cast_limit: usize) -> Result<DetailInfo, CatalogError> {
    let detail: RawDetail = decode(raw)?;
    Ok(DetailInfo {
        genres: genres(detail.genres.unwrap_or_default()),
        cast: cast(
            detail.credits.and_then(|c| c.cast).unwrap_or_default(),
            cast_limit,
        ),
    })
}

pub fn normalize_credits(
    raw: &RawResponse,
    cast_limit: usize,
) -> Result<Vec<CastMember>, CatalogError> {
    let credits: RawCredits = decode(raw)?;
    Ok(cast(credits.cast.unwrap_or_default(), cast_limit))
}

pub fn normalize_genres(raw: &RawResponse) -> Result<Vec<Genre>, CatalogError> {
    let list: RawGenreList = decode(raw)?;
    Ok(genres(list.genres.unwrap_or_default()))
}

/// Status check, JSON parse, upstream error envelope check, then the schema.
fn decode<T: DeserializeOwned>(raw: &RawResponse) -> Result<T, CatalogError> {
    if !raw.is_success() {
        return Err(CatalogError::Fetch {
            status: raw.status,
            message: status_message(&raw.body).unwrap_or_else(|| "request failed".to_string()),
        });
    }

    let value: serde_json::Value = serde_json::from_slice(&raw.body)
        .map_err(|e| CatalogError::Parse(format!("parse JSON: {e}")))?;

    if value.get("success").and_then(|s| s.as_bool()) == Some(false) {
        return Err(CatalogError::Fetch {
            status: raw.status,
            message: value["status_message"]
                .as_str()
                .unwrap_or("request failed")
                .to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| CatalogError::Parse(e.to_string()))
}

fn status_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value["status_message"].as_str().map(|s| s.to_string())
}

fn media_item(raw: RawMediaItem, implied_kind: MediaKind) -> Result<MediaItem, CatalogError> {
    let kind = match raw.media_type.as_deref() {
        None => implied_kind,
        Some(t) => MediaKind::from_str(t)
            .ok_or_else(|| CatalogError::Parse(format!("item {}: unknown media_type {t}", raw.id)))?,
    };

    let title = raw
        .title
        .or(raw.name)
        .ok_or_else(|| CatalogError::Parse(format!("item {}: missing title", raw.id)))?;

    let rating = raw.vote_average.unwrap_or(0.0);
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(CatalogError::Parse(format!(
            "item {}: rating {rating} out of range",
            raw.id
        )));
    }

    Ok(MediaItem {
        id: raw.id,
        kind,
        title,
        overview: raw.overview.unwrap_or_default(),
        poster_path: non_empty(raw.poster_path),
        backdrop_path: non_empty(raw.backdrop_path),
        release_date: non_empty(raw.release_date).or_else(|| non_empty(raw.first_air_date)),
        rating,
        genre_ids: raw.genre_ids.unwrap_or_default().into_iter().collect::<BTreeSet<_>>(),
    })
}

fn genres(raw: Vec<RawGenre>) -> Vec<Genre> {
    raw.into_iter()
        .map(|g| Genre {
            id: g.id,
            name: g.name,
        })
        .collect()
}

fn cast(raw: Vec<RawCast>, limit: usize) -> Vec<CastMember> {
    raw.into_iter()
        .take(limit)
        .map(|c| CastMember {
            id: c.id,
            name: c.name,
            character: c.character.unwrap_or_default(),
            profile_path: non_empty(c.profile_path),
        })
        .collect()
}

// Upstream sends "" for unknown dates and paths.
fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}
