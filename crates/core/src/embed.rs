//! Player URL for the details overlay.

use crate::types::MediaKind;

/// Build the embedded player URL for an item.
///
/// Both kinds resolve under the same base: `{base}/movie/{id}` and `{base}/tv/{id}`.
pub fn embed_url(base: &str, kind: MediaKind, id: u64) -> String {
    format!("{}/{}/{id}", base.trim_end_matches('/'), kind.as_str())
}
