use serde::Serialize;

pub const DEFAULT_WINDOW: u32 = 5;

/// Numbered page buttons for a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<u32>,
    /// Trailing jump to the last page, shown after an ellipsis.
    pub last: Option<u32>,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Sliding window of at most `width` page numbers around `current`.
///
/// The window starts at page 1 until `current` passes its midpoint, then
/// centres on `current`, and pins to the end once it would run past `total`.
pub fn page_window(current: u32, total: u32, width: u32) -> PageWindow {
    let total = total.max(1);
    let current = current.clamp(1, total);
    let width = width.max(1);
    let half = width / 2;

    let count = total.min(width);
    let start = if total > width && current > half + 1 {
        if current + half <= total {
            current - half
        } else {
            total - width + 1
        }
    } else {
        1
    };

    PageWindow {
        pages: (start..start + count).collect(),
        last: (total > width && current + half < total).then_some(total),
        has_previous: current > 1,
        has_next: current < total,
    }
}
