//! Per-page typography profile.

use crate::model::Page;

/// Baseline used for pages without any text.
pub const DEFAULT_BASELINE: f32 = 10.0;

/// Mean font size of every span on the page, or [`DEFAULT_BASELINE`] when
/// the page has no spans.
pub fn page_baseline(page: &Page) -> f32 {
    let (sum, count) = page
        .spans()
        .fold((0.0f32, 0usize), |(sum, count), span| (sum + span.font_size, count + 1));

    if count == 0 {
        DEFAULT_BASELINE
    } else {
        sum / count as f32
    }
}
