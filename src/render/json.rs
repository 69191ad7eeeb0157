//! JSON rendering of segmentation results.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Section;
use crate::segment::SegmentationResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a full result (sections, strategy, metadata) to JSON.
pub fn to_json(result: &SegmentationResult, format: JsonFormat) -> Result<String> {
    serialize(result, format)
}

/// Convert a bare section list to a JSON array of `{title, category, text}`.
pub fn sections_to_json(sections: &[Section], format: JsonFormat) -> Result<String> {
    serialize(sections, format)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
