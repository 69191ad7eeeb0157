//! Rendering of segmentation results.

mod json;
mod markdown;
mod options;

pub use json::{sections_to_json, to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::RenderOptions;
