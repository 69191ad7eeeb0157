//! Document model types.
//!
//! Pages are exposed to the segmenters as positioned text blocks plus the
//! tables detected on them; segmentation produces [`Section`]s.

mod document;
mod geometry;
mod page;
mod section;
mod table;

pub use document::{Document, Metadata, Outline, OutlineEntry};
pub use geometry::Rect;
pub use page::{Page, TextBlock, TextSpan};
pub use section::{Category, Section};
pub use table::{Table, TableCell, TableRegion, TableRow};
