//! Page-level types.

use super::{Rect, Table};
use serde::{Deserialize, Serialize};

/// A laid-out page: positioned text blocks plus the tables detected on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text blocks in reading order
    pub blocks: Vec<TextBlock>,

    /// Tables detected on the page
    pub tables: Vec<Table>,
}

impl Page {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Create a new page with standard A4 size (210 x 297 mm).
    pub fn a4(number: u32) -> Self {
        Self::new(number, 595.0, 842.0)
    }

    /// Add a text block to the page.
    pub fn add_block(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }

    /// Add a detected table to the page.
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// All spans on the page in block order.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.blocks.iter().flat_map(|b| b.spans.iter())
    }

    /// Number of text spans on the page.
    pub fn span_count(&self) -> usize {
        self.blocks.iter().map(|b| b.spans.len()).sum()
    }

    /// Check if the page carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.span_count() == 0
    }

    /// Plain text of every block, one line per block.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::letter(1)
    }
}

/// A block of text: a bounding rectangle plus its spans in reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    /// Bounding rectangle of all spans
    pub bbox: Rect,
    /// Spans in reading order
    pub spans: Vec<TextSpan>,
}

impl TextBlock {
    /// Create a block whose bounding box encloses all of its spans.
    pub fn from_spans(spans: Vec<TextSpan>) -> Self {
        let boxes: Vec<Rect> = spans.iter().map(TextSpan::bbox).collect();
        let bbox = Rect::enclosing(boxes.iter()).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
        Self { bbox, spans }
    }

    /// Create a block with an explicit bounding box.
    pub fn with_bbox(bbox: Rect, spans: Vec<TextSpan>) -> Self {
        Self { bbox, spans }
    }

    /// Span texts joined by a single space.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }
}

/// A text span with position and style information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a new text span. The width is estimated from the glyph count.
    pub fn new(
        text: impl Into<String>,
        x: f32,
        y: f32,
        font_size: f32,
        font_name: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let width = estimate_width(&text, font_size);
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name: font_name.into(),
        }
    }

    /// Override the estimated width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Get the bottom Y coordinate (approximate, based on font size).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2 // Approximate descender
    }

    /// Get the top Y coordinate (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8 // Approximate ascender
    }

    /// Bounding rectangle of the span.
    pub fn bbox(&self) -> Rect {
        Rect::new(self.x, self.bottom(), self.x + self.width, self.top())
    }
}

/// Average glyph advance is taken as half the font size.
fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_new() {
        let page = Page::new(1, 612.0, 792.0);
        assert_eq!(page.number, 1);
        assert!(page.is_empty());
        assert!(page.tables.is_empty());
    }

    #[test]
    fn test_span_bbox() {
        let span = TextSpan::new("ABCD", 100.0, 500.0, 10.0, "Helvetica");
        assert_eq!(span.width, 20.0);
        let bbox = span.bbox();
        assert_eq!(bbox.x0, 100.0);
        assert_eq!(bbox.x1, 120.0);
        assert_eq!(bbox.y0, 498.0);
        assert_eq!(bbox.y1, 508.0);
    }

    #[test]
    fn test_block_encloses_spans() {
        let block = TextBlock::from_spans(vec![
            TextSpan::new("Hello", 72.0, 700.0, 12.0, "Helvetica"),
            TextSpan::new("world", 72.0, 686.0, 12.0, "Helvetica"),
        ]);
        for span in &block.spans {
            assert!(block.bbox.contains(&span.bbox()));
        }
        assert_eq!(block.text(), "Hello world");
    }

    #[test]
    fn test_page_plain_text() {
        let mut page = Page::letter(2);
        page.add_block(TextBlock::from_spans(vec![TextSpan::new(
            "uno", 72.0, 700.0, 11.0, "Arial",
        )]));
        page.add_block(TextBlock::from_spans(vec![TextSpan::new(
            "dos", 72.0, 680.0, 11.0, "Arial",
        )]));
        assert_eq!(page.plain_text(), "uno\ndos");
        assert_eq!(page.span_count(), 2);
    }
}
