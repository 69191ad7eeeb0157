//! Layout analysis for PDF pages.
//!
//! Decodes a page's content stream into positioned text spans and groups
//! them into lines and blocks in reading order. Spans on a line that share
//! a font are coalesced first, so one styled run of text is one span no
//! matter how the producer split it into show-text operators.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{TextBlock, TextSpan};

/// A text line composed of spans on the same baseline.
#[derive(Debug, Clone)]
struct TextLine {
    /// Spans sorted by X position
    spans: Vec<TextSpan>,
    /// Y position (baseline)
    y: f32,
    /// Leftmost X position
    x: f32,
    /// Dominant font size
    font_size: f32,
}

impl TextLine {
    fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        if spans.is_empty() {
            return Self {
                spans,
                y: 0.0,
                x: 0.0,
                font_size: 0.0,
            };
        }

        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        // Dominant font size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted_size: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted_size / total_chars as f32
        } else {
            spans[0].font_size
        };

        let y = spans[0].y;
        let x = spans[0].x;

        Self {
            spans: coalesce_spans(spans),
            y,
            x,
            font_size,
        }
    }
}

/// Merge neighbouring spans that share font name and size.
///
/// A space is inserted between merged spans when the gap between them is
/// wider than a fifth of a glyph, except between two characters of a
/// script that does not separate words with spaces.
fn coalesce_spans(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    let mut merged: Vec<TextSpan> = Vec::with_capacity(spans.len());

    for span in spans {
        if let Some(prev) = merged.last_mut() {
            if try_merge(prev, &span) {
                continue;
            }
        }
        merged.push(span);
    }

    merged
}

/// Append `span` to `prev` when both are one styled run; returns whether it did.
fn try_merge(prev: &mut TextSpan, span: &TextSpan) -> bool {
    let same_style =
        prev.font_name == span.font_name && (prev.font_size - span.font_size).abs() < 0.1;
    if !same_style {
        return false;
    }

    let gap = span.x - (prev.x + prev.width);

    let char_count = span.text.chars().count();
    let avg_char_width = if char_count > 0 && span.width > 0.0 {
        span.width / char_count as f32
    } else {
        span.font_size * 0.5
    };

    // Far apart on the same line: separate runs
    if gap > avg_char_width * 3.0 {
        return false;
    }

    let both_spaceless = prev.text.chars().last().map(is_spaceless_script_char).unwrap_or(false)
        && span.text.chars().next().map(is_spaceless_script_char).unwrap_or(false);
    let prev_ends_with_space = prev.text.ends_with(' ') || prev.text.ends_with('\u{00A0}');
    let curr_starts_with_space = span.text.starts_with(' ') || span.text.starts_with('\u{00A0}');

    if gap > avg_char_width * 0.2
        && !both_spaceless
        && !prev_ends_with_space
        && !curr_starts_with_space
    {
        prev.text.push(' ');
    }
    prev.text.push_str(&span.text);
    prev.width = (span.x + span.width) - prev.x;
    true
}

/// A detected column in the page layout.
#[derive(Debug, Clone)]
pub struct Column {
    /// Left boundary X coordinate
    pub left: f32,
    /// Right boundary X coordinate
    pub right: f32,
    /// Column index (0 = leftmost)
    pub index: usize,
}

impl Column {
    /// Check if an X coordinate falls within this column.
    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }

    /// Check if a span belongs to this column (left edge or center inside).
    pub fn contains_span(&self, span: &TextSpan) -> bool {
        let center = span.x + span.width / 2.0;
        self.contains(span.x) || self.contains(center)
    }
}

/// Extracts positioned text from the pages of a loaded PDF.
pub struct LayoutAnalyzer<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract text spans from a page with position and font information.
    pub fn extract_page_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut fonts = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            fonts.insert(name.clone(), base_font);
        }

        let content = self.get_page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        self.parse_content_stream(&content, &fonts, &lopdf_fonts)
    }

    /// Concatenated, decompressed content streams of a page.
    ///
    /// A page without `/Contents` is blank and yields no bytes.
    fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => Ok(stream_bytes(s)),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            Object::Stream(s) => Ok(stream_bytes(s)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    content.extend_from_slice(&stream_bytes(s));
                    content.push(b' ');
                }
            }
        }
        content
    }

    /// Walk the content stream operators and collect shown text.
    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &HashMap<Vec<u8>, String>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font = String::new();
        let mut current_font_key: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut leading: f32 = 0.0;
        let mut text_matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    text_matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_key) = &op.operands[0] {
                            current_font_key = font_key.clone();
                            current_font = fonts.get(font_key.as_slice()).cloned().unwrap_or_else(
                                || String::from_utf8_lossy(font_key.as_slice()).to_string(),
                            );
                        }
                        current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(tl) = op.operands.first().and_then(get_number) {
                        leading = tl;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            leading = -ty;
                        }
                        text_matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        text_matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    text_matrix.next_line(leading);
                }
                "Tj" | "TJ" | "'" | "\"" => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        text_matrix.next_line(leading);
                    }
                    if !in_text_block {
                        continue;
                    }

                    let encoding = lopdf_fonts
                        .get(&current_font_key)
                        .and_then(|f| f.get_font_encoding(self.doc).ok());
                    let decode = |bytes: &[u8]| match encoding {
                        Some(ref enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
                        None => decode_text_simple(bytes),
                    };

                    let text = match op.operator.as_str() {
                        "TJ" => match op.operands.first() {
                            Some(Object::Array(arr)) => decode_tj_array(arr, decode),
                            _ => String::new(),
                        },
                        "\"" => match op.operands.get(2) {
                            Some(Object::String(bytes, _)) => decode(bytes),
                            _ => String::new(),
                        },
                        _ => match op.operands.first() {
                            Some(Object::String(bytes, _)) => decode(bytes),
                            _ => String::new(),
                        },
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = text_matrix.get_position();
                        let effective_size = current_font_size * text_matrix.get_scale();
                        spans.push(TextSpan::new(
                            text,
                            x,
                            y,
                            effective_size,
                            current_font.clone(),
                        ));
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }
}

/// Decoded stream data; streams without a filter are used as stored.
fn stream_bytes(stream: &lopdf::Stream) -> Vec<u8> {
    if stream.dict.has(b"Filter") {
        stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone())
    } else {
        stream.content.clone()
    }
}

/// Decode a TJ array; large negative adjustments become word spaces.
fn decode_tj_array(items: &[Object], decode: impl Fn(&[u8]) -> String) -> String {
    // 200 thousandths of an em is wider than kerning and narrower than a space
    let space_threshold = 200.0;
    let mut combined = String::new();

    for item in items {
        let adjustment = match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode(bytes));
                continue;
            }
            Object::Integer(n) => -(*n as f32),
            Object::Real(n) => -n,
            _ => continue,
        };

        if adjustment > space_threshold
            && !combined.is_empty()
            && !combined.ends_with(' ')
            && !combined.ends_with('\u{00A0}')
        {
            if let Some(c) = combined.chars().last() {
                if !is_spaceless_script_char(c) {
                    combined.push(' ');
                }
            }
        }
    }

    combined
}

/// Group spans into text blocks in reading order.
pub fn group_into_blocks(spans: Vec<TextSpan>) -> Vec<TextBlock> {
    let lines = group_spans_into_lines(spans);
    group_lines_into_blocks(lines)
}

/// Detect columns based on vertical gap (gutter) detection.
///
/// Looks for vertical empty space between text regions. Returns columns
/// sorted from left to right; a single column when no gutter is found.
pub fn detect_columns(spans: &[TextSpan]) -> Vec<Column> {
    if spans.is_empty() {
        return vec![];
    }

    let min_x = spans
        .iter()
        .map(|s| s.x)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(0.0);
    let max_x = spans
        .iter()
        .map(|s| s.x + s.width)
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(0.0);

    let single = || {
        vec![Column {
            left: min_x - 10.0,
            right: max_x + 10.0,
            index: 0,
        }]
    };

    let page_width = max_x - min_x;
    if page_width < 250.0 {
        return single();
    }

    // Divide the text extent into vertical slices and count spans in each
    let slice_width = 3.0;
    let num_slices = ((page_width / slice_width) as usize) + 1;
    let mut slice_occupancy = vec![0usize; num_slices];

    for span in spans {
        let start_slice = ((span.x - min_x) / slice_width) as usize;
        let end_slice = (((span.x + span.width) - min_x) / slice_width) as usize;

        for slot in slice_occupancy
            .iter_mut()
            .take(end_slice.min(num_slices - 1) + 1)
            .skip(start_slice)
        {
            *slot += 1;
        }
    }

    // Largest gap in the middle 70%, preferring gaps near the center
    let search_start = num_slices * 15 / 100;
    let search_end = num_slices * 85 / 100;
    let page_center = num_slices / 2;

    let mut best_gap_start = 0;
    let mut best_gap_len = 0;
    let mut best_gap_center_dist = f32::MAX;
    let mut current_gap_start = 0;
    let mut current_gap_len = 0;

    let consider = |gap_start: usize,
                    gap_len: usize,
                    best_start: &mut usize,
                    best_len: &mut usize,
                    best_dist: &mut f32| {
        let gap_center = gap_start + gap_len / 2;
        let center_dist = (gap_center as i32 - page_center as i32).abs() as f32;
        let gap_width = gap_len as f32 * slice_width;
        let best_width = *best_len as f32 * slice_width;

        // Prefer larger gaps, or similar-sized gaps closer to center
        if gap_width >= 10.0
            && (gap_width > best_width * 1.5
                || (gap_width >= best_width * 0.7 && center_dist < *best_dist))
        {
            *best_start = gap_start;
            *best_len = gap_len;
            *best_dist = center_dist;
        }
    };

    for (i, &occupancy) in slice_occupancy
        .iter()
        .enumerate()
        .take(search_end)
        .skip(search_start)
    {
        if occupancy == 0 {
            if current_gap_len == 0 {
                current_gap_start = i;
            }
            current_gap_len += 1;
        } else {
            if current_gap_len > 0 {
                consider(
                    current_gap_start,
                    current_gap_len,
                    &mut best_gap_start,
                    &mut best_gap_len,
                    &mut best_gap_center_dist,
                );
            }
            current_gap_len = 0;
        }
    }
    if current_gap_len > 0 {
        consider(
            current_gap_start,
            current_gap_len,
            &mut best_gap_start,
            &mut best_gap_len,
            &mut best_gap_center_dist,
        );
    }

    let gap_width = best_gap_len as f32 * slice_width;
    log::debug!(
        "Best gap: width={:.1}pt at x={:.1}, text_width={:.1}",
        gap_width,
        min_x + best_gap_start as f32 * slice_width,
        page_width
    );

    if gap_width < 12.0 {
        return single();
    }

    let gutter_center = min_x + (best_gap_start as f32 + best_gap_len as f32 / 2.0) * slice_width;

    // Both columns need a reasonable width
    if gutter_center - min_x < 80.0 || max_x - gutter_center < 80.0 {
        log::debug!("Column too narrow, treating as single column");
        return single();
    }

    // Both columns need at least 10% of the spans
    let left_spans = spans
        .iter()
        .filter(|s| s.x + s.width / 2.0 < gutter_center)
        .count();
    let right_spans = spans.len() - left_spans;
    let min_spans = (spans.len() / 10).max(2);
    if left_spans < min_spans || right_spans < min_spans {
        log::debug!("Spans too imbalanced, treating as single column");
        return single();
    }

    vec![
        Column {
            left: min_x - 10.0,
            right: gutter_center,
            index: 0,
        },
        Column {
            left: gutter_center,
            right: max_x + 10.0,
            index: 1,
        },
    ]
}

/// Group spans into lines, column by column.
///
/// In a two-column layout the whole left column is read before the right
/// one.
fn group_spans_into_lines(spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    let columns = detect_columns(&spans);
    log::debug!("Detected {} columns", columns.len());

    if columns.len() <= 1 {
        return group_spans_into_lines_single_column(spans);
    }

    let mut column_spans: Vec<Vec<TextSpan>> = vec![Vec::new(); columns.len()];
    for span in spans {
        let col_idx = columns
            .iter()
            .position(|c| c.contains_span(&span))
            .unwrap_or(0);
        column_spans[col_idx].push(span);
    }

    column_spans
        .into_iter()
        .flat_map(group_spans_into_lines_single_column)
        .collect()
}

/// Y-based line grouping for a single column, top to bottom.
fn group_spans_into_lines_single_column(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF Y grows upward, so sort descending
    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_line_spans: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;

        match current_y {
            Some(y) if (span.y - y).abs() <= y_tolerance => {
                current_line_spans.push(span);
            }
            _ => {
                if !current_line_spans.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(
                        &mut current_line_spans,
                    )));
                }
                current_y = Some(span.y);
                current_line_spans.push(span);
            }
        }
    }

    if !current_line_spans.is_empty() {
        lines.push(TextLine::from_spans(current_line_spans));
    }

    lines
}

/// Group lines into blocks (paragraphs) based on spacing.
fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<TextBlock> {
    if lines.is_empty() {
        return vec![];
    }

    let avg_spacing = calculate_avg_line_spacing(&lines);
    let mut blocks: Vec<TextBlock> = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev_line) = current.last() {
            if should_break_block(prev_line, &line, avg_spacing) {
                blocks.push(lines_to_block(std::mem::take(&mut current)));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(lines_to_block(current));
    }

    blocks
}

fn lines_to_block(lines: Vec<TextLine>) -> TextBlock {
    TextBlock::from_spans(lines.into_iter().flat_map(|l| l.spans).collect())
}

fn calculate_avg_line_spacing(lines: &[TextLine]) -> f32 {
    if lines.len() < 2 {
        return 12.0;
    }

    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Determine if a new block should start between two lines.
fn should_break_block(prev_line: &TextLine, curr_line: &TextLine, avg_spacing: f32) -> bool {
    // Moving back up means a new column
    if curr_line.y > prev_line.y {
        return true;
    }

    // Large spacing indicates a new paragraph
    let spacing = (prev_line.y - curr_line.y).abs();
    if spacing > avg_spacing * 1.5 {
        return true;
    }

    // Font size change
    if (prev_line.font_size - curr_line.font_size).abs() > 1.0 {
        return true;
    }

    // Indentation change
    (prev_line.x - curr_line.x).abs() > 20.0
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        let leading = if leading > 0.0 { leading } else { 12.0 };
        self.f -= leading * self.d;
    }

    fn get_position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn get_scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if a character belongs to a script that doesn't use word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Fallback decoding when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, 12.0, "Helvetica")
    }

    #[test]
    fn test_column_contains() {
        let col = Column {
            left: 100.0,
            right: 200.0,
            index: 0,
        };
        assert!(col.contains(100.0));
        assert!(col.contains(200.0));
        assert!(!col.contains(99.0));
        assert!(!col.contains(201.0));
    }

    #[test]
    fn test_column_contains_span() {
        let col = Column {
            left: 100.0,
            right: 200.0,
            index: 0,
        };
        assert!(col.contains_span(&span("Test", 120.0, 0.0).with_width(50.0)));
        // Center at 110
        assert!(col.contains_span(&span("Test", 90.0, 0.0).with_width(40.0)));
        assert!(!col.contains_span(&span("Test", 250.0, 0.0).with_width(30.0)));
    }

    #[test]
    fn test_coalesce_adjacent_runs() {
        // "Hello" is 30pt wide at 12pt; the next run starts 4pt later
        let line = TextLine::from_spans(vec![span("world", 106.0, 700.0), span("Hello", 72.0, 700.0)]);
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].text, "Hello world");
    }

    #[test]
    fn test_coalesce_keeps_font_changes_apart() {
        let bold = TextSpan::new("1. ALCANCE", 72.0, 700.0, 12.0, "Helvetica-Bold");
        let line = TextLine::from_spans(vec![bold, span("del contrato", 140.0, 700.0)]);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].font_name, "Helvetica-Bold");
    }

    #[test]
    fn test_blocks_split_on_large_spacing() {
        let spans = vec![
            span("first line", 72.0, 700.0),
            span("second line", 72.0, 686.0),
            span("third line", 72.0, 672.0),
            span("new paragraph", 72.0, 600.0),
        ];
        let blocks = group_into_blocks(spans);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), "first line second line third line");
        assert_eq!(blocks[1].text(), "new paragraph");
    }

    #[test]
    fn test_two_columns_read_left_first() {
        let mut spans = Vec::new();
        for i in 0..6 {
            let y = 700.0 - i as f32 * 14.0;
            spans.push(span("left column text", 72.0, y));
            spans.push(span("right column text", 350.0, y));
        }
        let blocks = group_into_blocks(spans);
        let text: Vec<String> = blocks.iter().map(|b| b.text()).collect();
        let joined = text.join("\n");
        let first_right = joined.find("right").unwrap_or(0);
        let last_left = joined.rfind("left").unwrap_or(usize::MAX);
        assert!(last_left < first_right);
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"abc"), "abc");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41]), "A");
        assert_eq!(decode_text_simple(&[0xE9]), "é");
    }

    #[test]
    fn test_tj_array_spacing() {
        let items = vec![
            Object::string_literal("Pliego"),
            Object::Integer(-250),
            Object::string_literal("de"),
            Object::Integer(-30),
            Object::string_literal("condiciones"),
        ];
        let text = decode_tj_array(&items, decode_text_simple);
        assert_eq!(text, "Pliego decondiciones");
    }
}
