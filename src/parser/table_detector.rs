//! Table detection using text position analysis (Stream mode algorithm).
//!
//! Tables are found from text alignment alone, without ruling lines: spans
//! are grouped into rows by baseline, column edges are taken where left
//! edges line up across rows, and contiguous aligned rows form a table.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{Rect, Table, TableCell, TableRow, TextBlock, TextSpan};

/// A detected table region with its content.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Area covered by every span of the table
    pub bbox: Rect,
    /// Detected column boundaries (X coordinates)
    pub columns: Vec<f32>,
    /// Rows of text spans grouped by Y position
    pub rows: Vec<TableRowData>,
}

impl DetectedTable {
    /// One text block per table row.
    ///
    /// Each block's box is the union of its spans' boxes, so it always lies
    /// inside the table's `bbox`.
    pub fn row_blocks(&self) -> Vec<TextBlock> {
        self.rows
            .iter()
            .filter(|row| !row.spans.is_empty())
            .map(|row| TextBlock::from_spans(row.spans.clone()))
            .collect()
    }
}

/// A row of text spans in a table.
#[derive(Debug, Clone)]
pub struct TableRowData {
    /// Y position of this row
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

impl TableDetectorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum number of rows.
    pub fn with_min_rows(mut self, rows: usize) -> Self {
        self.min_rows = rows;
        self
    }

    /// Set the maximum number of columns.
    pub fn with_max_columns(mut self, columns: usize) -> Self {
        self.max_columns = columns;
        self
    }

    /// Set the minimum column alignment ratio.
    pub fn with_min_alignment_ratio(mut self, ratio: f32) -> Self {
        self.min_alignment_ratio = ratio.clamp(0.0, 1.0);
        self
    }
}

/// Detects tables in a list of text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables in the given spans.
    ///
    /// Returns detected tables and the spans that were NOT part of tables.
    pub fn detect(&self, spans: Vec<TextSpan>) -> (Vec<DetectedTable>, Vec<TextSpan>) {
        log::debug!("TableDetector: starting with {} spans", spans.len());

        if spans.len() < self.config.min_rows * self.config.min_columns {
            return (vec![], spans);
        }

        // Step 1: Group spans into rows by Y position
        let rows = self.group_into_rows(&spans);
        if rows.len() < self.config.min_rows {
            return (vec![], spans);
        }

        // Step 2: Detect column boundaries from text edges
        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: detected {} columns at positions: {:?}",
            columns.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return (vec![], spans);
        }

        // Step 3: Find table regions (contiguous rows with consistent column alignment)
        let table_regions = self.find_table_regions(&rows, &columns);
        if table_regions.is_empty() {
            log::debug!("TableDetector: no table regions found");
            return (vec![], spans);
        }

        // Step 4: Convert regions to detected tables
        let mut detected_tables = Vec::new();
        let mut used_span_indices: HashSet<usize> = HashSet::new();

        for (start_row, end_row) in table_regions {
            let table_rows: Vec<TableRowData> = rows[start_row..=end_row].to_vec();

            let boxes: Vec<Rect> = table_rows
                .iter()
                .flat_map(|r| r.spans.iter())
                .map(TextSpan::bbox)
                .collect();
            let Some(bbox) = Rect::enclosing(boxes.iter()) else {
                continue;
            };

            // Re-detect columns for this specific table region
            let table_columns = self.detect_columns(&table_rows);
            if table_columns.len() < self.config.min_columns {
                continue;
            }

            // Too many columns means word-level splitting, not a table
            if table_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    table_columns.len(),
                    self.config.max_columns
                );
                continue;
            }

            if self.is_list_pattern(&table_rows, &table_columns) {
                log::debug!("TableDetector: skipping region, detected as list pattern");
                continue;
            }

            for row in &table_rows {
                for span in &row.spans {
                    for (i, orig_span) in spans.iter().enumerate() {
                        if (orig_span.x - span.x).abs() < 0.1
                            && (orig_span.y - span.y).abs() < 0.1
                            && orig_span.text == span.text
                        {
                            used_span_indices.insert(i);
                        }
                    }
                }
            }

            detected_tables.push(DetectedTable {
                bbox,
                columns: table_columns,
                rows: table_rows,
            });
        }

        let unused_spans: Vec<TextSpan> = spans
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !used_span_indices.contains(i))
            .map(|(_, span)| span)
            .collect();

        (detected_tables, unused_spans)
    }

    /// Group spans into rows by Y position.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<TableRowData> {
        if spans.is_empty() {
            return vec![];
        }

        // Sort by Y (descending for PDF coords) then X
        let mut sorted_spans = spans.to_vec();
        sorted_spans.sort_by(|a, b| {
            let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let mut rows: Vec<TableRowData> = Vec::new();
        let mut current_row_spans: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted_spans {
            let y_tolerance = span.font_size * self.config.y_tolerance_factor;

            match current_y {
                Some(y) if (span.y - y).abs() <= y_tolerance => {
                    current_row_spans.push(span);
                }
                _ => {
                    if !current_row_spans.is_empty() {
                        rows.push(row_from_spans(std::mem::take(&mut current_row_spans)));
                    }
                    current_y = Some(span.y);
                    current_row_spans.push(span);
                }
            }
        }

        if !current_row_spans.is_empty() {
            rows.push(row_from_spans(current_row_spans));
        }

        rows
    }

    /// Detect column boundaries from text edges.
    ///
    /// 1. For each row, collect X positions where text starts
    /// 2. Keep X positions that align across enough rows
    /// 3. Merge edges closer than the minimum column gap
    fn detect_columns(&self, rows: &[TableRowData]) -> Vec<f32> {
        if rows.is_empty() {
            return vec![];
        }

        // Rows with multiple spans are the likely table rows
        let multi_span_rows: Vec<&TableRowData> =
            rows.iter().filter(|r| r.spans.len() >= 2).collect();

        if multi_span_rows.len() < self.config.min_rows {
            return self.detect_columns_simple(rows);
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        let bucket_size = 5.0;

        for row in &multi_span_rows {
            // Count each bucket once per row
            let row_buckets: HashSet<i32> = row
                .spans
                .iter()
                .map(|span| (span.x / bucket_size).round() as i32)
                .collect();
            for bucket in row_buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((multi_span_rows.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        self.aligned_edges(&edge_counts, min_occurrences, bucket_size)
    }

    /// Simpler column detection for when few rows have multiple spans.
    fn detect_columns_simple(&self, rows: &[TableRowData]) -> Vec<f32> {
        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        let bucket_size = 5.0;

        for row in rows {
            for span in &row.spans {
                let bucket = (span.x / bucket_size).round() as i32;
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((rows.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        self.aligned_edges(&edge_counts, min_occurrences, bucket_size)
    }

    /// Sorted edges seen at least `min_occurrences` times, close edges merged.
    fn aligned_edges(
        &self,
        edge_counts: &HashMap<i32, usize>,
        min_occurrences: usize,
        bucket_size: f32,
    ) -> Vec<f32> {
        let mut column_edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * bucket_size)
            .collect();

        column_edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut merged: Vec<f32> = Vec::new();
        for edge in column_edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Find contiguous row regions that form tables.
    fn find_table_regions(&self, rows: &[TableRowData], columns: &[f32]) -> Vec<(usize, usize)> {
        if rows.is_empty() || columns.len() < self.config.min_columns {
            return vec![];
        }

        let mut regions: Vec<(usize, usize)> = Vec::new();
        let mut current_start: Option<usize> = None;
        let mut consecutive_table_rows = 0;

        for (i, row) in rows.iter().enumerate() {
            let alignment_score = self.calculate_alignment_score(row, columns);

            if alignment_score >= self.config.min_alignment_ratio {
                if current_start.is_none() {
                    current_start = Some(i);
                }
                consecutive_table_rows += 1;
            } else {
                if let Some(start) = current_start {
                    if consecutive_table_rows >= self.config.min_rows {
                        regions.push((start, i - 1));
                    }
                }
                current_start = None;
                consecutive_table_rows = 0;
            }
        }

        if let Some(start) = current_start {
            if consecutive_table_rows >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's spans that start on a detected column edge.
    fn calculate_alignment_score(&self, row: &TableRowData, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }

        let tolerance = 5.0;

        let aligned_spans = row
            .spans
            .iter()
            .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= tolerance))
            .count();

        aligned_spans as f32 / row.spans.len() as f32
    }

    /// Convert a detected table to the model Table type.
    ///
    /// The first row is treated as the header when there is more than one row.
    pub fn to_table_model(&self, detected: &DetectedTable) -> Table {
        let header_rows = if detected.rows.len() > 1 { 1 } else { 0 };
        let mut table = Table::new(detected.bbox).with_header(header_rows);
        let columns = &detected.columns;

        for (row_idx, row_data) in detected.rows.iter().enumerate() {
            let mut cell_contents: Vec<Vec<String>> = vec![Vec::new(); columns.len()];

            // Each span goes to exactly one column, by its left edge
            for span in &row_data.spans {
                let col_idx = self.find_column_for_span(span.x, columns, detected.bbox.x1);
                if let Some(cell) = cell_contents.get_mut(col_idx) {
                    cell.push(span.text.trim().to_string());
                }
            }

            let cells: Vec<TableCell> = cell_contents
                .into_iter()
                .map(|contents| TableCell::text(contents.join(" ")))
                .collect();

            let table_row = if row_idx == 0 && header_rows > 0 {
                TableRow::header(cells)
            } else {
                TableRow::new(cells)
            };
            table.add_row(table_row);
        }

        let widths: Vec<f32> = (0..columns.len())
            .map(|i| match columns.get(i + 1) {
                Some(next) => next - columns[i],
                None => detected.bbox.x1 - columns[i],
            })
            .collect();
        table.column_widths = Some(widths);

        table
    }

    /// Find which column a span belongs to based on its X position.
    fn find_column_for_span(&self, span_x: f32, columns: &[f32], right_x: f32) -> usize {
        if columns.is_empty() {
            return 0;
        }

        // [col_start, col_end) with 10pt tolerance before the column start
        for (i, &col_start) in columns.iter().enumerate() {
            let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
            if span_x >= col_start - 10.0 && span_x < col_end - 10.0 {
                return i;
            }
        }

        // Otherwise the closest column
        columns
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (span_x - **a)
                    .abs()
                    .partial_cmp(&(span_x - **b).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Check if detected table rows actually represent a numbered or bulleted list.
    ///
    /// A list like "1. Item" often has the marker and the text as separate
    /// spans at different X positions, which looks like two columns.
    fn is_list_pattern(&self, rows: &[TableRowData], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullet_count = 0;
        let mut number_count = 0;

        for row in rows {
            let first_span = row
                .spans
                .iter()
                .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

            if let Some(span) = first_span {
                let text = span.text.trim();
                if is_bullet_marker(text) {
                    bullet_count += 1;
                } else if is_number_marker(text) {
                    number_count += 1;
                }
            }
        }

        let bullet_ratio = bullet_count as f32 / rows.len() as f32;
        let total_ratio = (bullet_count + number_count) as f32 / rows.len() as f32;
        log::debug!(
            "TableDetector: list markers: bullets={}, numbers={}, rows={}",
            bullet_count,
            number_count,
            rows.len()
        );

        // Bullet markers are almost never real table data
        if bullet_ratio >= 0.5 {
            return true;
        }

        // Numbered markers only disqualify 2-column regions; real tables
        // often have a numbered first column
        columns.len() == 2 && total_ratio >= 0.5
    }
}

fn row_from_spans(spans: Vec<TextSpan>) -> TableRowData {
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len().max(1) as f32;
    TableRowData { y, spans }
}

/// Check if text is a bullet marker (•, -, etc.).
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "□"
            | "◆" | "◇" | "▶" | "▷" | "➤" | "➜"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    // Handles "1 ."
    let cleaned: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

    // Digits followed by "." or ")"
    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let prefix = &cleaned[..pos];
        let suffix = &cleaned[pos..];
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    // Letter marker: "a.", "B)"
    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some('.' | ')'), None) if letter.is_alphabetic()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, 12.0, "Helvetica").with_width(text.len() as f32 * 6.0)
    }

    fn is_list_marker(text: &str) -> bool {
        is_bullet_marker(text) || is_number_marker(text)
    }

    fn indicator_spans() -> Vec<TextSpan> {
        vec![
            make_span("Indicador", 10.0, 100.0),
            make_span("Minimo", 90.0, 100.0),
            make_span("Liquidez", 10.0, 85.0),
            make_span("1.5", 90.0, 85.0),
            make_span("Endeudamiento", 10.0, 70.0),
            make_span("0.6", 90.0, 70.0),
        ]
    }

    #[test]
    fn test_group_into_rows() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("A1", 10.0, 100.0),
            make_span("B1", 60.0, 100.0),
            make_span("A2", 10.0, 85.0),
            make_span("B2", 60.0, 85.0),
        ];

        let rows = detector.group_into_rows(&spans);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].spans.len(), 2);
        assert_eq!(rows[1].spans.len(), 2);
    }

    #[test]
    fn test_detect_columns() {
        let detector = TableDetector::new();
        let rows = vec![
            row_from_spans(vec![make_span("A1", 10.0, 100.0), make_span("B1", 60.0, 100.0)]),
            row_from_spans(vec![make_span("A2", 10.0, 85.0), make_span("B2", 60.0, 85.0)]),
            row_from_spans(vec![make_span("A3", 10.0, 70.0), make_span("B3", 60.0, 70.0)]),
        ];

        let columns = detector.detect_columns(&rows);
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn test_detect_simple_table() {
        let detector = TableDetector::new();
        let (tables, remaining) = detector.detect(indicator_spans());
        assert_eq!(tables.len(), 1);
        assert!(remaining.is_empty());

        let table = &tables[0];
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.columns.len(), 2);
    }

    #[test]
    fn test_row_blocks_lie_inside_table() {
        let detector = TableDetector::new();
        let (tables, _) = detector.detect(indicator_spans());
        let table = &tables[0];

        let blocks = table.row_blocks();
        assert_eq!(blocks.len(), 3);
        for block in &blocks {
            assert!(table.bbox.contains(&block.bbox));
        }
    }

    #[test]
    fn test_no_table_single_column() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("Line 1", 10.0, 100.0),
            make_span("Line 2", 10.0, 85.0),
            make_span("Line 3", 10.0, 70.0),
        ];

        let (tables, remaining) = detector.detect(spans);
        assert!(tables.is_empty());
        assert_eq!(remaining.len(), 3);
    }

    #[test]
    fn test_table_model_conversion() {
        let detector = TableDetector::new();
        let (tables, _) = detector.detect(indicator_spans());

        let table = detector.to_table_model(&tables[0]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.header_rows, 1);
        assert_eq!(table.bbox, tables[0].bbox);

        let md = table.to_markdown();
        assert!(md.starts_with("| Indicador | Minimo |\n| --- | --- |\n"));
        assert!(md.contains("| Liquidez | 1.5 |"));
    }

    #[test]
    fn test_numbered_list_not_detected_as_table() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("1.", 50.0, 400.0),
            make_span("Objeto del contrato", 80.0, 400.0),
            make_span("2.", 50.0, 370.0),
            make_span("Plazo de ejecucion", 80.0, 370.0),
            make_span("3.", 50.0, 340.0),
            make_span("Presupuesto oficial", 80.0, 340.0),
            make_span("4.", 50.0, 310.0),
            make_span("Forma de pago", 80.0, 310.0),
        ];

        let (tables, remaining) = detector.detect(spans);
        assert!(tables.is_empty(), "Numbered list should not be detected as a table");
        assert_eq!(remaining.len(), 8);
    }

    #[test]
    fn test_bullet_list_not_detected_as_table() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("-", 50.0, 400.0),
            make_span("Certificado RUP", 80.0, 400.0),
            make_span("-", 50.0, 370.0),
            make_span("Camara de comercio", 80.0, 370.0),
            make_span("-", 50.0, 340.0),
            make_span("Poliza de seriedad", 80.0, 340.0),
        ];

        let (tables, remaining) = detector.detect(spans);
        assert!(tables.is_empty(), "Bullet list should not be detected as a table");
        assert_eq!(remaining.len(), 6);
    }

    #[test]
    fn test_is_list_marker() {
        assert!(is_list_marker("1."));
        assert!(is_list_marker("12."));
        assert!(is_list_marker("1)"));
        assert!(is_list_marker("1 ."));
        assert!(is_list_marker("3"));

        assert!(is_list_marker("-"));
        assert!(is_list_marker("•"));
        assert!(is_list_marker("*"));
        assert!(is_list_marker("–"));

        assert!(is_list_marker("a."));
        assert!(is_list_marker("B)"));

        assert!(!is_list_marker("Name"));
        assert!(!is_list_marker("Liquidez"));
        assert!(!is_list_marker(""));
    }

    #[test]
    fn test_min_rows_rejects_short_tables() {
        let detector = TableDetector::with_config(TableDetectorConfig::new().with_min_rows(4));
        let (tables, remaining) = detector.detect(indicator_spans());
        assert!(tables.is_empty());
        assert_eq!(remaining.len(), 6);
    }

    #[test]
    fn test_min_alignment_ratio_is_clamped() {
        assert_eq!(TableDetectorConfig::new().with_min_alignment_ratio(1.7).min_alignment_ratio, 1.0);
        assert_eq!(TableDetectorConfig::new().with_min_alignment_ratio(-0.2).min_alignment_ratio, 0.0);

        let detector = TableDetector::with_config(TableDetectorConfig::new().with_min_alignment_ratio(0.5));
        let (tables, _) = detector.detect(indicator_spans());
        assert_eq!(tables.len(), 1);
    }
}

