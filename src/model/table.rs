//! Table types.

use super::Rect;
use serde::{Deserialize, Serialize};

/// A table detected on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Area covered by the table on its page
    pub bbox: Rect,

    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Number of header rows (0 = no header)
    pub header_rows: u8,

    /// Column widths in points (optional)
    pub column_widths: Option<Vec<f32>>,
}

impl Table {
    /// Create a new empty table covering `bbox`.
    pub fn new(bbox: Rect) -> Self {
        Self {
            bbox,
            rows: Vec::new(),
            header_rows: 0,
            column_widths: None,
        }
    }

    /// Set the number of header rows and return self.
    pub fn with_header(mut self, header_rows: u8) -> Self {
        self.header_rows = header_rows;
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize the table as a Markdown table.
    ///
    /// The first row is always followed by the separator line so the
    /// output is a valid Markdown table even without a declared header.
    pub fn to_markdown(&self) -> String {
        let col_count = self.column_count();
        if col_count == 0 {
            return String::new();
        }

        let mut output = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            output.push('|');
            for idx in 0..col_count {
                let content = row
                    .cells
                    .get(idx)
                    .map(|c| escape_cell(&c.text))
                    .unwrap_or_default();
                output.push_str(&format!(" {} |", content));
            }
            output.push('\n');

            if i == 0 {
                output.push('|');
                output.push_str(&" --- |".repeat(col_count));
                output.push('\n');
            }
        }

        output
    }

    /// Plain text of the table, tab-separated cells, one row per line.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this is a header row
    pub is_header: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content
    pub text: String,
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A table serialized for downstream consumers: where it was and what it said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    /// Area covered by the table
    pub bbox: Rect,
    /// Markdown serialization of the table
    pub markdown: String,
}

/// Cells must not break the Markdown row structure.
fn escape_cell(text: &str) -> String {
    text.replace('\n', " ").trim().replace('|', "\\|")
}
