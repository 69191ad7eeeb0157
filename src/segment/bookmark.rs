//! Outline-driven segmentation.
//!
//! Each outline entry owns the pages from its own start page up to (but not
//! including) the start page of the next entry. The last entry runs to the
//! end of the document.

use std::ops::Range;

use super::tables::{extract_tables, free_blocks};
use super::{PageReader, SectionAccumulator};
use crate::error::Result;
use crate::model::{Outline, Page};

/// Splits a document at its outline entries.
#[derive(Debug, Clone, Copy)]
pub struct BookmarkSegmenter<'a> {
    outline: &'a Outline,
}

impl<'a> BookmarkSegmenter<'a> {
    /// Create a segmenter over `outline`.
    pub fn new(outline: &'a Outline) -> Self {
        Self { outline }
    }

    /// Page range of every entry, clamped to a document of `page_count` pages.
    ///
    /// Ranges are half-open and 1-indexed. An entry whose successor starts on
    /// an earlier page, or on the same page, gets an empty range.
    pub fn page_ranges(&self, page_count: u32) -> Vec<Range<u32>> {
        let entries = &self.outline.entries;
        let past_end = page_count.saturating_add(1);

        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let start = entry.page;
                let end = entries.get(i + 1).map(|next| next.page).unwrap_or(past_end);
                let end = end.max(start);

                let start = start.clamp(1, past_end);
                let end = end.min(past_end).max(start);
                start..end
            })
            .collect()
    }

    pub(crate) fn run(&self, reader: &mut PageReader<'_>, out: &mut SectionAccumulator<'_>) -> Result<()> {
        let ranges = self.page_ranges(reader.page_count());

        for (entry, range) in self.outline.entries.iter().zip(ranges) {
            let mut body = String::new();
            for number in range.clone() {
                if let Some(page) = reader.read(number)? {
                    body.push_str(&page_body(&page));
                }
            }

            if !out.push(&entry.title, &body) {
                log::debug!(
                    "outline entry {:?} (pages {}..{}) has no text",
                    entry.title,
                    range.start,
                    range.end
                );
            }
        }

        Ok(())
    }
}

/// Text of a page for outline-driven sections.
///
/// Tables come first as marked Markdown; every block outside a table then
/// contributes one line, its spans joined by a space.
pub fn page_body(page: &Page) -> String {
    let (mut body, tables) = extract_tables(page);

    for block in free_blocks(page, &tables) {
        body.push_str(&block.text());
        body.push('\n');
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Rect, Table, TableRow, TextBlock, TextSpan};

    fn ranges(triples: &[(u8, &str, u32)], page_count: u32) -> Vec<Range<u32>> {
        let outline = Outline::from_triples(triples.iter().map(|(l, t, p)| (*l, *t, *p)));
        BookmarkSegmenter::new(&outline).page_ranges(page_count)
    }

    #[test]
    fn test_ranges_follow_next_entry() {
        assert_eq!(
            ranges(&[(1, "A", 1), (1, "B", 3), (1, "C", 6)], 10),
            vec![1..3, 3..6, 6..11]
        );
    }

    #[test]
    fn test_backward_successor_gives_empty_range() {
        assert_eq!(
            ranges(&[(1, "A", 5), (1, "B", 2), (1, "C", 7)], 8),
            vec![5..5, 2..7, 7..9]
        );
    }

    #[test]
    fn test_same_page_entries() {
        assert_eq!(
            ranges(&[(1, "A", 2), (2, "A.1", 2), (1, "B", 4)], 4),
            vec![2..2, 2..4, 4..5]
        );
    }

    #[test]
    fn test_ranges_clamped_to_document() {
        assert_eq!(
            ranges(&[(1, "A", 1), (1, "B", 9), (1, "C", 12)], 5),
            vec![1..6, 6..6, 6..6]
        );
    }

    #[test]
    fn test_page_body_puts_tables_first() {
        let mut page = Page::letter(1);
        page.add_block(TextBlock::from_spans(vec![
            TextSpan::new("Requisitos", 72.0, 700.0, 11.0, "Arial"),
            TextSpan::new("habilitantes", 140.0, 700.0, 11.0, "Arial"),
        ]));
        let mut table = Table::new(Rect::new(10.0, 50.0, 300.0, 120.0));
        table.add_row(TableRow::from_strings(["Indicador", "Valor"]));
        table.add_row(TableRow::from_strings(["Capital", "100"]));
        page.add_table(table);
        page.add_block(TextBlock::with_bbox(
            Rect::new(20.0, 60.0, 200.0, 80.0),
            vec![TextSpan::new("Capital 100", 20.0, 65.0, 10.0, "Arial")],
        ));

        let body = page_body(&page);
        let marker = body.find("[TABLE DETECTED]").unwrap();
        let text = body.find("Requisitos habilitantes").unwrap();
        assert!(marker < text);
        assert_eq!(body.matches("Capital").count(), 1);
        assert!(body.ends_with("Requisitos habilitantes\n"));
    }
}
