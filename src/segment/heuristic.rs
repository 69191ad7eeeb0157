//! Heading-driven segmentation for documents without a usable outline.

use super::header::HeaderClassifier;
use super::tables::{extract_tables, free_blocks};
use super::typography::page_baseline;
use super::{PageReader, SectionAccumulator};
use crate::error::Result;
use crate::text;

/// Splits a document wherever a span is classified as a heading.
///
/// Text before the first heading is collected under the sentinel title.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicSegmenter<'a> {
    classifier: &'a HeaderClassifier,
    sentinel: &'a str,
}

impl<'a> HeuristicSegmenter<'a> {
    /// Create a segmenter with the given classifier and leading title.
    pub fn new(classifier: &'a HeaderClassifier, sentinel: &'a str) -> Self {
        Self {
            classifier,
            sentinel,
        }
    }

    pub(crate) fn run(&self, reader: &mut PageReader<'_>, out: &mut SectionAccumulator<'_>) -> Result<()> {
        let mut title = self.sentinel.to_string();
        let mut buffer = String::new();

        for number in 1..=reader.page_count() {
            let Some(page) = reader.read(number)? else {
                continue;
            };

            let baseline = page_baseline(&page);
            let (tables_text, tables) = extract_tables(&page);
            buffer.push_str(&tables_text);

            for block in free_blocks(&page, &tables) {
                for span in &block.spans {
                    let span_text = span.text.trim();
                    if span_text.is_empty() {
                        continue;
                    }

                    if self.classifier.is_header(span, baseline) {
                        out.push(&title, &buffer);
                        title = text::collapse_whitespace(span_text);
                        buffer.clear();
                        log::debug!("page {}: heading {:?}", number, title);
                    } else {
                        buffer.push_str(span_text);
                        buffer.push(' ');
                    }
                }
                buffer.push('\n');
            }
        }

        out.push(&title, &buffer);
        Ok(())
    }
}
