//! Structural segmentation and categorization.
//!
//! A [`Segmenter`] reads a document through [`PageSource`], picks a
//! [`Strategy`] once (outline-driven when the outline is substantial,
//! heading-driven otherwise), and returns categorized [`Section`]s in
//! reading order.

mod bookmark;
mod category;
mod header;
mod heuristic;
mod options;
mod tables;
mod typography;

pub use bookmark::{page_body, BookmarkSegmenter};
pub use category::{count_by_category, CategoryRules, SectionCategorizer, DEFAULT_BODY_WINDOW};
pub use header::{HeaderClassifier, HeaderRules, HeaderSignals};
pub use heuristic::HeuristicSegmenter;
pub use options::{ErrorMode, SegmentOptions, DEFAULT_MIN_OUTLINE_ENTRIES, DEFAULT_SENTINEL_TITLE};
pub use tables::{extract_tables, free_blocks, is_inside_table, table_regions, TABLE_MARKER};
pub use typography::{page_baseline, DEFAULT_BASELINE};

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::collab::{PageAnnotations, SectionSink, VisualDescriber};
use crate::error::Result;
use crate::model::{Category, Metadata, Outline, Page, Section};
use crate::parser::PdfParser;
use crate::source::PageSource;
use crate::text;

/// How a document is split into sections. Chosen once per run.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Split at outline entries
    Bookmark(Outline),
    /// Split at typographically detected headings
    Heuristic,
}

impl Strategy {
    /// Use the outline when it has more than `min_entries` entries.
    pub fn select(outline: Outline, min_entries: usize) -> Self {
        if outline.is_substantial(min_entries) {
            Strategy::Bookmark(outline)
        } else {
            Strategy::Heuristic
        }
    }

    /// Which kind of strategy this is.
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Bookmark(_) => StrategyKind::Bookmark,
            Strategy::Heuristic => StrategyKind::Heuristic,
        }
    }
}

/// The strategy recorded on a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Outline-driven
    Bookmark,
    /// Heading-driven
    Heuristic,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Bookmark => f.write_str("bookmark"),
            StrategyKind::Heuristic => f.write_str("heuristic"),
        }
    }
}

/// Outcome of segmenting one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationResult {
    /// Sections in reading order
    pub sections: Vec<Section>,
    /// Strategy used for the run
    pub strategy: StrategyKind,
    /// Document metadata
    pub metadata: Metadata,
    /// Number of pages in the document
    pub page_count: u32,
    /// Pages that failed to load and were skipped
    pub degraded_pages: Vec<u32>,
    /// Page descriptions from the visual describer, if one was configured
    #[serde(default, skip_serializing_if = "PageAnnotations::is_empty")]
    pub annotations: PageAnnotations,
}

impl SegmentationResult {
    /// Whether no section was produced.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Sections routed to requirement extraction (everything but GENERAL).
    pub fn extractable_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.category.is_extractable())
    }

    /// Bodies of the first `sections` sections joined by a space, cut to
    /// `max_chars` characters.
    pub fn summary_text(&self, sections: usize, max_chars: usize) -> String {
        let joined = self
            .sections
            .iter()
            .take(sections)
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        text::truncate_chars(&joined, max_chars).to_string()
    }

    /// Number of sections per category.
    pub fn count_by_category(&self) -> BTreeMap<Category, usize> {
        count_by_category(&self.sections)
    }

    /// Hand the sections to `sink` under `document_id`.
    pub fn deliver(&self, document_id: &str, sink: &dyn SectionSink) -> Result<()> {
        sink.accept(document_id, &self.sections)
    }
}

/// Segments documents under one set of options.
///
/// A segmenter holds only read-only state and can be shared across threads.
pub struct Segmenter {
    options: SegmentOptions,
    classifier: HeaderClassifier,
    categorizer: SectionCategorizer,
    describer: Option<Arc<dyn VisualDescriber>>,
}

impl Segmenter {
    /// Build a segmenter. Fails when a configured rule does not compile.
    pub fn new(options: SegmentOptions) -> Result<Self> {
        let classifier = HeaderClassifier::new(options.header.clone())?;
        let categorizer = SectionCategorizer::new(options.categories.clone());
        Ok(Self {
            options,
            classifier,
            categorizer,
            describer: None,
        })
    }

    /// Annotate every loaded page with `describer`.
    pub fn with_describer(mut self, describer: Arc<dyn VisualDescriber>) -> Self {
        self.describer = Some(describer);
        self
    }

    /// The options this segmenter runs with.
    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    /// The heading classifier in use.
    pub fn classifier(&self) -> &HeaderClassifier {
        &self.classifier
    }

    /// Categorize a title and body with the configured rules.
    pub fn categorize(&self, title: &str, body: &str) -> Category {
        self.categorizer.categorize(title, body)
    }

    /// Open the PDF at `path` and segment it.
    pub fn segment_file<P: AsRef<Path>>(&self, path: P) -> Result<SegmentationResult> {
        let parser = PdfParser::open_with_options(path, self.options.parse_options())?;
        self.segment(&parser)
    }

    /// Segment a PDF held in memory.
    pub fn segment_bytes(&self, data: &[u8]) -> Result<SegmentationResult> {
        let parser = PdfParser::from_bytes_with_options(data, self.options.parse_options())?;
        self.segment(&parser)
    }

    /// Segment a PDF read from `reader`.
    pub fn segment_reader<R: Read>(&self, reader: R) -> Result<SegmentationResult> {
        let parser = PdfParser::from_reader_with_options(reader, self.options.parse_options())?;
        self.segment(&parser)
    }

    /// Segment any page source.
    pub fn segment<S: PageSource>(&self, source: &S) -> Result<SegmentationResult> {
        let page_count = source.page_count();
        let metadata = source.metadata();
        let strategy = Strategy::select(source.outline(), self.options.min_outline_entries);
        log::debug!(
            "segmenting {} pages with {} strategy",
            page_count,
            strategy.kind()
        );

        let mut reader = PageReader::new(source, self.options.error_mode, self.describer.as_deref());
        let mut out = SectionAccumulator::new(&self.categorizer);

        match &strategy {
            Strategy::Bookmark(outline) => {
                BookmarkSegmenter::new(outline).run(&mut reader, &mut out)?;
            }
            Strategy::Heuristic => {
                HeuristicSegmenter::new(&self.classifier, &self.options.sentinel_title)
                    .run(&mut reader, &mut out)?;
            }
        }

        let (degraded_pages, annotations) = reader.finish();
        let result = SegmentationResult {
            sections: out.into_sections(),
            strategy: strategy.kind(),
            metadata,
            page_count,
            degraded_pages,
            annotations,
        };

        if result.is_empty() {
            log::warn!("no sections extracted from {} pages", page_count);
        } else {
            log::info!(
                "extracted {} sections ({} extractable) from {} pages via {}",
                result.len(),
                result.extractable_sections().count(),
                page_count,
                result.strategy
            );
        }
        if !result.degraded_pages.is_empty() {
            log::warn!("skipped degraded pages {:?}", result.degraded_pages);
        }

        Ok(result)
    }
}

impl fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segmenter")
            .field("options", &self.options)
            .field("describer", &self.describer.is_some())
            .finish()
    }
}

/// Loads pages for a single run, applying the error mode.
pub(crate) struct PageReader<'a> {
    source: &'a dyn PageSource,
    mode: ErrorMode,
    describer: Option<&'a dyn VisualDescriber>,
    degraded: Vec<u32>,
    annotations: PageAnnotations,
}

impl<'a> PageReader<'a> {
    pub(crate) fn new(
        source: &'a dyn PageSource,
        mode: ErrorMode,
        describer: Option<&'a dyn VisualDescriber>,
    ) -> Self {
        Self {
            source,
            mode,
            describer,
            degraded: Vec::new(),
            annotations: PageAnnotations::new(),
        }
    }

    pub(crate) fn page_count(&self) -> u32 {
        self.source.page_count()
    }

    /// Load page `number`. Returns `None` for a page skipped in lenient mode.
    pub(crate) fn read(&mut self, number: u32) -> Result<Option<Page>> {
        match self.source.load_page(number) {
            Ok(page) => {
                self.annotate(&page);
                Ok(Some(page))
            }
            Err(err) if self.mode == ErrorMode::Lenient && err.is_page_local() => {
                if !self.degraded.contains(&number) {
                    log::warn!("skipping page {}: {}", number, err);
                    self.degraded.push(number);
                }
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn annotate(&mut self, page: &Page) {
        let Some(describer) = self.describer else {
            return;
        };
        if self.annotations.contains(page.number) {
            return;
        }

        match describer.describe(page) {
            Ok(description) if !description.trim().is_empty() => {
                self.annotations.insert(page.number, description.trim());
            }
            Ok(_) => {}
            Err(err) => log::warn!("page {}: visual description failed: {}", page.number, err),
        }
    }

    pub(crate) fn finish(mut self) -> (Vec<u32>, PageAnnotations) {
        self.degraded.sort_unstable();
        (self.degraded, self.annotations)
    }
}

/// Collects finished sections: normalizes, drops blanks, categorizes once.
pub(crate) struct SectionAccumulator<'a> {
    categorizer: &'a SectionCategorizer,
    sections: Vec<Section>,
}

impl<'a> SectionAccumulator<'a> {
    pub(crate) fn new(categorizer: &'a SectionCategorizer) -> Self {
        Self {
            categorizer,
            sections: Vec::new(),
        }
    }

    /// Append a section. Returns `false` when the body is blank and nothing was added.
    pub(crate) fn push(&mut self, title: &str, body: &str) -> bool {
        let body = text::normalize_whitespace(body);
        if body.is_empty() {
            return false;
        }

        let category = self.categorizer.categorize(title, &body);
        self.sections.push(Section::new(title, category, body));
        true
    }

    pub(crate) fn into_sections(self) -> Vec<Section> {
        self.sections
    }
}
