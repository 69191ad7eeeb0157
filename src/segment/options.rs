//! Options for a segmentation run.

use super::{CategoryRules, HeaderRules};
use crate::parser::{ParseOptions, TableDetectorConfig};

/// Title of the section that collects text before the first detected heading.
pub const DEFAULT_SENTINEL_TITLE: &str = "INTRODUCTION";

/// Outlines with at most this many entries are treated as absent.
pub const DEFAULT_MIN_OUTLINE_ENTRIES: usize = 2;

/// How page-level failures are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Abort the run on the first page that fails to load
    Strict,
    /// Log the failure, record the page as degraded, and keep going
    #[default]
    Lenient,
}

/// Options for segmenting documents.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOptions {
    /// Page failure handling
    pub error_mode: ErrorMode,

    /// Process independent documents of a batch in parallel
    pub parallel: bool,

    /// Password for encrypted documents
    pub password: Option<String>,

    /// The outline drives segmentation only with more entries than this
    pub min_outline_entries: usize,

    /// Title of the leading section in heading-driven segmentation
    pub sentinel_title: String,

    /// Detect and serialize tables
    pub detect_tables: bool,

    /// Heading detection rules
    pub header: HeaderRules,

    /// Category keyword table
    pub categories: CategoryRules,

    /// Table detector thresholds
    pub table_detector: TableDetectorConfig,
}

impl SegmentOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Abort on the first page failure.
    pub fn strict(self) -> Self {
        self.with_error_mode(ErrorMode::Strict)
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set password for encrypted documents.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the outline size threshold.
    pub fn with_min_outline_entries(mut self, entries: usize) -> Self {
        self.min_outline_entries = entries;
        self
    }

    /// Set the title of the leading section.
    pub fn with_sentinel_title(mut self, title: impl Into<String>) -> Self {
        self.sentinel_title = title.into();
        self
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }

    /// Set the heading rules.
    pub fn with_header_rules(mut self, rules: HeaderRules) -> Self {
        self.header = rules;
        self
    }

    /// Set the category keyword table.
    pub fn with_category_rules(mut self, rules: CategoryRules) -> Self {
        self.categories = rules;
        self
    }

    /// Set the table detector thresholds.
    pub fn with_table_detector(mut self, config: TableDetectorConfig) -> Self {
        self.table_detector = config;
        self
    }

    /// Options for opening a PDF under these settings.
    pub fn parse_options(&self) -> ParseOptions {
        let options = ParseOptions::new()
            .with_tables(self.detect_tables)
            .with_table_detector(self.table_detector.clone());
        match &self.password {
            Some(password) => options.with_password(password.clone()),
            None => options,
        }
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::default(),
            parallel: true,
            password: None,
            min_outline_entries: DEFAULT_MIN_OUTLINE_ENTRIES,
            sentinel_title: DEFAULT_SENTINEL_TITLE.to_string(),
            detect_tables: true,
            header: HeaderRules::default(),
            categories: CategoryRules::default(),
            table_detector: TableDetectorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SegmentOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.parallel);
        assert_eq!(options.min_outline_entries, 2);
        assert_eq!(options.sentinel_title, "INTRODUCTION");
        assert!(options.detect_tables);
    }

    #[test]
    fn test_builder_flows_into_parse_options() {
        let options = SegmentOptions::new()
            .strict()
            .with_password("clave")
            .with_tables(false)
            .with_sentinel_title("RESUMEN_INICIAL");

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.sentinel_title, "RESUMEN_INICIAL");

        let parse = options.parse_options();
        assert_eq!(parse.password.as_deref(), Some("clave"));
        assert!(!parse.detect_tables);
    }

    #[test]
    fn test_rule_and_detector_setters() {
        let options = SegmentOptions::new()
            .with_error_mode(ErrorMode::Strict)
            .with_min_outline_entries(5)
            .with_header_rules(HeaderRules::new().with_size_factor(1.3))
            .with_category_rules(CategoryRules::new().with_body_window(50))
            .with_table_detector(TableDetectorConfig::new().with_min_rows(4));

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.min_outline_entries, 5);
        assert_eq!(options.header.size_factor, 1.3);
        assert_eq!(options.categories.body_window, 50);
        assert_eq!(options.parse_options().table_detector.min_rows, 4);
    }
}
