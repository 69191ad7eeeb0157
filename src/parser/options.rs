//! Options for opening PDF documents.

use super::TableDetectorConfig;

/// Options for opening a PDF and laying out its pages.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Password for encrypted documents
    pub password: Option<String>,

    /// Whether to run the table detector when a page is loaded
    pub detect_tables: bool,

    /// Table detector thresholds
    pub table_detector: TableDetectorConfig,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set password for encrypted documents.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }

    /// Disable table detection.
    pub fn without_tables(self) -> Self {
        self.with_tables(false)
    }

    /// Set the table detector configuration.
    pub fn with_table_detector(mut self, config: TableDetectorConfig) -> Self {
        self.table_detector = config;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            password: None,
            detect_tables: true,
            table_detector: TableDetectorConfig::default(),
        }
    }
}
