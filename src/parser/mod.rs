//! PDF parsing module.

mod layout;
mod options;
mod pdf_parser;
mod table_detector;

pub use layout::{detect_columns, group_into_blocks, Column, LayoutAnalyzer};
pub use options::ParseOptions;
pub use pdf_parser::PdfParser;
pub use table_detector::{DetectedTable, TableDetector, TableDetectorConfig, TableRowData};
