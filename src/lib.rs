//! # tenderseg
//!
//! Structural segmentation and categorization of tender PDF documents.
//!
//! A tender document is split into titled sections: at its outline entries
//! when the outline is substantial, otherwise at headings detected from
//! typography. Tables are serialized once as marked Markdown and every
//! section gets a coarse category (financial, legal, technical, experience
//! or general) for downstream requirement extraction.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tenderseg::{segment_file, render};
//!
//! fn main() -> tenderseg::Result<()> {
//!     let result = segment_file("pliego.pdf")?;
//!
//!     for section in result.extractable_sections() {
//!         println!("[{}] {}", section.category, section.title);
//!     }
//!
//!     let json = render::to_json(&result, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two strategies**: outline-driven or heading-driven, chosen once per document
//! - **Tables**: detected from text alignment, emitted once as Markdown
//! - **Categories**: ordered keyword rules, accent-insensitive
//! - **Lenient by default**: unreadable pages are skipped and reported
//! - **Batch mode**: independent documents in parallel with Rayon

pub mod collab;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod segment;
pub mod source;
pub mod text;

// Re-export commonly used types
pub use collab::{ManagedResource, MemorySink, PageAnnotations, SectionSink, VisualDescriber};
pub use detect::{is_pdf_bytes, read_header, sniff, PdfHeader};
pub use error::{Error, Result};
pub use model::{Category, Document, Metadata, Outline, OutlineEntry, Page, Section};
pub use parser::{ParseOptions, PdfParser};
pub use render::{JsonFormat, RenderOptions};
pub use segment::{
    CategoryRules, ErrorMode, HeaderRules, SegmentOptions, SegmentationResult, Segmenter,
    Strategy, StrategyKind,
};
pub use source::PageSource;

use rayon::prelude::*;
use std::io::Read;
use std::path::Path;

/// Segment a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use tenderseg::segment_file;
///
/// let result = segment_file("pliego.pdf").unwrap();
/// println!("{} sections via {}", result.sections.len(), result.strategy);
/// ```
pub fn segment_file<P: AsRef<Path>>(path: P) -> Result<SegmentationResult> {
    segment_file_with_options(path, SegmentOptions::default())
}

/// Segment a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use tenderseg::{segment_file_with_options, SegmentOptions};
///
/// let options = SegmentOptions::new()
///     .strict()
///     .with_sentinel_title("RESUMEN_INICIAL");
/// let result = segment_file_with_options("pliego.pdf", options).unwrap();
/// ```
pub fn segment_file_with_options<P: AsRef<Path>>(
    path: P,
    options: SegmentOptions,
) -> Result<SegmentationResult> {
    Segmenter::new(options)?.segment_file(path)
}

/// Segment a PDF held in memory.
pub fn segment_bytes(data: &[u8]) -> Result<SegmentationResult> {
    segment_bytes_with_options(data, SegmentOptions::default())
}

/// Segment a PDF held in memory with custom options.
pub fn segment_bytes_with_options(
    data: &[u8],
    options: SegmentOptions,
) -> Result<SegmentationResult> {
    Segmenter::new(options)?.segment_bytes(data)
}

/// Segment a PDF read from `reader`.
///
/// # Example
///
/// ```no_run
/// use tenderseg::segment_reader;
/// use std::fs::File;
///
/// let file = File::open("pliego.pdf").unwrap();
/// let result = segment_reader(file).unwrap();
/// ```
pub fn segment_reader<R: Read>(reader: R) -> Result<SegmentationResult> {
    Segmenter::new(SegmentOptions::default())?.segment_reader(reader)
}

/// Segment several independent documents.
///
/// Documents run in parallel unless `options.parallel` is false. Results
/// come back in input order, one per path; a document that fails does not
/// affect the others. Only invalid options fail the whole batch.
pub fn segment_files<P>(paths: &[P], options: SegmentOptions) -> Result<Vec<Result<SegmentationResult>>>
where
    P: AsRef<Path> + Sync,
{
    let parallel = options.parallel;
    let segmenter = Segmenter::new(options)?;

    let results = if parallel {
        paths
            .par_iter()
            .map(|path| segmenter.segment_file(path))
            .collect()
    } else {
        paths
            .iter()
            .map(|path| segmenter.segment_file(path))
            .collect()
    };

    Ok(results)
}

/// Segment a PDF file without blocking the async runtime.
///
/// The file is read with `tokio::fs` and segmented on a blocking task.
#[cfg(feature = "async")]
pub async fn segment_file_async<P: AsRef<Path>>(
    path: P,
    options: SegmentOptions,
) -> Result<SegmentationResult> {
    let path = path.as_ref().to_path_buf();
    let segmenter = Segmenter::new(options)?;
    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| Error::open(&path, Error::Io(e)))?;

    tokio::task::spawn_blocking(move || {
        let parser =
            PdfParser::from_bytes_with_options(&data, segmenter.options().parse_options())
                .map_err(|e| Error::open(&path, e))?;
        segmenter.segment(&parser)
    })
    .await
    .map_err(|e| Error::Other(format!("segmentation task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_segment_bytes_empty_data() {
        let data: [u8; 0] = [];
        assert!(matches!(segment_bytes(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_segment_bytes_too_short() {
        assert!(segment_bytes(b"%PDF").is_err());
    }

    #[test]
    fn test_segment_bytes_unknown_magic() {
        let data = b"<!DOCTYPE html><html></html>";
        assert!(matches!(segment_bytes(data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_segment_bytes_truncated_pdf() {
        let result = segment_bytes(b"%PDF-1.7\n1 0 obj\n<<");
        assert!(result.is_err());
    }

    #[test]
    fn test_segment_missing_file_is_open_error() {
        let result = segment_file("/nonexistent/pliego.pdf");
        assert!(matches!(result, Err(Error::Open { .. })));
    }

    #[test]
    fn test_invalid_rules_fail_before_reading() {
        let options = SegmentOptions::new()
            .with_header_rules(HeaderRules::new().with_numbering_pattern("[0-9"));
        assert!(matches!(
            segment_file_with_options("/nonexistent/pliego.pdf", options),
            Err(Error::Config(_))
        ));
    }

    // ==================== Batch Tests ====================

    #[test]
    fn test_segment_files_keeps_input_order() {
        let paths = ["/nonexistent/a.pdf", "/nonexistent/b.pdf"];
        for parallel in [true, false] {
            let options = SegmentOptions::new().with_parallel(parallel);
            let results = segment_files(&paths, options).unwrap();
            assert_eq!(results.len(), 2);
            for (path, result) in paths.iter().zip(&results) {
                match result {
                    Err(Error::Open { path: failed, .. }) => {
                        assert_eq!(failed, Path::new(path));
                    }
                    other => panic!("unexpected result: {:?}", other.as_ref().map(|r| r.len())),
                }
            }
        }
    }
}
