//! Error types for tenderseg.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tenderseg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while segmenting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// The document at `path` could not be opened. Fatal for the whole run.
    #[error("Failed to open {}: {reason}", path.display())]
    Open {
        /// Path of the source file
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// A single page could not be laid out.
    #[error("Page {page}: {reason}")]
    Page {
        /// Page number (1-indexed)
        page: u32,
        /// Underlying cause
        reason: String,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error while rendering the section list.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid segmentation configuration (e.g. a rule pattern that does not compile).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A collaborator (vision model, sink) reported a failure.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error raised while opening `path` into a fatal open error.
    pub fn open(path: impl Into<PathBuf>, cause: Error) -> Self {
        match cause {
            Error::Open { .. } => cause,
            other => Error::Open {
                path: path.into(),
                reason: other.to_string(),
            },
        }
    }

    /// Whether this error only affects a single page.
    pub fn is_page_local(&self) -> bool {
        matches!(self, Error::Page { .. } | Error::PageOutOfRange(..))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
