//! Error types for pdfclean.

use std::io;
use thiserror::Error;

/// Result type alias for pdfclean operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, extracting or rendering content.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON payload, or a JSON encoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A document in the payload does not match the expected page schema.
    #[error("Document {index} does not match the page schema: {message}")]
    Schema {
        /// Position of the document in the payload
        index: usize,
        /// Decoder message (field path, line, column)
        message: String,
    },

    /// The input is not a PDF file.
    #[error("Unknown file format: not a PDF")]
    UnknownFormat,

    /// Unsupported PDF version.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing the PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// A required PDF object is missing.
    #[error("Missing required object: {0}")]
    MissingObject(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Extraction of one page failed.
    #[error("Page {page}: {source}")]
    Page {
        /// 1-indexed page number
        page: usize,
        /// What went wrong on that page
        #[source]
        source: Box<Error>,
    },

    /// Error while rendering output or side artifacts.
    #[error("Rendering error: {0}")]
    Render(String),

    /// No input was supplied at all.
    #[error("No input given")]
    EmptyInput,

    /// An argument could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
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
