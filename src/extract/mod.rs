//! Concurrent extraction pipeline.
//!
//! [`BatchRunner`] fans out over documents, [`DocumentExtractor`] over the
//! pages of one document and [`PageExtractor`] handles a single page. Each
//! level writes into index-addressed slots and joins before assembling, so
//! output order always follows input order.

mod batch;
mod document;
mod options;
mod page;

pub use batch::{
    BatchReport, BatchRunner, BatchSummary, DocumentReport, DocumentStatus, DocumentSummary,
    ExtractEvent, PageFailureSummary,
};
pub use document::{DocumentExtractor, ExtractedDocument, PageFailure};
pub use options::{ErrorMode, ExtractOptions};
pub use page::PageExtractor;
