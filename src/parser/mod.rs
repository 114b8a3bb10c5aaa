//! Document sources.
//!
//! A [`ContentSource`] hands out one page at a time as a content tree plus
//! media box. [`PdfParser`] reads PDF files through lopdf; [`MemorySource`]
//! serves pages that already exist in memory.

mod backend;
mod layout;
mod pdf_parser;
mod table_detector;

pub use backend::{
    decode_text_simple, ContentOp, ContentSource, FontResolver, MemorySource, PdfValue, RawPage,
};
pub use layout::{LayoutInterpreter, Matrix, PageLayout, MIN_BOX_SIZE};
pub use pdf_parser::PdfParser;
pub use table_detector::{TableDetector, TableDetectorConfig};
