//! # pdfclean
//!
//! Parallel PDF content-tree extraction with glyph normalization.
//!
//! A PDF page is reduced to a content tree: free text spans, table cells
//! with the spans inside them, and ruling lines, all with their geometry.
//! Text is then normalized for search indexing: dash-like glyphs become one
//! hyphen, commas are dropped or blanked, and full-width Latin folds to
//! half width.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfclean::{extract_files, render, ExtractOptions};
//!
//! let report = extract_files(&["a.pdf", "b.pdf"], ExtractOptions::default());
//! for failed in report.failed() {
//!     eprintln!("{}: {}", failed.name, failed.error().unwrap());
//! }
//! let json = render::report_to_json(&report, render::JsonFormat::Pretty)?;
//! println!("{}", json);
//! # Ok::<(), pdfclean::Error>(())
//! ```
//!
//! Payloads produced earlier can be cleaned again without touching a PDF:
//!
//! ```
//! use pdfclean::{clean_payload, NormalizeOptions};
//!
//! let payload = r#"[[{"Contents":{"Text":[{"Char":[{"S":"Ａ"},{"S":"–"}]}]},
//!                    "MediaBox":{"Min":{"X":0,"Y":0},"Max":{"X":612,"Y":792}}}]]"#.as_bytes();
//! let report = clean_payload(payload, &NormalizeOptions::default())?;
//! let doc = report.successful().next().unwrap();
//! assert_eq!(doc.pages[0].contents.text[0].text(), "A－");
//! # Ok::<(), pdfclean::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Ordered parallelism**: pages and documents run on Rayon, output order
//!   always follows input order
//! - **Failure isolation**: a broken document or page never stops the batch
//! - **CJK aware**: full-width forms fold, katakana is left alone
//! - **Geometry artifacts**: optional per-page SVG plots of cells and lines

pub mod detect;
pub mod error;
pub mod extract;
pub mod input;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_payload, detect_pdf_version, is_pdf_bytes, PayloadInput};
pub use error::{Error, Result};
pub use extract::{
    BatchReport, BatchRunner, BatchSummary, DocumentExtractor, DocumentReport, ErrorMode,
    ExtractEvent, ExtractOptions, PageExtractor,
};
pub use input::{decode_documents, load_payload, read_documents};
pub use model::{
    BoundingBox, Cell, Character, Content, Document, LineSegment, Page, Point, Table, TextSpan,
};
pub use normalize::{
    CommaPolicy, ContentTreeWalker, NormalizationRuleTable, NormalizeOptions, NormalizePreset,
    SpanNormalizer,
};
pub use parser::{ContentSource, MemorySource, PdfParser, RawPage};
pub use render::{ArtifactSink, JsonFormat, SvgArtifactSink};

use std::path::Path;

/// Extract a batch of PDF files.
///
/// # Example
///
/// ```no_run
/// use pdfclean::{extract_files, ExtractOptions};
///
/// let report = extract_files(&["scan.pdf"], ExtractOptions::default().lenient());
/// println!("{} of {} documents extracted", report.successful().count(), report.documents.len());
/// ```
pub fn extract_files<P: AsRef<Path> + Sync>(paths: &[P], options: ExtractOptions) -> BatchReport {
    BatchRunner::new(options).run_files(paths)
}

/// Extract a single PDF file into a document.
///
/// # Example
///
/// ```no_run
/// use pdfclean::{extract_file, ExtractOptions};
///
/// let doc = extract_file("scan.pdf", &ExtractOptions::default())?;
/// println!("Pages: {}", doc.page_count());
/// # Ok::<(), pdfclean::Error>(())
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Document> {
    let parser = PdfParser::open(path)?;
    let extracted = DocumentExtractor::new(options).extract(&parser)?;
    Ok(extracted.document)
}

/// Normalize a JSON payload given literally or as a file path.
///
/// Documents that fail to decode are reported in the batch at their input
/// index; serialized output holds `null` in their place.
pub fn clean_payload(raw: &[u8], options: &NormalizeOptions) -> Result<BatchReport> {
    let decoded = read_documents(raw)?;
    let runner = BatchRunner::new(ExtractOptions::new().with_normalize(options.clone()));
    Ok(runner.normalize_decoded(decoded))
}

/// Normalize documents in place.
pub fn normalize_documents(docs: &mut [Document], options: &NormalizeOptions) {
    let walker = ContentTreeWalker::new(options);
    for doc in docs {
        walker.normalize_document(doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_documents() {
        let content = Content {
            text: vec![
                TextSpan::from_graphemes(["１", "―", "２"]),
                TextSpan::from_graphemes(["a", ",", "b"]),
            ],
            ..Content::default()
        };
        let mut docs = vec![Document::new(vec![Page::new(content, BoundingBox::default())])];

        normalize_documents(&mut docs, &NormalizeOptions::default());

        let text = &docs[0].pages[0].contents.text;
        assert_eq!(text.len(), 1);
        assert_eq!(text[0].text(), "1－2");
    }

    #[test]
    fn test_clean_payload_keeps_order_and_failures() {
        let page = r#"{"Contents":{"Text":[{"Char":[{"S":"Ｂ"}]}]},"MediaBox":{"Min":{"X":0,"Y":0},"Max":{"X":1,"Y":1}}}"#;
        let raw = format!("[[{page}], 42, [{page}, {page}]]");
        let report = clean_payload(raw.as_bytes(), &NormalizeOptions::default()).unwrap();

        assert_eq!(report.documents.len(), 3);
        assert_eq!(report.failed_count(), 1);
        assert!(matches!(
            report.documents[1].error(),
            Some(Error::Schema { index: 1, .. })
        ));
        let pages: Vec<usize> = report.successful().map(Document::page_count).collect();
        assert_eq!(pages, vec![1, 2]);
        assert_eq!(report.documents[2].document().unwrap().pages[1].contents.text[0].text(), "B");
    }

    #[test]
    fn test_extract_file_missing() {
        let err = extract_file("/no/such/file.pdf", &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
