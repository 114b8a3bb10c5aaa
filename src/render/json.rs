//! JSON rendering of document sequences.
//!
//! Output is an array of documents, each an array of pages, with the
//! PascalCase field names of the page schema. Pretty output indents by two
//! spaces.

use std::io::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::extract::{BatchReport, BatchSummary};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

fn render<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a document sequence to JSON.
pub fn to_json(docs: &[Document], format: JsonFormat) -> Result<String> {
    render(docs, format)
}

/// Convert a batch to JSON, one entry per input in input order.
///
/// A failed input renders as `null`, so output index `i` is always input
/// `i`.
pub fn report_to_json(report: &BatchReport, format: JsonFormat) -> Result<String> {
    let docs: Vec<Option<&Document>> = report.outputs().collect();
    render(&docs, format)
}

/// Convert a batch summary to JSON.
pub fn summary_to_json(summary: &BatchSummary, format: JsonFormat) -> Result<String> {
    render(summary, format)
}

/// Write a document sequence as JSON to `writer`.
pub fn write_json<W: Write>(writer: W, docs: &[Document], format: JsonFormat) -> Result<()> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_writer_pretty(writer, docs),
        JsonFormat::Compact => serde_json::to_writer(writer, docs),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DocumentReport;
    use crate::model::{BoundingBox, Content, Page, Point, TextSpan};
    use std::time::Duration;

    fn sample_doc() -> Document {
        let content = Content {
            text: vec![TextSpan::from_graphemes(["A"])],
            ..Content::default()
        };
        Document::new(vec![Page::new(
            content,
            BoundingBox::new(Point::new(0.0, 0.0), Point::new(612.0, 792.0)),
        )])
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&[sample_doc()], JsonFormat::Pretty).unwrap();
        assert!(json.starts_with("[\n  [\n    {"));
        assert!(json.contains("\"Contents\""));
        assert!(json.contains("\"MediaBox\""));
        assert!(json.contains("\"Char\""));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&[sample_doc()], JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with("[[{\"Contents\":"));
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(to_json(&[], JsonFormat::Pretty).unwrap(), "[]");
        assert_eq!(to_json(&[Document::default()], JsonFormat::Compact).unwrap(), "[[]]");
    }

    #[test]
    fn test_failed_document_keeps_its_index() {
        let report = |index: usize, result: Result<Document>| DocumentReport {
            index,
            name: format!("document {index}"),
            result,
            page_failures: Vec::new(),
        };
        let batch = BatchReport {
            documents: vec![
                report(0, Ok(sample_doc())),
                report(1, Err(Error::Other("broken".to_string()))),
                report(2, Ok(Document::default())),
            ],
            elapsed: Duration::ZERO,
        };

        let json = report_to_json(&batch, JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let docs = value.as_array().unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs[1].is_null());
        assert_eq!(docs[2], serde_json::json!([]));
    }

    #[test]
    fn test_write_json_matches_to_json() {
        let docs = vec![sample_doc(), Document::default()];
        let mut buf = Vec::new();
        write_json(&mut buf, &docs, JsonFormat::Pretty).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), to_json(&docs, JsonFormat::Pretty).unwrap());
    }
}
