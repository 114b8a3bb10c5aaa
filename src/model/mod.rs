//! Content-tree model for extracted pages.
//!
//! These records mirror the structured payload produced by the document
//! parser: a batch is an array of documents, a document is an array of
//! pages, and every page carries its content tree plus its media box.
//! Field names are PascalCase on the wire so payloads written by the
//! upstream extractor decode without translation.

mod document;
mod geometry;
mod page;
mod table;
mod text;

pub use document::Document;
pub use geometry::{BoundingBox, LineSegment, Point};
pub use page::{Content, Page};
pub use table::{Cell, Table};
pub use text::{Character, TextSpan};

use serde::{Deserialize, Deserializer};

/// Decode a sequence that the producer may have written as `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
