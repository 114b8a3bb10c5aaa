//! Page-level types.

use serde::{Deserialize, Serialize};

use super::{null_as_empty, BoundingBox, LineSegment, Table, TextSpan};

/// A single page: its content tree and its media box.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page {
    /// Text, tables and ruling lines found on the page
    pub contents: Content,

    /// Page boundaries in user space
    pub media_box: BoundingBox,
}

impl Page {
    /// Create a page.
    pub fn new(contents: Content, media_box: BoundingBox) -> Self {
        Self {
            contents,
            media_box,
        }
    }

    /// Placeholder for a page whose extraction failed.
    ///
    /// Keeps the slot occupied so sibling page indices stay aligned.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Page dimensions as (width, height).
    pub fn dimensions(&self) -> (f64, f64) {
        (self.media_box.width(), self.media_box.height())
    }

    /// Check if the page carries no content at all.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// The content tree of one page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Content {
    /// Free text spans
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: Vec<TextSpan>,

    /// Tables, each holding cells with their own text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub table: Vec<Table>,

    /// Ruling lines
    #[serde(default, deserialize_with = "null_as_empty")]
    pub line: Vec<LineSegment>,
}

impl Content {
    /// Create empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there is no text, table or line.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.table.is_empty() && self.line.is_empty()
    }

    /// Every span on the page: free text first, then cell text table by table.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.text.iter().chain(
            self.table
                .iter()
                .flat_map(|t| t.cells.iter())
                .flat_map(|c| c.text.iter()),
        )
    }

    /// Total number of cells over all tables.
    pub fn cell_count(&self) -> usize {
        self.table.iter().map(Table::cell_count).sum()
    }
}
