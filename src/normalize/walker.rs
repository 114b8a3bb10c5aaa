//! Content-tree walk.
//!
//! Visits the free text of a page and the text of every cell of every
//! table. Ruling lines and boxes are never touched.

use crate::model::{Content, Document, Page};

use super::options::NormalizeOptions;
use super::span::{SpanNormalizer, WalkStats};

/// Applies a [`SpanNormalizer`] to every text span reachable from a [`Content`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentTreeWalker {
    normalizer: SpanNormalizer,
}

impl ContentTreeWalker {
    /// Create a walker from options.
    pub fn new(options: &NormalizeOptions) -> Self {
        Self {
            normalizer: SpanNormalizer::new(options),
        }
    }

    /// Create a walker around an existing normalizer.
    pub fn with_normalizer(normalizer: SpanNormalizer) -> Self {
        Self { normalizer }
    }

    /// Transform a content tree, returning the rewritten tree.
    pub fn walk(&self, mut content: Content) -> Content {
        self.normalize_content(&mut content);
        content
    }

    /// Rewrite a content tree in place.
    pub fn normalize_content(&self, content: &mut Content) -> WalkStats {
        let mut stats = self.normalizer.normalize_in_place(&mut content.text);
        for table in &mut content.table {
            for cell in &mut table.cells {
                stats += self.normalizer.normalize_in_place(&mut cell.text);
            }
        }
        stats
    }

    /// Rewrite the content tree of a page in place.
    pub fn normalize_page(&self, page: &mut Page) -> WalkStats {
        self.normalize_content(&mut page.contents)
    }

    /// Rewrite every page of a document in place.
    pub fn normalize_document(&self, doc: &mut Document) -> WalkStats {
        let mut stats = WalkStats::default();
        for page in &mut doc.pages {
            stats += self.normalize_page(page);
        }
        stats
    }
}
