//! Document-level types.

use serde::{Deserialize, Serialize};

use super::Page;

/// A document: its pages in source order.
///
/// Serialized as a bare array of pages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    /// Pages, index 0 is page 1
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a document from its pages.
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: usize) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get(page_num - 1)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl From<Vec<Page>> for Document {
    fn from(pages: Vec<Page>) -> Self {
        Self::new(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_page_one_indexed() {
        let doc = Document::new(vec![Page::empty(), Page::empty()]);
        assert_eq!(doc.page_count(), 2);
        assert!(doc.get_page(0).is_none());
        assert!(doc.get_page(2).is_some());
        assert!(doc.get_page(3).is_none());
    }

    #[test]
    fn test_serialized_as_array() {
        let doc = Document::new(vec![Page::empty()]);
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 1);
    }
}
