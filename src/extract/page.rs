//! Single-page extraction.

use crate::error::Result;
use crate::model::Page;
use crate::normalize::ContentTreeWalker;
use crate::parser::ContentSource;
use crate::render::ArtifactSink;

/// Fetches one page from a source, normalizes it and emits its artifact.
#[derive(Clone, Copy)]
pub struct PageExtractor<'a> {
    walker: Option<ContentTreeWalker>,
    sink: Option<&'a dyn ArtifactSink>,
}

impl<'a> PageExtractor<'a> {
    /// Create an extractor; `walker = None` keeps text as decoded.
    pub fn new(walker: Option<ContentTreeWalker>) -> Self {
        Self { walker, sink: None }
    }

    /// Emit a geometry artifact for every extracted page.
    pub fn with_sink(mut self, sink: &'a dyn ArtifactSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Extract page `page_num` (1-indexed) of `source`.
    pub fn extract<S: ContentSource + ?Sized>(&self, source: &S, page_num: usize) -> Result<Page> {
        let mut page = Page::from(source.page(page_num)?);

        if let Some(walker) = &self.walker {
            let stats = walker.normalize_page(&mut page);
            log::trace!(
                "{} page {}: {} span(s), {} dropped, {} glyph(s) rewritten",
                source.name(),
                page_num,
                stats.spans_seen,
                stats.spans_dropped,
                stats.glyphs_rewritten
            );
        }

        if let Some(sink) = self.sink {
            // The artifact is a side output; the page itself still counts.
            if let Err(e) = sink.emit(source.name(), page_num, &page) {
                log::warn!(
                    "{} page {}: failed to write artifact: {}",
                    source.name(),
                    page_num,
                    e
                );
            }
        }

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Content, Point, TextSpan};
    use crate::parser::{MemorySource, RawPage};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<(String, usize)>>,
    }

    impl ArtifactSink for RecordingSink {
        fn emit(&self, document: &str, page_num: usize, _page: &Page) -> Result<()> {
            self.seen.lock().unwrap().push((document.to_string(), page_num));
            Ok(())
        }
    }

    fn source() -> MemorySource {
        let content = Content {
            text: vec![TextSpan::from_graphemes(["Ａ", "１"])],
            ..Content::default()
        };
        MemorySource::new("mem.pdf").with_page(RawPage::new(
            content,
            BoundingBox::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)),
        ))
    }

    #[test]
    fn test_extract_normalizes() {
        let extractor = PageExtractor::new(Some(ContentTreeWalker::default()));
        let page = extractor.extract(&source(), 1).unwrap();
        assert_eq!(page.contents.text[0].text(), "A1");
        assert_eq!(page.media_box.max, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_extract_raw() {
        let extractor = PageExtractor::new(None);
        let page = extractor.extract(&source(), 1).unwrap();
        assert_eq!(page.contents.text[0].text(), "Ａ１");
    }

    #[test]
    fn test_sink_receives_page() {
        let sink = RecordingSink::default();
        let extractor = PageExtractor::new(None).with_sink(&sink);
        extractor.extract(&source(), 1).unwrap();
        assert_eq!(*sink.seen.lock().unwrap(), vec![("mem.pdf".to_string(), 1)]);
    }

    #[test]
    fn test_source_error_propagates() {
        let extractor = PageExtractor::new(None);
        assert!(extractor.extract(&source(), 2).is_err());
    }
}
