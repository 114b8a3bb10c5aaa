//! Whole-document extraction.
//!
//! Every page gets its own task. Each task writes into the slot at index
//! `page - 1` of a pre-sized vector, so the finished document lists pages in
//! page order no matter which task completes first. Assembly only starts
//! once every task has finished.

use crossbeam_channel::Sender;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Document, Page};
use crate::normalize::ContentTreeWalker;
use crate::parser::ContentSource;
use crate::render::ArtifactSink;

use super::batch::ExtractEvent;
use super::options::{ErrorMode, ExtractOptions};
use super::page::PageExtractor;

/// A page that could not be extracted.
#[derive(Debug)]
pub struct PageFailure {
    /// 1-indexed page number
    pub page: usize,
    /// Why it failed
    pub error: Error,
}

/// Result of extracting one document.
#[derive(Debug)]
pub struct ExtractedDocument {
    /// Pages in page order
    pub document: Document,
    /// Pages replaced by empty pages (lenient mode only)
    pub page_failures: Vec<PageFailure>,
}

/// Extracts all pages of one source concurrently.
pub struct DocumentExtractor<'a> {
    options: &'a ExtractOptions,
    sink: Option<&'a dyn ArtifactSink>,
    events: Option<&'a Sender<ExtractEvent>>,
}

impl<'a> DocumentExtractor<'a> {
    /// Create an extractor.
    pub fn new(options: &'a ExtractOptions) -> Self {
        Self {
            options,
            sink: None,
            events: None,
        }
    }

    /// Emit a geometry artifact for every page.
    pub fn with_sink(mut self, sink: Option<&'a dyn ArtifactSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Report page completions on `events`.
    pub fn with_events(mut self, events: Option<&'a Sender<ExtractEvent>>) -> Self {
        self.events = events;
        self
    }

    /// Extract every page of `source`.
    ///
    /// In strict mode the first failed page (by page number) fails the
    /// document. In lenient mode failed pages become empty pages and are
    /// listed in [`ExtractedDocument::page_failures`].
    pub fn extract<S: ContentSource + ?Sized>(&self, source: &S) -> Result<ExtractedDocument> {
        let page_count = source.page_count();
        let walker = self.options.normalize.as_ref().map(ContentTreeWalker::new);
        let mut pages = PageExtractor::new(walker);
        if let Some(sink) = self.sink {
            pages = pages.with_sink(sink);
        }

        log::debug!("Extracting {} page(s) from {}", page_count, source.name());

        let mut slots: Vec<Option<Result<Page>>> =
            std::iter::repeat_with(|| None).take(page_count).collect();

        let fill = |(idx, slot): (usize, &mut Option<Result<Page>>)| {
            let page_num = idx + 1;
            let result = pages.extract(source, page_num);
            if let Some(events) = self.events {
                let _ = events.send(ExtractEvent::PageDone {
                    document: source.name().to_string(),
                    page: page_num,
                    ok: result.is_ok(),
                });
            }
            *slot = Some(result);
        };

        if self.options.parallel {
            slots.par_iter_mut().enumerate().for_each(fill);
        } else {
            slots.iter_mut().enumerate().for_each(fill);
        }

        self.assemble(source.name(), slots)
    }

    fn assemble(&self, name: &str, slots: Vec<Option<Result<Page>>>) -> Result<ExtractedDocument> {
        let mut document = Document::new(Vec::with_capacity(slots.len()));
        let mut page_failures = Vec::new();

        for (idx, slot) in slots.into_iter().enumerate() {
            let page_num = idx + 1;
            let result = slot.unwrap_or_else(|| {
                Err(Error::Other(format!("page {page_num} was never extracted")))
            });
            match result {
                Ok(page) => document.pages.push(page),
                Err(e) => match self.options.error_mode {
                    ErrorMode::Strict => {
                        return Err(Error::Page {
                            page: page_num,
                            source: Box::new(e),
                        });
                    }
                    ErrorMode::Lenient => {
                        log::warn!("{} page {}: {}", name, page_num, e);
                        document.pages.push(Page::empty());
                        page_failures.push(PageFailure {
                            page: page_num,
                            error: e,
                        });
                    }
                },
            }
        }

        Ok(ExtractedDocument {
            document,
            page_failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Content, Point, TextSpan};
    use crate::parser::{MemorySource, RawPage};

    fn raw_page(label: &str) -> RawPage {
        RawPage::new(
            Content {
                text: vec![TextSpan::from_graphemes(label.chars().map(String::from))],
                ..Content::default()
            },
            BoundingBox::new(Point::new(0.0, 0.0), Point::new(612.0, 792.0)),
        )
    }

    fn three_pages_second_broken() -> MemorySource {
        MemorySource::new("doc.pdf")
            .with_page(raw_page("one"))
            .with_failing_page("corrupt stream")
            .with_page(raw_page("three"))
    }

    #[test]
    fn test_pages_in_order() {
        let source = (1..=50).fold(MemorySource::new("many.pdf"), |s, i| {
            s.with_page(raw_page(&format!("p{i}")))
        });
        let options = ExtractOptions::default();
        let out = DocumentExtractor::new(&options).extract(&source).unwrap();
        assert_eq!(out.document.page_count(), 50);
        for (i, page) in out.document.pages.iter().enumerate() {
            assert_eq!(page.contents.text[0].text(), format!("p{}", i + 1));
        }
    }

    #[test]
    fn test_empty_document() {
        let options = ExtractOptions::default();
        let out = DocumentExtractor::new(&options)
            .extract(&MemorySource::new("empty.pdf"))
            .unwrap();
        assert!(out.document.is_empty());
        assert!(out.page_failures.is_empty());
    }

    #[test]
    fn test_strict_fails_document() {
        let options = ExtractOptions::default();
        let err = DocumentExtractor::new(&options)
            .extract(&three_pages_second_broken())
            .unwrap_err();
        assert!(matches!(err, Error::Page { page: 2, .. }));
    }

    #[test]
    fn test_lenient_keeps_slot() {
        let options = ExtractOptions::default().lenient();
        let out = DocumentExtractor::new(&options)
            .extract(&three_pages_second_broken())
            .unwrap();
        assert_eq!(out.document.page_count(), 3);
        assert!(out.document.pages[1].is_empty());
        assert_eq!(out.document.pages[2].contents.text[0].text(), "three");
        assert_eq!(out.page_failures.len(), 1);
        assert_eq!(out.page_failures[0].page, 2);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let source = three_pages_second_broken();
        let parallel = ExtractOptions::default().lenient();
        let sequential = ExtractOptions::default().lenient().sequential();
        let a = DocumentExtractor::new(&parallel).extract(&source).unwrap();
        let b = DocumentExtractor::new(&sequential).extract(&source).unwrap();
        assert_eq!(a.document, b.document);
    }

    #[test]
    fn test_page_events() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let options = ExtractOptions::default().lenient();
        DocumentExtractor::new(&options)
            .with_events(Some(&tx))
            .extract(&three_pages_second_broken())
            .unwrap();
        drop(tx);
        let mut done: Vec<(usize, bool)> = rx
            .iter()
            .filter_map(|e| match e {
                ExtractEvent::PageDone { page, ok, .. } => Some((page, ok)),
                _ => None,
            })
            .collect();
        done.sort();
        assert_eq!(done, vec![(1, true), (2, false), (3, true)]);
    }
}
