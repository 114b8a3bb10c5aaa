//! Batch processing over many documents.
//!
//! Documents run concurrently, each one fanning out over its pages. Results
//! land in index-addressed slots, so the report lists documents in input
//! order. A document that fails is reported and keeps its slot in the output
//! as `null`; it never stops the rest of the batch.

use std::path::Path;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Document;
use crate::normalize::ContentTreeWalker;
use crate::parser::{ContentSource, PdfParser};
use crate::render::{ArtifactSink, SvgArtifactSink};

use super::document::{DocumentExtractor, PageFailure};
use super::options::ExtractOptions;

/// Progress notification sent while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractEvent {
    /// One page finished (successfully or not)
    PageDone {
        document: String,
        page: usize,
        ok: bool,
    },
    /// One document finished
    DocumentDone {
        index: usize,
        name: String,
        pages: usize,
        ok: bool,
    },
}

/// Outcome for one input of a batch.
#[derive(Debug)]
pub struct DocumentReport {
    /// Position in the input list
    pub index: usize,
    /// File path or source name
    pub name: String,
    /// The document, or why it could not be produced
    pub result: Result<Document>,
    /// Pages replaced by empty pages (lenient mode only)
    pub page_failures: Vec<PageFailure>,
}

impl DocumentReport {
    /// Whether the document was produced.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// The document, if it was produced.
    pub fn document(&self) -> Option<&Document> {
        self.result.as_ref().ok()
    }

    /// The error, if the document failed.
    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }
}

/// Outcome of a whole batch.
#[derive(Debug)]
pub struct BatchReport {
    /// One report per input, in input order
    pub documents: Vec<DocumentReport>,
    /// Wall-clock time of the batch
    pub elapsed: Duration,
}

impl BatchReport {
    /// Successfully produced documents, in input order.
    pub fn successful(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter_map(DocumentReport::document)
    }

    /// One entry per input, in input order; `None` where the input failed.
    pub fn outputs(&self) -> impl Iterator<Item = Option<&Document>> {
        self.documents.iter().map(DocumentReport::document)
    }

    /// Consume the report, keeping only the produced documents.
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
            .into_iter()
            .filter_map(|report| report.result.ok())
            .collect()
    }

    /// Reports of inputs that failed.
    pub fn failed(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|r| !r.is_ok())
    }

    /// Number of failed inputs.
    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    /// Number of pages replaced by empty pages across the batch.
    pub fn page_failure_count(&self) -> usize {
        self.documents.iter().map(|r| r.page_failures.len()).sum()
    }

    /// Whether every input and every page came through.
    pub fn is_complete(&self) -> bool {
        self.failed_count() == 0 && self.page_failure_count() == 0
    }

    /// Serializable summary for reporting.
    pub fn summary(&self) -> BatchSummary {
        let documents: Vec<DocumentSummary> = self
            .documents
            .iter()
            .map(|r| DocumentSummary {
                index: r.index,
                name: r.name.clone(),
                status: if r.is_ok() {
                    DocumentStatus::Ok
                } else {
                    DocumentStatus::Failed
                },
                pages: r.document().map(Document::page_count),
                error: r.error().map(ToString::to_string),
                page_failures: r
                    .page_failures
                    .iter()
                    .map(|f| PageFailureSummary {
                        page: f.page,
                        error: f.error.to_string(),
                    })
                    .collect(),
            })
            .collect();

        BatchSummary {
            succeeded: documents.len() - self.failed_count(),
            failed: self.failed_count(),
            elapsed_secs: self.elapsed.as_secs_f64(),
            documents,
        }
    }
}

/// Machine-readable batch summary.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Inputs that produced a document
    pub succeeded: usize,
    /// Inputs that failed
    pub failed: usize,
    /// Wall-clock seconds
    pub elapsed_secs: f64,
    /// Per-input detail, in input order
    pub documents: Vec<DocumentSummary>,
}

/// Summary of one input.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub index: usize,
    pub name: String,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub page_failures: Vec<PageFailureSummary>,
}

/// Whether an input produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Ok,
    Failed,
}

/// Summary of one failed page.
#[derive(Debug, Clone, Serialize)]
pub struct PageFailureSummary {
    pub page: usize,
    pub error: String,
}

/// Runs extraction or normalization over many documents.
pub struct BatchRunner {
    options: ExtractOptions,
    sink: Option<Box<dyn ArtifactSink>>,
    events: Option<Sender<ExtractEvent>>,
}

impl BatchRunner {
    /// Create a runner. An artifact directory in `options` installs an
    /// [`SvgArtifactSink`] writing there.
    pub fn new(options: ExtractOptions) -> Self {
        let sink = options
            .artifact_dir
            .clone()
            .map(|dir| Box::new(SvgArtifactSink::new(dir)) as Box<dyn ArtifactSink>);
        Self {
            options,
            sink,
            events: None,
        }
    }

    /// Replace the artifact sink.
    pub fn with_artifact_sink(mut self, sink: impl ArtifactSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Send progress events to `events`. Send failures are ignored.
    pub fn with_events(mut self, events: Sender<ExtractEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Open and extract PDF files.
    pub fn run_files<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> BatchReport {
        self.run_with(
            paths,
            |p| p.as_ref().display().to_string(),
            |p| PdfParser::open(p),
        )
    }

    /// Extract already-opened sources.
    pub fn run_sources<S: ContentSource>(&self, sources: &[S]) -> BatchReport {
        self.run_with(sources, |s| s.name().to_string(), |s| Ok(s))
    }

    /// Extract `inputs`, opening each one with `open` inside its own task.
    pub fn run_with<'i, I, S, L, O>(&self, inputs: &'i [I], label: L, open: O) -> BatchReport
    where
        I: Sync,
        S: ContentSource,
        L: Fn(&I) -> String + Sync,
        O: Fn(&'i I) -> Result<S> + Sync,
    {
        let start = Instant::now();
        let extractor = DocumentExtractor::new(&self.options)
            .with_sink(self.sink.as_deref().map(|s| s as &dyn ArtifactSink))
            .with_events(self.events.as_ref());

        let mut slots: Vec<Option<DocumentReport>> =
            std::iter::repeat_with(|| None).take(inputs.len()).collect();

        let fill = |(index, slot): (usize, &mut Option<DocumentReport>)| {
            let input: &'i I = &inputs[index];
            let name = label(input);
            let report = match open(input).and_then(|source| extractor.extract(&source)) {
                Ok(out) => DocumentReport {
                    index,
                    name,
                    result: Ok(out.document),
                    page_failures: out.page_failures,
                },
                Err(e) => {
                    log::warn!("{}: {}", name, e);
                    DocumentReport {
                        index,
                        name,
                        result: Err(e),
                        page_failures: Vec::new(),
                    }
                }
            };
            self.notify(&report);
            *slot = Some(report);
        };

        if self.options.parallel {
            slots.par_iter_mut().enumerate().for_each(fill);
        } else {
            slots.iter_mut().enumerate().for_each(fill);
        }

        self.finish(slots, start)
    }

    /// Normalize documents decoded from a JSON payload.
    ///
    /// Entries that failed to decode are carried through as failures at
    /// their original index.
    pub fn normalize_decoded(&self, decoded: Vec<Result<Document>>) -> BatchReport {
        let start = Instant::now();
        let walker = self.options.normalize.as_ref().map(ContentTreeWalker::new);

        let mut slots: Vec<Option<DocumentReport>> = decoded
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                Some(DocumentReport {
                    index,
                    name: format!("document {index}"),
                    result,
                    page_failures: Vec::new(),
                })
            })
            .collect();

        let normalize = |slot: &mut Option<DocumentReport>| {
            if let Some(report) = slot {
                if let (Some(walker), Ok(doc)) = (&walker, &mut report.result) {
                    if self.options.parallel {
                        doc.pages.par_iter_mut().for_each(|page| {
                            walker.normalize_page(page);
                        });
                    } else {
                        walker.normalize_document(doc);
                    }
                }
                self.notify(report);
            }
        };

        if self.options.parallel {
            slots.par_iter_mut().for_each(normalize);
        } else {
            slots.iter_mut().for_each(normalize);
        }

        self.finish(slots, start)
    }

    fn notify(&self, report: &DocumentReport) {
        if let Some(events) = &self.events {
            let _ = events.send(ExtractEvent::DocumentDone {
                index: report.index,
                name: report.name.clone(),
                pages: report.document().map_or(0, Document::page_count),
                ok: report.is_ok(),
            });
        }
    }

    fn finish(&self, slots: Vec<Option<DocumentReport>>, start: Instant) -> BatchReport {
        let documents = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| DocumentReport {
                    index,
                    name: format!("document {index}"),
                    result: Err(Error::Other("document was never processed".to_string())),
                    page_failures: Vec::new(),
                })
            })
            .collect();

        let report = BatchReport {
            documents,
            elapsed: start.elapsed(),
        };
        log::info!(
            "Batch finished: {} ok, {} failed, {} page failure(s) in {:.3}s",
            report.documents.len() - report.failed_count(),
            report.failed_count(),
            report.page_failure_count(),
            report.elapsed.as_secs_f64()
        );
        report
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}
