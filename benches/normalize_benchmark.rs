//! Benchmarks for pdfclean normalization and extraction throughput.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic content trees, so no PDF files are needed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdfclean::parser::{MemorySource, RawPage};
use pdfclean::{
    BatchRunner, BoundingBox, Cell, Content, ContentTreeWalker, Document, ExtractOptions,
    NormalizeOptions, Page, Point, Table, TextSpan,
};

const SAMPLE: &str = "ＡＢＣ１２３－–―−・ｱｲｳ漢字 abc, ＸＹＺ";

fn sample_span(i: usize) -> TextSpan {
    let text: String = SAMPLE.chars().cycle().skip(i % 7).take(24).collect();
    TextSpan::from_graphemes(text.chars().map(String::from))
}

/// Creates page content with free text and a table of `cells` cells.
fn create_content(spans: usize, cells: usize) -> Content {
    let table = Table::new(
        (0..cells)
            .map(|i| {
                let x = (i % 10) as f64 * 50.0;
                let y = (i / 10) as f64 * 20.0;
                Cell::new(BoundingBox::new(Point::new(x, y), Point::new(x + 50.0, y + 20.0)))
                    .with_text(vec![sample_span(i)])
            })
            .collect(),
    );
    Content {
        text: (0..spans).map(sample_span).collect(),
        table: vec![table],
        line: Vec::new(),
    }
}

fn letter() -> BoundingBox {
    BoundingBox::new(Point::new(0.0, 0.0), Point::new(612.0, 792.0))
}

/// Benchmark the rule table on single documents.
fn bench_normalize_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_document");
    let walker = ContentTreeWalker::new(&NormalizeOptions::default());

    for page_count in [1, 10, 50].iter() {
        let doc = Document::new(
            (0..*page_count)
                .map(|_| Page::new(create_content(40, 30), letter()))
                .collect(),
        );

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let mut doc = doc.clone();
                walker.normalize_document(black_box(&mut doc));
            });
        });
    }

    group.finish();
}

/// Benchmark the concurrent pipeline against the sequential one.
fn bench_batch_extraction(c: &mut Criterion) {
    let sources: Vec<MemorySource> = (0..8)
        .map(|d| {
            (0..20).fold(MemorySource::new(format!("doc{d}")), |source, _| {
                source.with_page(RawPage::new(create_content(40, 30), letter()))
            })
        })
        .collect();

    let mut group = c.benchmark_group("batch_extraction");
    let parallel = BatchRunner::new(ExtractOptions::default());
    let sequential = BatchRunner::new(ExtractOptions::default().sequential());

    group.bench_function("parallel", |b| {
        b.iter(|| parallel.run_sources(black_box(&sources)));
    });
    group.bench_function("sequential", |b| {
        b.iter(|| sequential.run_sources(black_box(&sources)));
    });

    group.finish();
}

criterion_group!(benches, bench_normalize_document, bench_batch_extraction);
criterion_main!(benches);
