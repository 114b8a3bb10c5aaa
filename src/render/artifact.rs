//! Per-page geometry artifacts.
//!
//! A page's table cells and ruling lines drawn as an SVG, one file per page,
//! for eyeballing what the table detector found. Text is not drawn.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::Page;

/// Receives each extracted page. Called from worker threads.
pub trait ArtifactSink: Send + Sync {
    /// Emit the artifact for page `page_num` (1-indexed) of `document`.
    fn emit(&self, document: &str, page_num: usize, page: &Page) -> Result<()>;
}

/// Writes `<stem>_page<N>.svg` files into a directory.
#[derive(Debug, Clone)]
pub struct SvgArtifactSink {
    out_dir: PathBuf,
}

impl SvgArtifactSink {
    /// Create a sink writing into `out_dir` (created on first use).
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Path of the artifact for one page.
    pub fn artifact_path(&self, document: &str, page_num: usize) -> PathBuf {
        let stem = Path::new(document)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.out_dir.join(format!("{stem}_page{page_num}.svg"))
    }
}

impl ArtifactSink for SvgArtifactSink {
    fn emit(&self, document: &str, page_num: usize, page: &Page) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.artifact_path(document, page_num);
        fs::write(&path, render_svg(page))?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Draw a page's cells (solid) and ruling lines (dashed) as SVG.
pub fn render_svg(page: &Page) -> String {
    let mb = page.media_box;
    let (width, height) = page.dimensions();
    let mut svg = String::new();

    // PDF space has y growing upward; flip once for the whole drawing.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(
        svg,
        r#"<g transform="matrix(1 0 0 -1 {tx} {ty})" fill="none" stroke-width="0.5">"#,
        tx = 0.0 - mb.min.x,
        ty = mb.max.y
    );
    for table in &page.contents.table {
        for cell in &table.cells {
            let b = cell.bounds();
            let _ = writeln!(
                svg,
                r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" stroke="black"/>"#,
                x = b.min.x,
                y = b.min.y,
                w = b.width(),
                h = b.height()
            );
        }
    }
    for line in &page.contents.line {
        let _ = writeln!(
            svg,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="steelblue" stroke-dasharray="2 2"/>"#,
            x1 = line.start.x,
            y1 = line.start.y,
            x2 = line.end.x,
            y2 = line.end.y
        );
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Cell, Content, LineSegment, Point, Table};

    fn sample_page() -> Page {
        let content = Content {
            text: Vec::new(),
            table: vec![Table::new(vec![Cell::new(BoundingBox::new(
                Point::new(10.0, 20.0),
                Point::new(110.0, 40.0),
            ))])],
            line: vec![LineSegment::new(Point::new(0.0, 5.0), Point::new(200.0, 5.0))],
        };
        Page::new(
            content,
            BoundingBox::new(Point::new(0.0, 0.0), Point::new(612.0, 792.0)),
        )
    }

    #[test]
    fn test_render_svg() {
        let svg = render_svg(&sample_page());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="612" height="792""#));
        assert!(svg.contains(r#"<rect x="10" y="20" width="100" height="20""#));
        assert!(svg.contains(r#"<line x1="0" y1="5" x2="200" y2="5""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_artifact_path() {
        let sink = SvgArtifactSink::new("/tmp/out");
        assert_eq!(
            sink.artifact_path("docs/report.pdf", 3),
            PathBuf::from("/tmp/out/report_page3.svg")
        );
    }

    #[test]
    fn test_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = SvgArtifactSink::new(dir.path().join("plots"));
        sink.emit("scan.pdf", 1, &sample_page()).unwrap();
        let written = fs::read_to_string(dir.path().join("plots/scan_page1.svg")).unwrap();
        assert!(written.contains("<rect"));
    }
}
