//! Rendering of extraction results: the JSON output and per-page artifacts.

mod artifact;
mod json;

pub use artifact::{render_svg, ArtifactSink, SvgArtifactSink};
pub use json::{report_to_json, summary_to_json, to_json, write_json, JsonFormat};
