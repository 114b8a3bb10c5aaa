//! Extraction options and configuration.

use std::path::PathBuf;

use crate::normalize::NormalizeOptions;

/// Options for extracting documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for page failures
    pub error_mode: ErrorMode,

    /// Whether pages and documents run concurrently
    pub parallel: bool,

    /// Glyph normalization applied to each page; `None` keeps raw text
    pub normalize: Option<NormalizeOptions>,

    /// Directory for per-page geometry artifacts; `None` disables them
    pub artifact_dir: Option<PathBuf>,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (failed pages become empty pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set normalization options.
    pub fn with_normalize(mut self, options: NormalizeOptions) -> Self {
        self.normalize = Some(options);
        self
    }

    /// Keep extracted text exactly as decoded.
    pub fn raw(mut self) -> Self {
        self.normalize = None;
        self
    }

    /// Write per-page geometry artifacts into `dir`.
    pub fn with_artifacts(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            normalize: Some(NormalizeOptions::default()),
            artifact_dir: None,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// A failed page fails its document
    #[default]
    Strict,
    /// A failed page is replaced by an empty page and reported
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CommaPolicy;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .lenient()
            .sequential()
            .with_normalize(NormalizeOptions::new().with_comma_policy(CommaPolicy::BlankGlyph))
            .with_artifacts("plots");

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.parallel);
        assert_eq!(
            options.normalize.map(|n| n.comma_policy),
            Some(CommaPolicy::BlankGlyph)
        );
        assert_eq!(options.artifact_dir, Some(PathBuf::from("plots")));
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.parallel);
        assert!(options.normalize.is_some());
        assert!(options.artifact_dir.is_none());
        assert!(options.raw().normalize.is_none());
    }
}
