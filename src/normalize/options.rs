//! Normalization options and presets.

/// What a comma grapheme does to the span that contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommaPolicy {
    /// Drop the whole span from its parent sequence
    #[default]
    DropSpan,
    /// Replace the comma with an empty grapheme and keep the span
    BlankGlyph,
}

impl CommaPolicy {
    /// Parse a policy name (`drop-span` or `blank-glyph`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "drop-span" | "drop" | "span" => Some(CommaPolicy::DropSpan),
            "blank-glyph" | "blank" | "glyph" => Some(CommaPolicy::BlankGlyph),
            _ => None,
        }
    }
}

/// Normalization preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizePreset {
    /// Index-oriented: spans with commas are dropped, widths folded
    #[default]
    Search,
    /// Geometry-preserving: commas blanked in place, widths folded
    Preserving,
}

/// Options for glyph normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Comma handling
    pub comma_policy: CommaPolicy,

    /// Fold full-width Latin letters, digits and punctuation to half width
    pub fold_width: bool,
}

impl NormalizeOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options from a preset.
    pub fn from_preset(preset: NormalizePreset) -> Self {
        match preset {
            NormalizePreset::Search => Self {
                comma_policy: CommaPolicy::DropSpan,
                fold_width: true,
            },
            NormalizePreset::Preserving => Self {
                comma_policy: CommaPolicy::BlankGlyph,
                fold_width: true,
            },
        }
    }

    /// Set the comma policy.
    pub fn with_comma_policy(mut self, policy: CommaPolicy) -> Self {
        self.comma_policy = policy;
        self
    }

    /// Enable or disable width folding.
    pub fn with_width_fold(mut self, fold: bool) -> Self {
        self.fold_width = fold;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::from_preset(NormalizePreset::Search)
    }
}
