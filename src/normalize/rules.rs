//! The grapheme rule table.

use std::borrow::Cow;

use super::fold::fold_str;

/// Canonical hyphen: FULLWIDTH HYPHEN-MINUS.
pub const CANONICAL_HYPHEN: &str = "\u{FF0D}";

/// Graphemes rewritten to [`CANONICAL_HYPHEN`].
///
/// EN DASH, HORIZONTAL BAR, MINUS SIGN, BOX DRAWINGS LIGHT HORIZONTAL, and
/// the canonical hyphen itself so the rule is a fixed point.
pub const HYPHEN_CLASS: [&str; 5] = ["\u{2013}", "\u{2015}", "\u{2212}", "\u{2500}", CANONICAL_HYPHEN];

/// KATAKANA MIDDLE DOT.
pub const FULLWIDTH_MIDDLE_DOT: &str = "\u{30FB}";

/// HALFWIDTH KATAKANA MIDDLE DOT.
pub const HALFWIDTH_MIDDLE_DOT: &str = "\u{FF65}";

/// The comma grapheme.
pub const COMMA: &str = ",";

/// What the rule table prescribes for one grapheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphAction {
    /// Replace with a fixed glyph
    Replace(&'static str),
    /// Comma: handled at span level according to the comma policy
    Comma,
    /// Pass through the width fold
    Fold,
}

/// Pure mapping from a grapheme to its [`GlyphAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizationRuleTable {
    fold_width: bool,
}

impl NormalizationRuleTable {
    /// Create a rule table; `fold_width = false` makes the fold the identity.
    pub fn new(fold_width: bool) -> Self {
        Self { fold_width }
    }

    /// Classify a grapheme.
    pub fn action(&self, grapheme: &str) -> GlyphAction {
        if HYPHEN_CLASS.contains(&grapheme) {
            return GlyphAction::Replace(CANONICAL_HYPHEN);
        }
        match grapheme {
            FULLWIDTH_MIDDLE_DOT | HALFWIDTH_MIDDLE_DOT => GlyphAction::Replace(HALFWIDTH_MIDDLE_DOT),
            COMMA => GlyphAction::Comma,
            _ => GlyphAction::Fold,
        }
    }

    /// Whether a grapheme is a comma.
    pub fn is_comma(&self, grapheme: &str) -> bool {
        self.action(grapheme) == GlyphAction::Comma
    }

    /// Rewrite a non-comma grapheme. Commas come back unchanged.
    pub fn rewrite<'a>(&self, grapheme: &'a str) -> Cow<'a, str> {
        match self.action(grapheme) {
            GlyphAction::Replace(glyph) => Cow::Borrowed(glyph),
            GlyphAction::Comma => Cow::Borrowed(grapheme),
            GlyphAction::Fold if self.fold_width => fold_str(grapheme),
            GlyphAction::Fold => Cow::Borrowed(grapheme),
        }
    }
}

impl Default for NormalizationRuleTable {
    fn default() -> Self {
        Self::new(true)
    }
}
