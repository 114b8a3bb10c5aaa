//! Glyph normalization.
//!
//! Every grapheme of every text span is mapped through a small rule table:
//!
//! - dash-like glyphs (–, ―, −, ─) become the full-width hyphen `－`
//! - the full-width middle dot `・` becomes the half-width `･`
//! - a comma either drops its whole span or is blanked, per [`CommaPolicy`]
//! - everything else goes through the width fold: full-width Latin letters,
//!   digits and punctuation become half width, katakana stays as it is
//!
//! [`ContentTreeWalker`] applies the rules to a page's free text and to the
//! text of every table cell.

pub mod fold;
mod options;
pub mod rules;
mod span;
mod walker;

pub use options::{CommaPolicy, NormalizeOptions, NormalizePreset};
pub use rules::{GlyphAction, NormalizationRuleTable};
pub use span::{SpanNormalizer, WalkStats};
pub use walker::ContentTreeWalker;
