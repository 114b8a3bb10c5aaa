//! Span-level application of the rule table.

use std::borrow::Cow;
use std::ops::AddAssign;

use crate::model::TextSpan;

use super::options::{CommaPolicy, NormalizeOptions};
use super::rules::NormalizationRuleTable;

/// Counters collected while normalizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Spans inspected
    pub spans_seen: usize,
    /// Spans removed by the comma rule
    pub spans_dropped: usize,
    /// Graphemes whose text changed
    pub glyphs_rewritten: usize,
}

impl AddAssign for WalkStats {
    fn add_assign(&mut self, other: Self) {
        self.spans_seen += other.spans_seen;
        self.spans_dropped += other.spans_dropped;
        self.glyphs_rewritten += other.glyphs_rewritten;
    }
}

/// Applies the rule table to text spans.
#[derive(Debug, Clone, Copy)]
pub struct SpanNormalizer {
    rules: NormalizationRuleTable,
    comma_policy: CommaPolicy,
}

impl SpanNormalizer {
    /// Create a normalizer from options.
    pub fn new(options: &NormalizeOptions) -> Self {
        Self {
            rules: NormalizationRuleTable::new(options.fold_width),
            comma_policy: options.comma_policy,
        }
    }

    /// The rule table in use.
    pub fn rules(&self) -> &NormalizationRuleTable {
        &self.rules
    }

    /// Normalize one span, returning `None` when the span is dropped.
    pub fn normalize_span(&self, mut span: TextSpan) -> Option<TextSpan> {
        self.rewrite_span(&mut span).map(|_| span)
    }

    /// Normalize a span sequence, preserving the order of surviving spans.
    pub fn normalize_spans(&self, spans: Vec<TextSpan>) -> Vec<TextSpan> {
        spans
            .into_iter()
            .filter_map(|span| self.normalize_span(span))
            .collect()
    }

    /// Normalize a span sequence in place and report what changed.
    pub fn normalize_in_place(&self, spans: &mut Vec<TextSpan>) -> WalkStats {
        let mut stats = WalkStats {
            spans_seen: spans.len(),
            ..WalkStats::default()
        };
        spans.retain_mut(|span| match self.rewrite_span(span) {
            Some(rewritten) => {
                stats.glyphs_rewritten += rewritten;
                true
            }
            None => {
                stats.spans_dropped += 1;
                false
            }
        });
        stats
    }

    /// Rewrite every grapheme of `span` and count the changed ones.
    ///
    /// Returns `None` when the comma policy drops the span.
    fn rewrite_span(&self, span: &mut TextSpan) -> Option<usize> {
        if self.comma_policy == CommaPolicy::DropSpan
            && span.chars.iter().any(|c| self.rules.is_comma(&c.s))
        {
            return None;
        }

        let mut rewritten = 0;
        for ch in &mut span.chars {
            if self.rules.is_comma(&ch.s) {
                ch.s.clear();
                rewritten += 1;
                continue;
            }
            let replacement = match self.rules.rewrite(&ch.s) {
                Cow::Borrowed(glyph) if glyph == ch.s => None,
                changed => Some(changed.into_owned()),
            };
            if let Some(s) = replacement {
                ch.s = s;
                rewritten += 1;
            }
        }
        Some(rewritten)
    }
}

impl Default for SpanNormalizer {
    fn default() -> Self {
        Self::new(&NormalizeOptions::default())
    }
}
