//! Width folding.
//!
//! Maps full-width ASCII variants (U+FF01..U+FF5E), the full-width white
//! parentheses (U+FF5F, U+FF60), the ideographic space
//! and the full-width currency/sign block (U+FFE0..U+FFE6) to their narrow
//! forms. Katakana in either width, kanji, hangul and the half-width forms
//! block are left alone.

use std::borrow::Cow;

/// Offset between a full-width ASCII variant and its ASCII character.
const FULLWIDTH_ASCII_OFFSET: u32 = 0xFEE0;

/// Fold one code point.
pub fn fold_char(c: char) -> char {
    match c {
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - FULLWIDTH_ASCII_OFFSET).unwrap_or(c),
        '\u{FF5F}' => '\u{2985}', // ⦅
        '\u{FF60}' => '\u{2986}', // ⦆
        '\u{3000}' => ' ',
        '\u{FFE0}' => '\u{00A2}', // ¢
        '\u{FFE1}' => '\u{00A3}', // £
        '\u{FFE2}' => '\u{00AC}', // ¬
        '\u{FFE3}' => '\u{00AF}', // ¯
        '\u{FFE4}' => '\u{00A6}', // ¦
        '\u{FFE5}' => '\u{00A5}', // ¥
        '\u{FFE6}' => '\u{20A9}', // ₩
        _ => c,
    }
}

/// Whether `fold_char` would change this code point.
pub fn is_foldable(c: char) -> bool {
    fold_char(c) != c
}

/// Fold every code point of a grapheme, borrowing when nothing changes.
pub fn fold_str(s: &str) -> Cow<'_, str> {
    if s.chars().any(is_foldable) {
        Cow::Owned(s.chars().map(fold_char).collect())
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullwidth_latin_and_digits() {
        assert_eq!(fold_str("Ａｂｃ１２３"), "Abc123");
        assert_eq!(fold_str("！～"), "!~");
        assert_eq!(fold_str("｟｠"), "\u{2985}\u{2986}");
    }

    #[test]
    fn test_ideographic_space_and_signs() {
        assert_eq!(fold_str("\u{3000}"), " ");
        assert_eq!(fold_str("￥￦"), "¥₩");
    }

    #[test]
    fn test_katakana_untouched() {
        for s in ["ｱ", "ア", "ｶﾞ", "漢", "한", "･"] {
            assert!(matches!(fold_str(s), Cow::Borrowed(_)), "{s} changed");
        }
    }

    #[test]
    fn test_idempotent_over_ranges() {
        let ranges = [0x20u32..0x7F, 0x3000..0x3100, 0xFF00..0xFFF0];
        for range in ranges {
            for cp in range {
                if let Some(c) = char::from_u32(cp) {
                    assert_eq!(fold_char(fold_char(c)), fold_char(c), "U+{cp:04X}");
                }
            }
        }
    }
}
