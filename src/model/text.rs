//! Text spans and the characters they are made of.

use serde::{Deserialize, Serialize};

use super::{null_as_empty, Point};

/// One rendered glyph and the metadata the parser attached to it.
///
/// `s` is a grapheme: usually one code point, but a base character with
/// combining marks stays together. Everything except `s` is passed through
/// normalization untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Character {
    /// Base font name
    #[serde(default)]
    pub font: String,

    /// Effective font size in points
    #[serde(default)]
    pub font_size: f64,

    /// Origin X
    #[serde(default)]
    pub x: f64,

    /// Origin Y (baseline)
    #[serde(default)]
    pub y: f64,

    /// Advance width
    #[serde(default)]
    pub w: f64,

    /// The grapheme
    pub s: String,
}

impl Character {
    /// Create a character with no geometry.
    pub fn new(s: impl Into<String>) -> Self {
        Self {
            s: s.into(),
            ..Self::default()
        }
    }

    /// Create a character placed at `origin`.
    pub fn at(s: impl Into<String>, origin: Point) -> Self {
        Self {
            s: s.into(),
            x: origin.x,
            y: origin.y,
            ..Self::default()
        }
    }

    /// Set font information and return self.
    pub fn with_font(mut self, font: impl Into<String>, size: f64) -> Self {
        self.font = font.into();
        self.font_size = size;
        self
    }

    /// Set the advance width and return self.
    pub fn with_width(mut self, w: f64) -> Self {
        self.w = w;
        self
    }

    /// Glyph origin.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A contiguous run of characters from one extraction context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextSpan {
    /// Characters in reading order
    #[serde(rename = "Char", default, deserialize_with = "null_as_empty")]
    pub chars: Vec<Character>,
}

impl TextSpan {
    /// Create a span from characters.
    pub fn new(chars: Vec<Character>) -> Self {
        Self { chars }
    }

    /// Create a span of geometry-less characters, one per grapheme.
    pub fn from_graphemes<S: AsRef<str>>(graphemes: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            graphemes
                .into_iter()
                .map(|g| Character::new(g.as_ref()))
                .collect(),
        )
    }

    /// Graphemes in order.
    pub fn graphemes(&self) -> Vec<&str> {
        self.chars.iter().map(|c| c.s.as_str()).collect()
    }

    /// Concatenated text of the span.
    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.s.as_str()).collect()
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the span has no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Origin of the first character, if any.
    pub fn origin(&self) -> Option<Point> {
        self.chars.first().map(Character::origin)
    }
}
