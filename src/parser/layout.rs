//! Content-stream interpretation.
//!
//! Walks the operations of one page and collects positioned characters,
//! ruling segments and filled/stroked rectangles. Text showing operators
//! (`Tj`, `TJ`, `'`, `"`) each produce one [`TextSpan`]; every grapheme of
//! the shown string becomes one [`Character`] placed with the text matrix.

use unicode_normalization::char::is_combining_mark;

use crate::model::{BoundingBox, Character, LineSegment, Point, TextSpan};

use super::backend::{ContentOp, FontResolver, PdfValue};

/// Rectangles thinner than this (in points) are ruling lines, not boxes.
pub const MIN_BOX_SIZE: f64 = 2.0;

/// 2D affine transform in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Create a matrix from its six components.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn horizontal_scale(&self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f64 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Everything the interpreter found on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// Text spans in content-stream order
    pub spans: Vec<TextSpan>,
    /// Painted rectangles large enough to be boxes
    pub boxes: Vec<BoundingBox>,
    /// Painted straight segments, including thin rectangles
    pub segments: Vec<LineSegment>,
}

#[derive(Debug, Clone)]
struct TextState {
    matrix: Matrix,
    line_matrix: Matrix,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    leading: f64,
    horizontal_scaling: f64,
    rise: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            leading: 0.0,
            horizontal_scaling: 1.0,
            rise: 0.0,
        }
    }
}

#[derive(Debug, Default)]
struct PathState {
    current: Option<Point>,
    start: Option<Point>,
    segments: Vec<LineSegment>,
    rects: Vec<BoundingBox>,
}

impl PathState {
    fn clear(&mut self) {
        self.current = None;
        self.start = None;
        self.segments.clear();
        self.rects.clear();
    }
}

/// Content-stream interpreter for one page.
pub struct LayoutInterpreter<'a, F: FontResolver + ?Sized> {
    fonts: &'a F,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text: TextState,
    path: PathState,
    layout: PageLayout,
}

impl<'a, F: FontResolver + ?Sized> LayoutInterpreter<'a, F> {
    /// Create an interpreter resolving fonts through `fonts`.
    pub fn new(fonts: &'a F) -> Self {
        Self {
            fonts,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text: TextState::default(),
            path: PathState::default(),
            layout: PageLayout::default(),
        }
    }

    /// Run all operations and return the collected layout.
    pub fn run(mut self, ops: &[ContentOp]) -> PageLayout {
        for op in ops {
            self.step(op);
        }
        self.layout
    }

    fn step(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            // Graphics state
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = op.numbers::<6>() {
                    self.ctm = Matrix::new(a, b, c, d, e, f).then(&self.ctm);
                }
            }

            // Text objects and state
            "BT" => {
                self.text.matrix = Matrix::IDENTITY;
                self.text.line_matrix = Matrix::IDENTITY;
            }
            "ET" => {}
            "Tf" => {
                if let Some(PdfValue::Name(key)) = op.operands.first() {
                    self.text.font_name = self.fonts.base_font(key);
                    self.text.font_key = key.clone();
                }
                if let Some(size) = op.number(1) {
                    self.text.font_size = size;
                }
            }
            "Tc" => self.text.char_spacing = op.number(0).unwrap_or(0.0),
            "Tw" => self.text.word_spacing = op.number(0).unwrap_or(0.0),
            "TL" => self.text.leading = op.number(0).unwrap_or(0.0),
            "Tz" => self.text.horizontal_scaling = op.number(0).unwrap_or(100.0) / 100.0,
            "Ts" => self.text.rise = op.number(0).unwrap_or(0.0),

            // Text positioning
            "Td" => {
                if let Some([tx, ty]) = op.numbers::<2>() {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = op.numbers::<2>() {
                    self.text.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some([a, b, c, d, e, f]) = op.numbers::<6>() {
                    let m = Matrix::new(a, b, c, d, e, f);
                    self.text.matrix = m;
                    self.text.line_matrix = m;
                }
            }
            "T*" => self.next_line(),

            // Text showing
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let mut chars = Vec::new();
                    self.show(bytes, &mut chars);
                    self.push_span(chars);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let mut chars = Vec::new();
                    for item in items {
                        match item {
                            PdfValue::Str(bytes) => self.show(bytes, &mut chars),
                            other => {
                                if let Some(adjust) = other.as_number() {
                                    let tx = -adjust / 1000.0
                                        * self.text.font_size
                                        * self.text.horizontal_scaling;
                                    self.advance(tx);
                                }
                            }
                        }
                    }
                    self.push_span(chars);
                }
            }
            "'" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let mut chars = Vec::new();
                    self.show(bytes, &mut chars);
                    self.push_span(chars);
                }
            }
            "\"" => {
                if let Some([aw, ac]) = op.numbers::<2>() {
                    self.text.word_spacing = aw;
                    self.text.char_spacing = ac;
                }
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    let mut chars = Vec::new();
                    self.show(bytes, &mut chars);
                    self.push_span(chars);
                }
            }

            // Path construction
            "m" => {
                if let Some([x, y]) = op.numbers::<2>() {
                    let p = self.ctm.apply(x, y);
                    self.path.current = Some(p);
                    self.path.start = Some(p);
                }
            }
            "l" => {
                if let Some([x, y]) = op.numbers::<2>() {
                    let p = self.ctm.apply(x, y);
                    if let Some(from) = self.path.current {
                        self.path.segments.push(LineSegment::new(from, p));
                    }
                    self.path.current = Some(p);
                }
            }
            "c" | "v" | "y" => {
                let n = op.operands.len();
                if n >= 2 {
                    if let (Some(x), Some(y)) = (op.number(n - 2), op.number(n - 1)) {
                        self.path.current = Some(self.ctm.apply(x, y));
                    }
                }
            }
            "h" => {
                if let (Some(from), Some(to)) = (self.path.current, self.path.start) {
                    if from != to {
                        self.path.segments.push(LineSegment::new(from, to));
                    }
                    self.path.current = Some(to);
                }
            }
            "re" => {
                if let Some([x, y, w, h]) = op.numbers::<4>() {
                    let p0 = self.ctm.apply(x, y);
                    let p1 = self.ctm.apply(x + w, y + h);
                    self.path.rects.push(BoundingBox::from_corners(p0, p1));
                    self.path.current = Some(p0);
                    self.path.start = Some(p0);
                }
            }

            // Path painting
            "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                if matches!(op.operator.as_str(), "s" | "b" | "b*") {
                    self.step(&ContentOp::new("h", Vec::new()));
                }
                self.commit_path();
            }
            "n" => self.path.clear(),

            _ => {}
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        let m = Matrix::translation(tx, ty).then(&self.text.line_matrix);
        self.text.line_matrix = m;
        self.text.matrix = m;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.text.leading);
    }

    fn advance(&mut self, tx: f64) {
        self.text.matrix = Matrix::translation(tx, 0.0).then(&self.text.matrix);
    }

    /// Decode `bytes` with the current font and append positioned characters.
    fn show(&mut self, bytes: &[u8], chars: &mut Vec<Character>) {
        let font = self.text.font_key.clone();
        let decoded: Vec<char> = self.fonts.decode_text(&font, bytes).chars().collect();
        // Widths can only be looked up when each byte is one character.
        let codes = (!self.fonts.is_multibyte(&font) && bytes.len() == decoded.len()).then_some(bytes);

        for (i, &ch) in decoded.iter().enumerate() {
            if is_combining_mark(ch) {
                if let Some(last) = chars.last_mut() {
                    last.s.push(ch);
                    continue;
                }
            }

            let em = codes
                .and_then(|c| self.fonts.glyph_width(&font, c[i]))
                .map(|w| w / 1000.0)
                .unwrap_or_else(|| default_advance(ch));
            let mut tx = em * self.text.font_size + self.text.char_spacing;
            if ch == ' ' {
                tx += self.text.word_spacing;
            }
            tx *= self.text.horizontal_scaling;

            let trm = self.text.matrix.then(&self.ctm);
            let origin = trm.apply(0.0, self.text.rise);
            chars.push(Character {
                font: self.text.font_name.clone(),
                font_size: self.text.font_size * trm.vertical_scale(),
                x: origin.x,
                y: origin.y,
                w: tx * trm.horizontal_scale(),
                s: ch.to_string(),
            });
            self.advance(tx);
        }
    }

    fn push_span(&mut self, chars: Vec<Character>) {
        if !chars.is_empty() {
            self.layout.spans.push(TextSpan::new(chars));
        }
    }

    fn commit_path(&mut self) {
        self.layout.segments.append(&mut self.path.segments);
        for rect in self.path.rects.drain(..) {
            let (w, h) = (rect.width(), rect.height());
            if w > MIN_BOX_SIZE && h > MIN_BOX_SIZE {
                self.layout.boxes.push(rect);
            } else if w > MIN_BOX_SIZE {
                let y = (rect.min.y + rect.max.y) / 2.0;
                self.layout.segments.push(LineSegment::new(
                    Point::new(rect.min.x, y),
                    Point::new(rect.max.x, y),
                ));
            } else if h > MIN_BOX_SIZE {
                let x = (rect.min.x + rect.max.x) / 2.0;
                self.layout.segments.push(LineSegment::new(
                    Point::new(x, rect.min.y),
                    Point::new(x, rect.max.y),
                ));
            }
        }
        self.path.current = None;
        self.path.start = None;
    }
}

/// Fallback advance in ems when the font gives no width.
fn default_advance(c: char) -> f64 {
    match c {
        ' ' => 0.25,
        _ if is_wide_char(c) => 1.0,
        _ => 0.5,
    }
}

/// East Asian wide and full-width characters.
fn is_wide_char(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F        // Hangul Jamo
        | 0x2E80..=0x303E      // CJK radicals, symbols and punctuation
        | 0x3041..=0x33FF      // Kana, CJK compatibility
        | 0x3400..=0x4DBF      // CJK Extension A
        | 0x4E00..=0x9FFF      // CJK Unified Ideographs
        | 0xA000..=0xA4CF      // Yi
        | 0xAC00..=0xD7A3      // Hangul syllables
        | 0xF900..=0xFAFF      // CJK compatibility ideographs
        | 0xFE30..=0xFE4F      // CJK compatibility forms
        | 0xFF01..=0xFF60      // Full-width forms
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x3FFFD)
}
