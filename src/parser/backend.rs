//! Document-source abstraction layer.
//!
//! Provides a trait-based interface to whatever turns document bytes into
//! page content trees, isolating the concrete PDF library (lopdf) from the
//! extraction pipeline. Implementations must tolerate concurrent calls to
//! [`ContentSource::page`]: pages of one document are requested in parallel.

use crate::error::{Error, Result};
use crate::model::{BoundingBox, Content, Page};

/// One page as delivered by a source, before normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPage {
    /// Content tree of the page
    pub content: Content,
    /// Media box of the page
    pub media_box: BoundingBox,
}

impl RawPage {
    /// Create a raw page.
    pub fn new(content: Content, media_box: BoundingBox) -> Self {
        Self { content, media_box }
    }
}

impl From<RawPage> for Page {
    fn from(raw: RawPage) -> Self {
        Page::new(raw.content, raw.media_box)
    }
}

/// A read-only, concurrently readable handle on one paginated document.
pub trait ContentSource: Sync {
    /// Human-readable name, used for logs and artifact file names.
    fn name(&self) -> &str;

    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Content tree and media box of page `page_num` (1-indexed).
    fn page(&self, page_num: usize) -> Result<RawPage>;
}

impl<T: ContentSource + ?Sized> ContentSource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page(&self, page_num: usize) -> Result<RawPage> {
        (**self).page(page_num)
    }
}

/// Font lookups needed to turn shown strings into positioned characters.
pub trait FontResolver {
    /// Base font name for a font resource key (e.g. `F1` → `Helvetica-Bold`).
    fn base_font(&self, font: &[u8]) -> String;

    /// Decode a shown byte string using the font's encoding.
    fn decode_text(&self, font: &[u8], bytes: &[u8]) -> String;

    /// Advance width of a single-byte code, in thousandths of an em.
    fn glyph_width(&self, font: &[u8], code: u8) -> Option<f64>;

    /// Whether the font uses multi-byte codes (Type0 / CID fonts).
    fn is_multibyte(&self, font: &[u8]) -> bool;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// A value from a content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PdfValue::Integer(i) => Some(*i as f64),
            PdfValue::Real(r) => Some(f64::from(*r)),
            _ => None,
        }
    }
}

/// A single operation from a content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Create an operation.
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    /// Numeric operand at `idx`.
    pub fn number(&self, idx: usize) -> Option<f64> {
        self.operands.get(idx).and_then(PdfValue::as_number)
    }

    /// All operands as numbers, or `None` if fewer than `n` are numeric.
    pub fn numbers<const N: usize>(&self) -> Option<[f64; N]> {
        let mut out = [0.0; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.number(i)?;
        }
        Some(out)
    }
}

/// In-memory source over already-built pages.
///
/// Useful for documents produced by another parser and for tests; a page
/// can be marked as failing to exercise the error paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    pages: Vec<std::result::Result<RawPage, String>>,
}

impl MemorySource {
    /// Create a source named `name` with no pages.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
        }
    }

    /// Append a page and return self.
    pub fn with_page(mut self, page: RawPage) -> Self {
        self.pages.push(Ok(page));
        self
    }

    /// Append a page whose extraction fails with `message`.
    pub fn with_failing_page(mut self, message: impl Into<String>) -> Self {
        self.pages.push(Err(message.into()));
        self
    }
}

impl ContentSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, page_num: usize) -> Result<RawPage> {
        let slot = page_num
            .checked_sub(1)
            .and_then(|idx| self.pages.get(idx))
            .ok_or(Error::PageOutOfRange(page_num, self.pages.len()))?;
        slot.clone().map_err(Error::PdfParse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x30, 0xA2, 0xFF, 0x01];
        assert_eq!(decode_text_simple(&bytes), "ア！");
    }

    #[test]
    fn test_content_op_numbers() {
        let op = ContentOp::new(
            "re",
            vec![
                PdfValue::Integer(1),
                PdfValue::Real(2.5),
                PdfValue::Integer(3),
                PdfValue::Integer(4),
            ],
        );
        assert_eq!(op.numbers::<4>(), Some([1.0, 2.5, 3.0, 4.0]));
        assert_eq!(op.numbers::<5>(), None);
    }

    #[test]
    fn test_memory_source_pages() {
        let source = MemorySource::new("mem")
            .with_page(RawPage::default())
            .with_failing_page("broken stream");
        assert_eq!(source.page_count(), 2);
        assert!(source.page(1).is_ok());
        assert!(matches!(source.page(2), Err(Error::PdfParse(m)) if m == "broken stream"));
        assert!(matches!(source.page(0), Err(Error::PageOutOfRange(0, 2))));
        assert!(matches!(source.page(3), Err(Error::PageOutOfRange(3, 2))));
    }
}
