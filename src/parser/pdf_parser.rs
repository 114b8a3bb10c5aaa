//! PDF document parser using lopdf.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{detect_pdf_version, detect_pdf_version_from_path};
use crate::error::{Error, Result};
use crate::model::{BoundingBox, Content, Point};

use super::backend::{decode_text_simple, ContentOp, ContentSource, FontResolver, PdfValue, RawPage};
use super::layout::LayoutInterpreter;
use super::table_detector::TableDetector;

/// US Letter, used when a page tree carries no MediaBox at all.
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Parent chains longer than this are treated as cyclic.
const MAX_TREE_DEPTH: usize = 32;

/// PDF document parser.
///
/// Loads the whole file once; pages are then interpreted independently and
/// may be requested from several threads at the same time.
pub struct PdfParser {
    name: String,
    doc: LopdfDocument,
    page_ids: Vec<ObjectId>,
    tables: TableDetector,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        detect_pdf_version_from_path(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Self::from_document(path.display().to_string(), doc)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        detect_pdf_version(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Self::from_document(name, doc)
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(name: impl Into<String>, mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(name, &data)
    }

    fn from_document(name: impl Into<String>, doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let page_ids = doc.get_pages().into_values().collect();
        Ok(Self {
            name: name.into(),
            doc,
            page_ids,
            tables: TableDetector::default(),
        })
    }

    /// Replace the table detector.
    pub fn with_table_detector(mut self, detector: TableDetector) -> Self {
        self.tables = detector;
        self
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.clone()
    }

    fn page_id(&self, page_num: usize) -> Result<ObjectId> {
        page_num
            .checked_sub(1)
            .and_then(|idx| self.page_ids.get(idx))
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, self.page_ids.len()))
    }

    /// Follow one level of indirection.
    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    /// MediaBox of a page, inherited through the page tree when absent.
    fn media_box(&self, page_id: ObjectId) -> Result<BoundingBox> {
        let mut dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(obj) = dict.get(b"MediaBox") {
                return self.parse_rect(obj);
            }
            match dict.get(b"Parent").and_then(Object::as_reference) {
                Ok(parent) => {
                    dict = self
                        .doc
                        .get_dictionary(parent)
                        .map_err(|e| Error::PdfParse(e.to_string()))?;
                }
                Err(_) => break,
            }
        }

        log::warn!("{}: page has no MediaBox, assuming US Letter", self.name);
        let [x0, y0, x1, y1] = DEFAULT_MEDIA_BOX;
        Ok(BoundingBox::new(Point::new(x0, y0), Point::new(x1, y1)))
    }

    fn parse_rect(&self, obj: &Object) -> Result<BoundingBox> {
        let array = self
            .resolve(obj)
            .as_array()
            .map_err(|_| Error::MissingObject("MediaBox array".to_string()))?;
        if array.len() < 4 {
            return Err(Error::PdfParse(format!(
                "MediaBox has {} entries, expected 4",
                array.len()
            )));
        }
        let mut v = [0.0f64; 4];
        for (slot, item) in v.iter_mut().zip(array) {
            *slot = self
                .resolve(item)
                .as_float()
                .map(f64::from)
                .map_err(|e| Error::PdfParse(format!("MediaBox: {e}")))?;
        }
        Ok(BoundingBox::from_corners(
            Point::new(v[0], v[1]),
            Point::new(v[2], v[3]),
        ))
    }

    /// Concatenated content streams of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(obj) => self.resolve(obj),
            // A page without content is blank, not broken
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Stream(s) => stream_bytes(s),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Stream(s) = self.resolve(obj) {
                        content.extend_from_slice(&stream_bytes(s)?);
                        content.push(b' ');
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }
}

fn stream_bytes(stream: &lopdf::Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| Error::PdfParse(e.to_string()))
    } else {
        Ok(stream.content.clone())
    }
}

impl ContentSource for PdfParser {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page(&self, page_num: usize) -> Result<RawPage> {
        let page_id = self.page_id(page_num)?;
        let media_box = self.media_box(page_id)?;

        let fonts = PageFonts {
            doc: &self.doc,
            fonts: self
                .doc
                .get_page_fonts(page_id)
                .map_err(|e| Error::PdfParse(e.to_string()))?,
        };

        let bytes = self.page_content(page_id)?;
        let ops: Vec<ContentOp> = lopdf::content::Content::decode(&bytes)
            .map_err(|e| Error::PdfParse(e.to_string()))?
            .operations
            .iter()
            .map(|op| ContentOp::new(op.operator.clone(), op.operands.iter().map(convert_object).collect()))
            .collect();

        let layout = LayoutInterpreter::new(&fonts).run(&ops);
        let (table, text) = self.tables.detect(&layout.boxes, layout.spans);

        log::debug!(
            "{} page {}: {} op(s), {} span(s), {} table(s), {} line(s)",
            self.name,
            page_num,
            ops.len(),
            text.len(),
            table.len(),
            layout.segments.len()
        );

        Ok(RawPage::new(
            Content {
                text,
                table,
                line: layout.segments,
            },
            media_box,
        ))
    }
}

/// Font resources of one page.
struct PageFonts<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
}

impl PageFonts<'_> {
    fn number(&self, obj: &Object) -> Option<f64> {
        let obj = match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok()?,
            other => other,
        };
        obj.as_float().ok().map(f64::from)
    }
}

impl FontResolver for PageFonts<'_> {
    fn base_font(&self, font: &[u8]) -> String {
        self.fonts
            .get(font)
            .and_then(|f| f.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(font).to_string())
    }

    fn decode_text(&self, font: &[u8], bytes: &[u8]) -> String {
        let encoding = self
            .fonts
            .get(font)
            .and_then(|f| f.get_font_encoding(self.doc).ok());
        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }

    fn glyph_width(&self, font: &[u8], code: u8) -> Option<f64> {
        let dict = self.fonts.get(font)?;
        let first = dict.get(b"FirstChar").ok().and_then(|o| self.number(o))? as i64;
        let widths = match dict.get(b"Widths").ok()? {
            Object::Reference(id) => self.doc.get_object(*id).ok()?,
            other => other,
        };
        let idx = usize::try_from(i64::from(code) - first).ok()?;
        widths
            .as_array()
            .ok()?
            .get(idx)
            .and_then(|w| self.number(w))
    }

    fn is_multibyte(&self, font: &[u8]) -> bool {
        self.fonts
            .get(font)
            .and_then(|f| f.get(b"Subtype").ok())
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Type0")
    }
}

fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}
