//! Input detection.
//!
//! Two questions come up before any work starts: is a raw command-line
//! argument a literal JSON payload or the path of a payload file, and does
//! a file look like a PDF at all.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Where a JSON payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadInput<'a> {
    /// The argument is the payload itself
    Literal(&'a [u8]),
    /// The argument names a file holding the payload
    Path(PathBuf),
}

/// Classify a raw argument as a literal payload or a file path.
///
/// The argument is literal when its first non-whitespace byte opens a JSON
/// array or object. Anything else is taken as a path, trimmed.
///
/// # Example
/// ```
/// use pdfclean::detect::{detect_payload, PayloadInput};
///
/// assert!(matches!(detect_payload(b"  [[]]").unwrap(), PayloadInput::Literal(_)));
/// assert!(matches!(detect_payload(b"out.json").unwrap(), PayloadInput::Path(_)));
/// ```
pub fn detect_payload(raw: &[u8]) -> Result<PayloadInput<'_>> {
    let start = raw
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .ok_or(Error::EmptyInput)?;

    match raw[start] {
        b'[' | b'{' => Ok(PayloadInput::Literal(&raw[start..])),
        _ => {
            let text = std::str::from_utf8(raw)
                .map_err(|_| Error::InvalidArgument("payload path is not valid UTF-8".to_string()))?;
            Ok(PayloadInput::Path(PathBuf::from(text.trim())))
        }
    }
}

/// PDF version read from the file header.
pub fn detect_pdf_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();
    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

/// PDF version of the file at `path`.
pub fn detect_pdf_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut header)?;
    detect_pdf_version(&header)
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_pdf_version(data).is_ok()
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}
