//! Payload loading and decoding.
//!
//! A payload is a JSON array of documents, each an array of pages. It is
//! given either literally or as a path (see [`detect_payload`]). Documents
//! are decoded one by one, so a malformed document fails alone.

use std::borrow::Cow;
use std::fs;
use std::io::Read;

use serde_json::Value;

use crate::detect::{detect_payload, PayloadInput};
use crate::error::{Error, Result};
use crate::model::Document;

/// Resolve a raw argument to payload bytes, reading the file it names if
/// it is not a literal payload.
pub fn load_payload(raw: &[u8]) -> Result<Cow<'_, [u8]>> {
    match detect_payload(raw)? {
        PayloadInput::Literal(bytes) => Ok(Cow::Borrowed(bytes)),
        PayloadInput::Path(path) => {
            log::debug!("Reading payload from {}", path.display());
            Ok(Cow::Owned(fs::read(&path)?))
        }
    }
}

/// Read everything from `reader` and resolve it like a raw argument.
pub fn load_payload_from_reader<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    Ok(load_payload(&raw)?.into_owned())
}

/// Decode payload bytes into per-document results.
///
/// The top level must be a JSON array; anything else is a fatal
/// [`Error::Json`]. Each element that does not match the page schema
/// becomes an [`Error::Schema`] at its index.
pub fn decode_documents(bytes: &[u8]) -> Result<Vec<Result<Document>>> {
    let values: Vec<Value> = serde_json::from_slice(bytes)?;
    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<Document>(value).map_err(|e| Error::Schema {
                index,
                message: e.to_string(),
            })
        })
        .collect())
}

/// Load and decode in one step.
pub fn read_documents(raw: &[u8]) -> Result<Vec<Result<Document>>> {
    decode_documents(&load_payload(raw)?)
}
