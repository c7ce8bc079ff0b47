//! Document formats and the codec seam.

use crate::document::Document;
use crate::error::{CodecError, CodecResult};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Turns bytes into a [`Document`] and back.
///
/// The store only ever talks to its codec through this trait, so a custom
/// on-disk format can be plugged in without touching transaction logic.
/// Encoding a document must not depend on where it is written; all I/O
/// failures belong to the storage layer.
pub trait DocumentCodec: fmt::Debug + Send + Sync {
    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Decodes a full backing blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a well-formed document.
    fn decode(&self, bytes: &[u8]) -> CodecResult<Document>;

    /// Encodes a full document.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer rejects the document.
    fn encode(&self, doc: &Document) -> CodecResult<Vec<u8>>;
}

/// The built-in formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// JSON (`.json`), written pretty-printed.
    Json,
    /// YAML (`.yaml`, `.yml`).
    Yaml,
    /// CBOR (`.cbor`).
    Cbor,
}

impl Format {
    /// Every built-in format.
    pub const ALL: [Format; 3] = [Format::Json, Format::Yaml, Format::Cbor];

    /// Picks the format for a path by its extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedFormat`] if the extension is missing
    /// or unknown.
    pub fn from_path(path: &Path) -> CodecResult<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&extension)
    }

    /// Picks the format for a bare extension such as `"yml"`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedFormat`] if the extension is unknown.
    pub fn from_extension(extension: &str) -> CodecResult<Self> {
        let lower = extension.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&lower.as_str()))
            .ok_or_else(|| CodecError::unsupported_format(extension))
    }

    /// Extensions recognized for this format, without the dot.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
            Format::Cbor => &["cbor"],
        }
    }

    const fn is_text(self) -> bool {
        !matches!(self, Format::Cbor)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl DocumentCodec for Format {
    fn name(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Cbor => "cbor",
        }
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Document> {
        // An empty file is an empty document in every format.
        let blank = if self.is_text() {
            bytes.iter().all(u8::is_ascii_whitespace)
        } else {
            bytes.is_empty()
        };
        if blank {
            return Ok(Document::new());
        }

        let name = self.name();
        let value: Value = match self {
            Format::Json => {
                serde_json::from_slice(bytes).map_err(|e| CodecError::decoding_failed(name, e))?
            }
            Format::Yaml => {
                serde_yaml::from_slice(bytes).map_err(|e| CodecError::decoding_failed(name, e))?
            }
            Format::Cbor => {
                ciborium::from_reader(bytes).map_err(|e| CodecError::decoding_failed(name, e))?
            }
        };
        Document::try_from(value)
    }

    fn encode(&self, doc: &Document) -> CodecResult<Vec<u8>> {
        let name = self.name();
        match self {
            Format::Json => {
                let mut bytes = serde_json::to_vec_pretty(doc)
                    .map_err(|e| CodecError::encoding_failed(name, e))?;
                bytes.push(b'\n');
                Ok(bytes)
            }
            Format::Yaml => serde_yaml::to_string(doc)
                .map(String::into_bytes)
                .map_err(|e| CodecError::encoding_failed(name, e)),
            Format::Cbor => {
                let mut bytes = Vec::new();
                ciborium::into_writer(doc, &mut bytes)
                    .map_err(|e| CodecError::encoding_failed(name, e))?;
                Ok(bytes)
            }
        }
    }
}
