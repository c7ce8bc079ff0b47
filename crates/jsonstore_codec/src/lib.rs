//! # jsonstore codec
//!
//! The in-memory [`Document`] and the formats it is stored in.
//!
//! A document is a string-keyed mapping of JSON-like values. On disk it is
//! exactly its encoded form: no header, no version, no metadata. The format
//! is chosen by file extension:
//!
//! | Format | Extensions        |
//! |--------|-------------------|
//! | JSON   | `.json`           |
//! | YAML   | `.yaml`, `.yml`   |
//! | CBOR   | `.cbor`           |
//!
//! ## Decoding Rules
//!
//! - Empty input (whitespace only, for text formats) is the empty document
//! - A `null` root is the empty document
//! - Any other non-mapping root is rejected
//!
//! ## Usage
//!
//! ```
//! use jsonstore_codec::{Document, DocumentCodec, Format};
//! use serde_json::json;
//! use std::path::Path;
//!
//! let format = Format::from_path(Path::new("settings.yml")).unwrap();
//! assert_eq!(format, Format::Yaml);
//!
//! let mut doc = Document::new();
//! doc.insert("foo".into(), json!("bar"));
//!
//! let bytes = format.encode(&doc).unwrap();
//! assert_eq!(format.decode(&bytes).unwrap(), doc);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod format;

pub use document::Document;
pub use error::{CodecError, CodecResult};
pub use format::{DocumentCodec, Format};

/// Re-exported so callers can build values without a direct dependency.
pub use serde_json::{json, Map, Value};
