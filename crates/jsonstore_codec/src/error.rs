//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode a document.
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        /// Name of the format.
        format: &'static str,
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode bytes into a document.
    #[error("{format} decoding failed: {message}")]
    DecodingFailed {
        /// Name of the format.
        format: &'static str,
        /// Description of the decoding error.
        message: String,
    },

    /// The decoded root value is not a mapping.
    #[error("document root must be a mapping, found {found}")]
    NotAMapping {
        /// Kind of value found at the root.
        found: &'static str,
    },

    /// The path's extension does not name a known format.
    #[error("unsupported document format: {extension:?}")]
    UnsupportedFormat {
        /// The extension that was seen (empty when there was none).
        extension: String,
    },
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(format: &'static str, message: impl ToString) -> Self {
        Self::EncodingFailed {
            format,
            message: message.to_string(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(format: &'static str, message: impl ToString) -> Self {
        Self::DecodingFailed {
            format,
            message: message.to_string(),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }
}
