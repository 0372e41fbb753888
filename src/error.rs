//! Error types for the sectrank library.

use std::io;
use thiserror::Error;

/// Result type alias for sectrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during collection analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error extracting positioned text spans.
    #[error("Span extraction error: {0}")]
    SpanExtract(String),

    /// The collection descriptor is missing or malformed.
    #[error("Invalid collection descriptor: {0}")]
    Descriptor(String),

    /// The collection input root is missing or unreadable.
    #[error("Input root not readable: {0}")]
    InputRoot(String),

    /// The embedding backend failed to initialize or run.
    ///
    /// Fatal for a run: ranking semantics depend on the dense signal, so
    /// there is no silent lexical-only fallback.
    #[error("Embedder unavailable: {0}")]
    Embedder(String),

    /// JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_embedder_error_message() {
        let err = Error::Embedder("model.onnx missing".into());
        assert!(err.to_string().contains("model.onnx"));
    }
}
