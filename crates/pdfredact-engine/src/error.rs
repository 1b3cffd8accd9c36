//! Error types for the engine layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. [`EngineError`]
//! covers everything the lopdf-backed engine can fail at: parsing,
//! page addressing, content re-encoding, and I/O.

use thiserror::Error;

/// Error type for PDF engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error parsing PDF structure or syntax.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// A page index outside the document's page range.
    #[error("page {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// Error re-encoding a rewritten content stream.
    #[error("content encode error: {0}")]
    Encode(String),

    /// Error reading or writing PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for EngineError {
    fn from(err: lopdf::Error) -> Self {
        EngineError::Parse(err.to_string())
    }
}
