//! Top-level error type for redaction jobs.

use pdfredact_engine::EngineError;
use thiserror::Error;

/// Errors surfaced by the public redaction API. All variants are
/// fatal to the job that raised them; partial output is never written.
#[derive(Debug, Error)]
pub enum RedactError {
    /// The caller supplied something unusable (bad options, not a PDF).
    #[error("invalid input: {0}")]
    Input(String),

    /// The PDF engine failed to parse, rewrite, or serialize.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Reading the input or persisting the output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
