//! pdfredact: Destructively redact PII from PDF documents.
//!
//! This is the public API facade crate for pdfredact-rs. It ties the
//! pure resolution pipeline (pdfredact-core) to the lopdf-backed PDF
//! engine (pdfredact-engine).
//!
//! # Architecture
//!
//! - **pdfredact-core**: Backend-independent data types, text
//!   normalization, the tiered region resolver, confidence scoring,
//!   and redaction planning
//! - **pdfredact-engine**: PDF parsing, positioned text extraction,
//!   glyph-level content stream rewriting, metadata scrubbing
//! - **pdfredact** (this crate): [`Document`] for inspection and
//!   dry-run span mapping, [`Redactor`] for end-to-end jobs, and
//!   [`verify`] for checking their output
//!
//! # Example
//!
//! ```no_run
//! use pdfredact::{PiiSpan, Redactor, verify};
//!
//! # fn main() -> Result<(), pdfredact::RedactError> {
//! let spans = vec![PiiSpan::new(0, "555-12-3456", 5, 16)];
//! let result = Redactor::new().redact("input.pdf", &spans, "clean.pdf")?;
//! assert!(verify("clean.pdf", "555-12-3456")?);
//! println!("removed {} regions", result.redaction_count);
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod redactor;

pub use document::Document;
pub use error::RedactError;
pub use redactor::{RedactOptions, Redactor, verify, verify_normalized};

pub use pdfredact_core;
pub use pdfredact_core::{
    FillColor, MappedPii, PiiSpan, RedactionResult, Region, ResolveOptions, UnicodeNorm,
};
pub use pdfredact_engine;
pub use pdfredact_engine::SaveOptions;
