//! pdfredact-engine: PDF parsing, text placement, and destructive
//! content rewriting.
//!
//! This crate binds the redaction pipeline to a concrete PDF
//! implementation. The [`PdfEngine`] trait is the seam; [`LopdfEngine`]
//! is the lopdf-backed implementation that opens documents, extracts
//! positioned page text, destroys glyphs under marked regions, scrubs
//! metadata, and serializes the result. It depends on pdfredact-core
//! for the shared content and geometry types.

pub mod backend;
pub mod error;
pub mod fonts;
pub mod page_geometry;
pub mod text_state;

mod extract;
mod lopdf_engine;
mod objects;
mod redact;

pub use backend::{PdfEngine, SaveOptions};
pub use error::EngineError;
pub use lopdf_engine::{LopdfDocument, LopdfEngine};
pub use pdfredact_core;
