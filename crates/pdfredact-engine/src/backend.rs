//! PDF engine capability trait.
//!
//! Defines [`PdfEngine`], the boundary between the redaction pipeline
//! and a concrete PDF implementation. Everything the pipeline needs —
//! open, page content, destructive region removal, metadata, save — is
//! expressed here so any engine binding can slot in underneath.

use std::io::Write;

use pdfredact_core::{DocumentMetadata, FillColor, PageContent, Region};

/// Options controlling how a document is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Remove unused/orphaned objects and renumber, so content removed
    /// from pages cannot survive as dead objects.
    pub compact: bool,
    /// Recompress content streams.
    pub compress: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            compact: true,
            compress: true,
        }
    }
}

/// Trait abstracting the PDF engine collaborator.
///
/// Methods are associated functions over an engine-specific `Document`
/// type, mirroring the single-writer discipline of the pipeline: marking
/// and committing removals take the document mutably, so the borrow
/// checker enforces one active writer.
///
/// # Usage
///
/// ```ignore
/// let mut doc = MyEngine::open(bytes)?;
/// let page = MyEngine::page_content(&doc, 0)?;
/// MyEngine::mark_region(&mut doc, 0, region, FillColor::BLACK)?;
/// MyEngine::commit_removals(&mut doc, 0)?;
/// MyEngine::save_to(&mut doc, &mut out, &SaveOptions::default())?;
/// ```
pub trait PdfEngine {
    /// The parsed PDF document type.
    type Document;

    /// Engine-specific error type.
    type Error: std::error::Error;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not represent a valid PDF.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Extract the full content of a page by 0-based index: raw text,
    /// reading-ordered glyphs, and hierarchical layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or interpretation
    /// fails.
    fn page_content(doc: &Self::Document, index: usize) -> Result<PageContent, Self::Error>;

    /// Mark a region of a page for destructive content removal, filled
    /// with the given color. Marks accumulate until
    /// [`commit_removals`](PdfEngine::commit_removals) is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the page index is out of range.
    fn mark_region(
        doc: &mut Self::Document,
        page_index: usize,
        region: Region,
        fill: FillColor,
    ) -> Result<(), Self::Error>;

    /// Commit all pending marks on a page as one atomic rewrite. Glyphs
    /// and underlying content intersecting any marked region must be
    /// destroyed, not overlaid. Returns the number of regions committed.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be rewritten. On error the
    /// page content is left unchanged.
    fn commit_removals(doc: &mut Self::Document, page_index: usize) -> Result<usize, Self::Error>;

    /// Read document metadata from the /Info dictionary.
    fn metadata(doc: &Self::Document) -> Result<DocumentMetadata, Self::Error>;

    /// Replace the /Info dictionary with exactly the given standard
    /// fields. Custom keys from the previous dictionary do not survive.
    fn set_metadata(
        doc: &mut Self::Document,
        metadata: &DocumentMetadata,
    ) -> Result<(), Self::Error>;

    /// Best-effort removal of the auxiliary XMP metadata stream.
    /// Returns `true` if a stream was removed; failure is tolerated.
    fn drop_xmp_metadata(doc: &mut Self::Document) -> bool;

    /// Serialize the document to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    fn save_to<W: Write>(
        doc: &mut Self::Document,
        writer: &mut W,
        options: &SaveOptions,
    ) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_options_default_is_compact_and_compressed() {
        let opts = SaveOptions::default();
        assert!(opts.compact);
        assert!(opts.compress);
    }
}
