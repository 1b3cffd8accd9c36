//! Read-only document inspection.

use std::path::Path;

use pdfredact_core::confidence;
use pdfredact_core::{
    DocumentMetadata, MappedPii, PageContent, PiiSpan, RegionResolver, ResolveOptions,
};
use pdfredact_engine::{LopdfDocument, LopdfEngine, PdfEngine};

use crate::error::RedactError;

/// A parsed PDF with every page's content extracted once at open time.
///
/// Use this for inspection and dry runs: resolving PII spans to regions
/// with [`map_pii`](Document::map_pii) does not modify the document.
/// Actual redaction goes through [`Redactor`](crate::Redactor), which
/// owns its own mutable document.
pub struct Document {
    inner: LopdfDocument,
    pages: Vec<PageContent>,
}

impl Document {
    /// Open and parse a PDF file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid PDF,
    /// or a page's content stream cannot be interpreted.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RedactError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a PDF from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RedactError> {
        let inner = LopdfEngine::open(bytes)?;
        let count = LopdfEngine::page_count(&inner);
        let pages = (0..count)
            .map(|i| LopdfEngine::page_content(&inner, i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { inner, pages })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Extracted content of a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn page(&self, index: usize) -> Result<&PageContent, RedactError> {
        self.pages.get(index).ok_or_else(|| {
            pdfredact_engine::EngineError::PageOutOfRange {
                index,
                count: self.pages.len(),
            }
            .into()
        })
    }

    /// All pages in order.
    pub fn pages(&self) -> &[PageContent] {
        &self.pages
    }

    /// Document /Info metadata. Missing entries are `None`.
    pub fn metadata(&self) -> Result<DocumentMetadata, RedactError> {
        Ok(LopdfEngine::metadata(&self.inner)?)
    }

    /// Resolve each PII span to on-page regions with a confidence
    /// score. Returns exactly one [`MappedPii`] per input span, in
    /// input order; spans that resolve nowhere (or name a page this
    /// document does not have) come back with no regions and
    /// confidence 0.0.
    pub fn map_pii(&self, spans: &[PiiSpan], options: ResolveOptions) -> Vec<MappedPii> {
        let resolver = RegionResolver::new(options);
        spans
            .iter()
            .map(|span| {
                let (regions, confidence) = match self.pages.get(span.page_index) {
                    Some(page) => {
                        let regions = resolver.resolve(page, &span.text);
                        let score = confidence::score(&span.text, &regions, page);
                        (regions, score)
                    }
                    None => (Vec::new(), 0.0),
                };
                MappedPii {
                    span: span.clone(),
                    regions,
                    confidence,
                }
            })
            .collect()
    }
}
