//! The redaction job: plan, apply, scrub, save.

use std::path::Path;

use pdfredact_core::{
    DEFAULT_MIN_CONFIDENCE, FillColor, NormalizeOptions, PageContent, PiiSpan, RedactionPlan,
    RedactionResult, RegionResolver, ResolveOptions, build_plan, normalize,
};
use pdfredact_engine::{LopdfDocument, LopdfEngine, PdfEngine, SaveOptions};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::RedactError;

/// Options for a redaction job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedactOptions {
    /// Minimum confidence a resolved span needs to be acted on.
    /// Spans below the threshold are dropped without error.
    pub min_confidence: f64,
    /// Color of the opaque cover rectangles.
    pub fill: FillColor,
    /// How span text is matched against page content.
    pub resolve: ResolveOptions,
    /// How the output document is persisted.
    pub save: SaveOptions,
}

impl Default for RedactOptions {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            fill: FillColor::BLACK,
            resolve: ResolveOptions::default(),
            save: SaveOptions::default(),
        }
    }
}

/// Applies destructive redactions to PDF documents.
///
/// A job takes the input PDF, a set of detected PII spans, and an
/// output path. Text under every accepted span is removed from the
/// content streams (not overlaid), document metadata is scrubbed, and
/// the result is written atomically: the output path either holds a
/// complete redacted document or nothing.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    options: RedactOptions,
}

impl Redactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RedactOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RedactOptions {
        &self.options
    }

    /// Run a redaction job from `input` to `output`.
    ///
    /// Spans that fail to resolve, score below the confidence
    /// threshold, or reference pages the document does not have are
    /// skipped; the job still succeeds and still scrubs metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or parsed, a page
    /// rewrite fails, or the output cannot be written. No partial
    /// output file is left behind on error.
    pub fn redact(
        &self,
        input: impl AsRef<Path>,
        spans: &[PiiSpan],
        output: impl AsRef<Path>,
    ) -> Result<RedactionResult, RedactError> {
        let bytes = std::fs::read(input)?;
        let (mut doc, redaction_count, pages_redacted) = self.apply(&bytes, spans)?;

        let output = output.as_ref();
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        LopdfEngine::save_to(&mut doc, tmp.as_file_mut(), &self.options.save)?;
        tmp.persist(output).map_err(|e| RedactError::Io(e.error))?;

        info!(
            redactions = redaction_count,
            pages = pages_redacted,
            output = %output.display(),
            "redaction job complete"
        );
        Ok(RedactionResult {
            redaction_count,
            pages_redacted,
            output_path: output.to_path_buf(),
        })
    }

    /// Run a redaction job entirely in memory, returning the redacted
    /// PDF bytes.
    pub fn redact_bytes(&self, bytes: &[u8], spans: &[PiiSpan]) -> Result<Vec<u8>, RedactError> {
        let (mut doc, _, _) = self.apply(bytes, spans)?;
        let mut out = Vec::new();
        LopdfEngine::save_to(&mut doc, &mut out, &self.options.save)?;
        Ok(out)
    }

    /// Parse, plan, destroy marked content, and scrub metadata.
    fn apply(
        &self,
        bytes: &[u8],
        spans: &[PiiSpan],
    ) -> Result<(LopdfDocument, usize, usize), RedactError> {
        if !(0.0..=1.0).contains(&self.options.min_confidence) {
            return Err(RedactError::Input(
                "min_confidence must be within [0, 1]".to_string(),
            ));
        }

        let mut doc = LopdfEngine::open(bytes)?;
        let count = LopdfEngine::page_count(&doc);
        let pages: Vec<PageContent> = (0..count)
            .map(|i| LopdfEngine::page_content(&doc, i))
            .collect::<Result<_, _>>()?;

        let resolver = RegionResolver::new(self.options.resolve);
        let plan = build_plan(spans, &pages, &resolver, self.options.min_confidence);
        if plan.is_empty() && !spans.is_empty() {
            debug!(
                spans = spans.len(),
                "no spans met the confidence threshold; output is a metadata-scrubbed copy"
            );
        }

        let (redaction_count, pages_redacted) = apply_plan(&mut doc, &plan, self.options.fill)?;

        let scrubbed = LopdfEngine::metadata(&doc)?.scrubbed();
        LopdfEngine::set_metadata(&mut doc, &scrubbed)?;
        if LopdfEngine::drop_xmp_metadata(&mut doc) {
            debug!("removed XMP metadata stream");
        }

        Ok((doc, redaction_count, pages_redacted))
    }
}

/// Mark and commit every planned region, one removal pass per page.
/// Plan entries for pages the document does not have are skipped with
/// a warning rather than failing the job.
fn apply_plan(
    doc: &mut LopdfDocument,
    plan: &RedactionPlan,
    fill: FillColor,
) -> Result<(usize, usize), RedactError> {
    let count = LopdfEngine::page_count(doc);
    let mut redaction_count = 0;
    let mut pages_redacted = 0;
    for page_index in plan.pages() {
        if page_index >= count {
            warn!(
                page = page_index,
                pages = count,
                "planned redaction references a missing page; skipping"
            );
            continue;
        }
        for planned in plan.for_page(page_index) {
            for region in &planned.regions {
                LopdfEngine::mark_region(doc, page_index, *region, fill)?;
            }
        }
        let committed = LopdfEngine::commit_removals(doc, page_index)?;
        if committed > 0 {
            redaction_count += committed;
            pages_redacted += 1;
        }
    }
    Ok((redaction_count, pages_redacted))
}

/// Check that `literal` no longer occurs verbatim anywhere in the
/// document at `path`. Every page is re-extracted and scanned for the
/// exact substring, including case and whitespace.
///
/// Returns `true` when the literal is gone from every page.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn verify(path: impl AsRef<Path>, literal: &str) -> Result<bool, RedactError> {
    if literal.is_empty() {
        return Ok(true);
    }
    let doc = Document::open(path)?;
    for page in doc.pages() {
        if page.raw_text.contains(literal) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Like [`verify`], but compares under the same default normalization
/// as resolution (case-insensitive, whitespace-collapsed, NFKC), so
/// text that would still resolve also still fails verification.
pub fn verify_normalized(path: impl AsRef<Path>, literal: &str) -> Result<bool, RedactError> {
    let doc = Document::open(path)?;
    let options = NormalizeOptions::default();
    let needle = normalize(literal, &options);
    if needle.is_empty() {
        return Ok(true);
    }
    for page in doc.pages() {
        if normalize(&page.raw_text, &options).contains(&needle) {
            return Ok(false);
        }
    }
    Ok(true)
}
