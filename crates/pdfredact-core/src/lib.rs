//! pdfredact-core: Backend-independent data types and algorithms.
//!
//! This crate provides the foundational types (Region, Glyph,
//! PageContent, PiiSpan, RedactionPlan) and the pure algorithms of the
//! redaction pipeline: text normalization, literal glyph search, the
//! tiered region resolver, confidence scoring, and redaction planning.
//! It knows nothing about any concrete PDF engine.

pub mod confidence;
pub mod content;
pub mod geometry;
pub mod metadata;
pub mod normalize;
pub mod pii;
pub mod plan;
pub mod resolve;
pub mod search;

pub use content::{Glyph, LayoutBlock, LayoutLine, PageContent, PageLayout, TextSpan};
pub use geometry::Region;
pub use metadata::DocumentMetadata;
pub use normalize::{NormalizeOptions, UnicodeNorm, normalize};
pub use pii::{FillColor, MappedPii, PiiSpan, PlannedRedaction, RedactionPlan, RedactionResult};
pub use plan::{DEFAULT_MIN_CONFIDENCE, build_plan};
pub use resolve::{RegionResolver, ResolveOptions};
pub use search::{NormalizedText, regions_by_line, search_glyphs};
