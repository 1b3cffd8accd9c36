//! Text normalization for span/page comparison.
//!
//! Detector-supplied spans and extracted page text rarely agree byte for
//! byte: PDF generators emit ligatures, fullwidth forms, and irregular
//! whitespace. [`normalize`] canonicalizes both sides before matching.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Unicode normalization form applied before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnicodeNorm {
    /// No normalization.
    None,
    /// Canonical Decomposition, followed by Canonical Composition (NFC).
    Nfc,
    /// Compatibility Decomposition, followed by Canonical Composition (NFKC).
    /// The pipeline default: folds ligatures and fullwidth forms produced
    /// by content streams into the plain forms detectors emit.
    #[default]
    Nfkc,
}

impl UnicodeNorm {
    /// Apply this normalization form to the given string.
    pub fn apply(&self, text: &str) -> String {
        match self {
            UnicodeNorm::None => text.to_string(),
            UnicodeNorm::Nfc => text.nfc().collect(),
            UnicodeNorm::Nfkc => text.nfkc().collect(),
        }
    }
}

/// Options controlling [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizeOptions {
    /// When `false`, text is lowercased (default: `false`).
    pub case_sensitive: bool,
    /// Collapse whitespace runs to a single space and trim ends (default: `true`).
    pub collapse_whitespace: bool,
    /// Unicode normalization form (default: NFKC).
    pub unicode: UnicodeNorm,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            collapse_whitespace: true,
            unicode: UnicodeNorm::default(),
        }
    }
}

/// Canonicalize text for comparison. Pure and deterministic.
///
/// Applies, in order: Unicode normalization, whitespace collapsing with
/// end trimming (when enabled), and case folding (when case-insensitive).
/// Empty or whitespace-only input normalizes to the empty string.
pub fn normalize(text: &str, options: &NormalizeOptions) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = options.unicode.apply(text);
    if options.collapse_whitespace {
        out = WHITESPACE_RUN.replace_all(&out, " ").trim().to_string();
    }
    if !options.case_sensitive {
        out = out.to_lowercase();
    }
    out
}
