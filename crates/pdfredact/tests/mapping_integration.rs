//! Span-to-region mapping on real (synthetic) documents.

mod common;

use common::{build_pdf, lines, single_line};
use pdfredact::{Document, PiiSpan, ResolveOptions};

#[test]
fn ssn_maps_to_one_region_with_plausible_confidence() {
    let bytes = build_pdf(&[single_line("SSN: 555-12-3456")], None);
    let doc = Document::from_bytes(&bytes).unwrap();

    let spans = vec![PiiSpan::new(0, "555-12-3456", 5, 16)];
    let mapped = doc.map_pii(&spans, ResolveOptions::default());

    assert_eq!(mapped.len(), 1);
    assert_eq!(mapped[0].regions.len(), 1);
    assert!((mapped[0].confidence - 0.85).abs() < 1e-9);

    let region = mapped[0].regions[0];
    assert!(region.is_valid());
    assert!(region.x0 > 72.0, "match starts after the SSN: prefix");
    assert!(region.bottom <= 792.0);
}

#[test]
fn absent_text_maps_to_nothing_with_zero_confidence() {
    let bytes = build_pdf(&[single_line("nothing sensitive here")], None);
    let doc = Document::from_bytes(&bytes).unwrap();

    let mapped = doc.map_pii(
        &[PiiSpan::new(0, "Jane Doe", 0, 8)],
        ResolveOptions::default(),
    );
    assert_eq!(mapped.len(), 1);
    assert!(mapped[0].regions.is_empty());
    assert_eq!(mapped[0].confidence, 0.0);
}

#[test]
fn span_on_missing_page_maps_to_nothing() {
    let bytes = build_pdf(&[single_line("page one")], None);
    let doc = Document::from_bytes(&bytes).unwrap();

    let mapped = doc.map_pii(
        &[PiiSpan::new(7, "page one", 0, 8)],
        ResolveOptions::default(),
    );
    assert_eq!(mapped.len(), 1);
    assert!(mapped[0].regions.is_empty());
    assert_eq!(mapped[0].confidence, 0.0);
}

#[test]
fn repeated_literal_maps_to_multiple_regions() {
    let bytes = build_pdf(&[lines(&["Call 555-0000 today", "or 555-0000 tonight"])], None);
    let doc = Document::from_bytes(&bytes).unwrap();

    let mapped = doc.map_pii(
        &[PiiSpan::new(0, "555-0000", 5, 13)],
        ResolveOptions::default(),
    );
    assert_eq!(mapped[0].regions.len(), 2);
    assert!((mapped[0].confidence - 0.95).abs() < 1e-9);
}

#[test]
fn name_wrapped_across_lines_maps_per_line() {
    // "John" ends one line and "Smith" starts the next; only the
    // normalized-text tier can anchor the two-word match.
    let bytes = build_pdf(&[lines(&["contact John", "Smith for details"])], None);
    let doc = Document::from_bytes(&bytes).unwrap();

    let mapped = doc.map_pii(
        &[PiiSpan::new(0, "John Smith", 8, 18)],
        ResolveOptions::default(),
    );
    assert_eq!(mapped[0].regions.len(), 2, "one region per wrapped line");
    assert!(mapped[0].confidence >= 0.9);

    let first = mapped[0].regions[0];
    let second = mapped[0].regions[1];
    assert!(first.bottom <= second.top + 1.0, "regions on distinct lines");
}

#[test]
fn matching_is_case_insensitive_by_default() {
    let bytes = build_pdf(&[single_line("Patient: JANE DOE")], None);
    let doc = Document::from_bytes(&bytes).unwrap();

    let mapped = doc.map_pii(
        &[PiiSpan::new(0, "jane doe", 9, 17)],
        ResolveOptions::default(),
    );
    assert_eq!(mapped[0].regions.len(), 1);

    let strict = doc.map_pii(
        &[PiiSpan::new(0, "jane doe", 9, 17)],
        ResolveOptions {
            case_sensitive: true,
            ..ResolveOptions::default()
        },
    );
    assert!(strict[0].regions.is_empty());
}

#[test]
fn one_result_per_span_in_input_order() {
    let bytes = build_pdf(
        &[single_line("alpha beta"), single_line("gamma delta")],
        None,
    );
    let doc = Document::from_bytes(&bytes).unwrap();

    let spans = vec![
        PiiSpan::new(1, "gamma", 0, 5),
        PiiSpan::new(0, "missing", 0, 7),
        PiiSpan::new(0, "alpha", 0, 5),
    ];
    let mapped = doc.map_pii(&spans, ResolveOptions::default());
    assert_eq!(mapped.len(), 3);
    assert_eq!(mapped[0].span.text, "gamma");
    assert_eq!(mapped[0].regions.len(), 1);
    assert!(mapped[1].regions.is_empty());
    assert_eq!(mapped[2].span.text, "alpha");
    assert_eq!(mapped[2].regions.len(), 1);
}

#[test]
fn document_reports_pages_and_metadata() {
    use lopdf::{Object, dictionary};
    let info = dictionary! {
        "Title" => Object::string_literal("Lab Results"),
        "Author" => Object::string_literal("Dr. A. Person"),
    };
    let bytes = build_pdf(&[single_line("a"), single_line("b")], Some(info));
    let doc = Document::from_bytes(&bytes).unwrap();

    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.page(1).unwrap().raw_text, "b");
    assert!(doc.page(2).is_err());

    let meta = doc.metadata().unwrap();
    assert_eq!(meta.title.as_deref(), Some("Lab Results"));
    assert_eq!(meta.author.as_deref(), Some("Dr. A. Person"));
}
