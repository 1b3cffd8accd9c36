//! lopdf-backed implementation of [`PdfEngine`].

use std::collections::BTreeMap;
use std::io::Write;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use pdfredact_core::{DocumentMetadata, FillColor, PageContent, Region};
use tracing::debug;

use crate::backend::{PdfEngine, SaveOptions};
use crate::error::EngineError;
use crate::extract::{extract_page, page_geometry};
use crate::fonts::load_page_fonts;
use crate::objects::resolve_ref;
use crate::redact::{PendingMark, rewrite_content};

/// A parsed PDF document plus the marks queued against its pages.
pub struct LopdfDocument {
    inner: Document,
    page_ids: Vec<ObjectId>,
    pending: BTreeMap<usize, Vec<PendingMark>>,
}

impl LopdfDocument {
    fn page_id(&self, index: usize) -> Result<ObjectId, EngineError> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(EngineError::PageOutOfRange {
                index,
                count: self.page_ids.len(),
            })
    }
}

/// The default engine, backed by lopdf.
pub struct LopdfEngine;

impl PdfEngine for LopdfEngine {
    type Document = LopdfDocument;
    type Error = EngineError;

    fn open(bytes: &[u8]) -> Result<LopdfDocument, EngineError> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| EngineError::Parse(format!("failed to parse PDF: {e}")))?;
        if inner.is_encrypted() {
            return Err(EngineError::Parse(
                "password-protected PDFs are not supported".to_string(),
            ));
        }
        // get_pages keys are 1-based page numbers in document order.
        let page_ids = inner.get_pages().into_values().collect();
        Ok(LopdfDocument {
            inner,
            page_ids,
            pending: BTreeMap::new(),
        })
    }

    fn page_count(doc: &LopdfDocument) -> usize {
        doc.page_ids.len()
    }

    fn page_content(doc: &LopdfDocument, index: usize) -> Result<PageContent, EngineError> {
        let page_id = doc.page_id(index)?;
        extract_page(&doc.inner, page_id, index)
    }

    fn mark_region(
        doc: &mut LopdfDocument,
        page_index: usize,
        region: Region,
        fill: FillColor,
    ) -> Result<(), EngineError> {
        doc.page_id(page_index)?;
        doc.pending
            .entry(page_index)
            .or_default()
            .push(PendingMark { region, fill });
        Ok(())
    }

    fn commit_removals(doc: &mut LopdfDocument, page_index: usize) -> Result<usize, EngineError> {
        let page_id = doc.page_id(page_index)?;
        let Some(marks) = doc.pending.get(&page_index) else {
            return Ok(0);
        };
        let marks = marks.clone();

        let content_bytes = doc.inner.get_page_content(page_id)?;
        let content = Content::decode(&content_bytes)?;
        let geometry = page_geometry(&doc.inner, page_id);
        let fonts = load_page_fonts(&doc.inner, page_id);

        let (operations, glyphs_removed) =
            rewrite_content(&content.operations, &fonts, &geometry, &marks, page_index);
        let encoded = Content { operations }
            .encode()
            .map_err(|e| EngineError::Encode(format!("failed to encode content stream: {e}")))?;
        doc.inner.change_page_content(page_id, encoded)?;

        doc.pending.remove(&page_index);
        debug!(
            page = page_index,
            regions = marks.len(),
            glyphs = glyphs_removed,
            "committed destructive removals"
        );
        Ok(marks.len())
    }

    fn metadata(doc: &LopdfDocument) -> Result<DocumentMetadata, EngineError> {
        let info = match doc.inner.trailer.get(b"Info") {
            Ok(obj) => match resolve_ref(&doc.inner, obj).as_dict() {
                Ok(dict) => dict,
                Err(_) => return Ok(DocumentMetadata::default()),
            },
            Err(_) => return Ok(DocumentMetadata::default()),
        };
        Ok(DocumentMetadata {
            title: info_string(&doc.inner, info, b"Title"),
            author: info_string(&doc.inner, info, b"Author"),
            subject: info_string(&doc.inner, info, b"Subject"),
            keywords: info_string(&doc.inner, info, b"Keywords"),
            creator: info_string(&doc.inner, info, b"Creator"),
            producer: info_string(&doc.inner, info, b"Producer"),
            creation_date: info_string(&doc.inner, info, b"CreationDate"),
            mod_date: info_string(&doc.inner, info, b"ModDate"),
        })
    }

    fn set_metadata(
        doc: &mut LopdfDocument,
        metadata: &DocumentMetadata,
    ) -> Result<(), EngineError> {
        // A fresh dictionary: anything not in the standard field set,
        // custom keys included, does not carry over.
        let mut info = Dictionary::new();
        let fields: [(&str, &Option<String>); 8] = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Keywords", &metadata.keywords),
            ("Creator", &metadata.creator),
            ("Producer", &metadata.producer),
            ("CreationDate", &metadata.creation_date),
            ("ModDate", &metadata.mod_date),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                info.set(key, Object::string_literal(v.as_str()));
            }
        }
        let info_id = doc.inner.add_object(Object::Dictionary(info));
        doc.inner.trailer.set("Info", Object::Reference(info_id));
        Ok(())
    }

    fn drop_xmp_metadata(doc: &mut LopdfDocument) -> bool {
        let Some(catalog_id) = doc
            .inner
            .trailer
            .get(b"Root")
            .ok()
            .and_then(|o| o.as_reference().ok())
        else {
            return false;
        };
        let Ok(catalog) = doc
            .inner
            .get_object_mut(catalog_id)
            .and_then(|o| o.as_dict_mut())
        else {
            return false;
        };
        catalog.remove(b"Metadata").is_some()
    }

    fn save_to<W: Write>(
        doc: &mut LopdfDocument,
        writer: &mut W,
        options: &SaveOptions,
    ) -> Result<(), EngineError> {
        if options.compact {
            // Orphans include the old /Info dictionary and any detached
            // XMP stream; pruning keeps removed data out of the file.
            doc.inner.prune_objects();
            doc.inner.delete_zero_length_streams();
            doc.inner.renumber_objects();
        }
        if options.compress {
            doc.inner.compress();
        }
        doc.inner
            .save_to(writer)
            .map_err(|e| EngineError::Encode(format!("failed to serialize PDF: {e}")))?;
        Ok(())
    }
}

/// Read a string-valued /Info entry, decoding UTF-16BE (BOM-prefixed)
/// or Latin-1 content.
fn info_string(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    match resolve_ref(doc, dict.get(key).ok()?) {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
