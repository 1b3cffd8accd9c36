//! Small helpers for walking lopdf object graphs.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::EngineError;

/// Follow a reference one level; non-references pass through unchanged.
/// A dangling reference resolves to the original object.
pub(crate) fn resolve_ref<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// Look up a page attribute, walking /Parent links for inheritable
/// keys such as /MediaBox and /Resources.
pub(crate) fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, EngineError> {
    let mut current_id = page_id;
    loop {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| EngineError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| EngineError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// Resources dictionary for a page, or `None` when the page declares none.
pub(crate) fn page_resources<'a>(
    doc: &'a Document,
    page_id: ObjectId,
) -> Result<Option<&'a Dictionary>, EngineError> {
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve_ref(doc, obj)
            .as_dict()
            .map(Some)
            .map_err(|_| EngineError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(None),
    }
}

/// Numeric value of an object, resolving one level of indirection.
pub(crate) fn object_to_f64(doc: &Document, object: &Object) -> Option<f64> {
    match resolve_ref(doc, object) {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}
