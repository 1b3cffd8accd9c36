//! Document-level metadata and the scrub policy.
//!
//! PDF /Info dictionary fields are a known side channel for leaked PII
//! (author names, revision titles, tool chains). [`DocumentMetadata`]
//! models the standard fields; [`DocumentMetadata::scrubbed`] produces
//! the metadata written to a redacted artifact: PII-bearing fields
//! cleared, date fields retained, everything else dropped by the writer.

/// Document-level metadata from the PDF /Info dictionary.
///
/// All fields are optional since PDFs may omit the /Info dictionary
/// entirely or include only a subset of fields. Date fields are raw PDF
/// date strings (`D:YYYYMMDDHHmmSS...`).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
}

impl DocumentMetadata {
    /// Returns `true` if all fields are `None`.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
            && self.creator.is_none()
            && self.producer.is_none()
            && self.creation_date.is_none()
            && self.mod_date.is_none()
    }

    /// The scrubbed metadata for a redacted output: author, creator,
    /// producer, title, subject, and keywords cleared to empty strings;
    /// creation and modification dates carried over unchanged.
    pub fn scrubbed(&self) -> DocumentMetadata {
        DocumentMetadata {
            title: Some(String::new()),
            author: Some(String::new()),
            subject: Some(String::new()),
            keywords: Some(String::new()),
            creator: Some(String::new()),
            producer: Some(String::new()),
            creation_date: self.creation_date.clone(),
            mod_date: self.mod_date.clone(),
        }
    }
}
