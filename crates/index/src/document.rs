//! Indexable documents
//!
//! One [`Document`] describes one source artifact: its filterable term
//! fields plus whatever stored fields response builders read rows from.
//! Term fields and stored fields share one namespace, so a field such as
//! `packageName` can be both filtered on and read back.

use refquery_core::{fields, RawHit, ValueTerm};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field values describing one artifact to index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    fields: BTreeMap<String, Vec<String>>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Document::default()
    }

    /// Append one value under a field.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .entry(field.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Append a term as a filterable field, named by the term's label.
    pub fn with_term(self, term: &ValueTerm) -> Self {
        self.with_field(term.label(), term.value())
    }

    /// Set the artifact path stored field.
    pub fn with_path(self, path: impl Into<String>) -> Self {
        self.with_field(fields::PATH, path)
    }

    /// All fields of this document.
    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Values under one field (empty when absent).
    pub fn values(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Render this document as a search hit under the given doc id.
    pub fn to_hit(&self, doc: u64) -> RawHit {
        RawHit {
            doc,
            fields: self.fields.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refquery_core::term::ResourceKind;

    #[test]
    fn test_term_field_uses_label() {
        let doc = Document::new()
            .with_term(&ValueTerm::package_name("org.acme"))
            .with_term(&ValueTerm::reference("Applicant", ResourceKind::Java));

        assert_eq!(doc.values("packageName"), ["org.acme"]);
        assert_eq!(doc.values("ref:java"), ["Applicant"]);
    }

    #[test]
    fn test_repeated_fields_accumulate() {
        let doc = Document::new()
            .with_field(fields::RULE_NAME, "approve loan")
            .with_field(fields::RULE_NAME, "reject loan");
        assert_eq!(doc.values(fields::RULE_NAME), ["approve loan", "reject loan"]);
    }

    #[test]
    fn test_to_hit_carries_every_field() {
        let doc = Document::new()
            .with_path("/my/project/src/a.rdrl")
            .with_term(&ValueTerm::package_name("org.acme"));

        let hit = doc.to_hit(7);
        assert_eq!(hit.doc, 7);
        assert_eq!(hit.first(fields::PATH), Some("/my/project/src/a.rdrl"));
        assert_eq!(hit.first("packageName"), Some("org.acme"));
    }

    #[test]
    fn test_document_serialization() {
        let doc = Document::new()
            .with_path("/my/project/src/a.rdrl")
            .with_term(&ValueTerm::package_name("org.acme"));
        let json = serde_json::to_string(&doc).unwrap();
        let restored: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, restored);
    }
}
