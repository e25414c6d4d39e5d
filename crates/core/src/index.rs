//! Index boundary
//!
//! The query layer talks to the source index through [`ArtifactIndex`], a
//! narrow conjunctive-filter interface. Everything above it (validation,
//! pagination, row shaping) is index-agnostic; everything below it (postings,
//! storage, scoring) is invisible to the query layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::IndexError;
use crate::term::{Discriminator, TermKey, ValueTerm};

/// Stored field names of the standard index schema.
///
/// Filterable term fields reuse the term label as their field name
/// (`"packageName"`, `"ref:java"`); the names here are the stored-only
/// fields response builders read rows from.
pub mod fields {
    /// Path of the indexed artifact.
    pub const PATH: &str = "path";

    /// Name of a rule defined by the artifact.
    pub const RULE_NAME: &str = "ruleName";

    /// Package of the artifact, stored alongside the filterable term field
    /// of the same name.
    pub const PACKAGE_NAME: &str = "packageName";
}

// ============================================================================
// Filters
// ============================================================================

/// One conjunctive filter handed to the index.
///
/// A clause carries the structured form of a validated term. Backends that
/// index by flat field name can render it with [`FilterClause::field`];
/// backends with structured schemas can match on the parts directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Term kind to filter on.
    pub key: TermKey,
    /// Value the field must contain.
    pub value: String,
    /// Discriminator, if the kind carries one.
    pub discriminator: Option<Discriminator>,
}

impl FilterClause {
    /// Build the clause for a validated term.
    pub fn from_term(term: &ValueTerm) -> Self {
        FilterClause {
            key: term.key().clone(),
            value: term.value().to_string(),
            discriminator: term.discriminator(),
        }
    }

    /// Flat field name this clause matches on, identical to the term label
    /// (`"packageName"`, `"ref:java"`).
    pub fn field(&self) -> String {
        match self.discriminator {
            Some(disc) => format!("{}:{}", self.key, disc),
            None => self.key.to_string(),
        }
    }
}

impl From<&ValueTerm> for FilterClause {
    fn from(term: &ValueTerm) -> Self {
        FilterClause::from_term(term)
    }
}

// ============================================================================
// Hits
// ============================================================================

/// One matching document, as returned by the index.
///
/// `fields` holds the stored field values of the document; a field may carry
/// several values (a rule references many types, for example). Response
/// builders read rows out of these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHit {
    /// Backend document id, unique within one index.
    pub doc: u64,
    /// Stored fields of the document.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl RawHit {
    /// Create a hit with no stored fields.
    pub fn new(doc: u64) -> Self {
        RawHit {
            doc,
            fields: BTreeMap::new(),
        }
    }

    /// Append one value under a stored field.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .entry(field.into())
            .or_default()
            .push(value.into());
        self
    }

    /// First stored value of a field, if any.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All stored values of a field (empty when absent).
    pub fn values(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// One window of index hits plus a continuation flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPage {
    /// Hits inside the requested window, in stable index order.
    pub hits: Vec<RawHit>,
    /// Whether at least one more hit exists past the window.
    pub has_more: bool,
}

impl IndexPage {
    /// Create a window from hits and a continuation flag.
    pub fn new(hits: Vec<RawHit>, has_more: bool) -> Self {
        IndexPage { hits, has_more }
    }

    /// An empty terminal window.
    pub fn empty() -> Self {
        IndexPage {
            hits: Vec::new(),
            has_more: false,
        }
    }
}

// ============================================================================
// Boundary trait
// ============================================================================

/// Conjunctive-filter search over an artifact index.
///
/// Implementations must satisfy three contracts the executor relies on:
///
/// - all filters are ANDed; a hit matches every clause
/// - hit order is stable across calls with equal filters, so adjacent pages
///   never overlap or skip
/// - `has_more` reports whether any hit exists past `offset + limit`; with
///   `limit` of `None` the whole match set is returned and `has_more` is
///   `false`
///
/// Implementations are shared across request threads and must be safe to
/// call concurrently.
pub trait ArtifactIndex: Send + Sync {
    /// Return the hits inside the window, in stable order.
    fn search(
        &self,
        filters: &[FilterClause],
        offset: usize,
        limit: Option<usize>,
    ) -> Result<IndexPage, IndexError>;
}
