//! In-memory artifact index
//!
//! This module provides [`MemoryIndex`], the reference implementation of
//! the index boundary:
//! - exact-match posting lists per (field, value) pair
//! - conjunctive intersection across filter clauses
//! - hits in ascending doc-id order, so paging windows are stable
//!
//! # Thread Safety
//!
//! Postings live in a `DashMap`; the document store sits behind a
//! `parking_lot` read-write lock. Searches share the read side, so many
//! queries run concurrently while additions and removals briefly take the
//! write side.

use dashmap::DashMap;
use parking_lot::RwLock;
use refquery_core::{ArtifactIndex, FilterClause, IndexError, IndexPage, RawHit};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::document::Document;

/// Exact-match in-memory index over artifact documents.
///
/// Every search runs against whatever documents have been added at that
/// moment; there is no staging or commit step. Doc ids are assigned once
/// and never reused, so a hit's id stays valid until the document is
/// removed.
pub struct MemoryIndex {
    /// (field, value) -> ids of documents carrying that value.
    postings: DashMap<(String, String), BTreeSet<u64>>,

    /// Documents by id. BTreeMap keeps iteration in id order.
    docs: RwLock<BTreeMap<u64, Document>>,

    /// Next doc id to assign.
    next_doc: AtomicU64,
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        MemoryIndex {
            postings: DashMap::new(),
            docs: RwLock::new(BTreeMap::new()),
            next_doc: AtomicU64::new(1),
        }
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Add a document, returning its assigned doc id.
    pub fn add(&self, document: Document) -> u64 {
        let doc = self.next_doc.fetch_add(1, Ordering::Relaxed);
        let mut docs = self.docs.write();
        for (field, values) in document.fields() {
            for value in values {
                self.postings
                    .entry((field.clone(), value.clone()))
                    .or_default()
                    .insert(doc);
            }
        }
        docs.insert(doc, document);
        doc
    }

    /// Remove a document by id. Returns false when the id is unknown.
    pub fn remove(&self, doc: u64) -> bool {
        let mut docs = self.docs.write();
        let document = match docs.remove(&doc) {
            Some(document) => document,
            None => return false,
        };
        for (field, values) in document.fields() {
            for value in values {
                let key = (field.clone(), value.clone());
                if let Some(mut ids) = self.postings.get_mut(&key) {
                    ids.remove(&doc);
                }
                self.postings.remove_if(&key, |_, ids| ids.is_empty());
            }
        }
        true
    }

    /// Drop every document and posting.
    pub fn clear(&self) {
        let mut docs = self.docs.write();
        self.postings.clear();
        docs.clear();
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

impl ArtifactIndex for MemoryIndex {
    /// Intersect the posting lists of every clause, then cut the requested
    /// window out of the matches in doc-id order.
    ///
    /// No filters means every document matches.
    fn search(
        &self,
        filters: &[FilterClause],
        offset: usize,
        limit: Option<usize>,
    ) -> Result<IndexPage, IndexError> {
        let docs = self.docs.read();

        let matched: Vec<u64> = if filters.is_empty() {
            docs.keys().copied().collect()
        } else {
            let mut sets: Vec<BTreeSet<u64>> = Vec::with_capacity(filters.len());
            for clause in filters {
                match self.postings.get(&(clause.field(), clause.value.clone())) {
                    Some(ids) => sets.push(ids.clone()),
                    None => return Ok(IndexPage::empty()),
                }
            }
            // Intersecting smallest-first keeps the working set shrinking.
            sets.sort_by_key(BTreeSet::len);
            let mut sets = sets.into_iter();
            let mut acc = sets.next().unwrap_or_default();
            for set in sets {
                acc = acc.intersection(&set).copied().collect();
                if acc.is_empty() {
                    return Ok(IndexPage::empty());
                }
            }
            acc.into_iter().filter(|id| docs.contains_key(id)).collect()
        };

        let total = matched.len();
        let hits: Vec<RawHit> = matched
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .filter_map(|id| docs.get(&id).map(|document| document.to_hit(id)))
            .collect();
        let has_more = total > offset.saturating_add(hits.len());

        Ok(IndexPage::new(hits, has_more))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use refquery_core::fields;
    use refquery_core::term::{PartKind, ResourceKind, ValueTerm};

    fn rule_doc(package: &str, rule: &str, referenced: &str) -> Document {
        Document::new()
            .with_path(format!("/my/project/src/{rule}.rdrl"))
            .with_term(&ValueTerm::package_name(package))
            .with_term(&ValueTerm::reference(referenced, ResourceKind::Java))
            .with_field(fields::RULE_NAME, rule)
    }

    fn clause(term: &ValueTerm) -> FilterClause {
        FilterClause::from_term(term)
    }

    #[test]
    fn test_empty_index_matches_nothing() {
        let index = MemoryIndex::new();
        let page = index
            .search(&[clause(&ValueTerm::package_name("org.acme"))], 0, None)
            .unwrap();
        assert!(page.hits.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_single_clause_match() {
        let index = MemoryIndex::new();
        index.add(rule_doc("org.acme", "approve", "Applicant"));
        index.add(rule_doc("org.other", "reject", "Account"));

        let page = index
            .search(&[clause(&ValueTerm::package_name("org.acme"))], 0, None)
            .unwrap();
        assert_eq!(page.hits.len(), 1);
        assert_eq!(page.hits[0].first(fields::RULE_NAME), Some("approve"));
    }

    #[test]
    fn test_clauses_are_conjunctive() {
        let index = MemoryIndex::new();
        index.add(rule_doc("org.acme", "approve", "Applicant"));
        index.add(rule_doc("org.acme", "reject", "Account"));

        let page = index
            .search(
                &[
                    clause(&ValueTerm::package_name("org.acme")),
                    clause(&ValueTerm::reference("Account", ResourceKind::Java)),
                ],
                0,
                None,
            )
            .unwrap();
        assert_eq!(page.hits.len(), 1);
        assert_eq!(page.hits[0].first(fields::RULE_NAME), Some("reject"));
    }

    #[test]
    fn test_discriminator_separates_fields() {
        let index = MemoryIndex::new();
        index.add(
            Document::new()
                .with_term(&ValueTerm::reference("Applicant", ResourceKind::Java)),
        );

        let as_rule = index
            .search(
                &[clause(&ValueTerm::reference("Applicant", ResourceKind::Rule))],
                0,
                None,
            )
            .unwrap();
        assert!(as_rule.hits.is_empty(), "ref:rule must not match a ref:java posting");

        let as_part = index
            .search(
                &[clause(&ValueTerm::shared_part("Applicant", PartKind::Global))],
                0,
                None,
            )
            .unwrap();
        assert!(as_part.hits.is_empty());
    }

    #[test]
    fn test_hits_in_doc_id_order() {
        let index = MemoryIndex::new();
        let first = index.add(rule_doc("org.acme", "a", "A"));
        let second = index.add(rule_doc("org.acme", "b", "B"));
        let third = index.add(rule_doc("org.acme", "c", "C"));

        let page = index
            .search(&[clause(&ValueTerm::package_name("org.acme"))], 0, None)
            .unwrap();
        let ids: Vec<u64> = page.hits.iter().map(|h| h.doc).collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn test_window_offset_and_limit() {
        let index = MemoryIndex::new();
        for i in 0..5 {
            index.add(rule_doc("org.acme", &format!("rule{i}"), "A"));
        }
        let filters = [clause(&ValueTerm::package_name("org.acme"))];

        let page = index.search(&filters, 2, Some(2)).unwrap();
        let names: Vec<_> = page
            .hits
            .iter()
            .map(|h| h.first(fields::RULE_NAME).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["rule2", "rule3"]);
        assert!(page.has_more, "rule4 lies past the window");

        let last = index.search(&filters, 4, Some(2)).unwrap();
        assert_eq!(last.hits.len(), 1);
        assert!(!last.has_more);
    }

    #[test]
    fn test_window_past_end_is_empty_and_terminal() {
        let index = MemoryIndex::new();
        index.add(rule_doc("org.acme", "only", "A"));
        let filters = [clause(&ValueTerm::package_name("org.acme"))];

        let page = index.search(&filters, 10, Some(5)).unwrap();
        assert!(page.hits.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_unlimited_search_never_reports_more() {
        let index = MemoryIndex::new();
        for i in 0..3 {
            index.add(rule_doc("org.acme", &format!("rule{i}"), "A"));
        }
        let page = index
            .search(&[clause(&ValueTerm::package_name("org.acme"))], 0, None)
            .unwrap();
        assert_eq!(page.hits.len(), 3);
        assert!(!page.has_more);
    }

    #[test]
    fn test_no_filters_matches_all_documents() {
        let index = MemoryIndex::new();
        index.add(rule_doc("org.acme", "a", "A"));
        index.add(rule_doc("org.other", "b", "B"));

        let page = index.search(&[], 0, None).unwrap();
        assert_eq!(page.hits.len(), 2);
    }

    #[test]
    fn test_remove_unlinks_postings() {
        let index = MemoryIndex::new();
        let doc = index.add(rule_doc("org.acme", "approve", "Applicant"));
        assert_eq!(index.len(), 1);

        assert!(index.remove(doc));
        assert!(!index.remove(doc), "second removal must report unknown id");
        assert!(index.is_empty());

        let page = index
            .search(&[clause(&ValueTerm::package_name("org.acme"))], 0, None)
            .unwrap();
        assert!(page.hits.is_empty());
    }

    #[test]
    fn test_clear_drops_everything() {
        let index = MemoryIndex::new();
        index.add(rule_doc("org.acme", "a", "A"));
        index.clear();
        assert!(index.is_empty());
        assert!(index.search(&[], 0, None).unwrap().hits.is_empty());
    }

    #[test]
    fn test_multi_valued_field_matches_each_value() {
        let index = MemoryIndex::new();
        index.add(
            Document::new()
                .with_term(&ValueTerm::reference("Applicant", ResourceKind::Java))
                .with_term(&ValueTerm::reference("Account", ResourceKind::Java)),
        );

        for name in ["Applicant", "Account"] {
            let page = index
                .search(&[clause(&ValueTerm::reference(name, ResourceKind::Java))], 0, None)
                .unwrap();
            assert_eq!(page.hits.len(), 1, "'{name}' must match the shared document");
        }
    }

    #[test]
    fn test_concurrent_adds_and_searches() {
        use std::sync::Arc;
        use std::thread;

        let index = Arc::new(MemoryIndex::new());
        let mut handles = Vec::new();

        for t in 0..4 {
            let index = Arc::clone(&index);
            handles.push(thread::spawn(move || {
                for i in 0..25 {
                    index.add(rule_doc("org.acme", &format!("t{t}-rule{i}"), "A"));
                    let page = index
                        .search(&[clause(&ValueTerm::package_name("org.acme"))], 0, Some(10))
                        .unwrap();
                    assert!(page.hits.len() <= 10);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(index.len(), 100);
    }
}
