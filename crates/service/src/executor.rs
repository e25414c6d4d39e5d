//! Query execution
//!
//! The executor turns a validated term set into conjunctive index filters
//! and fetches one window of raw hits. It holds no state besides the shared
//! index handle, so one executor serves every concurrent request.
//!
//! Windowing happens at the boundary: the index receives the offset and
//! limit and reports whether matches exist past the window, so the executor
//! never over-fetches to learn `has_more`.

use refquery_core::{ArtifactIndex, FilterClause, IndexPage, PageSpec, QueryError, ValueTerm};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::registry::NamedQuery;

/// Stateless executor over a shared artifact index.
pub struct QueryExecutor {
    index: Arc<dyn ArtifactIndex>,
}

impl QueryExecutor {
    /// Create an executor over the given index.
    pub fn new(index: Arc<dyn ArtifactIndex>) -> Self {
        QueryExecutor { index }
    }

    /// Fetch the requested window of raw hits for a validated term set.
    ///
    /// Page geometry is resolved here, so an invalid size fails before the
    /// index is touched. Backend failures surface as
    /// [`QueryError::IndexUnavailable`] and are not retried; retry policy
    /// belongs to the caller.
    pub fn execute(
        &self,
        query: &NamedQuery,
        terms: &BTreeSet<ValueTerm>,
        page_number: u32,
        page_size: i32,
    ) -> Result<IndexPage, QueryError> {
        let spec = PageSpec::resolve(page_number, page_size)?;
        let filters = build_filters(query, terms);

        let page = self.index.search(&filters, spec.offset(), spec.limit())?;
        debug!(
            target: "refquery::exec",
            query = %query.name(),
            clauses = filters.len(),
            offset = spec.offset(),
            hits = page.hits.len(),
            has_more = page.has_more,
            "Index searched"
        );
        Ok(page)
    }
}

/// Render the terms as filter clauses, root-key terms first.
///
/// Putting root clauses first hands the backend its primary partitioning
/// filter as a hint; all clauses are still ANDed, so the order carries no
/// semantic weight. Within each group the canonical term order is kept.
fn build_filters(query: &NamedQuery, terms: &BTreeSet<ValueTerm>) -> Vec<FilterClause> {
    let (roots, others): (Vec<&ValueTerm>, Vec<&ValueTerm>) = terms
        .iter()
        .partition(|term| query.roots().iter().any(|root| root == term.key()));

    roots
        .into_iter()
        .chain(others)
        .map(FilterClause::from_term)
        .collect()
}
