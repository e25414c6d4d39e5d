//! Term validation
//!
//! Every request is checked against its query's contract before the index
//! is touched. Validation runs two passes over the terms in their canonical
//! set order:
//!
//! 1. compatibility: the first term outside the contract fails the request,
//!    so which term is reported never depends on the order terms were
//!    supplied in
//! 2. root presence: at least one term must carry one of the query's root
//!    keys; when none does, the error names the first declared root
//!
//! A compatibility failure always wins over a missing root, even when both
//! conditions hold.

use refquery_core::{QueryError, ValueTerm};
use std::collections::BTreeSet;
use tracing::debug;

use crate::registry::NamedQuery;

/// Check a term set against a query contract.
pub fn validate(query: &NamedQuery, terms: &BTreeSet<ValueTerm>) -> Result<(), QueryError> {
    for term in terms {
        if !query.admits(term) {
            let label = term.label();
            debug!(target: "refquery::validate", query = %query.name(), term = %label, "Term outside contract");
            return Err(QueryError::IncompatibleTerm {
                term: label,
                query: query.name().to_string(),
            });
        }
    }

    // A contract without roots requires nothing here; registration refuses
    // such contracts, so this only matters for hand-built queries.
    let has_root = terms
        .iter()
        .any(|term| query.roots().iter().any(|root| root == term.key()));
    if !has_root {
        if let Some(first_root) = query.roots().first() {
            debug!(target: "refquery::validate", query = %query.name(), root = %first_root, "Root term missing");
            return Err(QueryError::MissingRootTerm {
                term: first_root.to_string(),
            });
        }
    }

    Ok(())
}
