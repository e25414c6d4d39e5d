//! Error types for query execution
//!
//! [`QueryError`] is the single failure taxonomy a caller sees when running
//! a query. The two term-validation messages are part of the client
//! protocol: tooling matches on their text, so their wording is fixed here
//! and asserted by tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Failure running a page request.
///
/// Serializable so callers layering a transport on top can ship failures
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum QueryError {
    // ==================== Lookup ====================
    /// No query is registered under the requested name.
    #[error("no query registered under the name '{name}'")]
    QueryNotFound {
        /// The name the request asked for.
        name: String,
    },

    // ==================== Term validation ====================
    /// A supplied term is outside the query's contract.
    ///
    /// The wording is protocol: the term label is quoted, the query name is
    /// not.
    #[error("Index term '{term}' can not be used with the {query} query")]
    IncompatibleTerm {
        /// Label of the offending term (`"ref:java"`).
        term: String,
        /// Name of the query it was supplied to.
        query: String,
    },

    /// None of the query's root terms was supplied.
    ///
    /// `term` is the first root key the query declares.
    #[error("Expected '{term}' term was not found")]
    MissingRootTerm {
        /// Key of the first declared root term.
        term: String,
    },

    // ==================== Page geometry ====================
    /// Page size is neither positive nor the unpaged sentinel.
    #[error("invalid page size {page_size}: must be positive, or -1 for the whole result")]
    InvalidPageSize {
        /// The rejected size.
        page_size: i32,
    },

    // ==================== Index access ====================
    /// The index could not be searched.
    #[error("index unavailable: {reason}")]
    IndexUnavailable {
        /// Backend failure description.
        reason: String,
    },

    /// The index returned a document the query's row shape cannot be read
    /// from.
    #[error("index corruption: {reason}")]
    IndexCorruption {
        /// What was malformed or missing.
        reason: String,
    },
}

impl QueryError {
    /// Whether retrying the same request may succeed without any change to
    /// the request itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, QueryError::IndexUnavailable { .. })
    }

    /// Whether this failure was caused by the supplied terms.
    pub fn is_invalid_terms(&self) -> bool {
        matches!(
            self,
            QueryError::IncompatibleTerm { .. } | QueryError::MissingRootTerm { .. }
        )
    }
}

/// Failure inside an index backend.
///
/// Backends reduce their internal errors to this one shape; the executor
/// folds it into [`QueryError::IndexUnavailable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct IndexError {
    /// Backend failure description.
    pub reason: String,
}

impl IndexError {
    /// Create a backend failure with the given description.
    pub fn new(reason: impl Into<String>) -> Self {
        IndexError {
            reason: reason.into(),
        }
    }
}

impl From<IndexError> for QueryError {
    fn from(err: IndexError) -> Self {
        QueryError::IndexUnavailable { reason: err.reason }
    }
}
