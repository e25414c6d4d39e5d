//! refquery - validated, paginated refactoring queries over a source index
//!
//! refquery answers "where is this used" questions for refactoring tools:
//! named queries with declarative term contracts, validated up front, run
//! as conjunctive filters against an artifact index, returned one page at
//! a time as typed rows.
//!
//! # Quick Start
//!
//! ```
//! use refquery::{term_set, Document, MemoryIndex, PageRequest, QueryService, ValueTerm};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Index one rule artifact.
//! let index = Arc::new(MemoryIndex::new());
//! index.add(
//!     Document::new()
//!         .with_path("/my/project/src/approve.rdrl")
//!         .with_term(&ValueTerm::package_name("org.acme"))
//!         .with_field(refquery::fields::RULE_NAME, "approve loan"),
//! );
//!
//! // Stand the service up with the standard query suite.
//! let service = QueryService::with_standard_queries(index)?;
//!
//! // Ask for every rule in the package, as one page.
//! let request = PageRequest::unpaged(
//!     refquery::names::FIND_RULES_BY_PROJECT,
//!     term_set([ValueTerm::package_name("org.acme")]),
//! );
//! let page = service.query(&request)?;
//! assert_eq!(page.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The contract layer ([`QueryRegistry`], [`validate`]) never touches the
//! index; the execution layer ([`QueryExecutor`]) only sees validated
//! terms; the index is reached solely through the [`ArtifactIndex`]
//! boundary, for which [`MemoryIndex`] is the in-process implementation.

// Re-export the shared vocabulary from refquery-core
pub use refquery_core::*;

// Re-export the in-memory index backend from refquery-index
pub use refquery_index::*;

// Re-export the query layer from refquery-service
pub use refquery_service::*;
