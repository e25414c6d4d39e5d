//! Core types for refquery
//!
//! This crate defines the vocabulary shared by every layer of the query
//! subsystem:
//! - TermKey, ResourceKind, PartKind, Discriminator: the index term schema
//! - ValueTerm: a concrete (key, value, discriminator) triple in a request
//! - PageRequest, PageSpec: the entry shape and its validated page geometry
//! - Page: one page of a query result
//! - FilterClause, RawHit, IndexPage, ArtifactIndex: the index boundary
//! - QueryError, IndexError: the failure taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod error;
pub mod index;
pub mod page;
pub mod request;
pub mod term;

// Re-export commonly used types and traits
pub use error::{IndexError, QueryError, Result};
pub use index::{fields, ArtifactIndex, FilterClause, IndexPage, RawHit};
pub use page::Page;
pub use request::{PageRequest, PageSpec};
pub use term::{keys, term_set, Discriminator, PartKind, ResourceKind, TermKey, ValueTerm};
