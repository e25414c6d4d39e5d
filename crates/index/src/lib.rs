//! In-memory artifact index backend for refquery
//!
//! This crate provides:
//! - Document: field values describing one artifact to index
//! - MemoryIndex: exact-match posting lists behind the `ArtifactIndex`
//!   boundary
//!
//! The backend is deliberately small: conjunctive filters, stable doc-id
//! ordering, and windowed retrieval are all the query layer asks of it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod memory;

// Re-export commonly used types
pub use document::Document;
pub use memory::MemoryIndex;
