//! Named query registry, term validation, and paginated execution
//!
//! This crate composes the read side of the refactoring query subsystem:
//! - QueryRegistry / NamedQuery / TermSpec: declarative query contracts
//! - validate: two-pass term checking against a contract
//! - QueryExecutor: conjunctive filters plus windowed fetching
//! - ResponseBuilder / PageRow: raw hits shaped into typed rows
//! - QueryService: the single `query(request)` entry point
//! - standard: the query suite registered at startup
//!
//! Everything here is index-agnostic: the only way out is the
//! `ArtifactIndex` boundary defined in `refquery-core`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod executor;
pub mod registry;
pub mod response;
pub mod service;
pub mod standard;
pub mod validate;

// Re-export commonly used types
pub use executor::QueryExecutor;
pub use registry::{NamedQuery, QueryRegistry, RegistryError, TermSpec};
pub use response::{PageRow, ResourceBuilder, ResponseBuilder, RuleNameBuilder};
pub use service::{BuildError, QueryService, QueryServiceBuilder};
pub use standard::{names, register_standard, standard_queries, standard_registry};
pub use validate::validate;
