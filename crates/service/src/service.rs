//! Query service
//!
//! [`QueryService`] is the single entry point: look the query up, validate
//! the terms, fetch one window of hits, shape the rows. Each step fails the
//! whole request; in particular nothing reaches the index until the terms
//! have passed validation, and a corrupted hit aborts the page rather than
//! returning a partial one.

use refquery_core::{ArtifactIndex, Page, PageRequest, QueryError};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::executor::QueryExecutor;
use crate::registry::{NamedQuery, QueryRegistry, RegistryError};
use crate::response::PageRow;
use crate::standard::{register_standard, standard_registry};
use crate::validate::validate;

/// Failure assembling a service from its builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// No index was configured.
    #[error("query service requires an index: call .index() before .build()")]
    MissingIndex,

    /// A query contract failed to register.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Builder for composing a service with its own registry.
///
/// Registration errors are deferred to [`QueryServiceBuilder::build`], so
/// the chain stays fluent. The standard suite, when requested, registers
/// before any custom contracts; a custom query reusing a standard name
/// fails the build with [`RegistryError::DuplicateQuery`].
#[derive(Default)]
pub struct QueryServiceBuilder {
    index: Option<Arc<dyn ArtifactIndex>>,
    queries: Vec<NamedQuery>,
    standard: bool,
}

impl QueryServiceBuilder {
    /// Create a builder with nothing configured.
    pub fn new() -> Self {
        QueryServiceBuilder::default()
    }

    /// Set the index to answer from. Required.
    pub fn index(mut self, index: Arc<dyn ArtifactIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Queue a query contract for registration.
    pub fn register(mut self, query: NamedQuery) -> Self {
        self.queries.push(query);
        self
    }

    /// Include the standard query suite.
    pub fn standard_queries(mut self) -> Self {
        self.standard = true;
        self
    }

    /// Assemble the service, registering every queued contract.
    pub fn build(self) -> Result<QueryService, BuildError> {
        let index = self.index.ok_or(BuildError::MissingIndex)?;
        let registry = Arc::new(QueryRegistry::new());
        if self.standard {
            register_standard(&registry)?;
        }
        for query in self.queries {
            registry.register(query)?;
        }
        Ok(QueryService::new(registry, index))
    }
}

/// Read side of the query subsystem, shared by all request threads.
///
/// # Three Ways to Compose a Service
///
/// ```ignore
/// // 1. Over the shared process-wide standard registry
/// let service = QueryService::standard(index);
///
/// // 2. Own copy of the standard suite (room for more registrations)
/// let service = QueryService::with_standard_queries(index)?;
///
/// // 3. Builder, for custom contracts beside (or instead of) the suite
/// let service = QueryService::builder()
///     .index(index)
///     .standard_queries()
///     .register(custom_query)
///     .build()?;
/// ```
pub struct QueryService {
    registry: Arc<QueryRegistry>,
    executor: QueryExecutor,
}

impl QueryService {
    /// Compose a service from an already populated registry and an index.
    pub fn new(registry: Arc<QueryRegistry>, index: Arc<dyn ArtifactIndex>) -> Self {
        QueryService {
            registry,
            executor: QueryExecutor::new(index),
        }
    }

    /// Start a builder.
    pub fn builder() -> QueryServiceBuilder {
        QueryServiceBuilder::new()
    }

    /// Compose a service over the shared process-wide standard registry.
    pub fn standard(index: Arc<dyn ArtifactIndex>) -> Self {
        QueryService::new(standard_registry(), index)
    }

    /// Compose a service with its own copy of the standard query suite,
    /// for callers that register further queries beside it.
    pub fn with_standard_queries(
        index: Arc<dyn ArtifactIndex>,
    ) -> Result<Self, RegistryError> {
        let registry = Arc::new(QueryRegistry::new());
        register_standard(&registry)?;
        Ok(QueryService::new(registry, index))
    }

    /// The registry this service answers from.
    pub fn registry(&self) -> &QueryRegistry {
        &self.registry
    }

    /// Run one page request.
    pub fn query(&self, request: &PageRequest) -> Result<Page<PageRow>, QueryError> {
        let query = self.registry.get(&request.query_name).ok_or_else(|| {
            QueryError::QueryNotFound {
                name: request.query_name.clone(),
            }
        })?;

        validate(&query, &request.terms)?;

        let raw = self.executor.execute(
            &query,
            &request.terms,
            request.page_number,
            request.page_size,
        )?;

        let rows = raw
            .hits
            .iter()
            .map(|hit| query.builder().build(hit))
            .collect::<Result<Vec<PageRow>, QueryError>>()?;

        debug!(
            target: "refquery::service",
            query = %query.name(),
            rows = rows.len(),
            has_next = raw.has_more,
            "Query served"
        );
        Ok(Page::new(rows, raw.has_more))
    }
}

// Manual Debug impl since the executor holds the index as a bare trait object
impl std::fmt::Debug for QueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryService")
            .field("queries", &self.registry.len())
            .field("index", &"Arc<dyn ArtifactIndex>")
            .finish()
    }
}
