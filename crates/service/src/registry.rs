//! Named query registry
//!
//! A [`NamedQuery`] is a declarative contract record: the query's name, the
//! term kinds that qualify as its root, every term kind it tolerates, and
//! the one builder that shapes its rows. The [`QueryRegistry`] maps names to
//! contracts; it is populated during startup and only read afterwards, so
//! lookups from concurrent requests need no coordination beyond the map's
//! own sharding.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use refquery_core::{Discriminator, TermKey, ValueTerm};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::response::ResponseBuilder;

// ============================================================================
// TermSpec
// ============================================================================

/// One term kind a query tolerates.
///
/// With no discriminator constraint the spec is a wildcard for its key: it
/// admits the bare kind and every discriminated variant. With a constraint
/// it admits exactly that variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSpec {
    key: TermKey,
    discriminator: Option<Discriminator>,
}

impl TermSpec {
    /// Admit every term of this kind, whatever its discriminator.
    pub fn any(key: TermKey) -> Self {
        TermSpec {
            key,
            discriminator: None,
        }
    }

    /// Admit only terms of this kind carrying the given discriminator.
    pub fn only(key: TermKey, discriminator: impl Into<Discriminator>) -> Self {
        TermSpec {
            key,
            discriminator: Some(discriminator.into()),
        }
    }

    /// The constrained term kind.
    pub fn key(&self) -> &TermKey {
        &self.key
    }

    /// The discriminator constraint, if any.
    pub fn discriminator(&self) -> Option<Discriminator> {
        self.discriminator
    }

    /// Whether a supplied term satisfies this spec.
    pub fn admits(&self, term: &ValueTerm) -> bool {
        if self.key != *term.key() {
            return false;
        }
        match self.discriminator {
            None => true,
            Some(required) => term.discriminator() == Some(required),
        }
    }
}

// ============================================================================
// NamedQuery
// ============================================================================

/// Contract of one registered query.
///
/// Root keys are ordered: a request must supply at least one term whose key
/// matches any of them, and when none does, the error names the first.
/// Roots are admitted with any discriminator; `compatible` lists the
/// additional kinds the query tolerates.
///
/// The builder factory is consumed once here, and the resulting instance is
/// shared by every request that runs the query.
pub struct NamedQuery {
    name: String,
    roots: Vec<TermKey>,
    compatible: Vec<TermSpec>,
    builder: Arc<dyn ResponseBuilder>,
}

impl NamedQuery {
    /// Create a contract with no term kinds declared yet.
    pub fn new<F>(name: impl Into<String>, builder: F) -> Self
    where
        F: FnOnce() -> Arc<dyn ResponseBuilder>,
    {
        NamedQuery {
            name: name.into(),
            roots: Vec::new(),
            compatible: Vec::new(),
            builder: builder(),
        }
    }

    /// Append a root term key. Declaration order is kept.
    pub fn with_root(mut self, key: TermKey) -> Self {
        self.roots.push(key);
        self
    }

    /// Append a tolerated term kind.
    pub fn with_compatible(mut self, spec: TermSpec) -> Self {
        self.compatible.push(spec);
        self
    }

    /// The query's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root term keys, in declaration order.
    pub fn roots(&self) -> &[TermKey] {
        &self.roots
    }

    /// Tolerated term kinds beyond the roots.
    pub fn compatible(&self) -> &[TermSpec] {
        &self.compatible
    }

    /// The builder shared by every execution of this query.
    pub fn builder(&self) -> &Arc<dyn ResponseBuilder> {
        &self.builder
    }

    /// Whether a supplied term is inside this query's contract.
    pub fn admits(&self, term: &ValueTerm) -> bool {
        self.roots.iter().any(|root| root == term.key())
            || self.compatible.iter().any(|spec| spec.admits(term))
    }
}

impl std::fmt::Debug for NamedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedQuery")
            .field("name", &self.name)
            .field("roots", &self.roots)
            .field("compatible", &self.compatible)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Failure registering a query contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A query with this name is already registered.
    #[error("a query named '{name}' is already registered")]
    DuplicateQuery {
        /// The contested name.
        name: String,
    },

    /// The contract declares no root term key.
    #[error("query '{name}' declares no root term")]
    NoRootTerm {
        /// Name of the rejected contract.
        name: String,
    },

    /// The contract's name is empty.
    #[error("query name must not be empty")]
    EmptyName,
}

/// Name-to-contract mapping, immutable after startup.
#[derive(Default)]
pub struct QueryRegistry {
    queries: DashMap<String, Arc<NamedQuery>>,
}

impl QueryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        QueryRegistry {
            queries: DashMap::new(),
        }
    }

    /// Register a contract, rejecting nameless, rootless, and duplicate
    /// queries.
    pub fn register(&self, query: NamedQuery) -> Result<(), RegistryError> {
        if query.name().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if query.roots().is_empty() {
            return Err(RegistryError::NoRootTerm {
                name: query.name().to_string(),
            });
        }
        match self.queries.entry(query.name().to_string()) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateQuery {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                debug!(target: "refquery::registry", query = %query.name(), "Query registered");
                entry.insert(Arc::new(query));
                Ok(())
            }
        }
    }

    /// Look up a contract by name.
    pub fn get(&self, name: &str) -> Option<Arc<NamedQuery>> {
        self.queries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Names of every registered query, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.queries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of registered queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether no query has been registered.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
