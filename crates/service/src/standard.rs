//! Standard query suite
//!
//! The contracts every deployment registers at startup:
//!
//! - `FindRulesByProjectQuery`: rules in a package, optionally narrowed by
//!   project root or referenced rule; rows are rule name + package
//! - `FindResourcesQuery`: artifacts referencing a resource
//! - `FindResourcePartsQuery`: artifacts referencing a shared part
//! - `FindAllChangeImpactQuery`: artifacts referencing a resource or a
//!   shared part, for whole-impact sweeps
//!
//! Registration order is fixed so startup failures are deterministic.

use once_cell::sync::Lazy;
use refquery_core::term::keys;
use refquery_core::ResourceKind;
use std::sync::Arc;

use crate::registry::{NamedQuery, QueryRegistry, RegistryError, TermSpec};
use crate::response::{ResourceBuilder, RuleNameBuilder};

/// Process-wide registry preloaded with the standard suite (built on first
/// use).
static STANDARD_REGISTRY: Lazy<Arc<QueryRegistry>> = Lazy::new(|| {
    let registry = Arc::new(QueryRegistry::new());
    register_standard(&registry).expect("standard suite registers into a fresh registry");
    registry
});

/// Names of the standard queries.
pub mod names {
    /// Rules defined inside a package.
    pub const FIND_RULES_BY_PROJECT: &str = "FindRulesByProjectQuery";

    /// Artifacts referencing a resource.
    pub const FIND_RESOURCES: &str = "FindResourcesQuery";

    /// Artifacts referencing a shared part.
    pub const FIND_RESOURCE_PARTS: &str = "FindResourcePartsQuery";

    /// Artifacts referencing a resource or shared part.
    pub const FIND_ALL_CHANGE_IMPACT: &str = "FindAllChangeImpactQuery";
}

/// Build the standard contracts, in registration order.
pub fn standard_queries() -> Vec<NamedQuery> {
    vec![
        NamedQuery::new(names::FIND_RULES_BY_PROJECT, || Arc::new(RuleNameBuilder))
            .with_root(keys::PACKAGE_NAME)
            .with_compatible(TermSpec::any(keys::PROJECT_ROOT_PATH))
            .with_compatible(TermSpec::only(keys::REFERENCE, ResourceKind::Rule)),
        NamedQuery::new(names::FIND_RESOURCES, || Arc::new(ResourceBuilder))
            .with_root(keys::REFERENCE),
        NamedQuery::new(names::FIND_RESOURCE_PARTS, || Arc::new(ResourceBuilder))
            .with_root(keys::SHARED_PART),
        NamedQuery::new(names::FIND_ALL_CHANGE_IMPACT, || Arc::new(ResourceBuilder))
            .with_root(keys::REFERENCE)
            .with_root(keys::SHARED_PART),
    ]
}

/// Register the standard suite into a registry.
pub fn register_standard(registry: &QueryRegistry) -> Result<(), RegistryError> {
    for query in standard_queries() {
        registry.register(query)?;
    }
    Ok(())
}

/// The shared process-wide registry holding the standard suite.
///
/// Services composed over this registry all answer from the same
/// contracts; callers wanting to register additional queries beside the
/// suite should build their own registry with [`register_standard`]
/// instead.
pub fn standard_registry() -> Arc<QueryRegistry> {
    Arc::clone(&STANDARD_REGISTRY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::PageRow;
    use refquery_core::term::{PartKind, ValueTerm};
    use refquery_core::{fields, RawHit};

    #[test]
    fn test_standard_suite_registers_cleanly() {
        let registry = QueryRegistry::new();
        register_standard(&registry).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                names::FIND_ALL_CHANGE_IMPACT,
                names::FIND_RESOURCE_PARTS,
                names::FIND_RESOURCES,
                names::FIND_RULES_BY_PROJECT,
            ]
        );
    }

    #[test]
    fn test_shared_registry_is_process_wide() {
        let first = standard_registry();
        let second = standard_registry();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.get(names::FIND_RULES_BY_PROJECT).is_some());
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_registering_twice_is_a_duplicate() {
        let registry = QueryRegistry::new();
        register_standard(&registry).unwrap();
        let err = register_standard(&registry).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateQuery { .. }));
    }

    #[test]
    fn test_rules_query_contract() {
        let registry = QueryRegistry::new();
        register_standard(&registry).unwrap();
        let query = registry.get(names::FIND_RULES_BY_PROJECT).unwrap();

        assert_eq!(query.roots(), [keys::PACKAGE_NAME]);
        assert!(query.admits(&ValueTerm::package_name("org.acme")));
        assert!(query.admits(&ValueTerm::project_root_path("/my/project")));
        assert!(query.admits(&ValueTerm::reference("approve loan", ResourceKind::Rule)));
        assert!(!query.admits(&ValueTerm::reference("Applicant", ResourceKind::Java)));
        assert!(!query.admits(&ValueTerm::shared_part("approvals", PartKind::Global)));
    }

    #[test]
    fn test_reference_queries_admit_every_resource_kind() {
        let registry = QueryRegistry::new();
        register_standard(&registry).unwrap();
        let query = registry.get(names::FIND_RESOURCES).unwrap();

        for kind in ResourceKind::ALL {
            assert!(
                query.admits(&ValueTerm::reference("Anything", kind)),
                "ref:{kind} must be admitted"
            );
        }
        assert!(!query.admits(&ValueTerm::package_name("org.acme")));
    }

    #[test]
    fn test_impact_query_has_two_roots() {
        let registry = QueryRegistry::new();
        register_standard(&registry).unwrap();
        let query = registry.get(names::FIND_ALL_CHANGE_IMPACT).unwrap();
        assert_eq!(query.roots(), [keys::REFERENCE, keys::SHARED_PART]);
    }

    #[test]
    fn test_rules_query_builds_rule_rows() {
        let registry = QueryRegistry::new();
        register_standard(&registry).unwrap();
        let query = registry.get(names::FIND_RULES_BY_PROJECT).unwrap();

        let hit = RawHit::new(1)
            .with_field(fields::RULE_NAME, "approve loan")
            .with_field(fields::PACKAGE_NAME, "org.acme");
        assert_eq!(
            query.builder().build(&hit).unwrap(),
            PageRow::RuleName {
                name: "approve loan".to_string(),
                package_name: "org.acme".to_string(),
            }
        );
    }

    #[test]
    fn test_resource_queries_build_path_rows() {
        let registry = QueryRegistry::new();
        register_standard(&registry).unwrap();

        let hit = RawHit::new(1).with_field(fields::PATH, "/my/project/src/a.rdrl");
        for name in [
            names::FIND_RESOURCES,
            names::FIND_RESOURCE_PARTS,
            names::FIND_ALL_CHANGE_IMPACT,
        ] {
            let query = registry.get(name).unwrap();
            assert_eq!(
                query.builder().build(&hit).unwrap(),
                PageRow::Resource {
                    path: "/my/project/src/a.rdrl".to_string(),
                },
                "{name} must build resource rows"
            );
        }
    }
}
