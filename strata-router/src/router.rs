//! The database router.
//!
//! Decides, per data-access operation, which database alias an entity's
//! namespace targets, and gates schema migrations so they can only land in
//! the matching physical database. Routing is a pure function of the
//! static [`RoutingTable`] plus the caller's tenant context; the router
//! itself holds no mutable state.

use strata_core::alias::DbAlias;
use strata_core::context::get_active_tenant_db;
use tracing::debug;

use crate::table::{RoutingTable, Scope};

/// How relations between entities of unrecognized namespaces are treated.
///
/// Recognized namespaces always compare by resolved alias. An
/// unrecognized side has no authoritative database, so the relation is
/// indeterminate; the permissive default allows it. Strict deployments
/// can refuse instead, closing a potential cross-tenant link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelationPolicy {
    /// Allow relations when either side is indeterminate.
    #[default]
    Permissive,
    /// Refuse relations when either side is indeterminate.
    Strict,
}

/// Routes entity operations to the system or tenant database.
#[derive(Debug, Clone)]
pub struct DbRouter {
    table: RoutingTable,
    relation_policy: RelationPolicy,
}

impl DbRouter {
    /// Create a router over the given classification table.
    pub fn new(table: RoutingTable) -> Self {
        Self {
            table,
            relation_policy: RelationPolicy::default(),
        }
    }

    /// Create a router with the business default classification.
    pub fn business_defaults() -> Self {
        Self::new(RoutingTable::business_defaults())
    }

    /// Set the relation policy.
    pub fn with_relation_policy(mut self, policy: RelationPolicy) -> Self {
        self.relation_policy = policy;
        self
    }

    /// The classification table in use.
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Resolve the alias for reads of entities in `namespace`.
    ///
    /// System namespaces and unrecognized namespaces target the fixed
    /// system alias; tenant namespaces target the caller's active tenant
    /// database. The tenant context is read here, at routing time, so the
    /// alias reflects the most recent provisioning for this execution
    /// unit.
    pub fn route_for_read(&self, namespace: &str) -> DbAlias {
        let alias = self.resolve(namespace);
        debug!(namespace, db = %alias, "route read");
        alias
    }

    /// Resolve the alias for writes of entities in `namespace`.
    ///
    /// Identical to [`DbRouter::route_for_read`]: routing is symmetric
    /// between reads and writes.
    pub fn route_for_write(&self, namespace: &str) -> DbAlias {
        let alias = self.resolve(namespace);
        debug!(namespace, db = %alias, "route write");
        alias
    }

    /// Whether a relation between entities of the two namespaces is allowed.
    ///
    /// Cross-database relations are never allowed: both sides must resolve
    /// to the same alias. Indeterminate sides follow the configured
    /// [`RelationPolicy`].
    pub fn allow_relation(&self, namespace_a: &str, namespace_b: &str) -> bool {
        let a_known = self.table.is_registered(namespace_a);
        let b_known = self.table.is_registered(namespace_b);

        if !a_known || !b_known {
            return match self.relation_policy {
                RelationPolicy::Permissive => true,
                RelationPolicy::Strict => false,
            };
        }

        self.resolve(namespace_a) == self.resolve(namespace_b)
    }

    /// Whether a migration for `namespace` may run against `target`.
    ///
    /// System and unrecognized namespaces migrate only to the system
    /// alias; tenant namespaces only to the fixed tenant alias. This keeps
    /// schema changes out of the wrong physical database.
    pub fn allow_migration(&self, target: &DbAlias, namespace: &str) -> bool {
        match self.table.classify(namespace) {
            Scope::System => target.is_system(),
            Scope::Tenant => *target == DbAlias::tenant(),
        }
    }

    fn resolve(&self, namespace: &str) -> DbAlias {
        match self.table.classify(namespace) {
            Scope::System => DbAlias::system(),
            Scope::Tenant => get_active_tenant_db(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::context::{clear_active_tenant_db, scope_tenant_db, set_active_tenant_db};

    #[test]
    fn test_system_namespace_routes_to_system() {
        let router = DbRouter::business_defaults();
        assert_eq!(router.route_for_read("auth"), DbAlias::system());
        assert_eq!(router.route_for_write("sessions"), DbAlias::system());
    }

    #[test]
    fn test_tenant_namespace_routes_to_active_tenant() {
        let router = DbRouter::business_defaults();
        set_active_tenant_db(DbAlias::new("acme_db"));
        assert_eq!(router.route_for_read("financial").as_str(), "acme_db");
        clear_active_tenant_db();
    }

    #[test]
    fn test_unrecognized_namespace_routes_to_system() {
        let router = DbRouter::business_defaults();
        set_active_tenant_db(DbAlias::new("acme_db"));
        // Never to the tenant database, never unresolved.
        assert_eq!(router.route_for_read("vendored_plugin"), DbAlias::system());
        clear_active_tenant_db();
    }

    #[test]
    fn test_read_write_symmetry() {
        let router = DbRouter::business_defaults();
        for (namespace, _) in router.table().entries() {
            assert_eq!(
                router.route_for_read(namespace),
                router.route_for_write(namespace),
                "asymmetric routing for '{}'",
                namespace
            );
        }
    }

    #[tokio::test]
    async fn test_routing_respects_task_scope() {
        let router = DbRouter::business_defaults();
        let alias = scope_tenant_db(DbAlias::new("tenant-42"), async {
            router.route_for_read("inventory")
        })
        .await;
        assert_eq!(alias.as_str(), "tenant-42");
    }

    #[test]
    fn test_relation_same_database() {
        let router = DbRouter::business_defaults();
        assert!(router.allow_relation("financial", "inventory"));
        assert!(router.allow_relation("auth", "sessions"));
    }

    #[test]
    fn test_relation_cross_database_refused() {
        let router = DbRouter::business_defaults();
        set_active_tenant_db(DbAlias::new("acme_db"));
        assert!(!router.allow_relation("auth", "financial"));
        clear_active_tenant_db();
    }

    #[test]
    fn test_relation_indeterminate_permissive() {
        let router = DbRouter::business_defaults();
        assert!(router.allow_relation("financial", "unknown_app"));
        assert!(router.allow_relation("unknown_a", "unknown_b"));
    }

    #[test]
    fn test_relation_indeterminate_strict() {
        let router =
            DbRouter::business_defaults().with_relation_policy(RelationPolicy::Strict);
        assert!(!router.allow_relation("financial", "unknown_app"));
        assert!(!router.allow_relation("unknown_a", "unknown_b"));
        // Recognized pairs unaffected.
        assert!(router.allow_relation("financial", "inventory"));
    }

    #[test]
    fn test_migration_gating() {
        let router = DbRouter::business_defaults();

        assert!(router.allow_migration(&DbAlias::new("customer_db"), "inventory"));
        assert!(!router.allow_migration(&DbAlias::new("default"), "inventory"));

        assert!(router.allow_migration(&DbAlias::system(), "auth"));
        assert!(!router.allow_migration(&DbAlias::tenant(), "auth"));

        // Unrecognized namespaces migrate only to the system database.
        assert!(router.allow_migration(&DbAlias::system(), "unknown_app"));
        assert!(!router.allow_migration(&DbAlias::tenant(), "unknown_app"));
    }
}
