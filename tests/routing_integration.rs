//! Integration tests for entity routing against a provisioned request.
//!
//! Routing decisions depend on the tenant context the provisioning
//! pipeline installs, so these tests exercise both halves together.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use strata_db::core::MapEnvSource;
use strata_db::provision::{MemorySession, Provisioner};
use strata_db::router::{DbRouter, RelationPolicy, RoutingTable};
use strata_db::DbAlias;

fn provisioner() -> Provisioner {
    Provisioner::builder().env(MapEnvSource::new()).build()
}

/// Scenario: auth reads go to the system database, financial reads to
/// the tenant database, in the same request.
#[tokio::test]
async fn test_mixed_reads_split_by_namespace() {
    let p = provisioner();
    let router = DbRouter::business_defaults();

    let session = MemorySession::new().with_credentials("h", "n", "u", "pw");
    let provisioned = p.provision("/customers/", &session);

    provisioned
        .scope(async {
            assert_eq!(router.route_for_read("auth"), DbAlias::system());
            assert_eq!(router.route_for_read("sessions"), DbAlias::system());
            assert_eq!(router.route_for_read("financial"), DbAlias::tenant());
            assert_eq!(router.route_for_read("inventory"), DbAlias::tenant());
            // Writes agree with reads.
            assert_eq!(router.route_for_write("financial"), DbAlias::tenant());
            assert_eq!(router.route_for_write("auth"), DbAlias::system());
        })
        .await;
}

/// Scenario: migration targeting customer_db applies tenant namespaces
/// only, never system ones.
#[test]
fn test_migration_targets() {
    let router = DbRouter::business_defaults();
    let tenant = DbAlias::tenant();
    let system = DbAlias::system();

    assert!(router.allow_migration(&tenant, "inventory"));
    assert!(router.allow_migration(&tenant, "financial"));
    assert!(!router.allow_migration(&tenant, "auth"));

    assert!(router.allow_migration(&system, "auth"));
    assert!(router.allow_migration(&system, "sessions"));
    assert!(!router.allow_migration(&system, "inventory"));

    // Unknown namespaces classify as system.
    assert!(router.allow_migration(&system, "thirdparty"));
    assert!(!router.allow_migration(&tenant, "thirdparty"));
}

#[test]
fn test_relation_checks_are_symmetric() {
    let permissive = DbRouter::business_defaults();
    let strict = DbRouter::business_defaults().with_relation_policy(RelationPolicy::Strict);

    let cases = [
        ("auth", "sessions", true),
        ("financial", "inventory", true),
        ("auth", "financial", false),
    ];
    for (a, b, allowed) in cases {
        assert_eq!(permissive.allow_relation(a, b), allowed);
        assert_eq!(permissive.allow_relation(b, a), allowed);
        assert_eq!(strict.allow_relation(a, b), allowed);
        assert_eq!(strict.allow_relation(b, a), allowed);
    }

    // Only registered-to-unregistered pairs diverge by policy.
    assert!(permissive.allow_relation("auth", "thirdparty"));
    assert!(!strict.allow_relation("auth", "thirdparty"));
}

#[test]
fn test_custom_table() {
    let table = RoutingTable::builder()
        .system_namespace("accounts")
        .tenant_namespaces(["orders", "billing"])
        .build()
        .unwrap();
    let router = DbRouter::new(table);

    assert_eq!(router.route_for_read("accounts"), DbAlias::system());
    assert_eq!(router.route_for_read("orders"), DbAlias::tenant());
    assert_eq!(router.route_for_read("billing"), DbAlias::tenant());
}

/// Concurrent requests with separate tenant scopes each route tenant
/// namespaces through their own context.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_routing_under_concurrent_scopes() {
    let router = Arc::new(DbRouter::business_defaults());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let router = Arc::clone(&router);
        handles.push(tokio::spawn(async move {
            strata_db::core::scope_tenant_db(DbAlias::tenant(), async {
                for _ in 0..25 {
                    assert_eq!(router.route_for_read("reports"), DbAlias::tenant());
                    assert_eq!(router.route_for_read("auth"), DbAlias::system());
                    tokio::task::yield_now().await;
                }
            })
            .await;
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}
