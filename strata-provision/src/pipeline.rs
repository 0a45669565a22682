//! The request-scoped provisioning pipeline.
//!
//! Runs once per inbound request, before any session- or tenant-data
//! access. The pipeline classifies the request path, extracts tenant
//! credentials from session state, and installs a fresh connection
//! descriptor, degrading to the default connection on any failure.
//! Provisioning always terminates in success: there is no failure
//! terminal, only the default path, so every request can at least reach a
//! login or error page.
//!
//! Per request exactly one of the two terminals runs:
//!
//! ```text
//! ClassifyPath ── exempt path ──────────────► UseDefault
//!      │
//!      └─► ExtractCredentials ── complete ──► ConfigureTenant
//!                │
//!                ├─ incomplete ─────────────► UseDefault
//!                └─ store unavailable ──────► UseDefault
//! ```

use std::future::Future;
use std::sync::Arc;

use strata_core::alias::DbAlias;
use strata_core::context::{scope_tenant_db, set_active_tenant_db, TenantDbScope};
use strata_core::credentials::TenantCredentials;
use strata_core::descriptor::{ConnDescriptor, DescriptorPolicy};
use strata_core::env::{EnvSource, StdEnvSource};
use strata_core::error::DbError;
use tracing::{debug, info, warn};

use crate::paths::PathPolicy;
use crate::registry::ConnectionRegistry;
use crate::session::{read_credentials, CredentialOutcome, SessionState};

/// Which terminal state provisioned the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionRoute {
    /// The fallback descriptor from environment configuration.
    Default,
    /// A tenant descriptor built from session credentials.
    Tenant,
}

/// The provisioning outcome for one request.
///
/// Carries the live descriptor for this request's tenant connection.
/// Downstream code queries through this handle rather than a shared slot,
/// so concurrent provisioning for another tenant cannot redirect it.
#[derive(Debug, Clone)]
pub struct Provisioned {
    /// Which terminal ran.
    pub route: ProvisionRoute,
    /// The alias the tenant context was set to.
    pub alias: DbAlias,
    /// The descriptor installed for this request.
    pub descriptor: Arc<ConnDescriptor>,
}

impl Provisioned {
    /// Run a future with this request's tenant alias active.
    pub async fn scope<F, T>(&self, f: F) -> T
    where
        F: Future<Output = T>,
    {
        scope_tenant_db(self.alias.clone(), f).await
    }

    /// Enter this request's tenant alias on the current thread.
    pub fn enter(&self) -> TenantDbScope {
        TenantDbScope::enter(self.alias.clone())
    }
}

/// Builds tenant connections for inbound requests.
pub struct Provisioner {
    paths: PathPolicy,
    policy: DescriptorPolicy,
    env: Arc<dyn EnvSource>,
    registry: ConnectionRegistry,
}

impl Provisioner {
    /// Create a provisioner with business defaults and the process
    /// environment as fallback source.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder.
    pub fn builder() -> ProvisionerBuilder {
        ProvisionerBuilder::default()
    }

    /// The live connection registry.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Provision the tenant connection for one request.
    ///
    /// Never fails; all degraded outcomes terminate in the default
    /// descriptor. Idempotent: the same request state yields the same
    /// descriptor.
    pub fn provision(&self, path: &str, session: &dyn SessionState) -> Provisioned {
        if self.paths.bypasses_session(path) {
            debug!(path, "exempt path, using default database");
            return self.use_default();
        }

        match read_credentials(session) {
            CredentialOutcome::Complete(creds) => self.configure_tenant(&creds),
            CredentialOutcome::Incomplete => {
                debug!(path, "no tenant credentials in session, using default database");
                self.use_default()
            }
            CredentialOutcome::Unavailable(err) => {
                warn!(path, error = %err, "session store unavailable, using default database");
                self.use_default()
            }
        }
    }

    /// Handle an error raised while serving an already-provisioned request.
    ///
    /// Connection-class failures discard the cached tenant connection so
    /// the next request reconfigures from scratch instead of retrying a
    /// known-bad connection.
    pub fn on_request_error(&self, err: &DbError) {
        if err.is_connection_error() {
            warn!(error = %err, "tenant connection broken, discarding");
            self.registry.discard(&DbAlias::tenant());
        }
    }

    fn use_default(&self) -> Provisioned {
        let descriptor = Arc::new(ConnDescriptor::fallback(self.env.as_ref(), &self.policy));
        self.install(ProvisionRoute::Default, descriptor)
    }

    fn configure_tenant(&self, creds: &TenantCredentials) -> Provisioned {
        let descriptor = Arc::new(ConnDescriptor::for_tenant(creds, &self.policy));
        info!(host = %descriptor.host, database = %descriptor.database, "tenant database configured");
        self.install(ProvisionRoute::Tenant, descriptor)
    }

    fn install(&self, route: ProvisionRoute, descriptor: Arc<ConnDescriptor>) -> Provisioned {
        let alias = DbAlias::tenant();

        // Stale connections under the previous identity must never be
        // reused, so the cached entry goes before the new one lands.
        self.registry.reset(&alias);
        self.registry.install(alias.clone(), Arc::clone(&descriptor));
        set_active_tenant_db(alias.clone());

        Provisioned {
            route,
            alias,
            descriptor,
        }
    }
}

impl Default for Provisioner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Provisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provisioner")
            .field("paths", &self.paths)
            .field("policy", &self.policy)
            .field("live", &self.registry.len())
            .finish()
    }
}

/// Builder for [`Provisioner`].
#[derive(Default)]
pub struct ProvisionerBuilder {
    paths: Option<PathPolicy>,
    policy: Option<DescriptorPolicy>,
    env: Option<Arc<dyn EnvSource>>,
}

impl ProvisionerBuilder {
    /// Set the path allow-list.
    pub fn paths(mut self, paths: PathPolicy) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Set the descriptor policy.
    pub fn policy(mut self, policy: DescriptorPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set the fallback credential source.
    pub fn env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Some(Arc::new(env));
        self
    }

    /// Build the provisioner.
    pub fn build(self) -> Provisioner {
        Provisioner {
            paths: self.paths.unwrap_or_default(),
            policy: self.policy.unwrap_or_default(),
            env: self.env.unwrap_or_else(|| Arc::new(StdEnvSource)),
            registry: ConnectionRegistry::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::context::{clear_active_tenant_db, get_active_tenant_db};
    use strata_core::env::MapEnvSource;
    use crate::session::{MemorySession, UnavailableSession, KEY_DB_NAME};

    fn fallback_env() -> MapEnvSource {
        MapEnvSource::new()
            .set("DB_HOST", "fallback-host")
            .set("DB_NAME", "fallback-db")
            .set("DB_USER", "fallback-user")
            .set("DB_PASSWORD", "fallback-pw")
    }

    fn provisioner() -> Provisioner {
        Provisioner::builder().env(fallback_env()).build()
    }

    #[test]
    fn test_complete_session_configures_tenant() {
        let p = provisioner();
        let session = MemorySession::new().with_credentials("h", "n", "u", "pw");

        let result = p.provision("/customers/", &session);
        assert_eq!(result.route, ProvisionRoute::Tenant);
        assert_eq!(result.alias, DbAlias::tenant());
        assert_eq!(result.descriptor.host, "h");
        assert_eq!(result.descriptor.database, "n");
        assert_eq!(result.descriptor.user, "u");
        assert_eq!(result.descriptor.port, 5432);
        assert_eq!(result.descriptor.connect_timeout.as_secs(), 10);
        clear_active_tenant_db();
    }

    #[test]
    fn test_exempt_path_always_default() {
        let p = provisioner();
        // Session credentials present but the path never needs them.
        let session = MemorySession::new().with_credentials("h", "n", "u", "pw");

        let result = p.provision("/login/", &session);
        assert_eq!(result.route, ProvisionRoute::Default);
        assert_eq!(result.descriptor.host, "fallback-host");
        clear_active_tenant_db();
    }

    #[test]
    fn test_incomplete_session_falls_back() {
        let p = provisioner();
        let session = MemorySession::new().set(KEY_DB_NAME, "n");

        let result = p.provision("/customers/", &session);
        assert_eq!(result.route, ProvisionRoute::Default);
        assert_eq!(result.descriptor.host, "fallback-host");
        assert_eq!(result.descriptor.database, "fallback-db");
        clear_active_tenant_db();
    }

    #[test]
    fn test_unavailable_store_falls_back() {
        let p = provisioner();
        let result = p.provision("/customers/", &UnavailableSession);
        assert_eq!(result.route, ProvisionRoute::Default);
        assert_eq!(result.descriptor.host, "fallback-host");
        clear_active_tenant_db();
    }

    #[test]
    fn test_context_set_on_both_paths() {
        let p = provisioner();

        p.provision("/login/", &MemorySession::new());
        assert_eq!(get_active_tenant_db(), DbAlias::tenant());

        p.provision(
            "/customers/",
            &MemorySession::new().with_credentials("h", "n", "u", "pw"),
        );
        assert_eq!(get_active_tenant_db(), DbAlias::tenant());
        clear_active_tenant_db();
    }

    #[test]
    fn test_idempotent() {
        let p = provisioner();
        let session = MemorySession::new().with_credentials("h", "n", "u", "pw");

        let first = p.provision("/customers/", &session);
        let second = p.provision("/customers/", &session);
        assert_eq!(first.route, second.route);
        assert_eq!(*first.descriptor, *second.descriptor);
        clear_active_tenant_db();
    }

    #[test]
    fn test_registry_tracks_latest() {
        let p = provisioner();
        let session = MemorySession::new().with_credentials("new-host", "n", "u", "pw");

        p.provision("/login/", &MemorySession::new());
        p.provision("/customers/", &session);

        let live = p.registry().current(&DbAlias::tenant()).unwrap();
        assert_eq!(live.host, "new-host");
        clear_active_tenant_db();
    }

    #[test]
    fn test_connection_error_discards_cache() {
        let p = provisioner();
        p.provision(
            "/customers/",
            &MemorySession::new().with_credentials("h", "n", "u", "pw"),
        );
        assert!(p.registry().current(&DbAlias::tenant()).is_some());

        p.on_request_error(&DbError::refused("h", 5432));
        assert!(p.registry().current(&DbAlias::tenant()).is_none());
        clear_active_tenant_db();
    }

    #[test]
    fn test_non_connection_error_keeps_cache() {
        let p = provisioner();
        p.provision(
            "/customers/",
            &MemorySession::new().with_credentials("h", "n", "u", "pw"),
        );

        p.on_request_error(&DbError::internal("unrelated bug"));
        assert!(p.registry().current(&DbAlias::tenant()).is_some());
        clear_active_tenant_db();
    }

    #[tokio::test]
    async fn test_provisioned_scope() {
        let p = provisioner();
        let result = p.provision("/login/", &MemorySession::new());

        let alias = result.scope(async { get_active_tenant_db() }).await;
        assert_eq!(alias, DbAlias::tenant());
        clear_active_tenant_db();
    }
}
