//! Connection descriptors and their construction policy.
//!
//! A [`ConnDescriptor`] is the complete set of parameters needed to open a
//! tenant database connection. Every field is a required struct field, so
//! a partially-configured descriptor is unrepresentable: the fixed policy
//! fields are injected at construction regardless of caller input, and the
//! value is never mutated afterwards. The descriptor for the next request
//! supersedes this one; it is never merged into it.

use std::fmt;
use std::time::Duration;

use tracing::info;

use crate::credentials::TenantCredentials;
use crate::env::EnvSource;

/// Default PostgreSQL port.
pub const DEFAULT_PORT: u16 = 5432;

/// Fixed connection policy applied to every descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorPolicy {
    /// Timeout for each new connection attempt.
    pub connect_timeout: Duration,
    /// Timezone applied to tenant connections.
    pub timezone: String,
}

impl Default for DescriptorPolicy {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timezone: "UTC".to_string(),
        }
    }
}

impl DescriptorPolicy {
    /// Create the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the timezone.
    pub fn timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = tz.into();
        self
    }
}

/// A fully-resolved tenant connection configuration.
///
/// Constructed fresh per request via [`ConnDescriptor::for_tenant`] or
/// [`ConnDescriptor::fallback`]; immutable afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnDescriptor {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Username.
    pub user: String,
    /// Password.
    pub password: String,
    /// Timeout for each new connection attempt.
    pub connect_timeout: Duration,
    /// Maximum age of a cached connection. Zero: never reuse a connection
    /// across request boundaries, so credentials are always fresh.
    pub max_age: Duration,
    /// Whether to health-check pooled connections before use.
    pub health_checks: bool,
    /// Whether statements auto-commit outside explicit transactions.
    pub autocommit: bool,
    /// Connection timezone.
    pub timezone: String,
}

impl ConnDescriptor {
    /// Build a descriptor from tenant credentials plus fixed policy fields.
    ///
    /// Policy fields are injected unconditionally; the caller cannot
    /// produce a descriptor with any of them missing.
    pub fn for_tenant(creds: &TenantCredentials, policy: &DescriptorPolicy) -> Self {
        Self {
            host: creds.host.clone(),
            port: creds.port.unwrap_or(DEFAULT_PORT),
            database: creds.database.clone(),
            user: creds.user.clone(),
            password: creds.password.clone(),
            connect_timeout: policy.connect_timeout,
            max_age: Duration::ZERO,
            health_checks: false,
            autocommit: true,
            timezone: policy.timezone.clone(),
        }
    }

    /// Build the fallback descriptor from environment configuration.
    ///
    /// Used when no tenant is established. Reads `DB_HOST`, `PORT`,
    /// `DB_NAME`, `DB_USER`, `DB_PASSWORD`; absent values fall back to a
    /// local postgres instance.
    pub fn fallback(env: &dyn EnvSource, policy: &DescriptorPolicy) -> Self {
        let creds = TenantCredentials {
            host: env.db_host(),
            port: Some(env.db_port()),
            database: env.db_name(),
            user: env.db_user(),
            password: env.db_password(),
        };

        info!(host = %creds.host, database = %creds.database, "fallback descriptor loaded from environment");

        Self::for_tenant(&creds, policy)
    }

    /// Render a connection URL without the password.
    pub fn to_url(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

// Password must never appear in logs or error output.
impl fmt::Debug for ConnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("max_age", &self.max_age)
            .field("health_checks", &self.health_checks)
            .field("autocommit", &self.autocommit)
            .field("timezone", &self.timezone)
            .finish()
    }
}
