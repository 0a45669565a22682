//! Tenant database credentials.

use std::fmt;

/// Credentials for a tenant-specific database, as carried in session state.
///
/// A credential set is only usable when it is complete: host, database,
/// user, and password all present and non-empty. Anything less is treated
/// as absent and the caller falls back to the default connection.
#[derive(Clone, PartialEq, Eq)]
pub struct TenantCredentials {
    /// Database host.
    pub host: String,
    /// Port; `None` means the default PostgreSQL port 5432.
    pub port: Option<u16>,
    /// Database name.
    pub database: String,
    /// Username.
    pub user: String,
    /// Password.
    pub password: String,
}

impl TenantCredentials {
    /// Create a credential set with the default port.
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: None,
            database: database.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// Set an explicit port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Check that every required field is present and non-empty.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of the required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.trim().is_empty() {
            missing.push("host");
        }
        if self.database.trim().is_empty() {
            missing.push("database");
        }
        if self.user.trim().is_empty() {
            missing.push("user");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }
}

// Password must never appear in logs or error output.
impl fmt::Debug for TenantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
