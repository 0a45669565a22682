//! Session state access and credential extraction.
//!
//! The session backing store lives in the system database and is an
//! external collaborator: the pipeline only reads a handful of string
//! keys through the [`SessionState`] seam. Reading can fail while the
//! store itself is unavailable (typically before its schema is migrated);
//! that outcome is a normal branch of provisioning, not an error that
//! propagates to the user.

use std::collections::HashMap;

use strata_core::credentials::TenantCredentials;
use thiserror::Error;

/// Session key holding the tenant database host.
pub const KEY_DB_HOST: &str = "db_host";
/// Session key holding the tenant database name.
pub const KEY_DB_NAME: &str = "db_name";
/// Session key holding the tenant database user.
pub const KEY_DB_USER: &str = "db_user";
/// Session key holding the tenant database password.
pub const KEY_DB_PASSWORD: &str = "db_password";

/// Errors raised by a session backing store.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    /// The backing store cannot be reached or is not yet migrated.
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to per-request session state.
pub trait SessionState: Send + Sync {
    /// Get a session value by key.
    ///
    /// `Ok(None)` means the key is simply absent; `Err` means the store
    /// itself could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
}

/// In-memory session state, for tests and standalone use.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    values: HashMap<String, String>,
}

impl MemorySession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Add the four tenant credential keys at once.
    pub fn with_credentials(
        self,
        host: impl Into<String>,
        name: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.set(KEY_DB_HOST, host)
            .set(KEY_DB_NAME, name)
            .set(KEY_DB_USER, user)
            .set(KEY_DB_PASSWORD, password)
    }
}

impl SessionState for MemorySession {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.values.get(key).cloned())
    }
}

/// A session whose backing store is down; every read fails.
///
/// Stands in for a real store before its schema exists.
#[derive(Debug, Clone, Default)]
pub struct UnavailableSession;

impl SessionState for UnavailableSession {
    fn get(&self, _key: &str) -> Result<Option<String>, SessionError> {
        Err(SessionError::Unavailable(
            "session table does not exist".to_string(),
        ))
    }
}

/// Result of extracting tenant credentials from session state.
///
/// Incomplete credentials and an unreadable store are distinct outcomes;
/// the caller decides what each one means.
#[derive(Debug, Clone)]
pub enum CredentialOutcome {
    /// All four credential fields present and non-empty.
    Complete(TenantCredentials),
    /// One or more fields absent or empty.
    Incomplete,
    /// The session store itself could not be read.
    Unavailable(SessionError),
}

/// Read tenant credentials from session state.
pub fn read_credentials(session: &dyn SessionState) -> CredentialOutcome {
    let get = |key: &str| session.get(key);

    let (host, name, user, password) = match (
        get(KEY_DB_HOST),
        get(KEY_DB_NAME),
        get(KEY_DB_USER),
        get(KEY_DB_PASSWORD),
    ) {
        (Ok(h), Ok(n), Ok(u), Ok(p)) => (h, n, u, p),
        (Err(e), ..) | (_, Err(e), ..) | (_, _, Err(e), _) | (_, _, _, Err(e)) => {
            return CredentialOutcome::Unavailable(e);
        }
    };

    let creds = TenantCredentials::new(
        host.unwrap_or_default(),
        name.unwrap_or_default(),
        user.unwrap_or_default(),
        password.unwrap_or_default(),
    );

    if creds.is_complete() {
        CredentialOutcome::Complete(creds)
    } else {
        CredentialOutcome::Incomplete
    }
}
