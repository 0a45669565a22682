//! Error taxonomy for tenant database access.

use thiserror::Error;

/// Result type for database-access operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors surfaced by data access against a tenant connection.
///
/// Messages are mapped by cause so they are actionable, and never contain
/// credentials. Connection-class errors additionally signal that the
/// cached tenant connection must be discarded before the next request.
#[derive(Error, Debug)]
pub enum DbError {
    /// The connection attempt exceeded the configured timeout.
    #[error("connection to {host}:{port} timed out after {seconds}s")]
    Timeout {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Configured timeout in seconds.
        seconds: u64,
    },

    /// The database refused the connection.
    #[error("connection refused by {host}:{port}")]
    Refused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Authentication against the tenant database failed.
    #[error("authentication failed for user '{user}'")]
    BadAuth {
        /// Rejected username.
        user: String,
    },

    /// A relation or schema object the query needs does not exist.
    #[error("missing database object '{name}' (is the tenant database migrated?)")]
    MissingObject {
        /// Name of the missing relation or schema object.
        name: String,
    },

    /// Other connection failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DbError {
    /// Create a timeout error.
    pub fn timeout(host: impl Into<String>, port: u16, seconds: u64) -> Self {
        Self::Timeout {
            host: host.into(),
            port,
            seconds,
        }
    }

    /// Create a refused-connection error.
    pub fn refused(host: impl Into<String>, port: u16) -> Self {
        Self::Refused {
            host: host.into(),
            port,
        }
    }

    /// Create an authentication error.
    pub fn bad_auth(user: impl Into<String>) -> Self {
        Self::BadAuth { user: user.into() }
    }

    /// Create a missing-object error.
    pub fn missing_object(name: impl Into<String>) -> Self {
        Self::MissingObject { name: name.into() }
    }

    /// Create a generic connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error indicates a broken tenant connection.
    ///
    /// Covers connectivity, auth, and schema-access failures; a cached
    /// connection in any of these states must not be retried.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Refused { .. }
                | Self::BadAuth { .. }
                | Self::MissingObject { .. }
                | Self::Connection(_)
        )
    }
}
