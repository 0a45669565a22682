//! Logical database aliases.

use std::fmt;

/// The alias of the shared system database (auth, sessions).
pub const SYSTEM_ALIAS: &str = "default";

/// The alias under which the active tenant database is registered.
pub const TENANT_ALIAS: &str = "customer_db";

/// A logical name identifying which physical database an operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DbAlias(String);

impl DbAlias {
    /// Create a new alias.
    pub fn new(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }

    /// The fixed alias of the shared system database.
    pub fn system() -> Self {
        Self::new(SYSTEM_ALIAS)
    }

    /// The fixed alias of the tenant database.
    pub fn tenant() -> Self {
        Self::new(TENANT_ALIAS)
    }

    /// Get the alias as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Check whether this is the system alias.
    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_ALIAS
    }
}

impl fmt::Display for DbAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DbAlias {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DbAlias {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<&str> for DbAlias {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
