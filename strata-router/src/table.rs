//! The entity classification table.
//!
//! Maps an entity's owning namespace (the app/module label) to the
//! database class it lives in. The mapping is total: anything not
//! registered resolves to [`Scope::System`], so no entity is ever left
//! unrouted. Conflicting registrations are rejected when the table is
//! built, not discovered at query time.

use indexmap::IndexMap;
use thiserror::Error;

/// Which database class a namespace belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The shared system database (auth, sessions, admin).
    System,
    /// The per-tenant database.
    Tenant,
}

/// Errors raised while building a routing table.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RoutingError {
    /// A namespace was registered under both scopes.
    #[error("namespace '{namespace}' registered as both system and tenant")]
    ConflictingScope {
        /// The doubly-registered namespace.
        namespace: String,
    },

    /// The table has no entries at all.
    #[error("routing table is empty")]
    Empty,
}

/// Static mapping from namespace to [`Scope`].
#[derive(Debug, Clone)]
pub struct RoutingTable {
    entries: IndexMap<String, Scope>,
}

impl RoutingTable {
    /// Start building a table.
    pub fn builder() -> RoutingTableBuilder {
        RoutingTableBuilder::default()
    }

    /// The classification used by the business administration backend.
    ///
    /// System: framework auth/session/admin namespaces. Tenant: every
    /// business-data namespace.
    pub fn business_defaults() -> Self {
        Self::builder()
            .system_namespaces(["admin", "auth", "contenttypes", "sessions", "messages"])
            .tenant_namespaces([
                "common",
                "inventory",
                "financial",
                "laundry",
                "restaurant",
                "reports",
            ])
            .build()
            .expect("default table has no conflicts")
    }

    /// Classify a namespace. Unrecognized namespaces are [`Scope::System`].
    pub fn classify(&self, namespace: &str) -> Scope {
        self.entries.get(namespace).copied().unwrap_or(Scope::System)
    }

    /// Whether the namespace is explicitly registered.
    pub fn is_registered(&self, namespace: &str) -> bool {
        self.entries.contains_key(namespace)
    }

    /// Iterate over all registered namespaces and their scopes.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Scope)> {
        self.entries.iter().map(|(ns, scope)| (ns.as_str(), *scope))
    }

    /// Number of registered namespaces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`RoutingTable`].
#[derive(Debug, Default)]
pub struct RoutingTableBuilder {
    entries: IndexMap<String, Scope>,
    conflict: Option<String>,
}

impl RoutingTableBuilder {
    /// Register a namespace as system-scoped.
    pub fn system_namespace(self, namespace: impl Into<String>) -> Self {
        self.insert(namespace.into(), Scope::System)
    }

    /// Register several namespaces as system-scoped.
    pub fn system_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for ns in namespaces {
            self = self.insert(ns.into(), Scope::System);
        }
        self
    }

    /// Register a namespace as tenant-scoped.
    pub fn tenant_namespace(self, namespace: impl Into<String>) -> Self {
        self.insert(namespace.into(), Scope::Tenant)
    }

    /// Register several namespaces as tenant-scoped.
    pub fn tenant_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for ns in namespaces {
            self = self.insert(ns.into(), Scope::Tenant);
        }
        self
    }

    fn insert(mut self, namespace: String, scope: Scope) -> Self {
        if let Some(existing) = self.entries.get(&namespace) {
            if *existing != scope && self.conflict.is_none() {
                self.conflict = Some(namespace.clone());
            }
        }
        self.entries.insert(namespace, scope);
        self
    }

    /// Build the table, rejecting conflicting or empty registrations.
    pub fn build(self) -> Result<RoutingTable, RoutingError> {
        if let Some(namespace) = self.conflict {
            return Err(RoutingError::ConflictingScope { namespace });
        }
        if self.entries.is_empty() {
            return Err(RoutingError::Empty);
        }
        Ok(RoutingTable {
            entries: self.entries,
        })
    }
}
