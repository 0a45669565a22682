//! Registry of live connection descriptors.
//!
//! Tracks the descriptor most recently installed under each alias so a
//! cached connection can be reset before new credentials take effect, or
//! discarded after a connection-class failure. The registry is not the
//! authoritative routing source for an in-flight request: each request
//! carries its own descriptor in its
//! [`Provisioned`](crate::pipeline::Provisioned) context, so concurrent
//! provisioning for different tenants cannot redirect each other's
//! queries. All access goes through a single lock keyed by alias.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use strata_core::alias::DbAlias;
use strata_core::descriptor::ConnDescriptor;
use tracing::debug;

/// Lock-guarded map of alias to live connection descriptor.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    live: RwLock<HashMap<DbAlias, Arc<ConnDescriptor>>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a descriptor under an alias, superseding any previous one.
    ///
    /// The previous entry is dropped, never merged; any connection opened
    /// from it must not be reused.
    pub fn install(&self, alias: DbAlias, descriptor: Arc<ConnDescriptor>) {
        debug!(alias = %alias, host = %descriptor.host, database = %descriptor.database, "descriptor installed");
        self.live.write().insert(alias, descriptor);
    }

    /// Drop the cached entry for an alias, forcing a fresh connection.
    pub fn reset(&self, alias: &DbAlias) {
        if self.live.write().remove(alias).is_some() {
            debug!(alias = %alias, "cached connection reset");
        }
    }

    /// Discard a known-bad entry so the next request reconfigures from
    /// scratch.
    pub fn discard(&self, alias: &DbAlias) {
        self.reset(alias);
    }

    /// The descriptor currently installed under an alias.
    pub fn current(&self, alias: &DbAlias) -> Option<Arc<ConnDescriptor>> {
        self.live.read().get(alias).cloned()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.live.read().is_empty()
    }
}
