//! Execution-unit-scoped storage for the active tenant database alias.
//!
//! Each in-flight request runs on its own execution unit (a thread for
//! sync handlers, a tokio task for async ones), and its tenant selection
//! must never be observable from another unit. Async code uses a tokio
//! task-local that survives `.await` points; sync code uses a
//! thread-local. [`get_active_tenant_db`] checks the task-local first, so
//! a handler running on a shared worker thread never reads a stale value
//! left behind by another task.
//!
//! # Example
//!
//! ```rust
//! use strata_core::context::{get_active_tenant_db, scope_tenant_db};
//! use strata_core::DbAlias;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let alias = scope_tenant_db(DbAlias::new("acme_db"), async {
//!     get_active_tenant_db()
//! })
//! .await;
//! assert_eq!(alias.as_str(), "acme_db");
//! # }
//! ```

use std::cell::Cell;
use std::future::Future;

use crate::alias::DbAlias;

tokio::task_local! {
    /// Task-local tenant database alias.
    static ACTIVE_TENANT_DB: DbAlias;
}

thread_local! {
    /// Thread-local tenant database alias for sync code paths.
    static SYNC_TENANT_DB: Cell<Option<DbAlias>> = const { Cell::new(None) };
}

/// Set the active tenant database alias for the current thread.
///
/// Subsequent [`get_active_tenant_db`] calls on the same thread observe
/// this alias until it is overwritten or cleared. Other threads are
/// unaffected.
pub fn set_active_tenant_db(alias: DbAlias) {
    SYNC_TENANT_DB.with(|cell| cell.set(Some(alias)));
}

/// Get the active tenant database alias for the current execution unit.
///
/// Resolution order: task-local (async scope), then thread-local, then
/// the fixed tenant alias. Never fails.
pub fn get_active_tenant_db() -> DbAlias {
    if let Ok(alias) = ACTIVE_TENANT_DB.try_with(|a| a.clone()) {
        return alias;
    }
    SYNC_TENANT_DB
        .with(|cell| {
            let current = cell.take();
            cell.set(current.clone());
            current
        })
        .unwrap_or_else(DbAlias::tenant)
}

/// Clear the thread-local tenant alias.
pub fn clear_active_tenant_db() {
    SYNC_TENANT_DB.with(|cell| cell.set(None));
}

/// Run a future with the given tenant alias active.
///
/// The alias is visible to all nested calls, including across `.await`
/// points, and is dropped when the future completes.
pub async fn scope_tenant_db<F, T>(alias: DbAlias, f: F) -> T
where
    F: Future<Output = T>,
{
    ACTIVE_TENANT_DB.scope(alias, f).await
}

/// Set the tenant alias for sync code, restoring the previous value on drop.
///
/// # Example
///
/// ```rust
/// use strata_core::context::{get_active_tenant_db, TenantDbScope};
/// use strata_core::DbAlias;
///
/// {
///     let _scope = TenantDbScope::enter(DbAlias::new("acme_db"));
///     assert_eq!(get_active_tenant_db().as_str(), "acme_db");
/// }
/// // previous value restored here
/// ```
pub struct TenantDbScope {
    previous: Option<DbAlias>,
}

impl TenantDbScope {
    /// Enter a scope with the given alias active on the current thread.
    pub fn enter(alias: DbAlias) -> Self {
        let previous = SYNC_TENANT_DB.with(|cell| cell.replace(Some(alias)));
        Self { previous }
    }
}

impl Drop for TenantDbScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        SYNC_TENANT_DB.with(|cell| cell.set(previous));
    }
}
