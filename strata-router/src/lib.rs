//! # strata-router
//!
//! System/tenant database classification and routing.
//!
//! A multi-tenant backend keeps framework data (auth, sessions, admin) in
//! one shared system database and business data in a per-tenant database.
//! This crate decides, per entity namespace, which database alias an
//! operation targets:
//!
//! - [`RoutingTable`]: explicit, exhaustive mapping from namespace to
//!   [`Scope`], with a system fallback for anything unrecognized
//! - [`DbRouter`]: read/write routing, cross-database relation checks, and
//!   migration gating
//!
//! ## Example
//!
//! ```rust
//! use strata_router::DbRouter;
//! use strata_core::DbAlias;
//!
//! let router = DbRouter::business_defaults();
//!
//! // Framework data stays on the shared system database.
//! assert_eq!(router.route_for_read("auth"), DbAlias::system());
//!
//! // Business data follows the active tenant context.
//! let db = router.route_for_read("financial");
//! assert_eq!(db, strata_core::get_active_tenant_db());
//!
//! // Migrations are gated per database.
//! assert!(router.allow_migration(&DbAlias::tenant(), "inventory"));
//! assert!(!router.allow_migration(&DbAlias::system(), "inventory"));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod router;
pub mod table;

pub use router::{DbRouter, RelationPolicy};
pub use table::{RoutingError, RoutingTable, RoutingTableBuilder, Scope};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::router::{DbRouter, RelationPolicy};
    pub use crate::table::{RoutingError, RoutingTable, Scope};
}
