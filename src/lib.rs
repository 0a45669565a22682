//! # Strata
//!
//! Per-request dynamic database routing for multi-tenant backends.
//!
//! A multi-tenant business backend keeps each customer organization's
//! data in its own database while auth and session data stay in one
//! shared system database. Strata provides the routing core for that
//! arrangement:
//!
//! - **Provisioning** ([`provision`]): once per request, turn session
//!   credentials into a fresh, complete connection descriptor, or fall
//!   back to the default connection; a request is never failed
//! - **Context** ([`core`]): execution-unit-scoped storage of the active
//!   tenant database alias, isolated across concurrent requests
//! - **Routing** ([`router`]): per-entity classification into system vs
//!   tenant database, relation checks, and migration gating
//!
//! ## Quick Start
//!
//! ```rust
//! use strata_db::prelude::*;
//!
//! // Built once at startup.
//! let provisioner = Provisioner::new();
//! let router = DbRouter::business_defaults();
//!
//! // Once per request, before any data access.
//! let session = MemorySession::new()
//!     .with_credentials("db.acme.example", "acme", "acme_app", "s3cret");
//! let provisioned = provisioner.provision("/customers/", &session);
//!
//! // Downstream, per entity namespace.
//! assert_eq!(router.route_for_read("auth"), DbAlias::system());
//! assert_eq!(router.route_for_read("financial"), provisioned.alias);
//! ```
//!
//! Web applications plug the same pipeline in as a Tower layer via the
//! `strata-axum` crate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Core types: aliases, tenant context, credentials, descriptors, errors.
pub mod core {
    pub use strata_core::*;
}

/// Entity classification and database routing.
pub mod router {
    pub use strata_router::*;
}

/// Request-scoped tenant connection provisioning.
pub mod provision {
    pub use strata_provision::*;
}

// Re-export key types at the crate root
pub use strata_core::{ConnDescriptor, DbAlias, DbError, TenantCredentials};
pub use strata_provision::{Provisioned, Provisioner};
pub use strata_router::DbRouter;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use strata_core::prelude::*;
    pub use strata_provision::prelude::*;
    pub use strata_router::prelude::*;
}
