//! # strata-core
//!
//! Core types for per-request multi-tenant database routing.
//!
//! This crate provides:
//! - Logical database aliases ([`DbAlias`]) for the shared system database
//!   and the per-request tenant database
//! - An execution-unit-scoped tenant context store ([`context`])
//! - Tenant credentials and fully-resolved connection descriptors
//!   ([`TenantCredentials`], [`ConnDescriptor`])
//! - An environment source abstraction for fallback configuration
//! - The database error taxonomy ([`DbError`])
//!
//! ## Example
//!
//! ```rust
//! use strata_core::prelude::*;
//!
//! let creds = TenantCredentials::new("db.acme.example", "acme", "acme_app", "s3cret");
//! assert!(creds.is_complete());
//!
//! let desc = ConnDescriptor::for_tenant(&creds, &DescriptorPolicy::default());
//! assert_eq!(desc.port, 5432);
//! assert_eq!(desc.connect_timeout.as_secs(), 10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod alias;
pub mod context;
pub mod credentials;
pub mod descriptor;
pub mod env;
pub mod error;

pub use alias::{DbAlias, SYSTEM_ALIAS, TENANT_ALIAS};
pub use context::{
    clear_active_tenant_db, get_active_tenant_db, scope_tenant_db, set_active_tenant_db,
    TenantDbScope,
};
pub use credentials::TenantCredentials;
pub use descriptor::{ConnDescriptor, DescriptorPolicy, DEFAULT_PORT};
pub use env::{EnvSource, MapEnvSource, StdEnvSource};
pub use error::{DbError, DbResult};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::alias::{DbAlias, SYSTEM_ALIAS, TENANT_ALIAS};
    pub use crate::context::{
        clear_active_tenant_db, get_active_tenant_db, scope_tenant_db, set_active_tenant_db,
        TenantDbScope,
    };
    pub use crate::credentials::TenantCredentials;
    pub use crate::descriptor::{ConnDescriptor, DescriptorPolicy};
    pub use crate::env::{EnvSource, MapEnvSource, StdEnvSource};
    pub use crate::error::{DbError, DbResult};
}
