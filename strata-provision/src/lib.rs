//! # strata-provision
//!
//! Request-scoped tenant connection provisioning.
//!
//! Once per inbound request, before any data access, the
//! [`Provisioner`] establishes which database the request's tenant data
//! lives in:
//!
//! 1. paths on the allow-list (login, static assets) skip session access
//!    entirely and get the default connection;
//! 2. otherwise tenant credentials are read from session state and, when
//!    complete, turned into a fresh connection descriptor;
//! 3. any failure along the way (store unavailable, fields missing)
//!    degrades to the default connection; provisioning never fails.
//!
//! The outcome is a [`Provisioned`] request context carrying the live
//! descriptor, plus the tenant context store set for downstream routing.
//!
//! ## Example
//!
//! ```rust
//! use strata_provision::{MemorySession, Provisioner};
//! use strata_core::MapEnvSource;
//!
//! let provisioner = Provisioner::builder()
//!     .env(MapEnvSource::new().set("DB_HOST", "db.internal"))
//!     .build();
//!
//! // Authenticated request: session carries the tenant's credentials.
//! let session = MemorySession::new()
//!     .with_credentials("db.acme.example", "acme", "acme_app", "s3cret");
//! let provisioned = provisioner.provision("/customers/", &session);
//! assert_eq!(provisioned.descriptor.host, "db.acme.example");
//!
//! // Login page: no tenant yet, default connection.
//! let provisioned = provisioner.provision("/login/", &MemorySession::new());
//! assert_eq!(provisioned.descriptor.host, "db.internal");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod paths;
pub mod pipeline;
pub mod registry;
pub mod session;

pub use paths::PathPolicy;
pub use pipeline::{Provisioned, Provisioner, ProvisionerBuilder, ProvisionRoute};
pub use registry::ConnectionRegistry;
pub use session::{
    read_credentials, CredentialOutcome, MemorySession, SessionError, SessionState,
    UnavailableSession, KEY_DB_HOST, KEY_DB_NAME, KEY_DB_PASSWORD, KEY_DB_USER,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::paths::PathPolicy;
    pub use crate::pipeline::{Provisioned, Provisioner, ProvisionRoute};
    pub use crate::registry::ConnectionRegistry;
    pub use crate::session::{CredentialOutcome, MemorySession, SessionError, SessionState};
}
