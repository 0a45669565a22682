//! Axum framework integration for Strata tenant provisioning.
//!
//! This crate is the narrow interface through which a web application's
//! view layer reaches the provisioning core:
//!
//! - **[`StrataLayer`]**: Tower layer that provisions the tenant
//!   connection before the inner service runs
//! - **[`DbContext`]**: extractor yielding the request's [`Provisioned`]
//!   context in handlers
//! - **[`handle_db_error`]**: maps data-access failures to HTTP responses
//!   and discards broken connections
//!
//! The layer reads the request path and the session state (an
//! `Arc<dyn SessionState>` request extension installed by the session
//! middleware), runs the pipeline, stores the [`Provisioned`] outcome in
//! the request extensions, and drives the inner service inside the
//! request's tenant-context scope. A missing session extension degrades
//! to the default connection; provisioning never rejects a request.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use std::sync::Arc;
//! use strata_axum::{DbContext, StrataLayer};
//! use strata_provision::Provisioner;
//!
//! async fn list_customers(DbContext(db): DbContext) -> String {
//!     format!("querying {}", db.descriptor.to_url())
//! }
//!
//! let provisioner = Arc::new(Provisioner::new());
//! let app: Router = Router::new()
//!     .route("/customers", get(list_customers))
//!     .layer(StrataLayer::new(provisioner));
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::FromRequestParts;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tower::{Layer, Service};
use tracing::debug;

use strata_core::error::DbError;
use strata_provision::{Provisioned, Provisioner, SessionState, UnavailableSession};

/// Errors that can occur during Strata-Axum integration.
#[derive(Error, Debug)]
pub enum StrataAxumError {
    /// A handler asked for the database context before the layer ran.
    #[error("request was not provisioned; is StrataLayer installed?")]
    NotProvisioned,
}

impl IntoResponse for StrataAxumError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Tower layer that provisions the tenant connection per request.
#[derive(Clone)]
pub struct StrataLayer {
    provisioner: Arc<Provisioner>,
}

impl StrataLayer {
    /// Create a new layer around a provisioner.
    pub fn new(provisioner: Arc<Provisioner>) -> Self {
        Self { provisioner }
    }

    /// The underlying provisioner.
    pub fn provisioner(&self) -> &Provisioner {
        &self.provisioner
    }
}

impl<S> Layer<S> for StrataLayer {
    type Service = StrataMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        StrataMiddleware {
            inner,
            provisioner: Arc::clone(&self.provisioner),
        }
    }
}

/// Tower middleware service wrapping the provisioning pipeline.
#[derive(Clone)]
pub struct StrataMiddleware<S> {
    inner: S,
    provisioner: Arc<Provisioner>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for StrataMiddleware<S>
where
    S: Service<Request<ReqBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future =
        Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send + 'static>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        // Take the ready inner service, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let provisioner = Arc::clone(&self.provisioner);

        Box::pin(async move {
            let path = request.uri().path().to_string();
            let session = request
                .extensions()
                .get::<Arc<dyn SessionState>>()
                .cloned();

            // No session middleware upstream counts as an unavailable
            // store: degrade to the default connection.
            let provisioned = match &session {
                Some(session) => provisioner.provision(&path, session.as_ref()),
                None => provisioner.provision(&path, &UnavailableSession),
            };
            debug!(path = %path, route = ?provisioned.route, "request provisioned");

            request.extensions_mut().insert(provisioned.clone());
            provisioned.scope(inner.call(request)).await
        })
    }
}

/// Extractor for the request's provisioned database context.
///
/// # Example
///
/// ```rust,ignore
/// use strata_axum::DbContext;
///
/// async fn handler(DbContext(db): DbContext) -> String {
///     db.alias.to_string()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DbContext(pub Provisioned);

impl<S> FromRequestParts<S> for DbContext
where
    S: Send + Sync,
{
    type Rejection = StrataAxumError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Provisioned>()
            .cloned()
            .map(DbContext)
            .ok_or(StrataAxumError::NotProvisioned)
    }
}

/// Map a data-access failure to an HTTP response.
///
/// Invokes the provisioner's error hook (discarding broken connections)
/// and returns a response whose message is actionable but never contains
/// credentials.
pub fn handle_db_error(provisioner: &Provisioner, err: &DbError) -> Response {
    provisioner.on_request_error(err);

    let status = match err {
        DbError::BadAuth { .. } => StatusCode::UNAUTHORIZED,
        DbError::Timeout { .. } | DbError::Refused { .. } | DbError::Connection(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        DbError::MissingObject { .. } | DbError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string()).into_response()
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{handle_db_error, DbContext, StrataAxumError, StrataLayer, StrataMiddleware};
    pub use strata_provision::prelude::*;
}
