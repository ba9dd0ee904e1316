//! Axum web framework integration.
//!
//! Gives every request its own scope:
//! - [`ScopeLayer`] forks the root registry once per request and stores the
//!   scope in the request extensions
//! - [`RequestRegistry`] extracts that scope in handlers
//!
//! The scope is dropped with the request, taking its Scoped instances
//! along; Singletons stay cached on the root.
//!
//! ```rust,no_run
//! use axum::{routing::get, Router};
//! use ioc_registry::axum_integration::{RequestRegistry, ScopeLayer};
//! use ioc_registry::{Registry, RegistrationMode, Resolver};
//! use std::sync::Arc;
//!
//! async fn handler(registry: RequestRegistry) -> String {
//!     registry.get::<String>().map(|s| s.to_string()).unwrap_or_default()
//! }
//!
//! let mut root = Registry::new();
//! root.register_scoped::<String>(RegistrationMode::Safe).unwrap();
//!
//! let app: Router = Router::new()
//!     .route("/", get(handler))
//!     .layer(ScopeLayer::new(Arc::new(root)));
//! ```

use std::ops::Deref;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, Request, StatusCode},
    Router,
};
use tower::{Layer, Service};

use crate::Registry;

/// Forked registry of the current request.
///
/// Cheap to clone; derefs to [`Registry`], so resolve on it directly.
#[derive(Clone, Debug)]
pub struct RequestRegistry(Arc<Registry>);

impl RequestRegistry {
    /// Wraps a scope. [`ScopeLayer`] does this for every request.
    pub fn new(scope: Registry) -> Self {
        Self(Arc::new(scope))
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.0
    }
}

impl Deref for RequestRegistry {
    type Target = Registry;

    fn deref(&self) -> &Registry {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestRegistry
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestRegistry>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Request registry not found in extensions. Make sure ScopeLayer is installed",
        ))
    }
}

/// Layer forking a root registry once per request.
#[derive(Clone, Debug)]
pub struct ScopeLayer {
    root: Arc<Registry>,
}

impl ScopeLayer {
    pub fn new(root: Arc<Registry>) -> Self {
        Self { root }
    }
}

impl<S> Layer<S> for ScopeLayer {
    type Service = ScopeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ScopeService {
            inner,
            root: Arc::clone(&self.root),
        }
    }
}

/// Service produced by [`ScopeLayer`].
#[derive(Clone, Debug)]
pub struct ScopeService<S> {
    inner: S,
    root: Arc<Registry>,
}

impl<S, B> Service<Request<B>> for ScopeService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        match self.root.fork() {
            Ok(scope) => {
                request.extensions_mut().insert(RequestRegistry::new(scope));
            }
            // Handlers extracting RequestRegistry answer 500 in this case.
            Err(err) => tracing::warn!(error = %err, "failed to fork request scope"),
        }
        self.inner.call(request)
    }
}

/// Installs a [`ScopeLayer`] on `router`.
pub fn with_request_scopes<S>(router: Router<S>, root: Arc<Registry>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(ScopeLayer::new(root))
}
