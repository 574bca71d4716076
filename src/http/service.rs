//! Tower service boundary.
//!
//! # Responsibilities
//! - Convert `http` requests into route-tree [`Request`] values
//! - Dispatch into a built [`Router`]
//! - Translate "not matched" into `404 Not Found`
//!
//! # Design Decisions
//! - Not a server: hand the service to axum/hyper (e.g. as a fallback)
//! - The body is buffered up to a limit since the tree is synchronous
//! - OPTIONS requests get the configured implicit candidate set as a
//!   fallback, never as a narrowed set

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{header, Method, StatusCode};
use futures_util::future::BoxFuture;
use tower::Service;

use crate::config::RouterConfig;
use crate::http::request::implicit_methods;
use crate::http::{response, Request, Response};
use crate::observability::metrics::{self, Outcome};
use crate::routing::{Route, Router};

/// `tower::Service` running requests through a route tree.
#[derive(Clone)]
pub struct RouterService {
    router: Router,
    implicit_methods: Arc<Vec<Method>>,
    body_limit: usize,
    metrics_enabled: bool,
}

impl RouterService {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            implicit_methods: Arc::new(implicit_methods()),
            body_limit: 1024 * 1024,
            metrics_enabled: false,
        }
    }

    /// Applies the service and observability sections of `config`.
    pub fn with_config(mut self, config: &RouterConfig) -> Self {
        self.implicit_methods = Arc::new(config.implicit_methods());
        self.body_limit = config.service.body_limit_bytes;
        self.metrics_enabled = config.observability.metrics_enabled;
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    fn record(&self, method: &Method, outcome: Outcome, start_time: Instant) {
        if self.metrics_enabled {
            metrics::record_request(method.as_str(), outcome, start_time);
        }
    }

    fn record_options(&self, response: Option<&Response>) {
        if !self.metrics_enabled {
            return;
        }
        let allowed = response
            .and_then(|response| response.headers().get(header::ALLOW))
            .and_then(|allow| allow.to_str().ok())
            .map_or(0, |allow| allow.split(',').filter(|m| !m.trim().is_empty()).count());
        metrics::record_options_probe(allowed);
    }

    /// Dispatches one request.
    pub async fn dispatch(&self, request: axum::extract::Request) -> Response {
        let start_time = Instant::now();
        let (parts, body) = request.into_parts();
        let method = parts.method.clone();

        let body = match axum::body::to_bytes(body, self.body_limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    method = %method,
                    uri = %parts.uri,
                    error = %e,
                    "Request body rejected"
                );
                self.record(&method, Outcome::PayloadTooLarge, start_time);
                return response::empty(StatusCode::PAYLOAD_TOO_LARGE);
            }
        };

        let request = match Request::from_parts(&parts, body) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(
                    method = %method,
                    uri = %parts.uri,
                    error = %e,
                    "Invalid request URI"
                );
                self.record(&method, Outcome::BadRequest, start_time);
                return response::empty(StatusCode::BAD_REQUEST);
            }
        };
        let request = if method == Method::OPTIONS {
            request.with_implicit_methods(self.implicit_methods.to_vec())
        } else {
            request
        };

        tracing::debug!(method = %method, path = %parts.uri.path(), "Routing request");

        let response = self.router.forward(request);
        if method == Method::OPTIONS {
            self.record_options(response.as_ref());
        }
        match response {
            Some(response) => {
                self.record(&method, Outcome::Matched, start_time);
                response
            }
            None => {
                tracing::warn!(method = %method, path = %parts.uri.path(), "No route matched");
                self.record(&method, Outcome::NotFound, start_time);
                response::not_found()
            }
        }
    }
}

impl Service<axum::extract::Request> for RouterService {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: axum::extract::Request) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.dispatch(request).await) })
    }
}
