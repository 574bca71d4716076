//! Middleware adapter gate.

use std::sync::Arc;

use crate::http::{Params, Request, Response, Uri};
use crate::routing::{Route, RouteRef, RoutingResult};

/// One-shot view of the wrapped route handed to middleware.
pub struct Next<'a> {
    route: &'a dyn Route,
}

impl<'a> Next<'a> {
    pub fn new(route: &'a dyn Route) -> Self {
        Self { route }
    }

    /// Continues down the tree. `None` means the wrapped route did not match.
    pub fn handle(self, request: Request) -> Option<Response> {
        self.route.forward(request)
    }
}

/// Conventional middleware: may inspect or transform the request, answer
/// on its own, or call `next`.
pub trait Middleware: Send + Sync {
    fn process(&self, request: Request, next: Next<'_>) -> Option<Response>;
}

/// Middleware backed by a closure.
pub struct FnMiddleware<F>(F);

impl<F> FnMiddleware<F>
where
    F: Fn(Request, Next<'_>) -> Option<Response> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(Request, Next<'_>) -> Option<Response> + Send + Sync,
{
    fn process(&self, request: Request, next: Next<'_>) -> Option<Response> {
        (self.0)(request, next)
    }
}

/// Runs the inner route through a [`Middleware`].
#[derive(Clone)]
pub struct MiddlewareGate {
    middleware: Arc<dyn Middleware>,
    route: RouteRef,
}

impl MiddlewareGate {
    pub fn new(middleware: Arc<dyn Middleware>, route: RouteRef) -> Self {
        Self { middleware, route }
    }
}

impl Route for MiddlewareGate {
    fn forward(&self, request: Request) -> Option<Response> {
        self.middleware.process(request, Next::new(self.route.as_ref()))
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        Ok(Arc::new(Self::new(self.middleware.clone(), self.route.select(path)?)))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.route.uri(prototype, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response;
    use crate::routing::test_support::{request, tag_of, tagged};
    use axum::http::{header, HeaderValue, Method, StatusCode};

    #[test]
    fn test_middleware_wraps_response() {
        let middleware = FnMiddleware::new(|request: Request, next: Next<'_>| {
            let mut response = next.handle(request)?;
            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            Some(response)
        });
        let gate = MiddlewareGate::new(Arc::new(middleware), tagged("inner"));

        let response = gate.forward(request(Method::GET, "/")).unwrap();
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(tag_of(Some(response)), Some("inner".into()));
    }

    #[test]
    fn test_middleware_can_short_circuit() {
        let middleware = FnMiddleware::new(|request: Request, next: Next<'_>| {
            if request.headers().contains_key(header::AUTHORIZATION) {
                next.handle(request)
            } else {
                Some(response::empty(StatusCode::UNAUTHORIZED))
            }
        });
        let gate = MiddlewareGate::new(Arc::new(middleware), tagged("inner"));
        let response = gate.forward(request(Method::GET, "/")).unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_unmatched_inner_passes_through() {
        let middleware = FnMiddleware::new(|request: Request, next: Next<'_>| next.handle(request));
        let gate = MiddlewareGate::new(Arc::new(middleware), tagged("inner"));
        assert!(gate.forward(request(Method::GET, "/unconsumed")).is_none());
    }
}
