//! Terminal nodes.
//!
//! # Responsibilities
//! - Run a handler once the request reached the end of a branch
//! - Answer narrowed OPTIONS probes without running the handler
//! - Build redirect responses through the router's own reverse lookup
//!
//! # Design Decisions
//! - An endpoint only answers when the path has been fully consumed
//! - `select` always fails (nothing below an endpoint); `uri` returns the
//!   prototype unchanged

use std::sync::Arc;

use axum::http::{Method, StatusCode};

use crate::http::{response, Params, Request, Response, Uri};
use crate::routing::link::ForwardLink;
use crate::routing::{Route, RouteRef, RoutingError, RoutingResult};

/// Request handler capability wrapped by endpoints.
pub trait Handler: Send + Sync {
    fn handle(&self, request: Request) -> Response;
}

impl<F> Handler for F
where
    F: Fn(Request) -> Response + Send + Sync,
{
    fn handle(&self, request: Request) -> Response {
        self(request)
    }
}

/// True when nothing is left for a descendant to consume.
fn path_consumed(request: &Request) -> bool {
    request.wildcard_matched() || request.remaining_path().is_empty()
}

/// An OPTIONS request whose candidate methods were narrowed by an
/// enclosing gate or switch is a capability probe.
fn options_probe(request: &Request) -> Option<Response> {
    if request.method() != Method::OPTIONS {
        return None;
    }
    request
        .narrowed_methods()
        .map(|methods| response::options(methods))
}

/// Endpoint delegating to a [`Handler`].
#[derive(Clone)]
pub struct Endpoint {
    handler: Arc<dyn Handler>,
}

impl Endpoint {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(Request) -> Response + Send + Sync + 'static,
    {
        Self::new(Arc::new(callback))
    }
}

impl Route for Endpoint {
    fn forward(&self, request: Request) -> Option<Response> {
        if !path_consumed(&request) {
            return None;
        }
        if let Some(answer) = options_probe(&request) {
            return Some(answer);
        }
        Some(self.handler.handle(request))
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        Err(RoutingError::EndpointSelect {
            path: path.to_string(),
        })
    }

    fn uri(&self, prototype: Uri, _params: &Params) -> RoutingResult<Uri> {
        Ok(prototype)
    }
}

/// Redirects to another route of the same tree.
///
/// The router is reached through a link written when the tree finishes
/// building, so the target is resolved at call time.
pub struct RedirectEndpoint {
    router: ForwardLink,
    path: String,
    status: StatusCode,
}

impl RedirectEndpoint {
    pub fn new(router: ForwardLink, path: impl Into<String>, status: StatusCode) -> Self {
        Self {
            router,
            path: path.into(),
            status,
        }
    }

    fn location(&self) -> RoutingResult<Uri> {
        let router = self.router.get().ok_or(RoutingError::UnresolvedLink)?;
        router.select(&self.path)?.uri(Uri::new(), &Params::new())
    }
}

impl Route for RedirectEndpoint {
    fn forward(&self, request: Request) -> Option<Response> {
        if !path_consumed(&request) {
            return None;
        }
        if let Some(answer) = options_probe(&request) {
            return Some(answer);
        }
        match self.location() {
            Ok(location) => Some(response::redirect(&location.to_string(), self.status)),
            Err(e) => {
                tracing::error!(
                    target_route = %self.path,
                    error = %e,
                    "Redirect target cannot be built"
                );
                Some(response::empty(StatusCode::INTERNAL_SERVER_ERROR))
            }
        }
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        Err(RoutingError::EndpointSelect {
            path: path.to_string(),
        })
    }

    fn uri(&self, prototype: Uri, _params: &Params) -> RoutingResult<Uri> {
        Ok(prototype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    fn ok_endpoint() -> Endpoint {
        Endpoint::callback(|_| response::empty(StatusCode::OK))
    }

    #[test]
    fn test_endpoint_requires_consumed_path() {
        let endpoint = ok_endpoint();
        let root = Request::parse(Method::GET, "/").unwrap();
        assert!(endpoint.forward(root).is_some());

        let deeper = Request::parse(Method::GET, "/extra").unwrap();
        assert!(endpoint.forward(deeper).is_none());
    }

    #[test]
    fn test_endpoint_answers_probe_without_handler() {
        let endpoint = Endpoint::callback(|_| panic!("handler must not run for a probe"));
        let probe = Request::parse(Method::OPTIONS, "/")
            .unwrap()
            .with_allowed_methods(vec![Method::GET, Method::HEAD]);

        let response = endpoint.forward(probe).unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
    }

    #[test]
    fn test_plain_options_reaches_handler() {
        let endpoint = Endpoint::callback(|_| response::empty(StatusCode::ACCEPTED));
        let options = Request::parse(Method::OPTIONS, "/").unwrap();
        assert_eq!(endpoint.forward(options).unwrap().status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_endpoint_select_fails_and_uri_is_identity() {
        let endpoint = ok_endpoint();
        assert!(matches!(
            endpoint.select("child"),
            Err(RoutingError::EndpointSelect { .. })
        ));
        let prototype = Uri::new().with_path("/x");
        assert_eq!(endpoint.uri(prototype.clone(), &Params::new()).unwrap(), prototype);
    }

    #[test]
    fn test_redirect_without_router_is_server_error() {
        let redirect = RedirectEndpoint::new(ForwardLink::new(), "admin", StatusCode::FOUND);
        let response = redirect
            .forward(Request::parse(Method::GET, "/").unwrap())
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
