//! HTTP method switch.

use std::sync::Arc;

use axum::http::Method;

use crate::http::{Params, Request, Response, Uri};
use crate::routing::gates::MethodGate;
use crate::routing::route::{select_tail, split_path};
use crate::routing::splitters::probe_methods;
use crate::routing::{Route, RouteRef, RoutingError, RoutingResult};

/// Dispatches on the request method.
///
/// Routes are kept in registration order, which is also the order of the
/// `Allow` header produced for OPTIONS.
#[derive(Clone, Default)]
pub struct MethodSwitch {
    routes: Vec<(Method, RouteRef)>,
    implicit: Option<Method>,
}

impl MethodSwitch {
    pub fn new(routes: Vec<(Method, RouteRef)>, implicit: Option<Method>) -> Self {
        Self { routes, implicit }
    }

    fn route(&self, method: &Method) -> Option<&RouteRef> {
        self.routes
            .iter()
            .find(|(registered, _)| registered == method)
            .map(|(_, route)| route)
    }
}

impl Route for MethodSwitch {
    fn forward(&self, request: Request) -> Option<Response> {
        if let Some(route) = self.route(request.method()) {
            return route.forward(request);
        }
        if request.method() == Method::OPTIONS {
            return probe_methods(
                &request,
                self.routes.iter().map(|(method, route)| (method, route)),
            );
        }
        None
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        let (segment, tail) = split_path(path)?;
        let method = Method::from_bytes(segment.to_ascii_uppercase().as_bytes())
            .map_err(|_| RoutingError::not_found(segment))?;
        let route = self
            .route(&method)
            .ok_or_else(|| RoutingError::not_found(segment))?;
        let selected = select_tail(route, tail)?;
        Ok(Arc::new(MethodGate::new(vec![method], selected)))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.implicit
            .as_ref()
            .and_then(|method| self.route(method))
            .ok_or(RoutingError::AmbiguousEndpoint)?
            .uri(prototype, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::test_support::{allow_header, request, tag_of, tagged};
    use axum::http::StatusCode;

    fn switch() -> MethodSwitch {
        MethodSwitch::new(
            vec![
                (Method::PATCH, tagged("patch")),
                (Method::PUT, tagged("put")),
                (Method::DELETE, tagged("delete")),
            ],
            None,
        )
    }

    #[test]
    fn test_dispatch_by_method() {
        let switch = switch();
        assert_eq!(tag_of(switch.forward(request(Method::PUT, "/"))), Some("put".into()));
        assert!(switch.forward(request(Method::GET, "/")).is_none());
    }

    #[test]
    fn test_options_allow_in_registration_order() {
        let options = request(Method::OPTIONS, "/").with_allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
        ]);
        let response = switch().forward(options).unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(allow_header(Some(response)), Some("PATCH, PUT".into()));
    }

    #[test]
    fn test_options_without_candidates_is_unmatched() {
        let options = request(Method::OPTIONS, "/").with_allowed_methods(vec![Method::GET]);
        assert!(switch().forward(options).is_none());
    }

    #[test]
    fn test_options_skips_unreachable_children() {
        let options = request(Method::OPTIONS, "/deeper");
        assert!(switch().forward(options).is_none());
    }

    #[test]
    fn test_registered_options_is_delegated() {
        let switch = MethodSwitch::new(vec![(Method::OPTIONS, tagged("options"))], None);
        assert_eq!(tag_of(switch.forward(request(Method::OPTIONS, "/"))), Some("options".into()));
    }

    #[test]
    fn test_select_gates_method() {
        let selected = switch().select("put").unwrap();
        assert!(selected.forward(request(Method::PUT, "/")).is_some());
        assert!(selected.forward(request(Method::PATCH, "/")).is_none());
        assert_eq!(switch().select("GET").unwrap_err(), RoutingError::not_found("GET"));
    }

    #[test]
    fn test_uri_requires_implicit_method() {
        assert_eq!(
            switch().uri(Uri::new(), &Params::new()).unwrap_err(),
            RoutingError::AmbiguousEndpoint
        );
        let implicit = MethodSwitch::new(vec![(Method::GET, tagged("get"))], Some(Method::GET));
        assert!(implicit.uri(Uri::new(), &Params::new()).is_ok());
    }
}
