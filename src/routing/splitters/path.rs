//! Path segment switch.

use std::collections::HashMap;
use std::sync::Arc;

use crate::http::{Params, Request, Response, Uri};
use crate::pattern::PathPattern;
use crate::routing::gates::PatternGate;
use crate::routing::route::{select_tail, split_path};
use crate::routing::{Route, RouteRef, RoutingError, RoutingResult};

/// Route path segment selecting the root child of a [`PathSwitch`].
pub const ROOT_PATH: &str = "ROOT";

/// Dispatches on the next unconsumed path segment.
#[derive(Clone, Default)]
pub struct PathSwitch {
    routes: HashMap<String, RouteRef>,
    root: Option<RouteRef>,
}

impl PathSwitch {
    pub fn new(routes: HashMap<String, RouteRef>, root: Option<RouteRef>) -> Self {
        Self { routes, root }
    }
}

impl Route for PathSwitch {
    fn forward(&self, request: Request) -> Option<Response> {
        let remaining = request.remaining_path();
        let Some((segment, rest)) = remaining.split_first() else {
            return self.root.as_ref()?.forward(request);
        };
        let route = self.routes.get(segment)?;
        tracing::trace!(segment = %segment, "Path switch dispatch");
        route.forward(request.with_remaining_path(rest.to_vec()))
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        let (segment, tail) = split_path(path)?;
        if segment == ROOT_PATH {
            if let Some(root) = &self.root {
                return select_tail(root, tail);
            }
        }
        let route = self
            .routes
            .get(segment)
            .ok_or_else(|| RoutingError::not_found(segment))?;
        let selected = select_tail(route, tail)?;
        Ok(Arc::new(PatternGate::new(
            Arc::new(PathPattern::segment(segment)),
            selected,
        )))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        match &self.root {
            Some(root) => root.uri(prototype, params),
            None => Err(RoutingError::AmbiguousEndpoint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::test_support::{request, tag_of, tagged};
    use axum::http::Method;

    fn switch() -> PathSwitch {
        let nested = PathSwitch::new(
            HashMap::from([("list".to_string(), tagged("users.list"))]),
            Some(tagged("users.root")),
        );
        PathSwitch::new(
            HashMap::from([
                ("users".to_string(), Arc::new(nested) as RouteRef),
                ("about".to_string(), tagged("about")),
            ]),
            Some(tagged("home")),
        )
    }

    #[test]
    fn test_dispatch_by_segment() {
        let switch = switch();
        for (uri, expected) in [
            ("/about", "about"),
            ("/users/list", "users.list"),
            ("/users", "users.root"),
            ("/", "home"),
        ] {
            let response = switch.forward(request(Method::GET, uri));
            assert_eq!(tag_of(response), Some(expected.into()), "{}", uri);
        }
        assert!(switch.forward(request(Method::GET, "/missing")).is_none());
        assert!(switch.forward(request(Method::GET, "/about/more")).is_none());
    }

    #[test]
    fn test_select_builds_segment_path() {
        let switch = switch();
        let selected = switch.select("users.list").unwrap();
        assert_eq!(selected.uri(Uri::new(), &Params::new()).unwrap().path(), "/users/list");

        let stepwise = switch.select("users").unwrap().select("list").unwrap();
        assert_eq!(stepwise.uri(Uri::new(), &Params::new()).unwrap().path(), "/users/list");
    }

    #[test]
    fn test_selected_node_still_forwards() {
        let selected = switch().select("users.list").unwrap();
        assert!(selected.forward(request(Method::GET, "/users/list")).is_some());
        assert!(selected.forward(request(Method::GET, "/about")).is_none());
    }

    #[test]
    fn test_select_errors() {
        let switch = switch();
        assert_eq!(switch.select("").unwrap_err(), RoutingError::EmptySelectPath);
        assert_eq!(switch.select("nope").unwrap_err(), RoutingError::not_found("nope"));
    }

    #[test]
    fn test_uri_uses_root_only() {
        let switch = switch();
        assert_eq!(switch.uri(Uri::new(), &Params::new()).unwrap(), Uri::new());

        let rootless = PathSwitch::new(HashMap::new(), None);
        assert_eq!(
            rootless.uri(Uri::new(), &Params::new()).unwrap_err(),
            RoutingError::AmbiguousEndpoint
        );
    }
}
