//! Built route tree.
//!
//! # Responsibilities
//! - Own the root node produced by the builder
//! - Dispatch requests and build URIs from dotted route paths
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Explicit `None` for unmatched requests rather than a silent default

use crate::http::{Params, Request, Response, Uri};
use crate::routing::{Route, RouteRef, RoutingResult};

/// Root of a built tree.
#[derive(Clone)]
pub struct Router {
    root: RouteRef,
}

impl Router {
    pub fn new(root: RouteRef) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &RouteRef {
        &self.root
    }

    /// Builds the URI of the route at `path` (e.g. `admin.users.get`).
    pub fn uri_for(&self, path: &str, params: &Params) -> RoutingResult<Uri> {
        self.root.select(path)?.uri(Uri::new(), params)
    }
}

impl Route for Router {
    fn forward(&self, request: Request) -> Option<Response> {
        self.root.forward(request)
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        self.root.select(path)
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.root.uri(prototype, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PathPattern;
    use crate::routing::gates::PatternGate;
    use crate::routing::splitters::PathSwitch;
    use crate::routing::test_support::{request, tag_of, tagged};
    use axum::http::Method;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn router() -> Router {
        let api = PathSwitch::new(
            HashMap::from([("status".to_string(), tagged("status"))]),
            None,
        );
        let root = PatternGate::new(Arc::new(PathPattern::new("/api")), Arc::new(api));
        Router::new(Arc::new(root))
    }

    #[test]
    fn test_forward_and_uri_for() {
        let router = router();
        let status = router.forward(request(Method::GET, "/api/status"));
        assert_eq!(tag_of(status), Some("status".into()));
        assert!(router.forward(request(Method::GET, "/api/other")).is_none());
        assert_eq!(router.uri_for("status", &Params::new()).unwrap().path(), "/api/status");
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}
