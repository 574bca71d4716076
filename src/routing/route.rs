//! The node contract shared by every routing element.

use std::sync::Arc;

use crate::http::{Params, Request, Response, Uri};
use crate::routing::error::{RoutingError, RoutingResult};

/// A node of the route tree: endpoint, gate or splitter.
///
/// Nodes are immutable once built and keep no per-request state, so a tree
/// can serve concurrent requests without locking.
pub trait Route: Send + Sync {
    /// Handles the request, or returns `None` when this node does not match.
    fn forward(&self, request: Request) -> Option<Response>;

    /// Resolves a dot-separated route path to a descendant node without
    /// executing it.
    fn select(&self, path: &str) -> RoutingResult<RouteRef>;

    /// Continues building `prototype` towards this node.
    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri>;
}

/// Shared handle to a route node.
pub type RouteRef = Arc<dyn Route>;

/// Splits a route path into its first segment and the remainder.
pub(crate) fn split_path(path: &str) -> RoutingResult<(&str, Option<&str>)> {
    let (head, tail) = match path.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (path, None),
    };
    if head.is_empty() || tail == Some("") {
        return Err(RoutingError::EmptySelectPath);
    }
    Ok((head, tail))
}

/// Selects `tail` on `route`, or returns `route` itself when there is none.
pub(crate) fn select_tail(route: &RouteRef, tail: Option<&str>) -> RoutingResult<RouteRef> {
    match tail {
        Some(tail) => route.select(tail),
        None => Ok(route.clone()),
    }
}


impl std::fmt::Debug for dyn Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route").finish_non_exhaustive()
    }
}
