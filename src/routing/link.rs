//! Forward links: write-once cells wiring one branch to another.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::http::{Params, Request, Response, Uri};
use crate::routing::{Route, RouteRef, RoutingError, RoutingResult};

/// Shared cell holding a route that may not be built yet.
///
/// Clones share the same cell. It is written once, when the owning branch
/// builds, and may be read by branches built before or after that.
#[derive(Clone, Default)]
pub struct ForwardLink {
    cell: Arc<OnceLock<RouteRef>>,
}

impl ForwardLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&RouteRef> {
        self.cell.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Writes the cell; returns `false` when it was already written.
    pub fn resolve(&self, route: RouteRef) -> bool {
        self.cell.set(route).is_ok()
    }

    /// Identity of the shared cell; equal for every clone.
    pub(crate) fn key(&self) -> usize {
        Arc::as_ptr(&self.cell) as usize
    }

    fn resolved(&self) -> RoutingResult<&RouteRef> {
        self.get().ok_or(RoutingError::UnresolvedLink)
    }
}

impl fmt::Debug for ForwardLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardLink")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Route reading its target from a [`ForwardLink`] on every call.
#[derive(Debug, Clone)]
pub struct LinkedRoute {
    link: ForwardLink,
}

impl LinkedRoute {
    pub fn new(link: ForwardLink) -> Self {
        Self { link }
    }
}

impl Route for LinkedRoute {
    fn forward(&self, request: Request) -> Option<Response> {
        match self.link.get() {
            Some(route) => route.forward(request),
            None => {
                tracing::warn!("Request reached an unresolved forward link");
                None
            }
        }
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        self.link.resolved()?.select(path)
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.link.resolved()?.uri(prototype, params)
    }
}
