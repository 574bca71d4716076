//! Callback filter gate.

use std::sync::Arc;

use crate::http::{Params, Request, Response, Uri};
use crate::routing::{Route, RouteRef, RoutingResult};

/// Filter callback: `None` blocks the request, `Some` forwards the
/// (possibly transformed) request.
pub type FilterFn = Arc<dyn Fn(Request) -> Option<Request> + Send + Sync>;

#[derive(Clone)]
pub struct CallbackGate {
    filter: FilterFn,
    route: RouteRef,
}

impl CallbackGate {
    pub fn new(filter: FilterFn, route: RouteRef) -> Self {
        Self { filter, route }
    }
}

impl Route for CallbackGate {
    fn forward(&self, request: Request) -> Option<Response> {
        let request = (self.filter)(request)?;
        self.route.forward(request)
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        Ok(Arc::new(Self::new(self.filter.clone(), self.route.select(path)?)))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.route.uri(prototype, params)
    }
}
