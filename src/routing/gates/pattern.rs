//! Pattern gate.

use std::sync::Arc;

use crate::http::{Params, Request, Response, Uri};
use crate::pattern::PatternRef;
use crate::routing::{Route, RouteRef, RoutingResult};

/// Turns a [`Pattern`](crate::pattern::Pattern) into a route node.
///
/// Forward: the pattern must match before the inner route is tried.
/// Reverse: the pattern writes its slice first and hands the resulting
/// prototype to the inner route, so patterns compose from the root down.
#[derive(Clone)]
pub struct PatternGate {
    pattern: PatternRef,
    route: RouteRef,
}

impl PatternGate {
    pub fn new(pattern: PatternRef, route: RouteRef) -> Self {
        Self { pattern, route }
    }
}

impl Route for PatternGate {
    fn forward(&self, request: Request) -> Option<Response> {
        let request = self.pattern.matched_request(request)?;
        self.route.forward(request)
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        Ok(Arc::new(Self::new(self.pattern.clone(), self.route.select(path)?)))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        let prototype = self.pattern.uri(prototype, params)?;
        self.route.uri(prototype, params)
    }
}
