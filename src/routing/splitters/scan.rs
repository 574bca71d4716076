//! Sequential scan switch.

use crate::http::{Params, Request, Response, Uri};
use crate::routing::route::{select_tail, split_path};
use crate::routing::{Route, RouteRef, RoutingError, RoutingResult};

/// Tries children in declared order; the first one that answers wins.
///
/// The default route, when present, is always tried first and is the one
/// used to build URIs.
#[derive(Clone, Default)]
pub struct ScanSwitch {
    routes: Vec<(String, RouteRef)>,
    default: Option<RouteRef>,
}

impl ScanSwitch {
    pub fn new(routes: Vec<(String, RouteRef)>, default: Option<RouteRef>) -> Self {
        Self { routes, default }
    }
}

impl Route for ScanSwitch {
    fn forward(&self, request: Request) -> Option<Response> {
        self.default
            .iter()
            .chain(self.routes.iter().map(|(_, route)| route))
            .find_map(|route| route.forward(request.clone()))
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        let (segment, tail) = split_path(path)?;
        match self.routes.iter().find(|(name, _)| name == segment) {
            Some((_, route)) => select_tail(route, tail),
            None => match &self.default {
                Some(default) => default.select(path),
                None => Err(RoutingError::not_found(segment)),
            },
        }
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.default
            .as_ref()
            .ok_or(RoutingError::AmbiguousEndpoint)?
            .uri(prototype, params)
    }
}
