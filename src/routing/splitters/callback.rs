//! Callback-keyed switch.

use std::collections::HashMap;
use std::sync::Arc;

use crate::http::{Params, Request, Response, Uri};
use crate::routing::route::{select_tail, split_path};
use crate::routing::{Route, RouteRef, RoutingError, RoutingResult};

/// Computes the dispatch key of a request.
pub type KeyFn = Arc<dyn Fn(&Request) -> String + Send + Sync>;

/// Dispatches on a key computed by a user callback.
#[derive(Clone)]
pub struct CallbackSwitch {
    key: KeyFn,
    routes: HashMap<String, RouteRef>,
    implicit: Option<String>,
}

impl CallbackSwitch {
    pub fn new(key: KeyFn, routes: HashMap<String, RouteRef>, implicit: Option<String>) -> Self {
        Self {
            key,
            routes,
            implicit,
        }
    }
}

impl Route for CallbackSwitch {
    fn forward(&self, request: Request) -> Option<Response> {
        let key = (self.key)(&request);
        tracing::trace!(key = %key, "Callback switch dispatch");
        self.routes.get(&key)?.forward(request)
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        let (segment, tail) = split_path(path)?;
        let route = self
            .routes
            .get(segment)
            .ok_or_else(|| RoutingError::not_found(segment))?;
        select_tail(route, tail)
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.implicit
            .as_ref()
            .and_then(|key| self.routes.get(key))
            .ok_or(RoutingError::AmbiguousEndpoint)?
            .uri(prototype, params)
    }
}
