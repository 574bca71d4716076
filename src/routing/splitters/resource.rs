//! REST resource switch.
//!
//! # Responsibilities
//! - Map `(method, id present?)` onto REST actions: `INDEX`/`POST` on the
//!   collection, `GET`/`PUT`/`PATCH`/`DELETE` on an item
//! - Validate the id segment and hand it to the action as attribute `id`
//! - Build collection or item URIs depending on whether `id` is supplied
//!
//! # Design Decisions
//! - `POST` on an item path never matches
//! - Anything deeper than one id segment is left unmatched; nest another
//!   switch under an action to go further

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::http::Method;
use regex::Regex;

use crate::http::uri::append_path;
use crate::http::{Params, Request, Response, Uri};
use crate::pattern::PatternRef;
use crate::routing::route::{select_tail, split_path};
use crate::routing::splitters::probe_methods;
use crate::routing::{Route, RouteRef, RoutingError, RoutingResult};

/// Request attribute and URI parameter carrying the resource id.
pub const RESOURCE_ID: &str = "id";

/// REST pseudo-method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAction {
    /// `GET` on the collection.
    Index,
    /// `POST` on the collection.
    Post,
    Get,
    Put,
    Patch,
    Delete,
}

impl ResourceAction {
    pub const ALL: [ResourceAction; 6] = [
        ResourceAction::Index,
        ResourceAction::Post,
        ResourceAction::Get,
        ResourceAction::Put,
        ResourceAction::Patch,
        ResourceAction::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceAction::Index => "INDEX",
            ResourceAction::Post => "POST",
            ResourceAction::Get => "GET",
            ResourceAction::Put => "PUT",
            ResourceAction::Patch => "PATCH",
            ResourceAction::Delete => "DELETE",
        }
    }

    /// HTTP method the action answers to.
    pub fn method(&self) -> Method {
        match self {
            ResourceAction::Index | ResourceAction::Get => Method::GET,
            ResourceAction::Post => Method::POST,
            ResourceAction::Put => Method::PUT,
            ResourceAction::Patch => Method::PATCH,
            ResourceAction::Delete => Method::DELETE,
        }
    }

    /// True for actions addressed to a single item.
    pub fn is_item(&self) -> bool {
        !matches!(self, ResourceAction::Index | ResourceAction::Post)
    }

    fn for_request(method: &Method, item: bool) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.is_item() == item && action.method() == method)
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceAction {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RoutingError::InvalidMethod(s.to_string()))
    }
}

/// Dispatches REST actions under an optional path prefix.
#[derive(Clone)]
pub struct ResourceSwitch {
    prefix: Option<PatternRef>,
    routes: Vec<(ResourceAction, RouteRef)>,
    id_pattern: Regex,
}

impl ResourceSwitch {
    pub fn new(
        prefix: Option<PatternRef>,
        routes: Vec<(ResourceAction, RouteRef)>,
        id_pattern: &str,
    ) -> RoutingResult<Self> {
        let id_pattern = Regex::new(&format!("^(?:{})$", id_pattern))
            .map_err(|e| RoutingError::InvalidPattern(format!("resource id: {}", e)))?;
        Ok(Self {
            prefix,
            routes,
            id_pattern,
        })
    }

    fn route(&self, action: ResourceAction) -> Option<&RouteRef> {
        self.routes
            .iter()
            .find(|(registered, _)| *registered == action)
            .map(|(_, route)| route)
    }

    /// The only route of the given kind, if there is exactly one.
    fn single(&self, item: bool) -> Option<&RouteRef> {
        let mut routes = self.routes.iter().filter(|(action, _)| action.is_item() == item);
        match (routes.next(), routes.next()) {
            (Some((_, route)), None) => Some(route),
            _ => None,
        }
    }

    fn has_kind(&self, item: bool) -> bool {
        self.routes.iter().any(|(action, _)| action.is_item() == item)
    }

    fn options(&self, request: &Request, item: bool) -> Option<Response> {
        let methods: Vec<(Method, &RouteRef)> = self
            .routes
            .iter()
            .filter(|(action, _)| action.is_item() == item)
            .map(|(action, route)| (action.method(), route))
            .collect();
        probe_methods(request, methods.iter().map(|(method, route)| (method, *route)))
    }
}

impl Route for ResourceSwitch {
    fn forward(&self, request: Request) -> Option<Response> {
        let request = match &self.prefix {
            Some(prefix) => prefix.matched_request(request)?,
            None => request,
        };
        let remaining = request.remaining_path();
        let (request, item) = match remaining.as_slice() {
            [] => (request, false),
            [id] if self.id_pattern.is_match(id) => {
                let id = id.clone();
                let request = request
                    .with_attribute(RESOURCE_ID, id)
                    .with_remaining_path(Vec::new());
                (request, true)
            }
            _ => return None,
        };

        if request.method() == Method::OPTIONS {
            return self.options(&request, item);
        }
        let action = ResourceAction::for_request(request.method(), item)?;
        tracing::trace!(action = %action, "Resource switch dispatch");
        self.route(action)?.forward(request)
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        let (segment, tail) = split_path(path)?;
        let action: ResourceAction = segment
            .parse()
            .map_err(|_| RoutingError::not_found(segment))?;
        let route = self
            .route(action)
            .ok_or_else(|| RoutingError::not_found(segment))?;
        let selected = select_tail(route, tail)?;
        Ok(Arc::new(Self {
            prefix: self.prefix.clone(),
            routes: vec![(action, selected)],
            id_pattern: self.id_pattern.clone(),
        }))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        let prototype = match &self.prefix {
            Some(prefix) => prefix.uri(prototype, params)?,
            None => prototype,
        };

        // Without an item route an id cannot route back, so it is ignored.
        match params.get(RESOURCE_ID).filter(|_| self.has_kind(true)) {
            Some(id) => {
                if !self.id_pattern.is_match(id) {
                    return Err(RoutingError::InvalidUriParams {
                        name: RESOURCE_ID.to_string(),
                        reason: format!("`{}` does not match `{}`", id, self.id_pattern.as_str()),
                    });
                }
                let path = append_path(prototype.path(), id);
                let uri = prototype.with_path(path);
                match self.single(true) {
                    Some(route) => route.uri(uri, params),
                    None => Ok(uri),
                }
            }
            None => {
                if !self.has_kind(false) && self.has_kind(true) {
                    return Err(RoutingError::missing_param(RESOURCE_ID));
                }
                match self.single(false) {
                    Some(route) => route.uri(prototype, params),
                    None => Ok(prototype),
                }
            }
        }
    }
}
