//! Method gate.

use std::str::FromStr;
use std::sync::Arc;

use axum::http::Method;

use crate::http::{Params, Request, Response, Uri};
use crate::routing::{Route, RouteRef, RoutingError, RoutingResult};

/// Parses a pipe-delimited method list such as `GET|POST`.
pub fn parse_methods(methods: &str) -> RoutingResult<Vec<Method>> {
    let parsed = methods
        .split('|')
        .map(str::trim)
        .map(|name| {
            if name.is_empty() {
                return Err(RoutingError::InvalidMethod(methods.to_string()));
            }
            Method::from_str(&name.to_ascii_uppercase())
                .map_err(|_| RoutingError::InvalidMethod(name.to_string()))
        })
        .collect::<RoutingResult<Vec<_>>>()?;
    Ok(parsed)
}

/// Lets requests through only for the allowed methods.
///
/// OPTIONS requests are routed by capability unless OPTIONS is itself
/// allowed: the candidate methods carried by the request are intersected
/// with the allowed ones and, when something is left, the narrowed request
/// continues down the tree. Nested gates thereby compute the `Allow` set
/// together.
#[derive(Clone)]
pub struct MethodGate {
    methods: Vec<Method>,
    route: RouteRef,
}

impl MethodGate {
    pub fn new(methods: Vec<Method>, route: RouteRef) -> Self {
        Self { methods, route }
    }

    pub fn parse(methods: &str, route: RouteRef) -> RoutingResult<Self> {
        Ok(Self::new(parse_methods(methods)?, route))
    }

    fn options(&self, request: Request) -> Option<Response> {
        let narrowed: Vec<Method> = request
            .allowed_methods()
            .into_iter()
            .filter(|method| self.methods.contains(method))
            .collect();
        if narrowed.is_empty() {
            return None;
        }
        self.route.forward(request.with_allowed_methods(narrowed))
    }
}

impl Route for MethodGate {
    fn forward(&self, request: Request) -> Option<Response> {
        if request.method() == Method::OPTIONS && !self.methods.contains(&Method::OPTIONS) {
            return self.options(request);
        }
        if self.methods.contains(request.method()) {
            self.route.forward(request)
        } else {
            None
        }
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        Ok(Arc::new(Self::new(self.methods.clone(), self.route.select(path)?)))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.route.uri(prototype, params)
    }
}
