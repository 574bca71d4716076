//! Request value passed down the route tree.
//!
//! # Responsibilities
//! - Carry method, URI, headers and body of an inbound request
//! - Hold the attribute bag nodes use to hand data to their descendants
//! - Expose typed accessors for the attributes the routing core relies on
//!
//! # Design Decisions
//! - Immutable: every `with_*` consumes the value and returns a new one
//! - Attribute bag is copy-on-write (`Arc` + `make_mut`); cloning a request
//!   for a probe or a scan is cheap and never aliases mutations
//! - Remaining path segments are derived from the URI until a node sets them

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, request::Parts, HeaderMap, Method};

use crate::http::uri::Uri;
use crate::routing::RoutingError;

/// Well-known attribute keys.
pub mod attributes {
    /// Path segments not yet consumed by a path-aware node (`Vec<String>`).
    pub const REMAINING_PATH: &str = "route_tree.remaining_path";
    /// Set once a wildcard pattern accepted the rest of the path (`bool`).
    pub const WILDCARD_MATCHED: &str = "route_tree.wildcard_matched";
    /// Path tail captured by a wildcard pattern (`String`).
    pub const WILDCARD: &str = "route_tree.wildcard";
    /// Candidate methods narrowed while answering OPTIONS (`Vec<Method>`).
    pub const ALLOWED_METHODS: &str = "route_tree.allowed_methods";
    /// Fallback candidate set for OPTIONS when nothing narrowed it yet
    /// (`Vec<Method>`).
    pub const IMPLICIT_METHODS: &str = "route_tree.implicit_methods";
}

/// Candidate methods assumed for OPTIONS when no node narrowed them yet.
pub fn implicit_methods() -> Vec<Method> {
    vec![
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
    ]
}

type AttributeValue = Arc<dyn Any + Send + Sync>;

/// Immutable request value.
#[derive(Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    attributes: Arc<HashMap<String, AttributeValue>>,
}

impl Request {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            attributes: Arc::new(HashMap::new()),
        }
    }

    /// Builds a request from a method and a URI string.
    pub fn parse(method: Method, uri: &str) -> Result<Self, RoutingError> {
        Ok(Self::new(method, uri.parse()?))
    }

    /// Converts the head of an `http` request. A missing authority is
    /// filled from the `Host` header.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Result<Self, RoutingError> {
        let mut uri = Uri::from_str(&parts.uri.to_string())?;
        if uri.host().is_empty() {
            if let Some(host) = parts.headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
                let authority: axum::http::uri::Authority = host
                    .parse()
                    .map_err(|e| RoutingError::InvalidUri(format!("host {}: {}", host, e)))?;
                uri = uri
                    .with_host(authority.host())
                    .with_port(authority.port_u16());
            }
        }
        Ok(Self {
            method: parts.method.clone(),
            uri,
            headers: parts.headers.clone(),
            body,
            attributes: Arc::new(HashMap::new()),
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.uri = uri;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Typed attribute lookup; `None` when absent or of another type.
    pub fn attribute<T: Any>(&self, key: &str) -> Option<&T> {
        self.attributes.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn with_attribute<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Arc::make_mut(&mut self.attributes).insert(key.into(), Arc::new(value));
        self
    }

    pub fn without_attribute(mut self, key: &str) -> Self {
        if self.attributes.contains_key(key) {
            Arc::make_mut(&mut self.attributes).remove(key);
        }
        self
    }

    /// String parameter captured by a pattern or splitter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.attribute::<String>(name).map(String::as_str)
    }

    /// Path segments left for nested nodes to consume.
    pub fn remaining_path(&self) -> Vec<String> {
        match self.attribute::<Vec<String>>(attributes::REMAINING_PATH) {
            Some(segments) => segments.clone(),
            None => self.uri.path_segments(),
        }
    }

    pub fn with_remaining_path(self, segments: Vec<String>) -> Self {
        self.with_attribute(attributes::REMAINING_PATH, segments)
    }

    pub fn wildcard_matched(&self) -> bool {
        self.attribute::<bool>(attributes::WILDCARD_MATCHED)
            .copied()
            .unwrap_or(false)
    }

    /// Path tail accepted by a wildcard pattern.
    pub fn wildcard(&self) -> Option<&str> {
        self.param(attributes::WILDCARD)
    }

    /// Marks the path as fully consumed, keeping the accepted tail.
    pub fn with_wildcard(self, tail: String) -> Self {
        self.with_attribute(attributes::WILDCARD, tail)
            .with_attribute(attributes::WILDCARD_MATCHED, true)
            .with_remaining_path(Vec::new())
    }

    /// Candidate methods explicitly narrowed by an enclosing node.
    pub fn narrowed_methods(&self) -> Option<&Vec<Method>> {
        self.attribute::<Vec<Method>>(attributes::ALLOWED_METHODS)
    }

    /// Candidate methods for an OPTIONS request. Falls back to the
    /// request's implicit set, then to [`implicit_methods`].
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.narrowed_methods()
            .or_else(|| self.attribute::<Vec<Method>>(attributes::IMPLICIT_METHODS))
            .cloned()
            .unwrap_or_else(implicit_methods)
    }

    /// Replaces the fallback candidate set without narrowing the request.
    pub fn with_implicit_methods(self, methods: Vec<Method>) -> Self {
        self.with_attribute(attributes::IMPLICIT_METHODS, methods)
    }

    pub fn with_allowed_methods(self, methods: Vec<Method>) -> Self {
        self.with_attribute(attributes::ALLOWED_METHODS, methods)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.attributes.keys().collect();
        keys.sort();
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri.to_string())
            .field("attributes", &keys)
            .finish()
    }
}
