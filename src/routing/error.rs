//! Structural routing errors.
//!
//! Raised by `select` and `uri` (and by pattern compilation). They describe
//! route definitions that cannot work and are meant to be fixed, not
//! handled; an unmatched request is never one of them.

use thiserror::Error;

/// Errors raised while selecting routes or building URIs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The node cannot decide which child should build the URI.
    #[error("Ambiguous endpoint: no implicit route to build the URI from")]
    AmbiguousEndpoint,

    /// A fixed component conflicts with the already built prototype.
    #[error("Unreachable endpoint: {component} `{expected}` conflicts with `{actual}`")]
    UnreachableEndpoint {
        component: &'static str,
        expected: String,
        actual: String,
    },

    /// A dynamic segment parameter is missing or malformed.
    #[error("Invalid URI parameter `{name}`: {reason}")]
    InvalidUriParams { name: String, reason: String },

    /// Empty route path or empty path segment passed to `select`.
    #[error("Empty route path segment")]
    EmptySelectPath,

    /// No child is registered under the requested path segment.
    #[error("Route `{segment}` not found")]
    RouteNotFound { segment: String },

    /// Endpoints have no descendants to select.
    #[error("Cannot select `{path}` on an endpoint")]
    EndpointSelect { path: String },

    /// A forward link was used before its branch was built.
    #[error("Unresolved forward link")]
    UnresolvedLink,

    /// Pattern template or regex rejected at compile time.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Method name rejected at compile time.
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// URI string could not be parsed.
    #[error("Invalid URI: {0}")]
    InvalidUri(String),
}

impl RoutingError {
    pub(crate) fn missing_param(name: &str) -> Self {
        Self::InvalidUriParams {
            name: name.to_string(),
            reason: "missing".to_string(),
        }
    }

    pub(crate) fn not_found(segment: &str) -> Self {
        Self::RouteNotFound {
            segment: segment.to_string(),
        }
    }
}

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RoutingError::UnreachableEndpoint {
            component: "host",
            expected: "example.com".to_string(),
            actual: "other.com".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unreachable endpoint: host `example.com` conflicts with `other.com`"
        );
        assert_eq!(
            RoutingError::missing_param("id").to_string(),
            "Invalid URI parameter `id`: missing"
        );
    }
}
