//! Composite pattern: sub-patterns applied in declared order.

use crate::http::{Params, Request, Uri};
use crate::pattern::{Pattern, PatternRef};
use crate::routing::RoutingResult;

/// Runs every sub-pattern in order, threading the request (matching) or
/// the prototype (building) from one to the next.
#[derive(Debug, Clone)]
pub struct CompositePattern {
    patterns: Vec<PatternRef>,
}

impl CompositePattern {
    pub fn new(patterns: Vec<PatternRef>) -> Self {
        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Pattern for CompositePattern {
    fn matched_request(&self, request: Request) -> Option<Request> {
        self.patterns
            .iter()
            .try_fold(request, |request, pattern| pattern.matched_request(request))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.patterns
            .iter()
            .try_fold(prototype, |uri, pattern| pattern.uri(uri, params))
    }

    fn template_uri(&self, prototype: Uri) -> RoutingResult<Uri> {
        self.patterns
            .iter()
            .try_fold(prototype, |uri, pattern| pattern.template_uri(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{PathPattern, QueryPattern, StaticComponent};
    use crate::routing::RoutingError;
    use axum::http::Method;
    use std::sync::Arc;

    fn composite() -> CompositePattern {
        CompositePattern::new(vec![
            Arc::new(StaticComponent::scheme("https")) as PatternRef,
            Arc::new(PathPattern::new("/account")),
            Arc::new(QueryPattern::parse("tab=settings")),
        ])
    }

    #[test]
    fn test_all_parts_must_match() {
        let pattern = composite();
        let ok = Request::parse(Method::GET, "https://example.com/account?tab=settings").unwrap();
        assert!(pattern.matched_request(ok).is_some());

        let wrong_scheme =
            Request::parse(Method::GET, "http://example.com/account?tab=settings").unwrap();
        assert!(pattern.matched_request(wrong_scheme).is_none());
    }

    #[test]
    fn test_builds_in_order() {
        let uri = composite().uri(Uri::new(), &Params::new()).unwrap();
        assert_eq!(uri.to_string(), "https:/account?tab=settings");
    }

    #[test]
    fn test_first_conflict_stops_building() {
        let err = composite()
            .uri(Uri::new().with_scheme("http"), &Params::new())
            .unwrap_err();
        assert!(matches!(err, RoutingError::UnreachableEndpoint { component: "scheme", .. }));
    }
}
