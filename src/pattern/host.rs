//! Host variants: domain suffix and enumerated subdomain.

use crate::http::{Params, Request, Uri};
use crate::pattern::Pattern;
use crate::routing::{RoutingError, RoutingResult};

/// Matches a host by suffix, ignoring any subdomain.
#[derive(Debug, Clone)]
pub struct DomainPattern {
    domain: String,
}

impl DomainPattern {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into().to_lowercase(),
        }
    }

    fn matches(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        host == self.domain
            || host
                .strip_suffix(&self.domain)
                .map(|prefix| prefix.ends_with('.'))
                .unwrap_or(false)
    }
}

impl Pattern for DomainPattern {
    fn matched_request(&self, request: Request) -> Option<Request> {
        if self.matches(request.uri().host()) {
            Some(request)
        } else {
            None
        }
    }

    fn uri(&self, prototype: Uri, _params: &Params) -> RoutingResult<Uri> {
        if prototype.host().is_empty() {
            return Ok(prototype.with_host(self.domain.clone()));
        }
        if self.matches(prototype.host()) {
            return Ok(prototype);
        }
        Err(RoutingError::UnreachableEndpoint {
            component: "host",
            expected: format!("*.{}", self.domain),
            actual: prototype.host().to_string(),
        })
    }

    fn template_uri(&self, prototype: Uri) -> RoutingResult<Uri> {
        self.uri(prototype, &Params::new())
    }
}

/// Matches the first host label against a fixed set of values and stores
/// it as a request attribute.
#[derive(Debug, Clone)]
pub struct SubdomainPattern {
    id: String,
    values: Vec<String>,
}

impl SubdomainPattern {
    pub fn new<I, S>(id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            values: values.into_iter().map(|v| v.into().to_lowercase()).collect(),
        }
    }

    /// The subdomain cannot be built standalone: the parent host must
    /// already be in place.
    fn parent_host<'a>(&self, prototype: &'a Uri) -> RoutingResult<&'a str> {
        if prototype.host().is_empty() {
            return Err(RoutingError::UnreachableEndpoint {
                component: "host",
                expected: format!("{{{}}}.<domain>", self.id),
                actual: String::new(),
            });
        }
        Ok(prototype.host())
    }
}

impl Pattern for SubdomainPattern {
    fn matched_request(&self, request: Request) -> Option<Request> {
        let host = request.uri().host().to_lowercase();
        let (label, rest) = host.split_once('.')?;
        if rest.is_empty() || !self.values.iter().any(|v| v == label) {
            return None;
        }
        let label = label.to_string();
        Some(request.with_attribute(self.id.clone(), label))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        let parent = self.parent_host(&prototype)?;
        let value = params
            .get(&self.id)
            .ok_or_else(|| RoutingError::missing_param(&self.id))?
            .to_lowercase();
        if !self.values.contains(&value) {
            return Err(RoutingError::InvalidUriParams {
                name: self.id.clone(),
                reason: format!("`{}` is not one of [{}]", value, self.values.join(", ")),
            });
        }
        let host = format!("{}.{}", value, parent);
        Ok(prototype.with_host(host))
    }

    fn template_uri(&self, prototype: Uri) -> RoutingResult<Uri> {
        let host = format!("{{{}}}.{}", self.id, self.parent_host(&prototype)?);
        Ok(prototype.with_host(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    fn request(uri: &str) -> Request {
        Request::parse(Method::GET, uri).unwrap()
    }

    #[test]
    fn test_domain_matches_suffix() {
        let pattern = DomainPattern::new("example.com");
        assert!(pattern.matched_request(request("http://example.com/")).is_some());
        assert!(pattern.matched_request(request("http://api.example.com/")).is_some());
        assert!(pattern.matched_request(request("http://badexample.com/")).is_none());
    }

    #[test]
    fn test_domain_build_fails_closed() {
        let pattern = DomainPattern::new("example.com");
        let built = pattern.uri(Uri::new(), &Params::new()).unwrap();
        assert_eq!(built.host(), "example.com");

        let sub = Uri::new().with_host("www.example.com");
        assert_eq!(pattern.uri(sub.clone(), &Params::new()).unwrap(), sub);

        let other = Uri::new().with_host("example.org");
        assert!(pattern.uri(other, &Params::new()).is_err());
    }

    #[test]
    fn test_subdomain_extracts_value() {
        let pattern = SubdomainPattern::new("lang", ["en", "de"]);
        let matched = pattern.matched_request(request("http://de.example.com/")).unwrap();
        assert_eq!(matched.param("lang"), Some("de"));
        assert!(pattern.matched_request(request("http://fr.example.com/")).is_none());
        assert!(pattern.matched_request(request("http://localhost/")).is_none());
    }

    #[test]
    fn test_subdomain_requires_host_to_build() {
        let pattern = SubdomainPattern::new("lang", ["en", "de"]);
        let params = Params::new().with("lang", "en");

        assert!(matches!(
            pattern.uri(Uri::new(), &params),
            Err(RoutingError::UnreachableEndpoint { .. })
        ));

        let built = pattern
            .uri(Uri::new().with_host("example.com"), &params)
            .unwrap();
        assert_eq!(built.host(), "en.example.com");

        let bad = Params::new().with("lang", "fr");
        assert!(matches!(
            pattern.uri(Uri::new().with_host("example.com"), &bad),
            Err(RoutingError::InvalidUriParams { .. })
        ));
    }
}
