//! Path patterns.
//!
//! # Responsibilities
//! - Literal paths: segment-wise exact match, positional consumption
//! - Parameterised paths: one regex with named groups
//! - Wildcard tail: accept whatever is left
//!
//! # Design Decisions
//! - Relative patterns work on the request's remaining path segments, so
//!   nested nodes never re-parse the full URI
//! - Absolute patterns (leading `/`) match from the URI root and refuse to
//!   build on top of a different, already written path
//! - Matching consumes a prefix; the unconsumed tail is left for descendants

use regex::Regex;

use crate::http::uri::{append_path, split_segments};
use crate::http::{Params, Request, Uri};
use crate::pattern::types::PatternTypes;
use crate::pattern::Pattern;
use crate::routing::{RoutingError, RoutingResult};

/// Params key used to rebuild a wildcard tail.
pub const WILDCARD_PARAM: &str = "*";

fn subject(request: &Request, absolute: bool) -> Vec<String> {
    if absolute {
        request.uri().path_segments()
    } else {
        request.remaining_path()
    }
}

fn write_path(prototype: Uri, path: &str, absolute: bool) -> RoutingResult<Uri> {
    if !absolute {
        let joined = append_path(prototype.path(), path);
        return Ok(prototype.with_path(joined));
    }
    let path = append_path("", path);
    if prototype.path().is_empty() || prototype.path() == path {
        return Ok(prototype.with_path(path));
    }
    Err(RoutingError::UnreachableEndpoint {
        component: "path",
        expected: path,
        actual: prototype.path().to_string(),
    })
}

/// Literal path consumed segment by segment.
#[derive(Debug, Clone)]
pub struct PathPattern {
    segments: Vec<String>,
    absolute: bool,
}

impl PathPattern {
    pub fn new(path: &str) -> Self {
        Self {
            segments: split_segments(path),
            absolute: path.starts_with('/'),
        }
    }

    /// Relative pattern for a single segment.
    pub fn segment(segment: &str) -> Self {
        Self {
            segments: vec![segment.to_string()],
            absolute: false,
        }
    }
}

impl Pattern for PathPattern {
    fn matched_request(&self, request: Request) -> Option<Request> {
        let remaining = subject(&request, self.absolute);
        if !remaining.starts_with(&self.segments) {
            return None;
        }
        let rest = remaining[self.segments.len()..].to_vec();
        Some(request.with_remaining_path(rest))
    }

    fn uri(&self, prototype: Uri, _params: &Params) -> RoutingResult<Uri> {
        if self.segments.is_empty() && !self.absolute {
            return Ok(prototype);
        }
        write_path(prototype, &self.segments.join("/"), self.absolute)
    }

    fn template_uri(&self, prototype: Uri) -> RoutingResult<Uri> {
        self.uri(prototype, &Params::new())
    }
}

/// Accepts the rest of the path and marks it consumed.
#[derive(Debug, Clone, Default)]
pub struct WildcardPattern;

impl Pattern for WildcardPattern {
    fn matched_request(&self, request: Request) -> Option<Request> {
        let tail = request.remaining_path().join("/");
        Some(request.with_wildcard(tail))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        match params.get(WILDCARD_PARAM) {
            Some(tail) if !tail.is_empty() => {
                let path = append_path(prototype.path(), tail);
                Ok(prototype.with_path(path))
            }
            _ => Ok(prototype),
        }
    }

    fn template_uri(&self, prototype: Uri) -> RoutingResult<Uri> {
        let path = append_path(prototype.path(), WILDCARD_PARAM);
        Ok(prototype.with_path(path))
    }
}

#[derive(Debug, Clone)]
enum Part {
    Literal(String),
    Param { name: String, validator: Regex },
}

/// Path template with `{placeholder}` segments compiled to one regex.
#[derive(Debug, Clone)]
pub struct PathRegexPattern {
    parts: Vec<Part>,
    regex: Regex,
    absolute: bool,
}

impl PathRegexPattern {
    pub fn new(template: &str, types: &PatternTypes) -> RoutingResult<Self> {
        let absolute = template.starts_with('/');
        let body = template.trim_matches('/');

        let mut parts = Vec::new();
        let mut expression = String::from("^");
        let mut rest = body;
        while let Some(open) = rest.find('{') {
            let close = rest[open..]
                .find('}')
                .map(|idx| open + idx)
                .ok_or_else(|| {
                    RoutingError::InvalidPattern(format!("unclosed placeholder in `{}`", template))
                })?;
            if open > 0 {
                let literal = &rest[..open];
                expression.push_str(&regex::escape(literal));
                parts.push(Part::Literal(literal.to_string()));
            }
            let (name, fragment) = types.resolve(&rest[open + 1..close])?;
            expression.push_str(&format!("(?P<{}>{})", name, fragment));
            parts.push(Part::Param {
                validator: compile(&format!("^(?:{})$", fragment))?,
                name,
            });
            rest = &rest[close + 1..];
        }
        if !rest.is_empty() {
            expression.push_str(&regex::escape(rest));
            parts.push(Part::Literal(rest.to_string()));
        }
        // trailing group keeps whatever is left for nested nodes
        expression.push_str("(?:/(.*))?$");

        Ok(Self {
            parts,
            regex: compile(&expression)?,
            absolute,
        })
    }

    fn render<F>(&self, mut param: F) -> RoutingResult<String>
    where
        F: FnMut(&str, &Regex) -> RoutingResult<String>,
    {
        let mut path = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(literal) => path.push_str(literal),
                Part::Param { name, validator } => path.push_str(&param(name, validator)?),
            }
        }
        Ok(path)
    }
}

fn compile(expression: &str) -> RoutingResult<Regex> {
    Regex::new(expression).map_err(|e| RoutingError::InvalidPattern(e.to_string()))
}

impl Pattern for PathRegexPattern {
    fn matched_request(&self, request: Request) -> Option<Request> {
        let subject = subject(&request, self.absolute).join("/");
        let captures = self.regex.captures(&subject)?;

        let tail = captures
            .get(captures.len() - 1)
            .map(|m| split_segments(m.as_str()))
            .unwrap_or_default();
        let values: Vec<(String, String)> = self
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Param { name, .. } => captures
                    .name(name)
                    .map(|m| (name.clone(), m.as_str().to_string())),
                Part::Literal(_) => None,
            })
            .collect();

        let request = values
            .into_iter()
            .fold(request, |request, (name, value)| request.with_attribute(name, value));
        Some(request.with_remaining_path(tail))
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        let path = self.render(|name, validator| {
            let value = params.get(name).ok_or_else(|| RoutingError::missing_param(name))?;
            if !validator.is_match(value) {
                return Err(RoutingError::InvalidUriParams {
                    name: name.to_string(),
                    reason: format!("`{}` does not match `{}`", value, validator.as_str()),
                });
            }
            Ok(value.to_string())
        })?;
        write_path(prototype, &path, self.absolute)
    }

    fn template_uri(&self, prototype: Uri) -> RoutingResult<Uri> {
        let path = self.render(|name, _| Ok(format!("{{{}}}", name)))?;
        write_path(prototype, &path, self.absolute)
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
    fn test_relative_path_consumes_prefix() {
        let pattern = PathPattern::new("foo/bar");
        let matched = pattern.matched_request(request("/foo/bar/baz")).unwrap();
        assert_eq!(matched.remaining_path(), vec!["baz"]);
        assert!(pattern.matched_request(request("/foo/baz")).is_none());
        assert!(pattern.matched_request(request("/foo")).is_none());
    }

    #[test]
    fn test_relative_path_uses_remaining_segments() {
        let pattern = PathPattern::new("bar");
        let nested = request("/foo/bar").with_remaining_path(vec!["bar".to_string()]);
        assert!(pattern.matched_request(nested).is_some());
    }

    #[test]
    fn test_relative_paths_compose_when_building() {
        let uri = PathPattern::new("foo").uri(Uri::new(), &Params::new()).unwrap();
        let uri = PathPattern::new("bar").uri(uri, &Params::new()).unwrap();
        assert_eq!(uri.path(), "/foo/bar");
    }

    #[test]
    fn test_absolute_path_conflict() {
        let pattern = PathPattern::new("/admin");
        let uri = pattern.uri(Uri::new(), &Params::new()).unwrap();
        assert_eq!(uri.path(), "/admin");
        assert!(pattern.uri(Uri::new().with_path("/other"), &Params::new()).is_err());
    }

    #[test]
    fn test_regex_path_captures_params() {
        let types = PatternTypes::default();
        let pattern = PathRegexPattern::new("/users/{#id}/posts/{@slug}", &types).unwrap();

        let matched = pattern
            .matched_request(request("/users/12/posts/hello-world/comments"))
            .unwrap();
        assert_eq!(matched.param("id"), Some("12"));
        assert_eq!(matched.param("slug"), Some("hello-world"));
        assert_eq!(matched.remaining_path(), vec!["comments"]);

        assert!(pattern.matched_request(request("/users/012/posts/x")).is_none());
    }

    #[test]
    fn test_regex_path_builds_and_validates() {
        let types = PatternTypes::default();
        let pattern = PathRegexPattern::new("users/{#id}", &types).unwrap();

        let uri = pattern
            .uri(Uri::new().with_path("/api"), &Params::new().with("id", 7))
            .unwrap();
        assert_eq!(uri.path(), "/api/users/7");

        let err = pattern.uri(Uri::new(), &Params::new()).unwrap_err();
        assert_eq!(err, RoutingError::missing_param("id"));

        let err = pattern
            .uri(Uri::new(), &Params::new().with("id", "abc"))
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidUriParams { .. }));
    }

    #[test]
    fn test_regex_path_template() {
        let types = PatternTypes::default();
        let pattern = PathRegexPattern::new("/users/{#id}", &types).unwrap();
        assert_eq!(pattern.template_uri(Uri::new()).unwrap().path(), "/users/{id}");
    }

    #[test]
    fn test_wildcard_takes_rest() {
        let matched = WildcardPattern
            .matched_request(request("/a/b/c").with_remaining_path(vec!["b".into(), "c".into()]))
            .unwrap();
        assert_eq!(matched.wildcard(), Some("b/c"));
        assert!(matched.remaining_path().is_empty());

        let uri = WildcardPattern
            .uri(Uri::new().with_path("/a"), &Params::new().with(WILDCARD_PARAM, "b/c"))
            .unwrap();
        assert_eq!(uri.path(), "/a/b/c");
    }
}
