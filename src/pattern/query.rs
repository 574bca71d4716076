//! Query string pattern.
//!
//! Declared keys must be present in the request; a value-less key only
//! checks presence, `key=` requires an empty value and `key=value` an exact
//! one. Keys the pattern does not declare never block a match.

use url::form_urlencoded;

use crate::http::{Params, Request, Uri};
use crate::pattern::Pattern;
use crate::routing::{RoutingError, RoutingResult};

#[derive(Debug, Clone, Default)]
pub struct QueryPattern {
    params: Vec<(String, Option<String>)>,
}

impl QueryPattern {
    /// Parses a template like `page&sort=asc&filter=`.
    pub fn parse(template: &str) -> Self {
        let params = template
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), Some(value.to_string())),
                None => (pair.to_string(), None),
            })
            .collect();
        Self { params }
    }

    pub fn new(params: Vec<(String, Option<String>)>) -> Self {
        Self { params }
    }

    fn pairs(query: &str) -> Vec<(String, String)> {
        form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn merge<F>(&self, prototype: Uri, mut value_for: F) -> RoutingResult<Uri>
    where
        F: FnMut(&str, Option<&str>) -> Option<String>,
    {
        let existing = Self::pairs(prototype.query());
        let mut query = prototype.query().to_string();

        for (key, declared) in &self.params {
            if let Some(actual) = Self::lookup(&existing, key) {
                match declared {
                    Some(expected) if expected != actual => {
                        return Err(RoutingError::UnreachableEndpoint {
                            component: "query",
                            expected: format!("{}={}", key, expected),
                            actual: format!("{}={}", key, actual),
                        });
                    }
                    _ => continue,
                }
            }

            let encoded_key: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
            let pair = match value_for(key, declared.as_deref()) {
                Some(value) => {
                    let encoded: String =
                        form_urlencoded::byte_serialize(value.as_bytes()).collect();
                    format!("{}={}", encoded_key, encoded)
                }
                None => encoded_key,
            };
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&pair);
        }
        Ok(prototype.with_query(query))
    }
}

impl Pattern for QueryPattern {
    fn matched_request(&self, request: Request) -> Option<Request> {
        let actual = Self::pairs(request.uri().query());
        let matches = self.params.iter().all(|(key, declared)| {
            match (Self::lookup(&actual, key), declared) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(value), Some(expected)) => value == expected,
            }
        });
        if matches {
            Some(request)
        } else {
            None
        }
    }

    /// Presence-only keys take their value from `params` when supplied.
    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.merge(prototype, |key, declared| match declared {
            Some(value) => Some(value.to_string()),
            None => params.get(key).map(str::to_string),
        })
    }

    fn template_uri(&self, prototype: Uri) -> RoutingResult<Uri> {
        self.merge(prototype, |_, declared| declared.map(str::to_string))
    }
}
