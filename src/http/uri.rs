//! URI value type.
//!
//! # Responsibilities
//! - Hold the standard URI components (scheme, user-info, host, port, path, query)
//! - Rewrite components functionally (every `with_*` returns a new value)
//! - Parse from and render to the textual form
//!
//! # Design Decisions
//! - Components are kept apart instead of re-parsing a string on every access;
//!   patterns read and write one component at a time
//! - Relative references (`/path?query`, `path`) are first-class: reverse
//!   building starts from an empty prototype and grows it piece by piece

use std::fmt;
use std::str::FromStr;

use axum::http::uri::Authority;

use crate::routing::RoutingError;

/// Immutable URI value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    scheme: String,
    user_info: String,
    host: String,
    port: Option<u16>,
    path: String,
    query: String,
    fragment: String,
}

impl Uri {
    /// Empty relative reference, the usual starting prototype.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn user_info(&self) -> &str {
        &self.user_info
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_user_info(mut self, user_info: impl Into<String>) -> Self {
        self.user_info = user_info.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = fragment.into();
        self
    }

    /// Non-empty path segments, in order.
    pub fn path_segments(&self) -> Vec<String> {
        split_segments(&self.path)
    }
}

/// Splits a path into its non-empty segments.
pub(crate) fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Appends `tail` to `base` with exactly one separating slash.
pub(crate) fn append_path(base: &str, tail: &str) -> String {
    let tail = tail.trim_start_matches('/');
    if tail.is_empty() {
        return if base.is_empty() { "/".to_string() } else { base.to_string() };
    }
    format!("{}/{}", base.trim_end_matches('/'), tail)
}

fn split_query(reference: &str) -> (String, String) {
    match reference.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (reference.to_string(), String::new()),
    }
}

/// Offset of `://` when everything before it is a valid scheme.
fn scheme_end(reference: &str) -> Option<usize> {
    let idx = reference.find("://")?;
    let mut chars = reference[..idx].chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(idx)
}

impl FromStr for Uri {
    type Err = RoutingError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (reference, fragment) = match input.split_once('#') {
            Some((reference, fragment)) => (reference, fragment.to_string()),
            None => (input, String::new()),
        };

        // `scheme://authority...` or the network-path form `//authority...`
        let (scheme, hierarchical) = match scheme_end(reference) {
            Some(idx) => (&reference[..idx], Some(&reference[idx + 3..])),
            None => ("", reference.strip_prefix("//")),
        };

        let Some(hierarchical) = hierarchical else {
            let (path, query) = split_query(reference);
            return Ok(Self {
                path,
                query,
                fragment,
                ..Self::default()
            });
        };

        let authority_end = hierarchical.find(['/', '?']).unwrap_or(hierarchical.len());
        let (authority, rest) = hierarchical.split_at(authority_end);
        if authority.is_empty() {
            return Err(RoutingError::InvalidUri(format!("{}: missing authority", input)));
        }
        let parsed: Authority = authority
            .parse()
            .map_err(|e| RoutingError::InvalidUri(format!("{}: {}", input, e)))?;
        let user_info = authority
            .rsplit_once('@')
            .map(|(user_info, _)| user_info.to_string())
            .unwrap_or_default();
        let (path, query) = split_query(rest);

        Ok(Self {
            scheme: scheme.to_string(),
            user_info,
            host: parsed.host().to_string(),
            port: parsed.port_u16(),
            path,
            query,
            fragment,
        })
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if !self.host.is_empty() {
            f.write_str("//")?;
            if !self.user_info.is_empty() {
                write!(f, "{}@", self.user_info)?;
            }
            f.write_str(&self.host)?;
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
            if !self.path.is_empty() && !self.path.starts_with('/') {
                f.write_str("/")?;
            }
        }
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}
