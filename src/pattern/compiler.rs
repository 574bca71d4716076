//! Template compiler.
//!
//! Splits a template into URI components and builds one sub-pattern per
//! component present, in the order scheme, host, port, user-info, path,
//! query. Splitting skips over `{...}` placeholders, so type prefixes such
//! as `@` never break the authority apart.

use std::sync::Arc;

use crate::pattern::{
    CompositePattern, DomainPattern, PathPattern, PathRegexPattern, PatternRef, PatternTypes,
    QueryPattern, StaticComponent, WildcardPattern,
};
use crate::routing::{RoutingError, RoutingResult};

/// Compiles `template` into a pattern. A single component is returned as
/// is, several are wrapped in a [`CompositePattern`].
pub fn compile(template: &str, types: &PatternTypes) -> RoutingResult<PatternRef> {
    let parts = TemplateParts::split(template)?;
    let mut patterns: Vec<PatternRef> = Vec::new();

    if let Some(scheme) = parts.scheme {
        patterns.push(Arc::new(StaticComponent::scheme(scheme)));
    }
    if let Some(host) = parts.host {
        patterns.push(host_pattern(host)?);
    }
    if let Some(port) = parts.port {
        let port = port
            .parse::<u16>()
            .map_err(|_| RoutingError::InvalidPattern(format!("invalid port `{}`", port)))?;
        patterns.push(Arc::new(StaticComponent::port(port)));
    }
    if let Some(user_info) = parts.user_info {
        patterns.push(Arc::new(StaticComponent::user_info(user_info)));
    }
    if let Some(path) = parts.path {
        push_path_patterns(&mut patterns, path, types)?;
    }
    if let Some(query) = parts.query {
        if query.contains('{') {
            return Err(RoutingError::InvalidPattern(format!(
                "query placeholders are not supported: `{}`",
                query
            )));
        }
        patterns.push(Arc::new(QueryPattern::parse(query)));
    }

    tracing::trace!(template = %template, parts = patterns.len(), "Compiled pattern");
    match patterns.len() {
        0 => Err(RoutingError::InvalidPattern(format!("empty pattern `{}`", template))),
        1 => Ok(patterns.remove(0)),
        _ => Ok(Arc::new(CompositePattern::new(patterns))),
    }
}

fn host_pattern(host: &str) -> RoutingResult<PatternRef> {
    if host.contains('{') {
        return Err(RoutingError::InvalidPattern(format!(
            "host placeholders are not supported, use SubdomainPattern: `{}`",
            host
        )));
    }
    match host.strip_prefix("*.") {
        Some(domain) => Ok(Arc::new(DomainPattern::new(domain))),
        None => Ok(Arc::new(StaticComponent::host(host))),
    }
}

fn push_path_patterns(
    patterns: &mut Vec<PatternRef>,
    path: &str,
    types: &PatternTypes,
) -> RoutingResult<()> {
    let (prefix, wildcard) = match path.strip_suffix('*') {
        Some(prefix) => (prefix, true),
        None => (path, false),
    };
    if prefix.contains('{') {
        patterns.push(Arc::new(PathRegexPattern::new(prefix, types)?));
    } else if !prefix.is_empty() {
        patterns.push(Arc::new(PathPattern::new(prefix)));
    }
    if wildcard {
        patterns.push(Arc::new(WildcardPattern));
    }
    Ok(())
}

/// Raw component slices of a template.
#[derive(Debug, Default, PartialEq)]
struct TemplateParts<'a> {
    scheme: Option<&'a str>,
    user_info: Option<&'a str>,
    host: Option<&'a str>,
    port: Option<&'a str>,
    path: Option<&'a str>,
    query: Option<&'a str>,
}

impl<'a> TemplateParts<'a> {
    fn split(template: &'a str) -> RoutingResult<Self> {
        let mut parts = TemplateParts::default();

        let reference = match find_outside(template, '?') {
            Some(idx) => {
                parts.query = non_empty(&template[idx + 1..]);
                &template[..idx]
            }
            None => template,
        };

        let hierarchical = match reference.find("://") {
            Some(idx) if !reference[..idx].contains(['/', '{']) => {
                if idx == 0 {
                    return Err(RoutingError::InvalidPattern(format!(
                        "empty scheme in `{}`",
                        template
                    )));
                }
                parts.scheme = Some(&reference[..idx]);
                Some(&reference[idx + 3..])
            }
            _ => reference.strip_prefix("//"),
        };

        let Some(hierarchical) = hierarchical else {
            parts.path = non_empty(reference);
            return Ok(parts);
        };

        let (authority, path) = match find_outside(hierarchical, '/') {
            Some(idx) => (&hierarchical[..idx], &hierarchical[idx..]),
            None => (hierarchical, ""),
        };
        parts.path = non_empty(path);

        let host_port = match rfind_outside(authority, '@') {
            Some(idx) => {
                parts.user_info = non_empty(&authority[..idx]);
                &authority[idx + 1..]
            }
            None => authority,
        };
        match host_port.rsplit_once(':') {
            Some((host, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => {
                parts.host = non_empty(host);
                parts.port = Some(port);
            }
            _ => parts.host = non_empty(host_port),
        }
        Ok(parts)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn positions_outside(value: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut depth = 0usize;
    value.char_indices().filter(move |&(_, c)| match c {
        '{' => {
            depth += 1;
            false
        }
        '}' => {
            depth = depth.saturating_sub(1);
            false
        }
        _ => depth == 0,
    })
}

fn find_outside(value: &str, target: char) -> Option<usize> {
    positions_outside(value)
        .find(|&(_, c)| c == target)
        .map(|(idx, _)| idx)
}

fn rfind_outside(value: &str, target: char) -> Option<usize> {
    positions_outside(value)
        .filter(|&(_, c)| c == target)
        .last()
        .map(|(idx, _)| idx)
}
