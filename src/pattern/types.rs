//! Placeholder regex table.
//!
//! `{Tname}` placeholders pick their regex by the one-character type
//! prefix `T`; bare `{name}` placeholders look the name up in the per-name
//! table. The table is built once and passed to the compiler by reference.

use std::collections::HashMap;

use crate::routing::{RoutingError, RoutingResult};

/// Positive integer without leading zero.
pub const NUMBER: char = '#';
/// Plain digits.
pub const DIGITS: char = '%';
/// Alphanumeric name.
pub const NAME: char = '$';
/// Hyphenated slug.
pub const SLUG: char = '@';

#[derive(Debug, Clone)]
pub struct PatternTypes {
    types: HashMap<char, String>,
    named: HashMap<String, String>,
}

impl Default for PatternTypes {
    fn default() -> Self {
        let types = [
            (NUMBER, "[1-9][0-9]*"),
            (DIGITS, "[0-9]+"),
            (NAME, "[a-zA-Z0-9]+"),
            (SLUG, "[a-zA-Z0-9]+(?:-[a-zA-Z0-9]+)*"),
        ]
        .into_iter()
        .map(|(marker, regex)| (marker, regex.to_string()))
        .collect();

        Self {
            types,
            named: HashMap::new(),
        }
    }
}

impl PatternTypes {
    /// Adds or replaces a type prefix.
    pub fn with_type(mut self, marker: char, regex: impl Into<String>) -> Self {
        self.types.insert(marker, regex.into());
        self
    }

    /// Registers the regex used by bare `{name}` placeholders.
    pub fn with_param(mut self, name: impl Into<String>, regex: impl Into<String>) -> Self {
        self.named.insert(name.into(), regex.into());
        self
    }

    pub fn type_regex(&self, marker: char) -> Option<&str> {
        self.types.get(&marker).map(String::as_str)
    }

    /// Resolves a placeholder body (`#id`, `slug`) to its name and regex.
    pub fn resolve(&self, token: &str) -> RoutingResult<(String, String)> {
        let mut chars = token.chars();
        let (name, regex) = match chars.next() {
            Some(marker) if self.types.contains_key(&marker) && token.len() > marker.len_utf8() => {
                (chars.as_str(), self.types[&marker].clone())
            }
            _ => {
                let regex = self.named.get(token).cloned().ok_or_else(|| {
                    RoutingError::InvalidPattern(format!("no regex registered for `{{{}}}`", token))
                })?;
                (token, regex)
            }
        };
        if !is_group_name(name) {
            return Err(RoutingError::InvalidPattern(format!(
                "`{}` is not a valid parameter name",
                name
            )));
        }
        Ok((name.to_string(), regex))
    }
}

fn is_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
