//! Configuration schema definitions.
//!
//! This module defines the configuration structure for building and serving
//! a route tree. All types derive Serde traits for deserialization from
//! config files.

use std::collections::BTreeMap;
use std::str::FromStr;

use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::http::request::implicit_methods;
use crate::pattern::PatternTypes;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Placeholder regex overrides.
    pub patterns: PatternsConfig,

    /// REST resource settings.
    pub resource: ResourceConfig,

    /// OPTIONS candidate methods.
    pub methods: MethodsConfig,

    /// Status code of redirect endpoints (3xx).
    pub redirect_status: u16,

    /// Service boundary settings.
    pub service: ServiceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            patterns: PatternsConfig::default(),
            resource: ResourceConfig::default(),
            methods: MethodsConfig::default(),
            redirect_status: 301,
            service: ServiceConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Pattern types with the configured overrides applied.
    pub fn pattern_types(&self) -> PatternTypes {
        let types = self
            .patterns
            .types
            .iter()
            .filter_map(|(key, regex)| Some((key.chars().next()?, regex)))
            .fold(PatternTypes::default(), |types, (prefix, regex)| {
                types.with_type(prefix, regex.clone())
            });
        self.patterns
            .params
            .iter()
            .fold(types, |types, (name, regex)| types.with_param(name.clone(), regex.clone()))
    }

    /// Parsed implicit methods; unknown names are skipped (validation
    /// rejects them).
    pub fn implicit_methods(&self) -> Vec<Method> {
        self.methods
            .implicit
            .iter()
            .filter_map(|name| Method::from_str(&name.to_ascii_uppercase()).ok())
            .collect()
    }

    /// Redirect status, falling back to `301` when out of range.
    pub fn redirect_status(&self) -> StatusCode {
        StatusCode::from_u16(self.redirect_status)
            .ok()
            .filter(StatusCode::is_redirection)
            .unwrap_or(StatusCode::MOVED_PERMANENTLY)
    }
}

/// Placeholder regex configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Type-prefix regexes keyed by a single character (e.g. `"#"`).
    pub types: BTreeMap<String, String>,

    /// Regexes for bare `{name}` placeholders, keyed by parameter name.
    pub params: BTreeMap<String, String>,
}

/// REST resource configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Regex an item id must match.
    pub id_pattern: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            id_pattern: "[1-9][0-9]*".to_string(),
        }
    }
}

/// OPTIONS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MethodsConfig {
    /// Candidate set used when an OPTIONS request carries none.
    pub implicit: Vec<String>,
}

impl Default for MethodsConfig {
    fn default() -> Self {
        Self {
            implicit: implicit_methods().iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Service boundary configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Maximum buffered request body in bytes.
    pub body_limit_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// JSON log output instead of the human readable format.
    pub json_logs: bool,

    /// Record request counters through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.redirect_status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(config.implicit_methods(), implicit_methods());
        assert_eq!(config.resource.id_pattern, "[1-9][0-9]*");
        assert_eq!(config.service.body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RouterConfig = toml::from_str(
            r#"
            redirect_status = 302

            [methods]
            implicit = ["get", "head"]

            [patterns.params]
            lang = "en|fr"
            "#,
        )
        .unwrap();
        assert_eq!(config.redirect_status(), StatusCode::FOUND);
        assert_eq!(config.implicit_methods(), vec![Method::GET, Method::HEAD]);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.pattern_types().resolve("lang").unwrap().1, "en|fr");
    }
}
