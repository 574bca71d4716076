//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every configured regex compiles
//! - Validate value ranges (redirect status, body limit, method names)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::str::FromStr;

use axum::http::{Method, StatusCode};
use regex::Regex;

use crate::config::schema::RouterConfig;

/// One rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn check_regex(field: String, regex: &str, errors: &mut Vec<ValidationError>) {
    if let Err(e) = Regex::new(regex) {
        errors.push(ValidationError::new(field, format!("invalid regex: {}", e)));
    }
}

/// Validates a loaded configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (key, regex) in &config.patterns.types {
        let field = format!("patterns.types.{}", key);
        if key.chars().count() != 1 {
            errors.push(ValidationError::new(
                field.clone(),
                "type prefix must be a single character",
            ));
        } else if key.chars().any(|c| c.is_ascii_alphanumeric() || c == '_') {
            errors.push(ValidationError::new(
                field.clone(),
                "type prefix cannot start a parameter name",
            ));
        }
        check_regex(field, regex, &mut errors);
    }

    for (name, regex) in &config.patterns.params {
        check_regex(format!("patterns.params.{}", name), regex, &mut errors);
    }

    check_regex("resource.id_pattern".to_string(), &config.resource.id_pattern, &mut errors);

    if config.methods.implicit.is_empty() {
        errors.push(ValidationError::new("methods.implicit", "must not be empty"));
    }
    for name in &config.methods.implicit {
        if Method::from_str(&name.to_ascii_uppercase()).is_err() {
            errors.push(ValidationError::new(
                "methods.implicit",
                format!("`{}` is not a valid method", name),
            ));
        }
    }

    let redirect = StatusCode::from_u16(config.redirect_status);
    if !matches!(redirect, Ok(status) if status.is_redirection()) {
        errors.push(ValidationError::new(
            "redirect_status",
            format!("{} is not a redirect status", config.redirect_status),
        ));
    }

    if config.service.body_limit_bytes == 0 {
        errors.push(ValidationError::new("service.body_limit_bytes", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.patterns.types.insert("##".to_string(), "[0-9]+".to_string());
        config.patterns.params.insert("year".to_string(), "([0-9]".to_string());
        config.methods.implicit = vec!["GET".to_string(), "NOT A METHOD".to_string()];
        config.redirect_status = 200;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["patterns.types.##", "patterns.params.year", "methods.implicit", "redirect_status"]
        );
    }

    #[test]
    fn test_rejects_empty_method_list() {
        let mut config = RouterConfig::default();
        config.methods.implicit.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].to_string(), "methods.implicit: must not be empty");
    }
}
