//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → RouterBuilder (pattern types, id regex, redirect status)
//!     → RouterService (implicit OPTIONS methods, body limit, metrics)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    MethodsConfig, ObservabilityConfig, PatternsConfig, ResourceConfig, RouterConfig,
    ServiceConfig,
};
pub use validation::{validate_config, ValidationError};
