//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing core and service boundary produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters via the `metrics` facade)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON or pretty)
//!     → Whatever `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap and a no-op until a recorder is installed
//! - The library never installs a recorder itself

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
