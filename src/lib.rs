//! Bidirectional HTTP request routing.
//!
//! A route tree both dispatches requests (`forward`) and builds URIs back
//! from dotted route ids (`select` + `uri`).
//!
//! # Architecture
//! ```text
//!                  ┌──────────────────────────────┐
//!  http::Request → │ RouterService (tower)        │ → Response | 404
//!                  └──────────────┬───────────────┘
//!                                 ▼
//!                  ┌──────────────────────────────┐
//!                  │ Router (root RouteRef)       │
//!                  │   gates → splitters → ...    │
//!                  │   → endpoint                 │
//!                  └──────────────┬───────────────┘
//!            patterns (matching and building URI slices)
//!
//!  RouterConfig → RouterBuilder → RouteBuilder / *SwitchBuilder → Router
//! ```
//!
//! # Example
//! ```
//! use route_tree::{http::response, Params, RouterBuilder};
//! use axum::http::StatusCode;
//!
//! let builder = RouterBuilder::new();
//! let paths = builder.root().path_switch()?;
//! paths
//!     .route("users")?
//!     .pattern("{#id}")?
//!     .method("GET")?
//!     .callback(|_| response::empty(StatusCode::OK))?;
//! let router = builder.build()?;
//!
//! let uri = router.uri_for("users", &Params::new().with("id", 7))?;
//! assert_eq!(uri.to_string(), "/users/7");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod config;
pub mod http;
pub mod observability;
pub mod pattern;
pub mod routing;

pub use builder::{BuildError, RouteBuilder, RouterBuilder};
pub use config::RouterConfig;
pub use http::{Params, Request, Response, RouterService, Uri};
pub use routing::{ForwardLink, Route, RouteRef, Router, RoutingError};
