//! HTTP value types and the service boundary.
//!
//! # Data Flow
//! ```text
//! http::Request (from axum/hyper)
//!     → service.rs (buffer body, convert)
//!     → request.rs (immutable Request with attribute bag)
//!     → [route tree: forward]
//!     → response.rs (Some(response) | None → 404)
//!
//! Reverse:
//!     params.rs + uri.rs → [route tree: uri] → Uri
//! ```

pub mod params;
pub mod request;
pub mod response;
pub mod service;
pub mod uri;

pub use params::Params;
pub use request::Request;
pub use response::Response;
pub use service::RouterService;
pub use uri::Uri;
