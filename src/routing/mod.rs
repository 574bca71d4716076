//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, uri, attributes)
//!     → gates (method, pattern, middleware, callback, lazy)
//!     → splitters (path, method, scan, callback, resource)
//!     → endpoint
//!     → Return: Some(Response) or None (not matched)
//!
//! Reverse lookup:
//!     "admin.users.get"
//!     → select (one segment per level, re-gating the selected child)
//!     → uri(prototype, params) (every ancestor gate writes its slice)
//!     → Uri
//! ```
//!
//! # Design Decisions
//! - Trees are immutable after build and shared as `Arc<dyn Route>`
//! - No per-request state in nodes; request data lives in attributes
//! - Unmatched is `None`, never an error; errors are structural only

pub mod endpoint;
pub mod error;
pub mod gates;
pub mod link;
pub mod route;
pub mod router;
pub mod splitters;

pub use endpoint::{Endpoint, Handler, RedirectEndpoint};
pub use error::{RoutingError, RoutingResult};
pub use gates::{
    parse_methods, CallbackGate, FilterFn, FnMiddleware, LazyRoute, MethodGate, Middleware,
    MiddlewareGate, Next, PatternGate,
};
pub use link::{ForwardLink, LinkedRoute};
pub use route::{Route, RouteRef};
pub use router::Router;
pub use splitters::{
    CallbackSwitch, KeyFn, MethodSwitch, PathSwitch, ResourceAction, ResourceSwitch, ScanSwitch,
    ROOT_PATH,
};
