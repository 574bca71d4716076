//! Gate decorators.
//!
//! # Data Flow
//! ```text
//! forward:  request → gate predicate/transform → inner route | None
//! select:   path → inner.select(path) → re-wrapped in the same gate
//! uri:      prototype → gate contribution (patterns only) → inner.uri
//! ```
//!
//! # Design Decisions
//! - Every gate wraps exactly one inner route and keeps the node contract
//! - Selection re-wraps the selected descendant so reverse building and
//!   direct forwarding on a selected node still pass through the gate

pub mod callback;
pub mod lazy;
pub mod method;
pub mod middleware;
pub mod pattern;

pub use callback::{CallbackGate, FilterFn};
pub use lazy::LazyRoute;
pub use method::{parse_methods, MethodGate};
pub use middleware::{FnMiddleware, Middleware, MiddlewareGate, Next};
pub use pattern::PatternGate;
