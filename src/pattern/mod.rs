//! Pattern subsystem.
//!
//! # Data Flow
//! ```text
//! Template ("https://*.example.com/users/{#id}?page")
//!     → compiler.rs (split by URI component, resolve placeholder regexes)
//!     → one sub-pattern per component (component.rs, host.rs, path.rs, query.rs)
//!     → composite.rs (runs them in declared order)
//!
//! Forward:  Request → matched_request → Request with attributes | None
//! Reverse:  Uri prototype + Params → uri → Uri with the component written
//! ```
//!
//! # Design Decisions
//! - A pattern is a capability, not a route node; `PatternGate` turns it into one
//! - Whatever `uri` writes, `matched_request` reads back from an equivalent request
//! - Fixed components refuse to overwrite a different value (`UnreachableEndpoint`)
//!   so impossible trees fail while building, not by producing a wrong URI

pub mod compiler;
pub mod component;
pub mod composite;
pub mod host;
pub mod path;
pub mod query;
pub mod types;

use std::fmt;
use std::sync::Arc;

use crate::http::{Params, Request, Uri};
use crate::routing::RoutingResult;

pub use compiler::compile;
pub use component::{Component, StaticComponent};
pub use composite::CompositePattern;
pub use host::{DomainPattern, SubdomainPattern};
pub use path::{PathPattern, PathRegexPattern, WildcardPattern};
pub use query::QueryPattern;
pub use types::PatternTypes;

/// Bidirectional matcher/generator for one slice of a URI.
pub trait Pattern: Send + Sync + fmt::Debug {
    /// Returns the (possibly attribute-augmented) request on match.
    fn matched_request(&self, request: Request) -> Option<Request>;

    /// Writes this pattern's slice into `prototype`.
    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri>;

    /// Like `uri`, with `{name}` tokens in place of parameter values.
    fn template_uri(&self, prototype: Uri) -> RoutingResult<Uri>;
}

/// Shared handle to a pattern.
pub type PatternRef = Arc<dyn Pattern>;
