//! Splitter dispatch variants.
//!
//! # Data Flow
//! ```text
//! forward:  request → dispatch key (segment | method | callback | scan order | REST method)
//!           → chosen child.forward | None
//! select:   "a.b" → child "a" (re-gated where the key lives in the URI) → select("b")
//! uri:      implicit/default/root child builds, otherwise AmbiguousEndpoint
//! ```
//!
//! # Design Decisions
//! - Children are held in insertion order where order is observable
//!   (scan order, `Allow` header order)
//! - OPTIONS on a method-keyed switch probes children with a request
//!   narrowed to one method; endpoints answer such probes without running
//!   their handler, so probing has no side effects

pub mod callback;
pub mod method;
pub mod path;
pub mod resource;
pub mod scan;

use axum::http::Method;

use crate::http::{response, Request, Response};
use crate::routing::RouteRef;

pub use callback::{CallbackSwitch, KeyFn};
pub use method::MethodSwitch;
pub use path::{PathSwitch, ROOT_PATH};
pub use resource::{ResourceAction, ResourceSwitch};
pub use scan::ScanSwitch;

/// Answers an OPTIONS request on behalf of method-keyed children.
///
/// Each `(method, route)` pair in the request's candidate set is probed
/// with an OPTIONS request narrowed to that method. The methods whose
/// route answered make up the `Allow` header, in the order given.
pub(crate) fn probe_methods<'a, I>(request: &Request, candidates: I) -> Option<Response>
where
    I: IntoIterator<Item = (&'a Method, &'a RouteRef)>,
{
    let wanted = request.allowed_methods();
    let mut allowed: Vec<Method> = Vec::new();
    for (method, route) in candidates {
        if !wanted.contains(method) || allowed.contains(method) {
            continue;
        }
        let probe = request.clone().with_allowed_methods(vec![method.clone()]);
        if route.forward(probe).is_some() {
            allowed.push(method.clone());
        }
    }
    tracing::debug!(allowed = ?allowed, "OPTIONS probe finished");
    if allowed.is_empty() {
        None
    } else {
        Some(response::options(&allowed))
    }
}
