//! Tree construction.
//!
//! # Data Flow
//! ```text
//! RouterBuilder (config, container)
//!     → root RouteBuilder
//!         → gates: method / pattern / filter / middleware / link  (stacked in call order)
//!         → seal:  endpoint | redirect | lazy | join_link | *_switch builder
//!             → switch builders hand out child RouteBuilders
//!     → build(): children first, then gates popped from the end
//!     → router link written, deferred links verified
//!     → Router
//! ```
//!
//! # Design Decisions
//! - Construction is single-threaded (`Rc<RefCell<_>>` handles); the built
//!   tree is `Send + Sync`
//! - Forward links are write-once cells; joining an unwritten link yields a
//!   node that reads it at call time, and the root build fails if any such
//!   link is still empty

pub mod context;
pub mod error;
pub mod route;
pub mod router;
pub mod splitters;

pub use context::{Container, Context, Environment, GateFn, NodeBuilder};
pub use error::{BuildError, BuildResult};
pub use route::RouteBuilder;
pub use router::RouterBuilder;
pub use splitters::{
    CallbackSwitchBuilder, MethodSwitchBuilder, PathSwitchBuilder, ResourceSwitchBuilder,
    ScanSwitchBuilder,
};
