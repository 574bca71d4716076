//! Construction errors.

use thiserror::Error;

use crate::routing::RoutingError;

/// Errors raised while assembling a route tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The context was already sealed or built.
    #[error("Route already built")]
    RouteAlreadyBuilt,

    /// `build` was called before a route or sub-builder was chosen.
    #[error("Route type not selected")]
    RouteTypeNotSelected,

    /// A switch already has a child under this name.
    #[error("Duplicate route `{0}`")]
    DuplicateRoute(String),

    /// A joined link was never written by its owning branch, or joined
    /// links lead back to themselves.
    #[error("Unresolved forward link")]
    UnresolvedLink,

    /// A link was written by two branches.
    #[error("Forward link already resolved")]
    LinkAlreadyResolved,

    /// The container has no handler under this id.
    #[error("Unknown handler `{0}`")]
    UnknownHandler(String),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}

pub type BuildResult<T> = Result<T, BuildError>;
