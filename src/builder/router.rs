//! Root builder.

use std::rc::Rc;
use std::sync::Arc;

use crate::builder::context::{Container, Environment};
use crate::builder::error::{BuildError, BuildResult};
use crate::builder::route::RouteBuilder;
use crate::config::RouterConfig;
use crate::routing::{Handler, Router};

/// Assembles a [`Router`].
///
/// Configure with `with_config` / `with_container` before handing out
/// [`root`](Self::root); both start a fresh tree.
pub struct RouterBuilder {
    env: Rc<Environment>,
    root: RouteBuilder,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::with_parts(&RouterConfig::default(), None)
    }
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_parts(config: &RouterConfig, container: Option<Container>) -> Self {
        let env = Rc::new(Environment::new(
            config.pattern_types(),
            config.redirect_status(),
            config.resource.id_pattern.clone(),
            container,
        ));
        let root = RouteBuilder::new(env.clone());
        Self { env, root }
    }

    /// Applies pattern types, resource id regex and redirect status.
    pub fn with_config(self, config: &RouterConfig) -> Self {
        Self::with_parts(config, self.env.container.clone())
    }

    /// Resolves `handler_id` endpoints through `container`.
    pub fn with_container<F>(self, container: F) -> Self
    where
        F: Fn(&str) -> Option<Arc<dyn Handler>> + 'static,
    {
        let env = Rc::new(Environment::new(
            self.env.types.clone(),
            self.env.redirect_status,
            self.env.id_pattern.clone(),
            Some(Rc::new(container)),
        ));
        let root = RouteBuilder::new(env.clone());
        Self { env, root }
    }

    /// The root branch.
    pub fn root(&self) -> RouteBuilder {
        self.root.clone()
    }

    /// Builds the tree, publishes it to redirect endpoints and checks that
    /// every joined link was resolved without a cycle.
    pub fn build(self) -> BuildResult<Router> {
        let root = self.root.build()?;
        if !self.env.router.resolve(root.clone()) {
            return Err(BuildError::RouteAlreadyBuilt);
        }
        let unresolved = self.env.unresolved_links();
        if unresolved > 0 {
            tracing::warn!(unresolved, "Route tree has unresolved forward links");
            return Err(BuildError::UnresolvedLink);
        }
        if self.env.has_link_cycle() {
            tracing::warn!("Route tree has forward links joining each other in a cycle");
            return Err(BuildError::UnresolvedLink);
        }
        tracing::info!("Route tree built");
        Ok(Router::new(root))
    }
}
