//! Branch builder handle.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::builder::context::{Context, Environment, NodeBuilder};
use crate::builder::error::{BuildError, BuildResult};
use crate::builder::splitters::{
    CallbackSwitchBuilder, MethodSwitchBuilder, PathSwitchBuilder, ResourceSwitchBuilder,
    ScanSwitchBuilder,
};
use crate::http::{Request, Response};
use crate::pattern::{compile, PathPattern, PatternRef};
use crate::routing::gates::{
    parse_methods, CallbackGate, FnMiddleware, LazyRoute, MethodGate, Middleware, MiddlewareGate,
    Next, PatternGate,
};
use crate::routing::{
    Endpoint, ForwardLink, Handler, KeyFn, LinkedRoute, RedirectEndpoint, RouteRef,
};

/// Handle on one branch under construction.
///
/// Gate methods stack decorators in call order (first call ends up
/// outermost); exactly one sealing method then picks what the branch is.
/// Clones refer to the same branch.
#[derive(Clone)]
pub struct RouteBuilder {
    context: Rc<RefCell<Context>>,
}

impl RouteBuilder {
    pub(crate) fn new(env: Rc<Environment>) -> Self {
        Self {
            context: Rc::new(RefCell::new(Context::new(env))),
        }
    }

    fn env(&self) -> Rc<Environment> {
        self.context.borrow().env().clone()
    }

    fn gate<F>(&self, wrap: F) -> BuildResult<&Self>
    where
        F: FnOnce(RouteRef) -> BuildResult<RouteRef> + 'static,
    {
        self.context.borrow_mut().add_gate(Box::new(wrap))?;
        Ok(self)
    }

    fn seal_builder(&self, builder: impl NodeBuilder + 'static) -> BuildResult<()> {
        self.context.borrow_mut().set_builder(Box::new(builder))
    }

    // Gates

    /// Restricts the branch to a pipe-delimited method list (`GET|POST`).
    pub fn method(&self, methods: &str) -> BuildResult<&Self> {
        let methods = parse_methods(methods)?;
        self.gate(move |route| Ok(Arc::new(MethodGate::new(methods, route))))
    }

    /// Compiles a URI template and gates the branch on it.
    pub fn pattern(&self, template: &str) -> BuildResult<&Self> {
        let pattern = compile(template, &self.env().types)?;
        self.with_pattern(pattern)
    }

    /// Gates the branch on a literal path.
    pub fn path(&self, path: &str) -> BuildResult<&Self> {
        self.with_pattern(Arc::new(PathPattern::new(path)))
    }

    pub fn with_pattern(&self, pattern: PatternRef) -> BuildResult<&Self> {
        self.gate(move |route| Ok(Arc::new(PatternGate::new(pattern, route))))
    }

    /// Filters (and may transform) requests; `None` blocks them.
    pub fn filter<F>(&self, filter: F) -> BuildResult<&Self>
    where
        F: Fn(Request) -> Option<Request> + Send + Sync + 'static,
    {
        self.gate(move |route| Ok(Arc::new(CallbackGate::new(Arc::new(filter), route))))
    }

    pub fn middleware(&self, middleware: Arc<dyn Middleware>) -> BuildResult<&Self> {
        self.gate(move |route| Ok(Arc::new(MiddlewareGate::new(middleware, route))))
    }

    pub fn middleware_fn<F>(&self, middleware: F) -> BuildResult<&Self>
    where
        F: Fn(Request, Next<'_>) -> Option<Response> + Send + Sync + 'static,
    {
        self.middleware(Arc::new(FnMiddleware::new(middleware)))
    }

    /// Publishes the route built at this point of the gate chain through
    /// `link`. Gates declared after this call are part of the published
    /// route; gates declared before are not.
    pub fn link(&self, link: &ForwardLink) -> BuildResult<&Self> {
        self.context.borrow_mut().add_link(link.clone())?;
        Ok(self)
    }

    // Seals

    pub fn route(&self, route: RouteRef) -> BuildResult<()> {
        self.context.borrow_mut().set_route(route)
    }

    pub fn handler(&self, handler: Arc<dyn Handler>) -> BuildResult<()> {
        self.route(Arc::new(Endpoint::new(handler)))
    }

    pub fn callback<F>(&self, callback: F) -> BuildResult<()>
    where
        F: Fn(Request) -> Response + Send + Sync + 'static,
    {
        self.route(Arc::new(Endpoint::callback(callback)))
    }

    /// Endpoint backed by a handler resolved from the container.
    pub fn handler_id(&self, id: &str) -> BuildResult<()> {
        let env = self.env();
        let handler = env
            .container
            .as_ref()
            .and_then(|container| container(id))
            .ok_or_else(|| BuildError::UnknownHandler(id.to_string()))?;
        self.handler(handler)
    }

    /// Redirects to the route at `path` of the finished tree.
    pub fn redirect(&self, path: &str) -> BuildResult<()> {
        let env = self.env();
        self.route(Arc::new(RedirectEndpoint::new(
            env.router.clone(),
            path,
            env.redirect_status,
        )))
    }

    /// Defers building the branch's node to its first use.
    pub fn lazy<F>(&self, supplier: F) -> BuildResult<()>
    where
        F: Fn() -> RouteRef + Send + Sync + 'static,
    {
        self.route(Arc::new(LazyRoute::new(supplier)))
    }

    /// Continues with the route published through `link`, whichever branch
    /// is built first.
    pub fn join_link(&self, link: &ForwardLink) -> BuildResult<()> {
        self.seal_builder(JoinedLink {
            link: link.clone(),
            env: self.env(),
        })
    }

    pub fn path_switch(&self) -> BuildResult<PathSwitchBuilder> {
        let switch = PathSwitchBuilder::new(self.env());
        self.seal_builder(switch.clone())?;
        Ok(switch)
    }

    pub fn method_switch(&self) -> BuildResult<MethodSwitchBuilder> {
        let switch = MethodSwitchBuilder::new(self.env());
        self.seal_builder(switch.clone())?;
        Ok(switch)
    }

    pub fn scan(&self) -> BuildResult<ScanSwitchBuilder> {
        let switch = ScanSwitchBuilder::new(self.env());
        self.seal_builder(switch.clone())?;
        Ok(switch)
    }

    pub fn callback_switch<F>(&self, key: F) -> BuildResult<CallbackSwitchBuilder>
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        let key: KeyFn = Arc::new(key);
        let switch = CallbackSwitchBuilder::new(self.env(), key);
        self.seal_builder(switch.clone())?;
        Ok(switch)
    }

    /// REST resource under `prefix` (empty for none).
    pub fn resource(&self, prefix: &str) -> BuildResult<ResourceSwitchBuilder> {
        let prefix: Option<PatternRef> = if prefix.is_empty() {
            None
        } else {
            Some(Arc::new(PathPattern::new(prefix)))
        };
        let switch = ResourceSwitchBuilder::new(self.env(), prefix);
        self.seal_builder(switch.clone())?;
        Ok(switch)
    }

    /// Builds the branch (memoized).
    pub fn build(&self) -> BuildResult<RouteRef> {
        self.context.borrow_mut().build()
    }

    /// A fresh, unsealed branch sharing this one's environment.
    pub fn create(&self) -> RouteBuilder {
        Self {
            context: Rc::new(RefCell::new(self.context.borrow().create())),
        }
    }
}

struct JoinedLink {
    link: ForwardLink,
    env: Rc<Environment>,
}

impl NodeBuilder for JoinedLink {
    fn build(&self) -> BuildResult<RouteRef> {
        self.env.record_join(self.link.clone());
        if let Some(route) = self.link.get() {
            return Ok(route.clone());
        }
        tracing::debug!("Joining a link that is not resolved yet");
        self.env.defer_link(self.link.clone());
        Ok(Arc::new(LinkedRoute::new(self.link.clone())))
    }
}

impl std::fmt::Debug for RouteBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteBuilder").finish_non_exhaustive()
    }
}
