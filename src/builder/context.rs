//! Per-branch construction state.
//!
//! # Responsibilities
//! - Collect gate wrappers in declaration order
//! - Hold exactly one seal: a finished route or a sub-builder
//! - Build once and hand out the memoized node afterwards
//!
//! # Design Decisions
//! - Gates are applied by popping from the end of the list, so the first
//!   declared gate ends up outermost and is evaluated first in both
//!   directions
//! - Sealing twice, or gating a built context, is a logic error
//! - Every join is logged; a link published around a subtree depends on the
//!   links joined inside it, and the finished tree must have no dependency
//!   cycle

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use axum::http::StatusCode;

use crate::builder::error::{BuildError, BuildResult};
use crate::pattern::PatternTypes;
use crate::routing::{ForwardLink, Handler, RouteRef};

/// Resolves handler ids to handlers.
pub type Container = Rc<dyn Fn(&str) -> Option<std::sync::Arc<dyn Handler>>>;

/// Wraps the route built so far in one more node.
pub type GateFn = Box<dyn FnOnce(RouteRef) -> BuildResult<RouteRef>>;

/// Anything that can produce a node when its context builds.
pub trait NodeBuilder {
    fn build(&self) -> BuildResult<RouteRef>;
}

/// State shared by every context of one tree.
pub struct Environment {
    pub(crate) router: ForwardLink,
    pub(crate) container: Option<Container>,
    pub(crate) types: PatternTypes,
    pub(crate) redirect_status: StatusCode,
    pub(crate) id_pattern: String,
    pending_links: RefCell<Vec<ForwardLink>>,
    joined: RefCell<Vec<ForwardLink>>,
    dependencies: RefCell<Vec<(usize, usize)>>,
}

impl Environment {
    pub(crate) fn new(
        types: PatternTypes,
        redirect_status: StatusCode,
        id_pattern: String,
        container: Option<Container>,
    ) -> Self {
        Self {
            router: ForwardLink::new(),
            container,
            types,
            redirect_status,
            id_pattern,
            pending_links: RefCell::new(Vec::new()),
            joined: RefCell::new(Vec::new()),
            dependencies: RefCell::new(Vec::new()),
        }
    }

    /// Registers a link that must be resolved by the end of the build.
    pub(crate) fn defer_link(&self, link: ForwardLink) {
        self.pending_links.borrow_mut().push(link);
    }

    /// Logs a join, resolved or not, made while building the current subtree.
    pub(crate) fn record_join(&self, link: ForwardLink) {
        self.joined.borrow_mut().push(link);
    }

    fn joined_len(&self) -> usize {
        self.joined.borrow().len()
    }

    fn joined_since(&self, mark: usize) -> Vec<ForwardLink> {
        self.joined.borrow()[mark..].to_vec()
    }

    fn replay_joins(&self, links: &[ForwardLink]) {
        self.joined.borrow_mut().extend_from_slice(links);
    }

    /// Writes `route` into `link`, which then depends on every link in
    /// `reached`.
    fn publish(
        &self,
        link: &ForwardLink,
        route: RouteRef,
        reached: &[ForwardLink],
    ) -> BuildResult<()> {
        if !link.resolve(route) {
            return Err(BuildError::LinkAlreadyResolved);
        }
        self.dependencies
            .borrow_mut()
            .extend(reached.iter().map(|target| (link.key(), target.key())));
        Ok(())
    }

    /// Number of deferred links still unresolved.
    pub(crate) fn unresolved_links(&self) -> usize {
        self.pending_links
            .borrow()
            .iter()
            .filter(|link| !link.is_resolved())
            .count()
    }

    /// Whether some link reaches itself through the links joined below it.
    pub(crate) fn has_link_cycle(&self) -> bool {
        let mut graph: HashMap<usize, Vec<usize>> = HashMap::new();
        for &(from, to) in self.dependencies.borrow().iter() {
            graph.entry(from).or_default().push(to);
        }
        let mut done = HashSet::new();
        let mut path = HashSet::new();
        graph
            .keys()
            .any(|&start| reaches_cycle(&graph, start, &mut path, &mut done))
    }
}

fn reaches_cycle(
    graph: &HashMap<usize, Vec<usize>>,
    node: usize,
    path: &mut HashSet<usize>,
    done: &mut HashSet<usize>,
) -> bool {
    if done.contains(&node) {
        return false;
    }
    if !path.insert(node) {
        return true;
    }
    let cyclic = graph
        .get(&node)
        .into_iter()
        .flatten()
        .any(|&next| reaches_cycle(graph, next, path, done));
    path.remove(&node);
    done.insert(node);
    cyclic
}

enum Gate {
    Wrap(GateFn),
    Link(ForwardLink),
}

enum Seal {
    Empty,
    Route(RouteRef),
    Builder(Box<dyn NodeBuilder>),
}

/// Construction context of one branch.
pub struct Context {
    env: Rc<Environment>,
    gates: Vec<Gate>,
    seal: Seal,
    built: Option<RouteRef>,
    reached: Vec<ForwardLink>,
}

impl Context {
    pub fn new(env: Rc<Environment>) -> Self {
        Self {
            env,
            gates: Vec::new(),
            seal: Seal::Empty,
            built: None,
            reached: Vec::new(),
        }
    }

    pub fn env(&self) -> &Rc<Environment> {
        &self.env
    }

    pub fn add_gate(&mut self, gate: GateFn) -> BuildResult<()> {
        self.push_gate(Gate::Wrap(gate))
    }

    /// Publishes the route built at this point of the gate chain.
    pub fn add_link(&mut self, link: ForwardLink) -> BuildResult<()> {
        self.push_gate(Gate::Link(link))
    }

    fn push_gate(&mut self, gate: Gate) -> BuildResult<()> {
        if self.built.is_some() {
            return Err(BuildError::RouteAlreadyBuilt);
        }
        self.gates.push(gate);
        Ok(())
    }

    pub fn set_route(&mut self, route: RouteRef) -> BuildResult<()> {
        self.ensure_open()?;
        self.seal = Seal::Route(route);
        Ok(())
    }

    pub fn set_builder(&mut self, builder: Box<dyn NodeBuilder>) -> BuildResult<()> {
        self.ensure_open()?;
        self.seal = Seal::Builder(builder);
        Ok(())
    }

    pub fn is_sealed(&self) -> bool {
        !matches!(self.seal, Seal::Empty)
    }

    fn ensure_open(&self) -> BuildResult<()> {
        if self.is_sealed() || self.built.is_some() {
            Err(BuildError::RouteAlreadyBuilt)
        } else {
            Ok(())
        }
    }

    /// Builds the branch; later calls return the same node.
    pub fn build(&mut self) -> BuildResult<RouteRef> {
        if let Some(built) = &self.built {
            self.env.replay_joins(&self.reached);
            return Ok(built.clone());
        }
        let mark = self.env.joined_len();
        let mut route = match &self.seal {
            Seal::Empty => return Err(BuildError::RouteTypeNotSelected),
            Seal::Route(route) => route.clone(),
            Seal::Builder(builder) => builder.build()?,
        };
        let reached = self.env.joined_since(mark);
        let gates = self.gates.len();
        while let Some(gate) = self.gates.pop() {
            match gate {
                Gate::Wrap(wrap) => route = wrap(route)?,
                Gate::Link(link) => self.env.publish(&link, route.clone(), &reached)?,
            }
        }
        tracing::debug!(gates, joined = reached.len(), "Route context built");
        self.reached = reached;
        self.built = Some(route.clone());
        Ok(route)
    }

    /// A fresh context sharing this one's environment.
    pub fn create(&self) -> Self {
        Self::new(self.env.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::test_support::tagged;
    use std::sync::Arc;

    fn context() -> Context {
        let env = Environment::new(
            PatternTypes::default(),
            StatusCode::MOVED_PERMANENTLY,
            "[0-9]+".to_string(),
            None,
        );
        Context::new(Rc::new(env))
    }

    #[test]
    fn test_unsealed_build_fails() {
        assert_eq!(context().build().unwrap_err(), BuildError::RouteTypeNotSelected);
    }

    #[test]
    fn test_double_seal_fails() {
        let mut context = context();
        context.set_route(tagged("a")).unwrap();
        assert_eq!(context.set_route(tagged("b")).unwrap_err(), BuildError::RouteAlreadyBuilt);
    }

    #[test]
    fn test_build_is_memoized() {
        let mut context = context();
        context.set_route(tagged("a")).unwrap();
        let first = context.build().unwrap();
        let second = context.build().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(context.add_gate(Box::new(|route: RouteRef| Ok(route))).is_err());
    }

    #[test]
    fn test_gates_apply_first_declared_outermost() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut context = context();
        for name in ["first", "second"] {
            let order = order.clone();
            context
                .add_gate(Box::new(move |route: RouteRef| {
                    order.borrow_mut().push(name);
                    Ok(route)
                }))
                .unwrap();
        }
        context.set_route(tagged("a")).unwrap();
        context.build().unwrap();
        // Innermost wrapper is applied first.
        assert_eq!(*order.borrow(), vec!["second", "first"]);
    }

    /// Sub-builder joining `link` while it builds.
    struct Joins {
        env: Rc<Environment>,
        link: ForwardLink,
    }

    impl NodeBuilder for Joins {
        fn build(&self) -> BuildResult<RouteRef> {
            self.env.record_join(self.link.clone());
            Ok(tagged("joined"))
        }
    }

    fn publishing(env: &Rc<Environment>, publish: &ForwardLink, join: &ForwardLink) -> Context {
        let mut context = Context::new(env.clone());
        context.add_link(publish.clone()).unwrap();
        context
            .set_builder(Box::new(Joins {
                env: env.clone(),
                link: join.clone(),
            }))
            .unwrap();
        context
    }

    #[test]
    fn test_link_joining_itself_is_a_cycle() {
        let env = context().env().clone();
        let link = ForwardLink::new();
        publishing(&env, &link, &link).build().unwrap();
        assert!(link.is_resolved());
        assert!(env.has_link_cycle());
    }

    #[test]
    fn test_links_joining_each_other_form_a_cycle() {
        let env = context().env().clone();
        let (first, second) = (ForwardLink::new(), ForwardLink::new());
        publishing(&env, &first, &second).build().unwrap();
        assert!(!env.has_link_cycle());
        publishing(&env, &second, &first).build().unwrap();
        assert!(env.has_link_cycle());
    }

    #[test]
    fn test_link_chain_is_not_a_cycle() {
        let env = context().env().clone();
        let (first, second, third) = (ForwardLink::new(), ForwardLink::new(), ForwardLink::new());
        publishing(&env, &first, &second).build().unwrap();
        publishing(&env, &second, &third).build().unwrap();
        assert!(!env.has_link_cycle());
    }

    #[test]
    fn test_memoized_build_replays_its_joins() {
        let env = context().env().clone();
        let link = ForwardLink::new();
        let mut inner = Context::new(env.clone());
        inner
            .set_builder(Box::new(Joins {
                env: env.clone(),
                link: link.clone(),
            }))
            .unwrap();
        inner.build().unwrap();
        let before = env.joined_len();
        inner.build().unwrap();
        assert_eq!(env.joined_len(), before + 1);
    }

    #[test]
    fn test_create_shares_environment() {
        let context = context();
        let sibling = context.create();
        assert!(Rc::ptr_eq(context.env(), sibling.env()));
        assert!(!sibling.is_sealed());
    }
}
