//! Splitter builders.
//!
//! Each builder hands out one [`RouteBuilder`] per child and assembles the
//! matching splitter node when its parent context builds. Children are
//! built in registration order.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use axum::http::Method;

use crate::builder::context::{Environment, NodeBuilder};
use crate::builder::error::{BuildError, BuildResult};
use crate::builder::route::RouteBuilder;
use crate::pattern::PatternRef;
use crate::routing::gates::parse_methods;
use crate::routing::{
    CallbackSwitch, KeyFn, MethodSwitch, PathSwitch, ResourceAction, ResourceSwitch, RouteRef,
    ScanSwitch, ROOT_PATH,
};

/// Children in registration order.
type Children<K> = Rc<RefCell<Vec<(K, RouteBuilder)>>>;

fn register<K: PartialEq + ToString>(
    children: &Children<K>,
    env: &Rc<Environment>,
    key: K,
) -> BuildResult<RouteBuilder> {
    let mut children = children.borrow_mut();
    if children.iter().any(|(existing, _)| *existing == key) {
        return Err(BuildError::DuplicateRoute(key.to_string()));
    }
    let child = RouteBuilder::new(env.clone());
    children.push((key, child.clone()));
    Ok(child)
}

fn build_children<K: Clone>(children: &Children<K>) -> BuildResult<Vec<(K, RouteRef)>> {
    children
        .borrow()
        .iter()
        .map(|(key, child)| Ok((key.clone(), child.build()?)))
        .collect()
}

/// Builds a [`PathSwitch`].
#[derive(Clone)]
pub struct PathSwitchBuilder {
    env: Rc<Environment>,
    routes: Children<String>,
    root: Rc<RefCell<Option<RouteBuilder>>>,
}

impl PathSwitchBuilder {
    pub(crate) fn new(env: Rc<Environment>) -> Self {
        Self {
            env,
            routes: Rc::default(),
            root: Rc::default(),
        }
    }

    /// Child dispatched for the path segment `segment`.
    pub fn route(&self, segment: &str) -> BuildResult<RouteBuilder> {
        register(&self.routes, &self.env, segment.to_string())
    }

    /// Child answering when no segment is left.
    pub fn root(&self) -> BuildResult<RouteBuilder> {
        let mut root = self.root.borrow_mut();
        if root.is_some() {
            return Err(BuildError::DuplicateRoute(ROOT_PATH.to_string()));
        }
        let child = RouteBuilder::new(self.env.clone());
        *root = Some(child.clone());
        Ok(child)
    }
}

impl NodeBuilder for PathSwitchBuilder {
    fn build(&self) -> BuildResult<RouteRef> {
        let routes: HashMap<String, RouteRef> = build_children(&self.routes)?.into_iter().collect();
        let root = self.root.borrow().as_ref().map(RouteBuilder::build).transpose()?;
        tracing::debug!(routes = routes.len(), root = root.is_some(), "Path switch built");
        Ok(Arc::new(PathSwitch::new(routes, root)))
    }
}

/// Builds a [`MethodSwitch`].
#[derive(Clone)]
pub struct MethodSwitchBuilder {
    env: Rc<Environment>,
    routes: Children<Method>,
    implicit: Rc<RefCell<Option<Method>>>,
}

impl MethodSwitchBuilder {
    pub(crate) fn new(env: Rc<Environment>) -> Self {
        Self {
            env,
            routes: Rc::default(),
            implicit: Rc::default(),
        }
    }

    /// One child shared by every method of a pipe-delimited list.
    pub fn route(&self, methods: &str) -> BuildResult<RouteBuilder> {
        let methods = parse_methods(methods)?;
        let mut routes = self.routes.borrow_mut();
        if let Some(duplicate) = methods
            .iter()
            .find(|method| routes.iter().any(|(existing, _)| existing == *method))
        {
            return Err(BuildError::DuplicateRoute(duplicate.to_string()));
        }
        let child = RouteBuilder::new(self.env.clone());
        routes.extend(methods.into_iter().map(|method| (method, child.clone())));
        Ok(child)
    }

    /// Method whose route builds URIs. Defaults to `GET` when registered.
    pub fn implicit(&self, method: Method) -> &Self {
        *self.implicit.borrow_mut() = Some(method);
        self
    }
}

impl NodeBuilder for MethodSwitchBuilder {
    fn build(&self) -> BuildResult<RouteRef> {
        let routes = build_children(&self.routes)?;
        let implicit = self.implicit.borrow().clone().or_else(|| {
            routes
                .iter()
                .any(|(method, _)| method == Method::GET)
                .then_some(Method::GET)
        });
        tracing::debug!(routes = routes.len(), implicit = ?implicit, "Method switch built");
        Ok(Arc::new(MethodSwitch::new(routes, implicit)))
    }
}

/// Builds a [`ScanSwitch`].
#[derive(Clone)]
pub struct ScanSwitchBuilder {
    env: Rc<Environment>,
    routes: Children<String>,
    default: Rc<RefCell<Option<RouteBuilder>>>,
}

impl ScanSwitchBuilder {
    pub(crate) fn new(env: Rc<Environment>) -> Self {
        Self {
            env,
            routes: Rc::default(),
            default: Rc::default(),
        }
    }

    /// Named child, selectable by `name`.
    pub fn route(&self, name: &str) -> BuildResult<RouteBuilder> {
        register(&self.routes, &self.env, name.to_string())
    }

    /// Anonymous child, named after its position.
    pub fn next(&self) -> BuildResult<RouteBuilder> {
        let position = self.routes.borrow().len();
        register(&self.routes, &self.env, position.to_string())
    }

    /// Child tried before all others and used to build URIs.
    pub fn default_route(&self) -> BuildResult<RouteBuilder> {
        let mut default = self.default.borrow_mut();
        if default.is_some() {
            return Err(BuildError::DuplicateRoute("default".to_string()));
        }
        let child = RouteBuilder::new(self.env.clone());
        *default = Some(child.clone());
        Ok(child)
    }
}

impl NodeBuilder for ScanSwitchBuilder {
    fn build(&self) -> BuildResult<RouteRef> {
        let routes = build_children(&self.routes)?;
        let default = self.default.borrow().as_ref().map(RouteBuilder::build).transpose()?;
        tracing::debug!(routes = routes.len(), default = default.is_some(), "Scan switch built");
        Ok(Arc::new(ScanSwitch::new(routes, default)))
    }
}

/// Builds a [`CallbackSwitch`].
#[derive(Clone)]
pub struct CallbackSwitchBuilder {
    env: Rc<Environment>,
    key: KeyFn,
    routes: Children<String>,
    implicit: Rc<RefCell<Option<String>>>,
}

impl CallbackSwitchBuilder {
    pub(crate) fn new(env: Rc<Environment>, key: KeyFn) -> Self {
        Self {
            env,
            key,
            routes: Rc::default(),
            implicit: Rc::default(),
        }
    }

    /// Child dispatched when the callback returns `key`.
    pub fn route(&self, key: &str) -> BuildResult<RouteBuilder> {
        register(&self.routes, &self.env, key.to_string())
    }

    /// Key whose route builds URIs.
    pub fn implicit(&self, key: &str) -> &Self {
        *self.implicit.borrow_mut() = Some(key.to_string());
        self
    }
}

impl NodeBuilder for CallbackSwitchBuilder {
    fn build(&self) -> BuildResult<RouteRef> {
        let routes: HashMap<String, RouteRef> = build_children(&self.routes)?.into_iter().collect();
        tracing::debug!(routes = routes.len(), "Callback switch built");
        Ok(Arc::new(CallbackSwitch::new(
            self.key.clone(),
            routes,
            self.implicit.borrow().clone(),
        )))
    }
}

/// Builds a [`ResourceSwitch`].
#[derive(Clone)]
pub struct ResourceSwitchBuilder {
    env: Rc<Environment>,
    prefix: Option<PatternRef>,
    routes: Children<ResourceAction>,
    id_pattern: Rc<RefCell<Option<String>>>,
}

impl ResourceSwitchBuilder {
    pub(crate) fn new(env: Rc<Environment>, prefix: Option<PatternRef>) -> Self {
        Self {
            env,
            prefix,
            routes: Rc::default(),
            id_pattern: Rc::default(),
        }
    }

    /// Child for a REST pseudo-method (`INDEX`, `POST`, `GET`, `PUT`,
    /// `PATCH`, `DELETE`).
    pub fn route(&self, action: &str) -> BuildResult<RouteBuilder> {
        self.action(action.parse()?)
    }

    pub fn action(&self, action: ResourceAction) -> BuildResult<RouteBuilder> {
        register(&self.routes, &self.env, action)
    }

    /// Overrides the configured id regex for this resource.
    pub fn with_id(&self, id_pattern: &str) -> &Self {
        *self.id_pattern.borrow_mut() = Some(id_pattern.to_string());
        self
    }
}

impl NodeBuilder for ResourceSwitchBuilder {
    fn build(&self) -> BuildResult<RouteRef> {
        let routes = build_children(&self.routes)?;
        let id_pattern = self
            .id_pattern
            .borrow()
            .clone()
            .unwrap_or_else(|| self.env.id_pattern.clone());
        tracing::debug!(routes = routes.len(), id_pattern = %id_pattern, "Resource switch built");
        Ok(Arc::new(ResourceSwitch::new(
            self.prefix.clone(),
            routes,
            &id_pattern,
        )?))
    }
}
