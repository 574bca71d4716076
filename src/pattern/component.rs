//! Static single-value components (scheme, user-info, host, port).

use crate::http::{Params, Request, Uri};
use crate::pattern::Pattern;
use crate::routing::{RoutingError, RoutingResult};

/// URI component a static pattern is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Scheme,
    UserInfo,
    Host,
    Port,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::Scheme => "scheme",
            Component::UserInfo => "user-info",
            Component::Host => "host",
            Component::Port => "port",
        }
    }

    fn read(&self, uri: &Uri) -> String {
        match self {
            Component::Scheme => uri.scheme().to_string(),
            Component::UserInfo => uri.user_info().to_string(),
            Component::Host => uri.host().to_string(),
            Component::Port => uri.port().map(|p| p.to_string()).unwrap_or_default(),
        }
    }

    /// Scheme and host compare case-insensitively.
    fn same(&self, expected: &str, actual: &str) -> bool {
        match self {
            Component::Scheme | Component::Host => expected.eq_ignore_ascii_case(actual),
            Component::UserInfo | Component::Port => expected == actual,
        }
    }
}

/// Exact-match pattern for one static component.
#[derive(Debug, Clone)]
pub struct StaticComponent {
    component: Component,
    value: String,
    port: Option<u16>,
}

impl StaticComponent {
    pub fn scheme(scheme: impl Into<String>) -> Self {
        Self::text(Component::Scheme, scheme.into())
    }

    pub fn user_info(user_info: impl Into<String>) -> Self {
        Self::text(Component::UserInfo, user_info.into())
    }

    pub fn host(host: impl Into<String>) -> Self {
        Self::text(Component::Host, host.into())
    }

    pub fn port(port: u16) -> Self {
        Self {
            component: Component::Port,
            value: port.to_string(),
            port: Some(port),
        }
    }

    fn text(component: Component, value: String) -> Self {
        Self {
            component,
            value,
            port: None,
        }
    }

    pub fn component(&self) -> Component {
        self.component
    }

    fn write(&self, uri: Uri) -> Uri {
        match self.component {
            Component::Scheme => uri.with_scheme(self.value.clone()),
            Component::UserInfo => uri.with_user_info(self.value.clone()),
            Component::Host => uri.with_host(self.value.clone()),
            Component::Port => uri.with_port(self.port),
        }
    }
}

impl Pattern for StaticComponent {
    fn matched_request(&self, request: Request) -> Option<Request> {
        let actual = self.component.read(request.uri());
        if self.component.same(&self.value, &actual) {
            Some(request)
        } else {
            tracing::trace!(
                component = self.component.name(),
                expected = %self.value,
                actual = %actual,
                "Component mismatch"
            );
            None
        }
    }

    fn uri(&self, prototype: Uri, _params: &Params) -> RoutingResult<Uri> {
        let actual = self.component.read(&prototype);
        if actual.is_empty() {
            return Ok(self.write(prototype));
        }
        if self.component.same(&self.value, &actual) {
            return Ok(prototype);
        }
        Err(RoutingError::UnreachableEndpoint {
            component: self.component.name(),
            expected: self.value.clone(),
            actual,
        })
    }

    fn template_uri(&self, prototype: Uri) -> RoutingResult<Uri> {
        self.uri(prototype, &Params::new())
    }
}
