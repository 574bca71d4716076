//! Lazily constructed route.

use std::sync::OnceLock;

use crate::http::{Params, Request, Response, Uri};
use crate::routing::{Route, RouteRef, RoutingResult};

type Supplier = Box<dyn Fn() -> RouteRef + Send + Sync>;

/// Defers building the inner route until first use.
///
/// The supplier runs at most once, even when several threads hit the route
/// at the same time.
pub struct LazyRoute {
    supplier: Supplier,
    route: OnceLock<RouteRef>,
}

impl LazyRoute {
    pub fn new<F>(supplier: F) -> Self
    where
        F: Fn() -> RouteRef + Send + Sync + 'static,
    {
        Self {
            supplier: Box::new(supplier),
            route: OnceLock::new(),
        }
    }

    fn route(&self) -> &RouteRef {
        self.route.get_or_init(|| {
            tracing::debug!("Resolving lazy route");
            (self.supplier)()
        })
    }
}

impl Route for LazyRoute {
    fn forward(&self, request: Request) -> Option<Response> {
        self.route().forward(request)
    }

    fn select(&self, path: &str) -> RoutingResult<RouteRef> {
        self.route().select(path)
    }

    fn uri(&self, prototype: Uri, params: &Params) -> RoutingResult<Uri> {
        self.route().uri(prototype, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::test_support::{request, tag_of, tagged};
    use axum::http::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_supplier_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let lazy = LazyRoute::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            tagged("lazy")
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(tag_of(lazy.forward(request(Method::GET, "/"))), Some("lazy".into()));
        assert!(lazy.uri(Uri::new(), &Params::new()).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_use_resolves_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let lazy = Arc::new(LazyRoute::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            tagged("lazy")
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = lazy.clone();
                std::thread::spawn(move || lazy.forward(request(Method::GET, "/")).is_some())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
