//! Forward links between branches built in any order.

use axum::http::Method;
use route_tree::{BuildError, ForwardLink, Params, RouterBuilder};

mod common;

use common::{send, tag, tagged};

/// `shared` publishes its route through a link, `alias` joins it.
fn build(link_first: bool) -> route_tree::Router {
    let link = ForwardLink::new();
    let builder = RouterBuilder::new();
    let paths = builder.root().path_switch().unwrap();

    let publish = |paths: &route_tree::builder::PathSwitchBuilder| {
        paths
            .route("shared")
            .unwrap()
            .link(&link)
            .unwrap()
            .method("GET")
            .unwrap()
            .callback(tagged("shared"))
            .unwrap();
    };
    let join = |paths: &route_tree::builder::PathSwitchBuilder| {
        paths.route("alias").unwrap().join_link(&link).unwrap();
    };

    if link_first {
        publish(&paths);
        join(&paths);
    } else {
        join(&paths);
        publish(&paths);
    }
    builder.build().unwrap()
}

#[test]
fn test_link_order_independence() {
    for link_first in [true, false] {
        let router = build(link_first);
        assert_eq!(tag(send(&router, Method::GET, "/shared")), Some("shared".into()));
        assert_eq!(tag(send(&router, Method::GET, "/alias")), Some("shared".into()));
        // The method gate declared after `link` is part of the linked route.
        assert!(send(&router, Method::POST, "/alias").is_none());
        assert_eq!(
            router.uri_for("alias", &Params::new()).unwrap().path(),
            "/alias"
        );
    }
}

#[test]
fn test_unwritten_link_fails_the_build() {
    let builder = RouterBuilder::new();
    let paths = builder.root().path_switch().unwrap();
    paths.route("alias").unwrap().join_link(&ForwardLink::new()).unwrap();
    paths.route("home").unwrap().callback(tagged("home")).unwrap();
    assert_eq!(builder.build().unwrap_err(), BuildError::UnresolvedLink);
}

#[test]
fn test_link_shared_between_trees_is_written_once() {
    let link = ForwardLink::new();

    let first = RouterBuilder::new();
    first.root().link(&link).unwrap().callback(tagged("first")).unwrap();
    first.build().unwrap();

    let second = RouterBuilder::new();
    second.root().link(&link).unwrap().callback(tagged("second")).unwrap();
    assert_eq!(second.build().unwrap_err(), BuildError::LinkAlreadyResolved);
}

#[test]
fn test_branch_joining_its_own_link_fails_the_build() {
    let link = ForwardLink::new();
    let builder = RouterBuilder::new();
    let paths = builder.root().path_switch().unwrap();
    paths.route("a").unwrap().link(&link).unwrap().join_link(&link).unwrap();
    paths.route("home").unwrap().callback(tagged("home")).unwrap();
    assert_eq!(builder.build().unwrap_err(), BuildError::UnresolvedLink);
}

#[test]
fn test_branches_joining_each_other_fail_the_build() {
    for gated in [false, true] {
        let (first, second) = (ForwardLink::new(), ForwardLink::new());
        let builder = RouterBuilder::new();
        let paths = builder.root().path_switch().unwrap();
        let a = paths.route("a").unwrap();
        a.link(&first).unwrap();
        if gated {
            a.method("GET").unwrap();
        }
        a.join_link(&second).unwrap();
        let b = paths.route("b").unwrap();
        b.link(&second).unwrap().path("x").unwrap().join_link(&first).unwrap();
        assert_eq!(builder.build().unwrap_err(), BuildError::UnresolvedLink);
    }
}

#[test]
fn test_chained_links_build() {
    let (first, second) = (ForwardLink::new(), ForwardLink::new());
    let builder = RouterBuilder::new();
    let paths = builder.root().path_switch().unwrap();
    paths.route("a").unwrap().link(&first).unwrap().join_link(&second).unwrap();
    paths
        .route("b")
        .unwrap()
        .link(&second)
        .unwrap()
        .callback(tagged("b"))
        .unwrap();
    paths.route("c").unwrap().join_link(&first).unwrap();
    let router = builder.build().unwrap();

    for uri in ["/a", "/b", "/c"] {
        assert_eq!(tag(send(&router, Method::GET, uri)), Some("b".into()));
    }
}
