//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, StatusCode};
use route_tree::http::response;
use route_tree::{Request, Response, Route, Router};

pub const ROUTE_HEADER: &str = "x-route";

/// Endpoint callback answering 200 with `name` in `x-route`.
pub fn tagged(name: &'static str) -> impl Fn(Request) -> Response + Send + Sync + 'static {
    move |_| {
        let mut response = response::empty(StatusCode::OK);
        response
            .headers_mut()
            .insert(ROUTE_HEADER, HeaderValue::from_static(name));
        response
    }
}

pub fn request(method: Method, uri: &str) -> Request {
    Request::parse(method, uri).unwrap()
}

pub fn send(router: &Router, method: Method, uri: &str) -> Option<Response> {
    router.forward(request(method, uri))
}

pub fn tag(response: Option<Response>) -> Option<String> {
    let response = response?;
    Some(response.headers().get(ROUTE_HEADER)?.to_str().ok()?.to_string())
}

pub fn allow(response: &Response) -> Option<&str> {
    response.headers().get(header::ALLOW)?.to_str().ok()
}

pub fn http_request(method: Method, uri: &str) -> axum::extract::Request {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "example.com")
        .body(Body::empty())
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
