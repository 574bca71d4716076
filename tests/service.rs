//! The tower service boundary.

use axum::http::{header, Method, StatusCode};
use route_tree::config::parse_config;
use route_tree::http::response;
use route_tree::{Request, RouterBuilder, RouterService};
use tower::ServiceExt;

mod common;

use common::{allow, body_text, http_request, tagged};

fn service(config_toml: &str) -> RouterService {
    let config = parse_config(config_toml).unwrap();
    let builder = RouterBuilder::new().with_config(&config);
    let paths = builder.root().path_switch().unwrap();
    let echo = paths.route("echo").unwrap().method_switch().unwrap();
    echo.route("POST")
        .unwrap()
        .callback(|request: Request| {
            response::empty(StatusCode::OK).map(|_| axum::body::Body::from(request.body().clone()))
        })
        .unwrap();
    echo.route("PUT").unwrap().callback(tagged("put")).unwrap();
    echo.implicit(Method::POST);
    paths.route("old").unwrap().redirect("echo").unwrap();
    RouterService::new(builder.build().unwrap()).with_config(&config)
}

#[tokio::test]
async fn test_body_reaches_endpoint() {
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/echo")
        .body(axum::body::Body::from("ping"))
        .unwrap();
    let response = service("").oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ping");
}

#[tokio::test]
async fn test_not_found_has_empty_body() {
    let response = service("").oneshot(http_request(Method::GET, "/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn test_configured_redirect_status() {
    let response = service("redirect_status = 308")
        .oneshot(http_request(Method::GET, "/old"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/echo");
}

#[tokio::test]
async fn test_options_answered_from_capabilities() {
    let response = service("")
        .oneshot(http_request(Method::OPTIONS, "/echo"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(allow(&response), Some("POST, PUT"));

    let narrowed = service("[methods]\nimplicit = [\"PUT\", \"DELETE\"]")
        .oneshot(http_request(Method::OPTIONS, "/echo"))
        .await
        .unwrap();
    assert_eq!(allow(&narrowed), Some("PUT"));
}

#[tokio::test]
async fn test_url_in_query_is_routed() {
    let response = service("")
        .oneshot(http_request(Method::PUT, "/echo?next=https://example.com/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-route"], "put");
}
