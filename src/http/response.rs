//! Response helpers.
//!
//! # Responsibilities
//! - Name the response type produced by endpoints
//! - Build the few responses the routing core creates itself
//!   (OPTIONS capability answers, redirects, the boundary 404)
//!
//! # Design Decisions
//! - "Not matched" is `None` on the forward path, never a response;
//!   `not_found` is only used at the service boundary

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, StatusCode};

/// Response produced by endpoints.
pub type Response = axum::http::Response<Body>;

/// Builds a bodiless response with the given status.
pub fn empty(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

/// Capability answer for OPTIONS: `204 No Content` with an `Allow` list.
pub fn options(methods: &[Method]) -> Response {
    let allow = methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let mut response = empty(StatusCode::NO_CONTENT);
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

/// Redirect to `location`. Locations that are not valid header values
/// turn into `500 Internal Server Error`.
pub fn redirect(location: &str, status: StatusCode) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = empty(status);
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        Err(_) => {
            tracing::error!(location = %location, "Redirect location is not a valid header value");
            empty(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub fn not_found() -> Response {
    empty(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_allow_header() {
        let response = options(&[Method::PATCH, Method::PUT]);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::ALLOW], "PATCH, PUT");
    }

    #[test]
    fn test_redirect_location() {
        let response = redirect("/admin", StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/admin");

        let response = redirect("/bad\nline", StatusCode::FOUND);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
