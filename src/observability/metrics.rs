//! Metrics collection.
//!
//! # Metrics
//! - `route_tree_requests_total` (counter): requests by method and outcome
//! - `route_tree_request_duration_seconds` (histogram): dispatch latency
//! - `route_tree_options_probes_total` (counter): OPTIONS requests answered
//!   at the service boundary, by whether any method was allowed
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; exposition is up to the host
//! - Labels limited to low-cardinality values (no paths)

use std::time::Instant;

/// Result of dispatching one request at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    NotFound,
    BadRequest,
    PayloadTooLarge,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Matched => "matched",
            Outcome::NotFound => "not_found",
            Outcome::BadRequest => "bad_request",
            Outcome::PayloadTooLarge => "payload_too_large",
        }
    }
}

pub fn record_request(method: &str, outcome: Outcome, start_time: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("outcome", outcome.as_str().to_string()),
    ];
    ::metrics::counter!("route_tree_requests_total", &labels).increment(1);
    ::metrics::histogram!("route_tree_request_duration_seconds", &labels)
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_options_probe(allowed: usize) {
    let result = if allowed > 0 { "allowed" } else { "none" };
    ::metrics::counter!("route_tree_options_probes_total", "result" => result).increment(1);
}
