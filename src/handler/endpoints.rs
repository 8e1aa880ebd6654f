//! Endpoint handlers
//!
//! Each handler maps a request to a canned or lightly randomized JSON
//! document. None of them reads the request body or keeps state between
//! requests.

use crate::config::AppState;
use crate::http;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Root endpoint: welcome document describing the available endpoints
pub fn home(is_head: bool) -> Response<Full<Bytes>> {
    let doc = serde_json::json!({
        "message": "Welcome to the demo monitoring app",
        "endpoints": {
            "/": "App root",
            "/api/data": "Returns random data",
            "/api/slow": "Simulates slow requests",
            "/health": "Health check endpoint",
            "/metrics": "Prometheus metrics"
        }
    });
    http::build_json_response(&doc, is_head)
}

/// Random data endpoint: value in [1,100] plus the current Unix time
pub fn data(is_head: bool) -> Response<Full<Bytes>> {
    let value: u32 = rand::thread_rng().gen_range(1..=100);
    let doc = serde_json::json!({
        "value": value,
        "timestamp": unix_timestamp(),
    });
    http::build_json_response(&doc, is_head)
}

/// Slow endpoint: waits a uniformly sampled 1-3s before answering.
///
/// The wait is an async timer, so a slow request parks its task instead of
/// stalling other connections.
pub async fn slow(is_head: bool) -> Response<Full<Bytes>> {
    let delay_seconds = sample_delay();
    tokio::time::sleep(Duration::from_secs_f64(delay_seconds)).await;
    let doc = serde_json::json!({
        "message": "This was a slow request",
        "delay_seconds": delay_seconds,
    });
    http::build_json_response(&doc, is_head)
}

/// Health check endpoint: unconditionally healthy
pub fn health(is_head: bool) -> Response<Full<Bytes>> {
    http::build_json_response(&serde_json::json!({"status": "healthy"}), is_head)
}

/// Metrics endpoint: renders the registry in the exposition format
pub fn metrics(state: &Arc<AppState>, is_head: bool) -> Response<Full<Bytes>> {
    http::build_metrics_response(state.metrics.render(), is_head)
}

/// Uniform delay in [1.0, 3.0) seconds
fn sample_delay() -> f64 {
    rand::thread_rng().gen_range(1.0..3.0)
}

/// Current Unix time as floating-point seconds
fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.expect("body").to_bytes();
        serde_json::from_slice(&bytes).expect("valid json body")
    }

    #[tokio::test]
    async fn home_lists_exactly_the_five_endpoints() {
        let doc = body_json(home(false)).await;
        assert_eq!(doc["message"], "Welcome to the demo monitoring app");
        let endpoints = doc["endpoints"].as_object().expect("endpoint map");
        assert_eq!(endpoints.len(), 5);
        for key in ["/", "/api/data", "/api/slow", "/health", "/metrics"] {
            assert!(endpoints.contains_key(key), "missing endpoint key {key}");
        }
    }

    #[tokio::test]
    async fn data_value_stays_in_documented_range() {
        for _ in 0..100 {
            let doc = body_json(data(false)).await;
            let value = doc["value"].as_u64().expect("integer value");
            assert!((1..=100).contains(&value), "value out of range: {value}");
        }
    }

    #[tokio::test]
    async fn data_timestamp_tracks_wall_clock() {
        let before = unix_timestamp();
        let doc = body_json(data(false)).await;
        let after = unix_timestamp();
        let ts = doc["timestamp"].as_f64().expect("float timestamp");
        assert!(ts >= before && ts <= after, "timestamp {ts} outside [{before}, {after}]");
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let resp = health(false);
        assert_eq!(resp.status(), hyper::StatusCode::OK);
        let doc = body_json(resp).await;
        assert_eq!(doc, serde_json::json!({"status": "healthy"}));
    }

    #[test]
    fn sampled_delay_stays_in_documented_range() {
        for _ in 0..100 {
            let d = sample_delay();
            assert!((1.0..3.0).contains(&d), "delay out of range: {d}");
        }
    }

    // Paused time lets the timer auto-advance, so the 1-3s wait is instant
    #[tokio::test(start_paused = true)]
    async fn slow_reports_its_sampled_delay() {
        let started = tokio::time::Instant::now();
        let doc = body_json(slow(false).await).await;
        let waited = started.elapsed().as_secs_f64();
        let delay = doc["delay_seconds"].as_f64().expect("float delay");
        assert_eq!(doc["message"], "This was a slow request");
        assert!((1.0..3.0).contains(&delay), "delay out of range: {delay}");
        assert!(waited >= delay, "latency {waited} below reported delay {delay}");
    }
}
