//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for route matching,
//! method validation, and post-dispatch accounting (access log + metrics).

use crate::config::AppState;
use crate::handler::endpoints;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const ROUTES: [&str; 5] = ["/", "/api/data", "/api/slow", "/health", "/metrics"];

/// Main entry point for HTTP request handling.
///
/// Generic over the body type: no handler reads the request body, and tests
/// dispatch with an empty one.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        resp
    } else {
        route_request(&method, &path, &state, remote_addr).await
    };

    record_dispatch(&state, remote_addr, &method, &path, &response, started);
    Ok(response)
}

/// Route request: path first (unknown path is 404 for any method), then the
/// method gate on matched routes
async fn route_request(
    method: &Method,
    path: &str,
    state: &Arc<AppState>,
    remote_addr: SocketAddr,
) -> Response<Full<Bytes>> {
    if !ROUTES.contains(&path) {
        logger::log_not_found(path, &remote_addr);
        return http::build_404_response();
    }

    let is_head = *method == Method::HEAD;
    if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        return resp;
    }

    match path {
        "/" => endpoints::home(is_head),
        "/api/data" => endpoints::data(is_head),
        "/api/slow" => endpoints::slow(is_head).await,
        "/health" => endpoints::health(is_head),
        "/metrics" => endpoints::metrics(state, is_head),
        _ => http::build_404_response(),
    }
}

/// Check HTTP method and return the appropriate response for
/// non-GET/HEAD methods on a matched route
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Post-dispatch accounting: access log entry plus request counter and
/// duration histogram
fn record_dispatch(
    state: &Arc<AppState>,
    remote_addr: SocketAddr,
    method: &Method,
    path: &str,
    response: &Response<Full<Bytes>>,
    started: Instant,
) {
    let elapsed = started.elapsed();
    let status = response.status().as_u16();

    state
        .metrics
        .record_request(method.as_str(), path, status, elapsed);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            remote_addr.to_string(),
            method.to_string(),
            path.to_string(),
        );
        entry.status = status;
        entry.body_bytes = usize::try_from(
            response.body().size_hint().exact().unwrap_or(0),
        )
        .unwrap_or(usize::MAX);
        entry.request_time_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn test_state() -> Arc<AppState> {
        let mut cfg = Config::load_from("no_such_config_file").expect("defaults");
        // Keep test output quiet
        cfg.logging.access_log = false;
        Arc::new(AppState::new(&cfg))
    }

    fn client() -> SocketAddr {
        "127.0.0.1:54321".parse().expect("socket addr")
    }

    fn request(method: Method, path: &str) -> Request<()> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(())
            .expect("request")
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.expect("body").to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn unknown_path_is_404_with_documented_body() {
        let state = test_state();
        let resp = handle_request(request(Method::GET, "/nope"), state, client())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, "404 Resource not found.");
    }

    #[tokio::test]
    async fn unknown_path_is_404_for_any_method() {
        let state = test_state();
        let resp = handle_request(request(Method::POST, "/nope"), state, client())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_on_matched_route_is_405() {
        let state = test_state();
        let resp = handle_request(request(Method::POST, "/health"), state, client())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD, OPTIONS");
    }

    #[tokio::test]
    async fn options_on_matched_route_is_204() {
        let state = test_state();
        let resp = handle_request(request(Method::OPTIONS, "/"), state, client())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn head_keeps_status_and_drops_body() {
        let state = test_state();
        let resp = handle_request(request(Method::HEAD, "/health"), state, client())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn oversized_content_length_is_rejected() {
        let state = test_state();
        let req = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .header("content-length", "999999999999")
            .body(())
            .expect("request");
        let resp = handle_request(req, state, client()).await.expect("infallible");
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn dispatch_increments_request_counter() {
        let state = test_state();
        for _ in 0..3 {
            let _resp = handle_request(request(Method::GET, "/health"), Arc::clone(&state), client())
                .await
                .expect("infallible");
        }
        let count = state.metrics.requests.get(&[
            ("method", "GET"),
            ("path", "/health"),
            ("status", "200"),
        ]);
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn not_found_is_also_counted() {
        let state = test_state();
        let _resp = handle_request(request(Method::GET, "/nope"), Arc::clone(&state), client())
            .await
            .expect("infallible");
        let count = state.metrics.requests.get(&[
            ("method", "GET"),
            ("path", "/nope"),
            ("status", "404"),
        ]);
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_app_info_and_earlier_requests() {
        let state = test_state();
        let _resp = handle_request(request(Method::GET, "/health"), Arc::clone(&state), client())
            .await
            .expect("infallible");
        let resp = handle_request(request(Method::GET, "/metrics"), state, client())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()["Content-Type"]
            .to_str()
            .expect("ascii header")
            .starts_with("text/plain"));
        let body = body_string(resp).await;
        assert!(body.contains("app_info{version=\"1.0.0\"} 1"));
        assert!(body.contains("http_requests_total{method=\"GET\",path=\"/health\",status=\"200\"} 1"));
    }
}
