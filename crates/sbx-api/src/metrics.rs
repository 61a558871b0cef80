//! Prometheus metrics for request volume and latency.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{Label, counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static NUMERIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+").expect("numeric segment pattern is valid"));

/// Install the global Prometheus recorder
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
    )?;

    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Count requests and time them per method, path and status
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = vec![
        Label::new("method", req.method().to_string()),
        Label::new("path", normalize_path(req.uri().path())),
    ];

    let in_flight = gauge!("http_requests_in_flight", route.clone());
    in_flight.increment(1.0);
    let response = next.run(req).await;
    in_flight.decrement(1.0);

    let mut labels = route;
    labels.push(Label::new("status", response.status().as_u16().to_string()));
    counter!("http_requests_total", labels.clone()).increment(1);
    histogram!("http_request_duration_seconds", labels).record(start.elapsed());

    response
}

/// Collapse numeric ids so `/api/topic/7` and `/api/topic/8` share a series
fn normalize_path(path: &str) -> String {
    NUMERIC_SEGMENT.replace_all(path, "/:id").into_owned()
}

/// `GET /metrics` in the Prometheus text format
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/api/topic/123"), "/api/topic/:id");
        assert_eq!(normalize_path("/api/topic"), "/api/topic");
        assert_eq!(normalize_path("/topics/7/x/8"), "/topics/:id/x/:id");
        assert_eq!(normalize_path("/health"), "/health");
    }
}
