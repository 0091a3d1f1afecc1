use axum::{
    extract::{MatchedPath, Request, State},
    http::{Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, field, info, info_span, warn};
use uuid::Uuid;

use super::AppState;
use super::form::{as_str_pairs, bind_id, decode_pairs};

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// How a page request ended, as reported in logs and metric labels.
fn page_outcome(method: &Method, status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "error"
    } else if status.is_client_error() {
        "rejected"
    } else if status.is_redirection() {
        if *method == Method::POST { "saved" } else { "redirected" }
    } else {
        "rendered"
    }
}

/// One span and one summary event per page request.
///
/// The span carries the title id the request addresses, if any. Redirects
/// record their target, so a canonicalized listing or a post-save bounce can
/// be followed in the logs.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_string(), |mp| mp.as_str().to_string());
    let title_id = req
        .uri()
        .query()
        .and_then(|query| bind_id(as_str_pairs(&decode_pairs(query))));

    let span = info_span!(
        "page",
        request_id = %Uuid::new_v4(),
        %method,
        %route,
        title_id = field::Empty,
        redirect_to = field::Empty,
    );
    if let Some(id) = title_id {
        span.record("title_id", id.value());
    }

    async move {
        let response = next.run(req).await;

        let status = response.status();
        let outcome = page_outcome(&method, status);
        let elapsed = start.elapsed();

        if let Some(target) = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
        {
            tracing::Span::current().record("redirect_to", target);
        }

        let labels = [
            ("method", method.to_string()),
            ("route", route.clone()),
            ("outcome", outcome.to_string()),
        ];
        metrics::counter!("catalog_page_requests_total", &labels).increment(1);
        metrics::histogram!("catalog_page_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if status.is_server_error() {
            warn!(status = status.as_u16(), duration_ms, outcome, "Page failed");
        } else {
            info!(status = status.as_u16(), duration_ms, outcome, "Page served");
        }

        response
    }
    .instrument(span)
    .await
}
