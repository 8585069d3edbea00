use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// Logs every request and its outcome, louder as the status gets worse.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    tracing::info!(%method, %uri, "request");

    let response = next.run(request).await;

    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or("Unknown");
    let elapsed = start.elapsed();

    if status.is_server_error() {
        tracing::error!(%method, %uri, status = status_text, ?elapsed, "response");
    } else if status.is_client_error() {
        tracing::warn!(%method, %uri, status = status_text, ?elapsed, "response");
    } else {
        tracing::info!(%method, %uri, status = status_text, ?elapsed, "response");
    }

    response
}
