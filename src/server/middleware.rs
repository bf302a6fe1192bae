use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use log::info;

/// Logs method, path, status and latency of every request.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} {} ({}us)",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_micros()
    );

    response
}
