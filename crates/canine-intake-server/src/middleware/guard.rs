// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::{client_key, normalized_header_value};
use crate::http::response::error_response;
use crate::{AppState, WEBHOOK_ROUTE};
use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request};
use axum::middleware::Next;
use axum::response::Response;
use canine_intake_api::ApiError;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{info, warn};

/// Write-route admission (drain gate and per-client rate limit) plus the
/// request deadline. The payments webhook is exempt from the rate limit.
pub(crate) async fn submit_guard_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() == Method::POST {
        if !state.accepting_requests.load(Ordering::Relaxed) {
            return error_response(&ApiError::not_ready());
        }
        if req.uri().path() != WEBHOOK_ROUTE {
            let key = client_key(req.headers());
            if !state
                .submit_limiter
                .allow(&key, &state.api.submit_rate_limit)
                .await
            {
                warn!(client = %key, "submit rate limit exceeded");
                return error_response(&ApiError::rate_limited());
            }
        }
    }
    match tokio::time::timeout(state.api.request_timeout, next.run(req)).await {
        Ok(resp) => resp,
        Err(_) => {
            warn!(
                timeout_ms = state.api.request_timeout.as_millis() as u64,
                "request deadline exceeded"
            );
            error_response(&ApiError::timeout())
        }
    }
}

pub(crate) async fn audit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.api.enable_audit_log {
        return next.run(req).await;
    }
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id =
        normalized_header_value(req.headers(), "x-request-id", 128).unwrap_or_default();
    let client_ip = client_key(req.headers());
    let resp = next.run(req).await;
    info!(
        target: "intake_audit",
        method = %method,
        path = %path,
        status = resp.status().as_u16(),
        request_id = %request_id,
        client_ip = %client_ip,
        latency_ms = started.elapsed().as_millis() as u64,
        "audit"
    );
    resp
}
