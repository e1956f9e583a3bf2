// SPDX-License-Identifier: Apache-2.0

use crate::config::CONFIG_SCHEMA_VERSION;
use crate::http::response::now_iso_millis;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use canine_intake_api::{openapi_v1_spec, HealthDto, SERVICE_NAME};
use serde_json::json;
use std::sync::atomic::Ordering;

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    Json(HealthDto {
        ok: true,
        service: SERVICE_NAME.to_string(),
        timestamp: now_iso_millis(),
    })
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    if state.ready.load(Ordering::Relaxed) && state.accepting_requests.load(Ordering::Relaxed) {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not-ready").into_response()
    }
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "crate": crate::CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "config_schema_version": CONFIG_SCHEMA_VERSION,
        "store_backend": state.store.backend_tag(),
        "payments_backend": state.payments.backend_tag(),
    }))
}

pub(crate) async fn openapi_handler() -> impl IntoResponse {
    Json(openapi_v1_spec())
}
