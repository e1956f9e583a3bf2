// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::normalized_header_value;
use crate::http::response::{body_or, error_response};
use crate::webhook::{apply_event, verify};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use canine_intake_api::{ApiError, PaymentEventDto, WebhookAckDto};
use tracing::{error, warn};

const SIGNATURE_HEADER: &str = "stripe-signature";

fn now_unix() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

async fn handle_webhook(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<WebhookAckDto, ApiError> {
    let secret = state.api.webhook_secret();
    let signature = normalized_header_value(headers, SIGNATURE_HEADER, 4096);
    let (Some(secret), Some(signature)) = (secret, signature) else {
        warn!(
            secret_configured = state.api.webhook_secret().is_some(),
            "webhook rejected: missing signature or secret"
        );
        return Err(ApiError::missing_webhook_config());
    };
    let raw = body_or(body, ApiError::invalid_signature)?;
    verify(
        &raw,
        &signature,
        secret,
        state.api.webhook_tolerance_secs,
        now_unix(),
    )
    .map_err(|e| {
        warn!("webhook signature rejected: {e}");
        ApiError::invalid_signature()
    })?;
    let event: PaymentEventDto = serde_json::from_slice(&raw).map_err(|e| {
        warn!("signed webhook payload is not an event: {e}");
        ApiError::invalid_signature()
    })?;
    apply_event(state.store.as_ref(), &event)
        .await
        .map_err(|e| {
            error!(event_id = %event.id, event_type = %event.event_type, "webhook handler failed: {e}");
            ApiError::webhook_failed()
        })?;
    Ok(WebhookAckDto { received: true })
}

pub(crate) async fn stripe_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match handle_webhook(&state, &headers, body).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => error_response(&err),
    }
}
