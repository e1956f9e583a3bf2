// SPDX-License-Identifier: Apache-2.0

use crate::http::response::{body_or, error_response, now_iso_millis};
use crate::store::Document;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use canine_intake_api::{parse_booking_request, ApiError, BookingRequestDto, BookingResponseDto};
use canine_intake_model::{ConnectMethod, BOOKING_SOURCE};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};

pub(crate) fn fields_of<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Lead document: the answers plus routing labels and payment state.
pub(crate) fn booking_document(
    request: &BookingRequestDto,
    method: ConnectMethod,
    submitted_at_iso: &str,
) -> Document {
    let form = &request.form_data;
    let payment_status = request
        .payment_status()
        .map_or_else(|| method.default_payment_status().as_str().to_string(), str::to_string);
    Document::from_fields(fields_of(form))
        .with("bookingType", method.as_str())
        .with("suggestedService", form.suggested_service())
        .with("highPriority", form.is_high_priority())
        .with(
            "paymentIntentId",
            request
                .payment_intent_id()
                .map_or(Value::Null, |id| Value::String(id.to_string())),
        )
        .with("paymentStatus", payment_status)
        .with("source", BOOKING_SOURCE)
        .with("submittedAtIso", submitted_at_iso)
        .with_server_timestamp("createdAt")
}

async fn create_booking(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<BookingResponseDto, ApiError> {
    let raw = body_or(body, ApiError::invalid_booking)?;
    let request = parse_booking_request(&raw)?;
    let method = request
        .form_data
        .connect_method()
        .ok_or_else(ApiError::unsupported_booking_type)?;
    let doc = booking_document(&request, method, &now_iso_millis());
    let created = state
        .store
        .add(method.collection(), doc)
        .await
        .map_err(|e| {
            error!(collection = method.collection(), "save booking failed: {e}");
            ApiError::save_booking_failed()
        })?;
    info!(
        collection = %created.collection,
        booking_id = %created.id,
        booking_type = method.as_str(),
        "booking saved"
    );
    Ok(BookingResponseDto {
        ok: true,
        id: created.id,
        collection: created.collection,
    })
}

pub(crate) async fn create_booking_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match create_booking(&state, body).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => error_response(&err),
    }
}
