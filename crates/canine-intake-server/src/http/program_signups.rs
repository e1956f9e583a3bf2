// SPDX-License-Identifier: Apache-2.0

use crate::http::bookings::fields_of;
use crate::http::response::{body_or, error_response, now_iso_millis};
use crate::payments::{CreatePaymentIntent, PaymentIntent};
use crate::store::Document;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use canine_intake_api::{
    parse_program_signup_request, ApiError, ApiErrorCode, ProgramSignupResponseDto,
};
use canine_intake_model::{
    ProgramSignupData, SessionPack, COLLECTION_PROGRAM_SIGNUPS, PROGRAM_PAYMENT_SOURCE,
    PROGRAM_SIGNUP_SOURCE,
};
use tracing::{error, info};

pub(crate) fn pack_intent_request(form: &ProgramSignupData, pack: SessionPack) -> CreatePaymentIntent {
    CreatePaymentIntent::new(pack.price_cents, pack.currency(), &pack.description())
        .with_receipt_email(&form.owner_email)
        .with_metadata("source", PROGRAM_PAYMENT_SOURCE)
        .with_metadata("dogName", &form.dog_name)
        .with_metadata("ownerName", &form.owner_name)
        .with_metadata("ownerEmail", &form.owner_email)
        .with_metadata("ownerPhone", &form.owner_phone)
        .with_metadata("sessionsCount", &pack.sessions.to_string())
}

pub(crate) fn signup_document(
    form: &ProgramSignupData,
    pack: SessionPack,
    intent: &PaymentIntent,
    submitted_at_iso: &str,
) -> Document {
    Document::from_fields(fields_of(form))
        .with("paymentIntentId", intent.id.as_str())
        .with("paymentStatus", intent.status.as_str())
        .with("priceCents", pack.price_cents)
        .with("source", PROGRAM_SIGNUP_SOURCE)
        .with("submittedAtIso", submitted_at_iso)
        .with_server_timestamp("createdAt")
}

async fn create_program_signup(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<ProgramSignupResponseDto, ApiError> {
    let raw = body_or(body, ApiError::invalid_program_signup)?;
    let form = parse_program_signup_request(&raw)?.form_data;
    let pack = form.selected_pack().ok_or_else(ApiError::unsupported_package)?;

    let intent = state
        .payments
        .create_payment_intent(pack_intent_request(&form, pack))
        .await
        .map_err(|e| {
            error!(sessions = pack.sessions, "program checkout payment failed: {e}");
            ApiError::checkout_failed(ApiErrorCode::UpstreamPayments)
        })?;
    let created = state
        .store
        .add(
            COLLECTION_PROGRAM_SIGNUPS,
            signup_document(&form, pack, &intent, &now_iso_millis()),
        )
        .await
        .map_err(|e| {
            error!(payment_intent_id = %intent.id, "program signup save failed: {e}");
            ApiError::checkout_failed(ApiErrorCode::UpstreamStore)
        })?;
    info!(
        signup_id = %created.id,
        payment_intent_id = %intent.id,
        sessions = pack.sessions,
        "program signup saved"
    );
    Ok(ProgramSignupResponseDto {
        ok: true,
        signup_id: created.id,
        payment_intent_id: intent.id,
        client_secret: intent.client_secret,
        amount: intent.amount,
        currency: intent.currency,
        status: intent.status,
    })
}

pub(crate) async fn create_program_signup_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match create_program_signup(&state, body).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => error_response(&err),
    }
}
