// SPDX-License-Identifier: Apache-2.0

use crate::http::response::{body_or, error_response};
use crate::payments::CreatePaymentIntent;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use canine_intake_api::{
    parse_payment_intent_request, ApiError, PaymentIntentRequestDto, PaymentIntentResponseDto,
};
use canine_intake_model::{ConnectMethod, CURRENCY, IN_PERSON_DESCRIPTION, IN_PERSON_PRICE_CENTS};
use tracing::{error, info};

pub(crate) fn in_person_intent_request(request: &PaymentIntentRequestDto) -> CreatePaymentIntent {
    let form = &request.form_data;
    let mut intent = CreatePaymentIntent::new(IN_PERSON_PRICE_CENTS, CURRENCY, IN_PERSON_DESCRIPTION)
        .with_receipt_email(&form.contact_email)
        .with_metadata("bookingType", &form.connect_method)
        .with_metadata("contactName", &form.contact_name)
        .with_metadata("contactEmail", &form.contact_email)
        .with_metadata("contactPhone", &form.contact_phone)
        .with_metadata("dogName", &form.dog_name);
    if let Some(booking_id) = &request.booking_id {
        intent = intent.with_metadata("bookingId", booking_id);
    }
    intent
}

async fn create_payment_intent(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<PaymentIntentResponseDto, ApiError> {
    let raw = body_or(body, ApiError::invalid_booking)?;
    let request = parse_payment_intent_request(&raw)?;
    if request.form_data.connect_method() != Some(ConnectMethod::InPersonEvaluation) {
        return Err(ApiError::payment_not_required());
    }
    let intent = state
        .payments
        .create_payment_intent(in_person_intent_request(&request))
        .await
        .map_err(|e| {
            error!(backend = state.payments.backend_tag(), "create payment intent failed: {e}");
            ApiError::create_intent_failed()
        })?;
    info!(payment_intent_id = %intent.id, status = %intent.status, "payment intent created");
    Ok(PaymentIntentResponseDto {
        ok: true,
        payment_intent_id: intent.id,
        client_secret: intent.client_secret,
        amount: intent.amount,
        currency: intent.currency,
        status: intent.status,
    })
}

pub(crate) async fn create_payment_intent_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match create_payment_intent(&state, body).await {
        Ok(dto) => Json(dto).into_response(),
        Err(err) => error_response(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canine_intake_model::BookingFormData;

    #[test]
    fn metadata_carries_contact_fields_and_optional_booking_id() {
        let request = PaymentIntentRequestDto {
            form_data: BookingFormData {
                connect_method: "in-person-evaluation".to_string(),
                dog_name: "Biscuit".to_string(),
                ..BookingFormData::default()
            },
            booking_id: Some("lead-7".to_string()),
        };
        let intent = in_person_intent_request(&request);
        assert_eq!(intent.amount, IN_PERSON_PRICE_CENTS);
        assert_eq!(intent.receipt_email, None);
        assert_eq!(intent.metadata["dogName"], "Biscuit");
        assert_eq!(intent.metadata["contactEmail"], "");
        assert_eq!(intent.metadata["bookingId"], "lead-7");
    }
}
