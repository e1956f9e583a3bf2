// SPDX-License-Identifier: Apache-2.0

use crate::ApiError;
use canine_intake_model::{BookingFormData, BookingSubmission, ProgramSignupData};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBodyDto {
    pub error: String,
}

impl From<&ApiError> for ErrorBodyDto {
    fn from(value: &ApiError) -> Self {
        Self {
            error: value.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequestDto {
    pub form_data: BookingFormData,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl From<BookingSubmission> for BookingRequestDto {
    fn from(value: BookingSubmission) -> Self {
        Self {
            form_data: value.form_data,
            payment_intent_id: value.payment_intent_id,
            payment_status: value.payment_status,
        }
    }
}

impl BookingRequestDto {
    /// Empty strings count as absent.
    #[must_use]
    pub fn payment_intent_id(&self) -> Option<&str> {
        self.payment_intent_id.as_deref().filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn payment_status(&self) -> Option<&str> {
        self.payment_status.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponseDto {
    pub ok: bool,
    pub id: String,
    pub collection: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequestDto {
    pub form_data: BookingFormData,
    #[serde(default)]
    pub booking_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponseDto {
    pub ok: bool,
    pub payment_intent_id: String,
    pub client_secret: Option<String>,
    pub amount: u64,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSignupRequestDto {
    pub form_data: ProgramSignupData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSignupResponseDto {
    pub ok: bool,
    pub signup_id: String,
    pub payment_intent_id: String,
    pub client_secret: Option<String>,
    pub amount: u64,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAckDto {
    pub received: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub ok: bool,
    pub service: String,
    pub timestamp: String,
}

/// Subset of a payments-provider event the webhook acts on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentEventDto {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentEventData,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentEventData {
    pub object: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentIntentObjectDto {
    pub id: String,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, Value>,
    #[serde(default)]
    pub last_payment_error: Option<LastPaymentErrorDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LastPaymentErrorDto {
    #[serde(default)]
    pub message: Option<String>,
}

impl PaymentEventDto {
    pub fn payment_intent(&self) -> Result<PaymentIntentObjectDto, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }
}

fn has_connect_method(form: &Value) -> bool {
    form.get("connectMethod")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

fn form_data(raw: &[u8]) -> Option<(Value, Value)> {
    let body: Value = serde_json::from_slice(raw).ok()?;
    let form = body.get("formData").filter(|v| v.is_object())?.clone();
    Some((body, form))
}

/// Shape check shared by the booking and payment-intent endpoints: a JSON
/// object with `formData.connectMethod` as a non-empty string.
pub fn parse_booking_request(raw: &[u8]) -> Result<BookingRequestDto, ApiError> {
    let (body, form) = form_data(raw).ok_or_else(ApiError::invalid_booking)?;
    if !has_connect_method(&form) {
        return Err(ApiError::invalid_booking());
    }
    let form_data: BookingFormData =
        serde_json::from_value(form).map_err(|_| ApiError::invalid_booking())?;
    let optional = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
    Ok(BookingRequestDto {
        form_data,
        payment_intent_id: optional("paymentIntentId"),
        payment_status: optional("paymentStatus"),
    })
}

pub fn parse_payment_intent_request(raw: &[u8]) -> Result<PaymentIntentRequestDto, ApiError> {
    let (body, form) = form_data(raw).ok_or_else(ApiError::invalid_booking)?;
    if !has_connect_method(&form) {
        return Err(ApiError::invalid_booking());
    }
    let form_data: BookingFormData =
        serde_json::from_value(form).map_err(|_| ApiError::invalid_booking())?;
    let booking_id = body
        .get("bookingId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Ok(PaymentIntentRequestDto {
        form_data,
        booking_id,
    })
}

const PROGRAM_STRING_FIELDS: [&str; 7] = [
    "dogName",
    "dogBreed",
    "preferredDay",
    "preferredTimeSlot",
    "ownerName",
    "ownerEmail",
    "ownerPhone",
];

/// Every string field present, `problems` an array, `sessionsCount` a number.
pub fn parse_program_signup_request(raw: &[u8]) -> Result<ProgramSignupRequestDto, ApiError> {
    let (_, form) = form_data(raw).ok_or_else(ApiError::invalid_program_signup)?;
    let strings_ok = PROGRAM_STRING_FIELDS
        .iter()
        .all(|key| form.get(*key).is_some_and(Value::is_string));
    let problems_ok = form.get("problems").is_some_and(Value::is_array);
    let sessions = form.get("sessionsCount");
    if !strings_ok || !problems_ok || !sessions.is_some_and(Value::is_number) {
        return Err(ApiError::invalid_program_signup());
    }
    // A number that is not a small non-negative integer cannot name a pack.
    let sessions_count = sessions
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(ApiError::unsupported_package)?;
    let mut form_data: ProgramSignupData = serde_json::from_value(form_without_sessions(&form))
        .map_err(|_| ApiError::invalid_program_signup())?;
    form_data.sessions_count = Some(sessions_count);
    Ok(ProgramSignupRequestDto { form_data })
}

fn form_without_sessions(form: &Value) -> Value {
    let mut copy = form.clone();
    if let Some(map) = copy.as_object_mut() {
        map.insert("sessionsCount".to_string(), Value::Null);
    }
    copy
}
