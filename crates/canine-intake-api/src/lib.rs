#![forbid(unsafe_code)]

mod dto;
pub mod error_mapping;
mod errors;
pub mod openapi;

pub use dto::{
    parse_booking_request, parse_payment_intent_request, parse_program_signup_request,
    BookingRequestDto, BookingResponseDto, ErrorBodyDto, HealthDto, LastPaymentErrorDto,
    PaymentEventData, PaymentEventDto, PaymentIntentObjectDto, PaymentIntentRequestDto,
    PaymentIntentResponseDto, ProgramSignupRequestDto, ProgramSignupResponseDto, WebhookAckDto,
};
pub use errors::{
    ApiError, ApiErrorCode, API_ERROR_CODES, MSG_CHECKOUT_FAILED, MSG_CREATE_INTENT_FAILED,
    MSG_INVALID_BOOKING, MSG_INVALID_PROGRAM_SIGNUP, MSG_INVALID_SIGNATURE,
    MSG_MISSING_WEBHOOK_CONFIG, MSG_PAYMENT_NOT_REQUIRED, MSG_SAVE_BOOKING_FAILED,
    MSG_UNSUPPORTED_BOOKING, MSG_UNSUPPORTED_PACKAGE, MSG_WEBHOOK_FAILED,
};
pub use openapi::openapi_v1_spec;

pub const CRATE_NAME: &str = "canine-intake-api";
pub const SERVICE_NAME: &str = "canine-intake";
