// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

pub const MSG_INVALID_BOOKING: &str = "Invalid booking payload.";
pub const MSG_UNSUPPORTED_BOOKING: &str = "Unsupported booking type.";
pub const MSG_SAVE_BOOKING_FAILED: &str = "Failed to save booking.";
pub const MSG_PAYMENT_NOT_REQUIRED: &str = "Payment intent is only required for in-person bookings.";
pub const MSG_CREATE_INTENT_FAILED: &str = "Failed to create payment intent.";
pub const MSG_INVALID_PROGRAM_SIGNUP: &str = "Invalid program signup payload.";
pub const MSG_UNSUPPORTED_PACKAGE: &str = "Unsupported session package.";
pub const MSG_CHECKOUT_FAILED: &str = "Failed to initialize checkout.";
pub const MSG_MISSING_WEBHOOK_CONFIG: &str = "Missing Stripe webhook configuration.";
pub const MSG_INVALID_SIGNATURE: &str = "Invalid Stripe signature.";
pub const MSG_WEBHOOK_FAILED: &str = "Webhook handler failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidPayload,
    UnsupportedBookingType,
    PaymentNotRequired,
    UnsupportedPackage,
    MissingSignature,
    InvalidSignature,
    MethodNotAllowed,
    PayloadTooLarge,
    RateLimited,
    Timeout,
    UpstreamPayments,
    UpstreamStore,
    Internal,
    NotReady,
}

pub const API_ERROR_CODES: [ApiErrorCode; 14] = [
    ApiErrorCode::InvalidPayload,
    ApiErrorCode::UnsupportedBookingType,
    ApiErrorCode::PaymentNotRequired,
    ApiErrorCode::UnsupportedPackage,
    ApiErrorCode::MissingSignature,
    ApiErrorCode::InvalidSignature,
    ApiErrorCode::MethodNotAllowed,
    ApiErrorCode::PayloadTooLarge,
    ApiErrorCode::RateLimited,
    ApiErrorCode::Timeout,
    ApiErrorCode::UpstreamPayments,
    ApiErrorCode::UpstreamStore,
    ApiErrorCode::Internal,
    ApiErrorCode::NotReady,
];

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPayload => "InvalidPayload",
            Self::UnsupportedBookingType => "UnsupportedBookingType",
            Self::PaymentNotRequired => "PaymentNotRequired",
            Self::UnsupportedPackage => "UnsupportedPackage",
            Self::MissingSignature => "MissingSignature",
            Self::InvalidSignature => "InvalidSignature",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::RateLimited => "RateLimited",
            Self::Timeout => "Timeout",
            Self::UpstreamPayments => "UpstreamPayments",
            Self::UpstreamStore => "UpstreamStore",
            Self::Internal => "Internal",
            Self::NotReady => "NotReady",
        }
    }
}

/// Internal error carried to the HTTP edge. Only `message` reaches clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_booking() -> Self {
        Self::new(ApiErrorCode::InvalidPayload, MSG_INVALID_BOOKING)
    }

    #[must_use]
    pub fn unsupported_booking_type() -> Self {
        Self::new(ApiErrorCode::UnsupportedBookingType, MSG_UNSUPPORTED_BOOKING)
    }

    #[must_use]
    pub fn save_booking_failed() -> Self {
        Self::new(ApiErrorCode::UpstreamStore, MSG_SAVE_BOOKING_FAILED)
    }

    #[must_use]
    pub fn payment_not_required() -> Self {
        Self::new(ApiErrorCode::PaymentNotRequired, MSG_PAYMENT_NOT_REQUIRED)
    }

    #[must_use]
    pub fn create_intent_failed() -> Self {
        Self::new(ApiErrorCode::UpstreamPayments, MSG_CREATE_INTENT_FAILED)
    }

    #[must_use]
    pub fn invalid_program_signup() -> Self {
        Self::new(ApiErrorCode::InvalidPayload, MSG_INVALID_PROGRAM_SIGNUP)
    }

    #[must_use]
    pub fn unsupported_package() -> Self {
        Self::new(ApiErrorCode::UnsupportedPackage, MSG_UNSUPPORTED_PACKAGE)
    }

    #[must_use]
    pub fn checkout_failed(code: ApiErrorCode) -> Self {
        Self::new(code, MSG_CHECKOUT_FAILED)
    }

    #[must_use]
    pub fn missing_webhook_config() -> Self {
        Self::new(ApiErrorCode::MissingSignature, MSG_MISSING_WEBHOOK_CONFIG)
    }

    #[must_use]
    pub fn invalid_signature() -> Self {
        Self::new(ApiErrorCode::InvalidSignature, MSG_INVALID_SIGNATURE)
    }

    #[must_use]
    pub fn webhook_failed() -> Self {
        Self::new(ApiErrorCode::UpstreamStore, MSG_WEBHOOK_FAILED)
    }

    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(ApiErrorCode::MethodNotAllowed, "Method not allowed.")
    }

    #[must_use]
    pub fn payload_too_large() -> Self {
        Self::new(ApiErrorCode::PayloadTooLarge, "Request body too large.")
    }

    #[must_use]
    pub fn rate_limited() -> Self {
        Self::new(ApiErrorCode::RateLimited, "Too many requests.")
    }

    #[must_use]
    pub fn timeout() -> Self {
        Self::new(ApiErrorCode::Timeout, "Request timed out.")
    }

    #[must_use]
    pub fn not_ready() -> Self {
        Self::new(ApiErrorCode::NotReady, "Service not ready.")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
};
