// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

pub const API_ERROR_SCHEMA_REF: &str = "#/components/schemas/ErrorBody";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiErrorMapping {
    pub status_code: u16,
    pub schema_ref: &'static str,
}

#[must_use]
pub const fn status_for(code: ApiErrorCode) -> u16 {
    match code {
        ApiErrorCode::InvalidPayload
        | ApiErrorCode::UnsupportedBookingType
        | ApiErrorCode::PaymentNotRequired
        | ApiErrorCode::UnsupportedPackage
        | ApiErrorCode::MissingSignature
        | ApiErrorCode::InvalidSignature => 400,
        ApiErrorCode::MethodNotAllowed => 405,
        ApiErrorCode::PayloadTooLarge => 413,
        ApiErrorCode::RateLimited => 429,
        ApiErrorCode::NotReady => 503,
        ApiErrorCode::Timeout => 504,
        ApiErrorCode::UpstreamPayments | ApiErrorCode::UpstreamStore | ApiErrorCode::Internal => {
            500
        }
    }
}

#[must_use]
pub fn map_error(error: &ApiError) -> ApiErrorMapping {
    ApiErrorMapping {
        status_code: status_for(error.code),
        schema_ref: API_ERROR_SCHEMA_REF,
    }
}
