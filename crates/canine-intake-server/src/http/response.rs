// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use canine_intake_api::error_mapping::map_error;
use canine_intake_api::{ApiError, ErrorBodyDto};
use chrono::{SecondsFormat, Utc};

pub(crate) fn error_response(err: &ApiError) -> Response {
    let status = StatusCode::from_u16(map_error(err).status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBodyDto::from(err))).into_response()
}

/// Raw body, or the error to answer with when it could not be read.
pub(crate) fn body_or(
    body: Result<Bytes, BytesRejection>,
    otherwise: fn() -> ApiError,
) -> Result<Bytes, ApiError> {
    match body {
        Ok(bytes) => Ok(bytes),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::payload_too_large())
        }
        Err(_) => Err(otherwise()),
    }
}

#[must_use]
pub(crate) fn now_iso_millis() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) async fn method_not_allowed_handler() -> Response {
    error_response(&ApiError::method_not_allowed())
}
