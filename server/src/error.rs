//! API error type and its JSON rendering.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use ttobak_billing::BillingError;
use ttobak_entitlement::{EntitlementError, QUOTA_EXCEEDED_MESSAGE};
use ttobak_transform::TransformError;

/// Shown when a trial is requested with a malformed email.
pub(crate) const INVALID_EMAIL_MESSAGE: &str = "이메일 형식이 올바르지 않아요. 예: name@example.com";

/// Shown when a request carries no usable identity.
pub(crate) const LOGIN_REQUIRED_MESSAGE: &str = "로그인이 필요해요. 다시 로그인해 주세요.";

/// An error response: a status code and a JSON `{error}` body.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
    paywall: bool,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    paywall: bool,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            paywall: false,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, LOGIN_REQUIRED_MESSAGE)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Free quota exhausted; the client should open the paywall.
    pub fn paywall() -> Self {
        Self {
            status: StatusCode::PAYMENT_REQUIRED,
            message: QUOTA_EXCEEDED_MESSAGE.to_string(),
            paywall: true,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "Request rejected");
        }
        let body = ErrorBody {
            error: &self.message,
            paywall: self.paywall,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<EntitlementError> for ApiError {
    fn from(err: EntitlementError) -> Self {
        match err {
            EntitlementError::InvalidEmail(_) => Self::bad_request(INVALID_EMAIL_MESSAGE),
            EntitlementError::QuotaExceeded { .. } => Self::paywall(),
            EntitlementError::WrongIdentity(_) => Self::forbidden(err.to_string()),
            EntitlementError::CheckoutAlreadyRedeemed(_) => Self::conflict(err.to_string()),
            EntitlementError::Storage(_) => Self::internal(err.to_string()),
        }
    }
}

impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Validation(msg) => Self::bad_request(msg),
            TransformError::Provider(msg) => Self::internal(msg),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::Validation(msg) => Self::bad_request(msg),
            BillingError::Api(msg) => Self::internal(msg),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
