//! Mapping from [`Error`] to HTTP responses.

use super::response::ApiResponse;
use crate::errors::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

impl Error {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::DuplicateCode { .. } => StatusCode::CONFLICT,
            Self::InvalidInput { .. }
            | Self::UsageLimitReached { .. }
            | Self::CouponUnavailable { .. } => StatusCode::BAD_REQUEST,
            Self::CouponNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Config { .. } | Self::Database(_) | Self::CorruptRecord { .. } | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Server faults are logged in full but never echoed to the client
        let message = if self.is_server_fault() {
            error!(application_error = %self, "Responding with server error");
            "Internal Server Error".to_string()
        } else {
            warn!(client_error = %self, status = status.as_u16(), "Rejected request");
            self.to_string()
        };
        ApiResponse::failure(message).into_response_with(status)
    }
}
