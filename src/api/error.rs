//! Mapping of service errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::AccessError;

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Failure kind for programmatic handling
    pub kind: String,
    /// Human-readable error message
    pub message: String,
}

/// HTTP status for each failure kind
#[must_use]
pub fn status_code(err: &AccessError) -> StatusCode {
    match err {
        AccessError::UnknownFacility { .. } => StatusCode::NOT_FOUND,
        AccessError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        AccessError::EmptyCollection { .. }
        | AccessError::InsufficientData { .. }
        | AccessError::InvariantViolation { .. }
        | AccessError::Config { .. }
        | AccessError::Dataset { .. }
        | AccessError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let status = status_code(&self);

        match &self {
            AccessError::InvariantViolation { message } => {
                error!(kind = self.kind(), "Invariant violated: {}", message);
            }
            _ if status.is_server_error() => error!(kind = self.kind(), "{}", self),
            _ => warn!(kind = self.kind(), "{}", self),
        }

        let body = ErrorBody {
            error: ErrorDetail {
                kind: self.kind().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccessError::UnknownFacility { id: 1 }, StatusCode::NOT_FOUND)]
    #[case(AccessError::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(AccessError::insufficient_data("stops"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AccessError::invariant("NaN"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AccessError::dataset("broken"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_codes(#[case] err: AccessError, #[case] expected: StatusCode) {
        assert_eq!(status_code(&err), expected);
        assert_eq!(err.into_response().status(), expected);
    }
}
