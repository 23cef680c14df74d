use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application error taxonomy, mapped onto HTTP status codes at the
/// response boundary. Store and transaction causes are logged server-side
/// and surfaced to clients as opaque messages.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// A required state predicate did not hold (e.g. the offer was not
    /// Pending). Distinct from `NotFound` so acceptance reports 400, not 404.
    #[error("{0}")]
    PreconditionFailed(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("transaction failed: {0}")]
    Transaction(String),
    #[error("store error: {0}")]
    Store(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::PreconditionFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Transaction(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Transaction(cause) => {
                log::error!("Transaction failed: {}", cause);
                "Transaction failed. Changes rolled back.".to_string()
            }
            ApiError::Store(cause) => {
                log::error!("Store error: {}", cause);
                "Internal database error.".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(ErrorBody {
            success: false,
            message,
        });
        (status, body).into_response()
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match e {
            Error::NotFound => ApiError::NotFound("Record not found.".to_string()),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                ApiError::Conflict(format!("Duplicate record: {}", info.message()))
            }
            other => ApiError::Store(other.to_string()),
        }
    }
}
