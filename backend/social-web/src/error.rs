/// Error types for the social web backend
///
/// Two families matter to callers: local validation failures, raised before
/// any request leaves the process, and remote failures from the hosted
/// backend. Both convert to JSON HTTP responses.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use supabase_rest::SupabaseError;
use thiserror::Error;

/// Result type for social-web operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Input rejected locally; nothing was sent
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The hosted backend failed or rejected the request
    #[error("Backend error: {0}")]
    Backend(#[from] SupabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Surface the first message; drafts carry one rule per field.
        let message = errors
            .field_errors()
            .into_values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input".to_string());
        AppError::Validation(message)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Backend(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Backend(e) if e.status() == Some(401) => StatusCode::UNAUTHORIZED,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}
