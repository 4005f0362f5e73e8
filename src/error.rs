use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Span, error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User with id {0} not found")]
    UserNotFound(i64),

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("Invalid query parameter: {0}")]
    InvalidQuery(String),
}

/// Uniform error payload. Every failure the API surfaces renders as this
/// object rather than a bare status or transport-level error.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn log_and_record(&self, ctx: &str) {
        let current_span = Span::current();
        let message = self.to_string();

        let error_kind = match self {
            AppError::Database(err) => {
                error!(error = %message, context = %ctx, db_error = %err, "Store error");
                "store_error"
            }
            AppError::UserNotFound(id) => {
                warn!(user_id = %id, context = %ctx, "User not found");
                "user_not_found"
            }
            AppError::DuplicateUsername(username) => {
                warn!(username = %username, context = %ctx, "Duplicate username");
                "duplicate_username"
            }
            AppError::InvalidQuery(msg) => {
                warn!(message = %msg, context = %ctx, "Invalid query parameter");
                "invalid_query_parameter"
            }
        };

        if !current_span.is_none() {
            current_span.record("error", true);
            current_span.record("error_kind", error_kind);
            current_span.record("error_message", message.as_str());
        }
    }

    pub fn status_code(&self) -> Status {
        match self {
            AppError::Database(_) => Status::InternalServerError,
            AppError::UserNotFound(_) => Status::NotFound,
            AppError::DuplicateUsername(_) => Status::Conflict,
            AppError::InvalidQuery(_) => Status::BadRequest,
        }
    }
}

impl<'r> rocket::response::Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'static> {
        self.log_and_record(&format!("Request to {} {}", req.method(), req.uri()));

        let body = ErrorBody {
            error: self.to_string(),
        };
        Custom(self.status_code(), Json(body)).respond_to(req)
    }
}
