use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use validator::Validate;

use crate::error::{AppError, ErrorBody};

/// Runs `validator` checks on a JSON request body and flattens any failures
/// into the uniform error payload.
pub trait JsonValidateExt<T> {
    fn validate_custom(self) -> Result<T, Custom<Json<ErrorBody>>>;
}

impl<T: Validate> JsonValidateExt<T> for Json<T> {
    fn validate_custom(self) -> Result<T, Custom<Json<ErrorBody>>> {
        let inner = self.into_inner();
        match inner.validate() {
            Ok(()) => Ok(inner),
            Err(errors) => Err(Custom(
                Status::UnprocessableEntity,
                Json(ErrorBody {
                    error: flatten_errors(&errors),
                }),
            )),
        }
    }
}

fn flatten_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors.iter() {
            let message = error
                .message
                .clone()
                .unwrap_or_else(|| "invalid value".into());
            messages.push(format!("{}: {}", field, message));
        }
    }

    messages.sort();
    messages.join("; ")
}

/// Adapter for handlers that mix validation failures with `AppError`:
/// renders the error the same way the `AppError` responder would.
pub trait ToErrorPayload<T> {
    fn or_error_payload(self) -> Result<T, Custom<Json<ErrorBody>>>;
}

impl<T> ToErrorPayload<T> for Result<T, AppError> {
    fn or_error_payload(self) -> Result<T, Custom<Json<ErrorBody>>> {
        self.map_err(|err| {
            err.log_and_record("API request validation");
            Custom(
                err.status_code(),
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            )
        })
    }
}
