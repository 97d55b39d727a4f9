//! API error handling.
//!
//! Every handler returns [`ApiResult`]; the [`ApiError`] renderer produces
//! the `{"status": "fail" | "error", "message": ...}` envelope — "fail"
//! for operational 4xx conditions, "error" for server faults, whose
//! details are logged but never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use wf_auth::jwt::TokenError;
use wf_core::{AppError, ValidationErrors};
use wf_db::RepositoryError;

#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str },
    Validation(ValidationErrors),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Conflict(String),
    ServiceUnavailable(String),
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(resource: &'static str) -> Self {
        ApiError::NotFound { resource }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    /// Map a repository failure onto the resource being handled
    pub fn from_repository(err: RepositoryError, resource: &'static str) -> Self {
        match err {
            RepositoryError::NotFound(_) => ApiError::NotFound { resource },
            RepositoryError::Conflict(msg) => ApiError::Conflict(msg),
            RepositoryError::Validation(msg) => ApiError::BadRequest(msg),
            RepositoryError::Database(err) => {
                tracing::error!(resource, error = %err, "database error");
                ApiError::Internal("Something went very wrong!".into())
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::NotFound { resource } => format!("No {} found with that ID", resource),
            ApiError::Validation(errors) => {
                format!("Invalid input data. {}", errors.full_messages().join(". "))
            }
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => {
                ApiError::unauthorized("Your token has expired! Please log in again.")
            }
            TokenError::Missing => {
                ApiError::unauthorized("You are not logged in! Please log in to get access.")
            }
            TokenError::Invalid(_) => {
                ApiError::unauthorized("Invalid token. Please log in again!")
            }
            TokenError::EncodingFailed(msg) => {
                tracing::error!(error = %msg, "token encoding failed");
                ApiError::Internal("Something went very wrong!".into())
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound { resource, .. } => ApiError::NotFound { resource },
            AppError::Unauthorized { message } => ApiError::Unauthorized(message),
            AppError::Forbidden { message } => ApiError::Forbidden(message),
            AppError::Validation(errors) => ApiError::Validation(errors),
            AppError::BadRequest { message } => ApiError::BadRequest(message),
            AppError::Conflict { message } => ApiError::Conflict(message),
            AppError::Database(msg) | AppError::Internal(msg) | AppError::Config(msg) => {
                tracing::error!(error = %msg, "internal error");
                ApiError::Internal("Something went very wrong!".into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let status_word = if status.is_client_error() {
            "fail"
        } else {
            "error"
        };
        let body = json!({
            "status": status_word,
            "message": self.message(),
        });
        (status, Json(body)).into_response()
    }
}

/// Run validator-derived rules and convert failures into the shared
/// per-field error collection.
pub fn validate_dto<T: validator::Validate>(dto: &T) -> ApiResult<()> {
    dto.validate()
        .map_err(|errors| ApiError::Validation(convert_validator_errors(errors)))
}

fn convert_validator_errors(errors: validator::ValidationErrors) -> ValidationErrors {
    let mut out = ValidationErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            if field == "__all__" {
                out.add_base(message);
            } else {
                out.add(field, message);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
        rating: i32,
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::not_found("tour");
        assert_eq!(err.message(), "No tour found with that ID");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validate_dto_collects_field_messages() {
        let err = validate_dto(&Probe { rating: 9 }).unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert!(errors.has_error("rating"));
                assert_eq!(
                    errors.full_messages(),
                    vec!["rating must be between 1 and 5"]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_repository_not_found_maps_to_resource() {
        let err = ApiError::from_repository(
            RepositoryError::NotFound("tour 7".into()),
            "tour",
        );
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "No tour found with that ID");
    }

    #[test]
    fn test_database_errors_hide_details() {
        let err = ApiError::from_repository(
            RepositoryError::Database(sqlx::Error::PoolClosed),
            "tour",
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Something went very wrong!");
    }
}
