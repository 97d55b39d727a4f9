//! Core error types for Wayfarer.
//!
//! All layers converge on [`AppError`]; the API crate maps it onto HTTP
//! responses through the status/code accessors below.

use std::collections::HashMap;
use thiserror::Error;

/// Standard Result type for Wayfarer operations
pub type AppResult<T> = Result<T, AppError>;

/// Central error taxonomy
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No {resource} found with that ID")]
    NotFound { resource: &'static str, id: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound { .. } => 404,
            AppError::Unauthorized { .. } => 401,
            AppError::Forbidden { .. } => 403,
            AppError::Validation(_) => 422,
            AppError::BadRequest { .. } => 400,
            AppError::Conflict { .. } => 409,
            AppError::Database(_) | AppError::Internal(_) | AppError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "not_found",
            AppError::Unauthorized { .. } => "unauthorized",
            AppError::Forbidden { .. } => "forbidden",
            AppError::Validation(_) => "validation_failed",
            AppError::BadRequest { .. } => "bad_request",
            AppError::Conflict { .. } => "conflict",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "configuration_error",
        }
    }

    /// Operational errors carry a message safe to show to clients.
    /// Everything else is reported generically.
    pub fn is_operational(&self) -> bool {
        !matches!(
            self,
            AppError::Database(_) | AppError::Internal(_) | AppError::Config(_)
        )
    }
}

/// Per-field validation errors collection
#[derive(Error, Debug, Default, Clone)]
#[error("Invalid input data. {}", self.full_messages().join(". "))]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        let mut fields: Vec<_> = self.errors.iter().collect();
        fields.sort_by_key(|(field, _)| field.as_str());
        for (field, field_messages) in fields {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found("tour", 42);
        assert_eq!(err.to_string(), "No tour found with that ID");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "not_found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::unauthorized("x").status_code(), 401);
        assert_eq!(AppError::forbidden("x").status_code(), 403);
        assert_eq!(AppError::bad_request("x").status_code(), 400);
        assert_eq!(AppError::conflict("x").status_code(), 409);
        assert_eq!(AppError::Database("boom".into()).status_code(), 500);

        let mut errors = ValidationErrors::new();
        errors.add("rating", "must be between 1 and 5");
        assert_eq!(AppError::Validation(errors).status_code(), 422);
    }

    #[test]
    fn test_validation_distinct_from_not_found() {
        let mut errors = ValidationErrors::new();
        errors.add("rating", "must be between 1 and 5");
        let validation = AppError::Validation(errors);
        let not_found = AppError::not_found("review", 1);
        assert_ne!(validation.error_code(), not_found.error_code());
        assert_ne!(validation.status_code(), not_found.status_code());
    }

    #[test]
    fn test_operational_classification() {
        assert!(AppError::not_found("tour", 1).is_operational());
        assert!(!AppError::Internal("bug".into()).is_operational());
    }

    #[test]
    fn test_full_messages_sorted_and_merged() {
        let mut a = ValidationErrors::new();
        a.add("name", "is required");
        let mut b = ValidationErrors::new();
        b.add("email", "is invalid");
        b.add_base("something is off");
        a.merge(b);

        let messages = a.full_messages();
        assert_eq!(messages[0], "something is off");
        assert!(messages.contains(&"name is required".to_string()));
        assert!(messages.contains(&"email is invalid".to_string()));
    }
}
