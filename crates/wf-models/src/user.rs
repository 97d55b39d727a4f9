//! User model.
//!
//! The password hash never serializes; the `active` flag implements soft
//! deactivation instead of row deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use wf_core::{Id, Role};

/// User database row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRow {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub lock_version: i32,
}

/// Signup payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_password_match", skip_on_field_errors = true))]
pub struct SignupDto {
    #[validate(length(min = 1, message = "can not be empty"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must have at least 8 characters"))]
    pub password: String,
    pub password_confirm: String,
}

fn validate_password_match(dto: &SignupDto) -> Result<(), ValidationError> {
    if dto.password != dto.password_confirm {
        return Err(ValidationError::new("passwords do not match"));
    }
    Ok(())
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

/// Self-service profile update (name and email only)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMeDto {
    #[validate(length(min = 1, message = "can not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
}

/// Password change payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePasswordDto {
    pub password_current: String,
    #[validate(length(min = 8, message = "must have at least 8 characters"))]
    pub password: String,
    pub password_confirm: String,
}

impl UpdatePasswordDto {
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirm
    }
}

/// Admin-side create (hash computed by the caller)
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

/// Admin-side partial update. Not for passwords.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, message = "can not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_signup() -> SignupDto {
        SignupDto {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "correct-horse".into(),
            password_confirm: "correct-horse".into(),
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(valid_signup().validate().is_ok());
    }

    #[test]
    fn test_mismatched_passwords_rejected() {
        let mut dto = valid_signup();
        dto.password_confirm = "something-else".into();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut dto = valid_signup();
        dto.email = "not-an-email".into();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = UserRow {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            photo: None,
            role: Role::User,
            password_hash: "$argon2id$secret".into(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            lock_version: 0,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("lock_version"));
    }
}
