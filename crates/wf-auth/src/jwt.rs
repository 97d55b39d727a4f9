//! JWT issuing and validation.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wf_core::{AuthConfig, Id};

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// JWT ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// Creates and validates the signed tokens the API hands out at signup
/// and login.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in_secs: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], expires_in_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expires_in_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.token_expiration_secs)
    }

    /// Issue a token for the given user
    pub fn create_token(&self, user_id: Id) -> Result<String, TokenError> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?
            .as_secs() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + self.expires_in_secs as usize,
            iat: now,
            jti: Some(uuid::Uuid::new_v4().to_string()),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Validate a token and extract the user id from its subject
    pub fn get_user_id(&self, token: &str) -> Result<Id, TokenError> {
        let claims = self.validate_token(token)?;
        claims
            .sub
            .parse()
            .map_err(|_| TokenError::Invalid("Invalid user ID in token".to_string()))
    }
}

/// Extract bearer token from an Authorization header value
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    if authorization.to_lowercase().starts_with("bearer ") {
        Some(authorization[7..].trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret-key-at-least-32-bytes", 3600)
    }

    #[test]
    fn test_create_and_validate_token() {
        let service = service();
        let token = service.create_token(1).unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "1");
        assert!(claims.jti.is_some());
    }

    #[test]
    fn test_get_user_id() {
        let service = service();
        let token = service.create_token(42).unwrap();
        assert_eq!(service.get_user_id(&token).unwrap(), 42);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().create_token(1).unwrap();
        let other = TokenService::new(b"another-secret-key-also-32-bytes!", 3600);
        assert!(matches!(
            other.validate_token(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
    }
}
