//! Axum extractors and shared state.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::{header, request::Parts},
};
use sqlx::PgPool;

use wf_auth::jwt::{extract_bearer_token, TokenService};
use wf_auth::permissions::CurrentUser;
use wf_core::{AppConfig, Role};
use wf_db::{CrudRepository, UserRepository};

use crate::error::{ApiError, ApiResult};

/// Query-string map handlers feed into the feature builder
pub type QueryMap = Query<HashMap<String, String>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pool: Option<PgPool>,
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let tokens = Arc::new(TokenService::from_config(&config.auth));
        Self {
            pool: Some(pool),
            config: Arc::new(config),
            tokens,
        }
    }

    /// State without a database, for routing and middleware tests
    pub fn without_database(config: AppConfig) -> Self {
        let tokens = Arc::new(TokenService::from_config(&config.auth));
        Self {
            pool: None,
            config: Arc::new(config),
            tokens,
        }
    }

    pub fn pool(&self) -> ApiResult<PgPool> {
        self.pool
            .clone()
            .ok_or_else(|| ApiError::ServiceUnavailable("Database unavailable".into()))
    }
}

/// Authenticated user, resolved from a bearer token plus a live user row
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::unauthorized("You are not logged in! Please log in to get access.")
            })?;
        let token = extract_bearer_token(header_value).ok_or_else(|| {
            ApiError::unauthorized("You are not logged in! Please log in to get access.")
        })?;

        let user_id = state.tokens.get_user_id(token)?;

        // The token alone is not enough: the user must still exist and be
        // active.
        let repo = UserRepository::new(state.pool()?);
        let row = repo
            .find_by_id(user_id)
            .await
            .map_err(|e| ApiError::from_repository(e, "user"))?
            .filter(|u| u.active)
            .ok_or_else(|| {
                ApiError::unauthorized("The user belonging to this token does no longer exist.")
            })?;

        Ok(AuthenticatedUser(CurrentUser {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
        }))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Reject users outside the given roles
pub fn restrict_to(user: &CurrentUser, roles: &[Role]) -> ApiResult<()> {
    if user.has_any_role(roles) {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "You do not have permission to perform this action",
        ))
    }
}
