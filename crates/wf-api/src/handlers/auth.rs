//! Signup, login, and password change.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use wf_auth::password::{hash_password, verify_password};
use wf_core::Role;
use wf_db::{CrudRepository, UserRepository};
use wf_models::{CreateUserDto, LoginDto, SignupDto, UpdatePasswordDto};

use crate::error::{validate_dto, ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};

fn token_response(state: &AppState, user: &wf_models::UserRow) -> ApiResult<Value> {
    let token = state.tokens.create_token(user.id)?;
    Ok(json!({
        "status": "success",
        "token": token,
        "data": { "user": user },
    }))
}

/// POST /api/v1/users/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(dto): Json<SignupDto>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    validate_dto(&dto)?;

    let password_hash =
        hash_password(&dto.password).map_err(|e| ApiError::internal(e.to_string()))?;

    let repo = UserRepository::new(state.pool()?);
    let user = repo
        .create(CreateUserDto {
            name: dto.name,
            email: dto.email,
            // Everyone signs up as a plain user; roles are granted by admins
            role: Role::User,
            password_hash,
        })
        .await
        .map_err(|e| ApiError::from_repository(e, "user"))?;

    tracing::info!(user_id = user.id, "new user signed up");
    Ok((StatusCode::CREATED, Json(token_response(&state, &user)?)))
}

/// POST /api/v1/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> ApiResult<Json<Value>> {
    if dto.email.is_empty() || dto.password.is_empty() {
        return Err(ApiError::bad_request("Please provide email and password!"));
    }

    let repo = UserRepository::new(state.pool()?);
    let user = repo
        .find_by_email(&dto.email)
        .await
        .map_err(|e| ApiError::from_repository(e, "user"))?;

    // Same failure for a missing user and a wrong password
    let user = match user {
        Some(user)
            if verify_password(&dto.password, &user.password_hash)
                .map_err(|e| ApiError::internal(e.to_string()))? =>
        {
            user
        }
        _ => return Err(ApiError::unauthorized("Incorrect email or password")),
    };

    Ok(Json(token_response(&state, &user)?))
}

/// PATCH /api/v1/users/update-my-password
pub async fn update_my_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<UpdatePasswordDto>,
) -> ApiResult<Json<Value>> {
    validate_dto(&dto)?;
    if !dto.passwords_match() {
        return Err(ApiError::bad_request("Passwords do not match"));
    }

    let repo = UserRepository::new(state.pool()?);
    let row = repo
        .find_by_id(user.id)
        .await
        .map_err(|e| ApiError::from_repository(e, "user"))?
        .ok_or_else(|| ApiError::not_found("user"))?;

    let current_ok = verify_password(&dto.password_current, &row.password_hash)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    if !current_ok {
        return Err(ApiError::unauthorized("Your current password is wrong."));
    }

    let password_hash =
        hash_password(&dto.password).map_err(|e| ApiError::internal(e.to_string()))?;
    repo.update_password(row.id, &password_hash)
        .await
        .map_err(|e| ApiError::from_repository(e, "user"))?;

    // Re-fetch so the response reflects the updated row
    let row = repo
        .find_by_id(user.id)
        .await
        .map_err(|e| ApiError::from_repository(e, "user"))?
        .ok_or_else(|| ApiError::not_found("user"))?;

    Ok(Json(token_response(&state, &row)?))
}
