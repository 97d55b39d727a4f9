//! User handlers: the self-service `/me` surface plus admin CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use wf_core::{Id, Role};
use wf_db::UserRepository;
use wf_models::{UpdateMeDto, UpdateUserDto};

use crate::error::{validate_dto, ApiError, ApiResult};
use crate::extractors::{restrict_to, AppState, AuthenticatedUser, QueryMap};
use crate::factory;

fn repo(state: &AppState) -> ApiResult<UserRepository> {
    Ok(UserRepository::new(state.pool()?))
}

/// GET /api/v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<Value>> {
    factory::get_one(&repo(&state)?, user.id).await
}

/// PATCH /api/v1/users/me
///
/// Name and email only. Passwords go through `/update-my-password`.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<UpdateMeDto>,
) -> ApiResult<Json<Value>> {
    validate_dto(&dto)?;
    let update = UpdateUserDto {
        name: dto.name,
        email: dto.email,
        role: None,
        active: None,
    };
    factory::update_one(&repo(&state)?, user.id, update).await
}

/// DELETE /api/v1/users/me
///
/// Soft deactivation: the row stays, but the account stops working.
pub async fn delete_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<StatusCode> {
    repo(&state)?
        .deactivate(user.id)
        .await
        .map_err(|e| ApiError::from_repository(e, "user"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    axum::extract::Query(params): QueryMap,
) -> ApiResult<Json<Value>> {
    restrict_to(&user, &[Role::Admin])?;
    factory::get_all(&repo(&state)?, &params, None).await
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<Json<Value>> {
    restrict_to(&user, &[Role::Admin])?;
    factory::get_one(&repo(&state)?, id).await
}

/// POST /api/v1/users
pub async fn create_user(user: AuthenticatedUser) -> ApiResult<Json<Value>> {
    restrict_to(&user, &[Role::Admin])?;
    Err(ApiError::internal(
        "This route is not defined! Please use /signup instead",
    ))
}

/// PATCH /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateUserDto>,
) -> ApiResult<Json<Value>> {
    restrict_to(&user, &[Role::Admin])?;
    validate_dto(&dto)?;
    factory::update_one(&repo(&state)?, id, dto).await
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    restrict_to(&user, &[Role::Admin])?;
    factory::delete_one(&repo(&state)?, id).await
}
