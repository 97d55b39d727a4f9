//! Booking handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use wf_core::{Id, Role};
use wf_db::BookingRepository;
use wf_models::{CreateBookingDto, UpdateBookingDto};

use crate::error::{validate_dto, ApiError, ApiResult};
use crate::extractors::{restrict_to, AppState, AuthenticatedUser, QueryMap};
use crate::factory;

const MANAGERS: &[Role] = &[Role::Admin, Role::LeadGuide];

fn repo(state: &AppState) -> ApiResult<BookingRepository> {
    Ok(BookingRepository::new(state.pool()?))
}

/// GET /api/v1/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    axum::extract::Query(params): QueryMap,
) -> ApiResult<Json<Value>> {
    restrict_to(&user, MANAGERS)?;
    factory::get_all(&repo(&state)?, &params, None).await
}

/// GET /api/v1/bookings/my
pub async fn my_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<Value>> {
    let bookings = repo(&state)?
        .find_by_user(user.id)
        .await
        .map_err(|e| ApiError::from_repository(e, "booking"))?;
    Ok(Json(json!({
        "status": "success",
        "results": bookings.len(),
        "data": { "data": bookings },
    })))
}

/// GET /api/v1/bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<Json<Value>> {
    restrict_to(&user, MANAGERS)?;
    factory::get_one(&repo(&state)?, id).await
}

/// POST /api/v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateBookingDto>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    restrict_to(&user, MANAGERS)?;
    validate_dto(&dto)?;
    factory::create_one(&repo(&state)?, dto).await
}

/// PATCH /api/v1/bookings/:id
pub async fn update_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateBookingDto>,
) -> ApiResult<Json<Value>> {
    restrict_to(&user, MANAGERS)?;
    validate_dto(&dto)?;
    factory::update_one(&repo(&state)?, id, dto).await
}

/// DELETE /api/v1/bookings/:id
pub async fn delete_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    restrict_to(&user, MANAGERS)?;
    factory::delete_one(&repo(&state)?, id).await
}
