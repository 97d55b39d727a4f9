//! Review handlers.
//!
//! Reviews are reachable flat (`/reviews`) and nested under a tour
//! (`/tours/:tour_id/reviews`). The nested listing scopes through the
//! feature builder's parent clause; creation takes the tour from the path
//! or, on the flat route, from the body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use wf_core::{Id, Role};
use wf_db::{CrudRepository, ReviewRepository, TourRepository};
use wf_models::{CreateReviewDto, UpdateReviewDto};

use crate::error::{validate_dto, ApiError, ApiResult};
use crate::extractors::{restrict_to, AppState, AuthenticatedUser, QueryMap};
use crate::factory;
use wf_queries::FilterClause;

fn repo(state: &AppState) -> ApiResult<ReviewRepository> {
    Ok(ReviewRepository::new(state.pool()?))
}

/// Request body for review creation. The tour may come from the nested
/// path instead, and the author is always the authenticated user.
#[derive(Debug, Deserialize)]
pub struct ReviewBody {
    pub body: String,
    pub rating: i32,
    pub tour_id: Option<Id>,
}

/// GET /api/v1/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    axum::extract::Query(params): QueryMap,
) -> ApiResult<Json<Value>> {
    factory::get_all(&repo(&state)?, &params, None).await
}

/// GET /api/v1/tours/:tour_id/reviews
pub async fn list_tour_reviews(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(tour_id): Path<Id>,
    axum::extract::Query(params): QueryMap,
) -> ApiResult<Json<Value>> {
    let parent = FilterClause::eq("tour_id", tour_id);
    factory::get_all(&repo(&state)?, &params, Some(parent)).await
}

/// GET /api/v1/reviews/:id
pub async fn get_review(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<Json<Value>> {
    factory::get_one(&repo(&state)?, id).await
}

async fn create(
    state: AppState,
    user: AuthenticatedUser,
    path_tour_id: Option<Id>,
    body: ReviewBody,
) -> ApiResult<(StatusCode, Json<Value>)> {
    restrict_to(&user, &[Role::User])?;

    let tour_id = path_tour_id.or(body.tour_id).ok_or_else(|| {
        ApiError::bad_request("A review must belong to a tour")
    })?;

    // 404 on a missing tour instead of surfacing the FK violation as a 500
    let tours = TourRepository::new(state.pool()?);
    if !tours
        .exists(tour_id)
        .await
        .map_err(|e| ApiError::from_repository(e, TourRepository::RESOURCE))?
    {
        return Err(ApiError::not_found(TourRepository::RESOURCE));
    }

    let dto = CreateReviewDto {
        body: body.body,
        rating: body.rating,
        tour_id,
        user_id: user.id,
    };
    validate_dto(&dto)?;
    factory::create_one(&repo(&state)?, dto).await
}

/// POST /api/v1/reviews
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<ReviewBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    create(state, user, None, body).await
}

/// POST /api/v1/tours/:tour_id/reviews
pub async fn create_tour_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(tour_id): Path<Id>,
    Json(body): Json<ReviewBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    create(state, user, Some(tour_id), body).await
}

/// PATCH /api/v1/reviews/:id
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateReviewDto>,
) -> ApiResult<Json<Value>> {
    restrict_to(&user, &[Role::User, Role::Admin])?;
    validate_dto(&dto)?;
    factory::update_one(&repo(&state)?, id, dto).await
}

/// DELETE /api/v1/reviews/:id
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    restrict_to(&user, &[Role::User, Role::Admin])?;
    factory::delete_one(&repo(&state)?, id).await
}
