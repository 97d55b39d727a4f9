//! Tour handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use wf_core::{Id, Role};
use wf_db::TourRepository;
use wf_models::{CreateTourDto, UpdateTourDto};

use crate::error::{validate_dto, ApiError, ApiResult};
use crate::extractors::{restrict_to, AppState, AuthenticatedUser, QueryMap};
use crate::factory;

const KM_PER_MILE: f64 = 1.609344;
const MILES_PER_KM: f64 = 0.621371;

fn repo(state: &AppState) -> ApiResult<TourRepository> {
    Ok(TourRepository::new(state.pool()?))
}

/// GET /api/v1/tours
pub async fn list_tours(
    State(state): State<AppState>,
    axum::extract::Query(params): QueryMap,
) -> ApiResult<Json<Value>> {
    factory::get_all(&repo(&state)?, &params, None).await
}

/// GET /api/v1/tours/top-5-cheap
///
/// Alias route: a plain listing with the refinement parameters preset.
pub async fn top_cheap(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let params: HashMap<String, String> = [
        ("limit", "5"),
        ("sort", "-ratings_average,price"),
        ("fields", "name,price,ratings_average,summary,difficulty"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    factory::get_all(&repo(&state)?, &params, None).await
}

/// GET /api/v1/tours/:id
pub async fn get_tour(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Value>> {
    factory::get_one(&repo(&state)?, id).await
}

/// POST /api/v1/tours
pub async fn create_tour(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateTourDto>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    restrict_to(&user, &[Role::Admin, Role::LeadGuide])?;
    validate_dto(&dto)?;
    factory::create_one(&repo(&state)?, dto).await
}

/// PATCH /api/v1/tours/:id
pub async fn update_tour(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateTourDto>,
) -> ApiResult<Json<Value>> {
    restrict_to(&user, &[Role::Admin, Role::LeadGuide])?;
    validate_dto(&dto)?;
    factory::update_one(&repo(&state)?, id, dto).await
}

/// DELETE /api/v1/tours/:id
pub async fn delete_tour(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    restrict_to(&user, &[Role::Admin, Role::LeadGuide])?;
    factory::delete_one(&repo(&state)?, id).await
}

/// GET /api/v1/tours/stats
pub async fn tour_stats(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let stats = repo(&state)?
        .stats()
        .await
        .map_err(|e| ApiError::from_repository(e, "tour"))?;
    Ok(Json(json!({
        "status": "success",
        "data": { "stats": stats },
    })))
}

/// GET /api/v1/tours/monthly-plan/:year
pub async fn monthly_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(year): Path<i32>,
) -> ApiResult<Json<Value>> {
    restrict_to(&user, &[Role::Admin, Role::LeadGuide, Role::Guide])?;
    let plan = repo(&state)?
        .monthly_plan(year)
        .await
        .map_err(|e| ApiError::from_repository(e, "tour"))?;
    Ok(Json(json!({
        "status": "success",
        "results": plan.len(),
        "data": { "plan": plan },
    })))
}

fn parse_latlng(latlng: &str) -> ApiResult<(f64, f64)> {
    let mut parts = latlng.splitn(2, ',');
    let lat = parts.next().and_then(|s| s.trim().parse::<f64>().ok());
    let lng = parts.next().and_then(|s| s.trim().parse::<f64>().ok());
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok((lat, lng)),
        _ => Err(ApiError::bad_request(
            "Please provide latitude and longitude in the format lat,lng.",
        )),
    }
}

/// GET /api/v1/tours/tours-within/:distance/center/:latlng/unit/:unit
pub async fn tours_within(
    State(state): State<AppState>,
    Path((distance, latlng, unit)): Path<(f64, String, String)>,
) -> ApiResult<Json<Value>> {
    let (lat, lng) = parse_latlng(&latlng)?;
    let radius_km = match unit.as_str() {
        "mi" => distance * KM_PER_MILE,
        "km" => distance,
        _ => return Err(ApiError::bad_request("Unit must be either mi or km.")),
    };

    let tours = repo(&state)?
        .find_within(lat, lng, radius_km)
        .await
        .map_err(|e| ApiError::from_repository(e, "tour"))?;
    Ok(Json(json!({
        "status": "success",
        "results": tours.len(),
        "data": { "data": tours },
    })))
}

/// GET /api/v1/tours/distances/:latlng/unit/:unit
pub async fn tour_distances(
    State(state): State<AppState>,
    Path((latlng, unit)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let (lat, lng) = parse_latlng(&latlng)?;
    let multiplier = match unit.as_str() {
        "mi" => MILES_PER_KM,
        "km" => 1.0,
        _ => return Err(ApiError::bad_request("Unit must be either mi or km.")),
    };

    let distances = repo(&state)?
        .distances(lat, lng, multiplier)
        .await
        .map_err(|e| ApiError::from_repository(e, "tour"))?;
    Ok(Json(json!({
        "status": "success",
        "data": { "data": distances },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latlng() {
        assert_eq!(parse_latlng("34.1,-118.1").unwrap(), (34.1, -118.1));
        assert!(parse_latlng("34.1").is_err());
        assert!(parse_latlng("lat,lng").is_err());
    }
}
