//! Generic CRUD handler bodies.
//!
//! One set of functions serves every resource: handlers construct their
//! repository and delegate here, so the list/get/create/update/delete
//! behavior (query refinement, envelopes, 404 mapping) is written once.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use wf_core::Id;
use wf_db::CrudRepository;
use wf_queries::{ApiFeatures, FilterClause};

use crate::error::{ApiError, ApiResult};

fn success_one<T: serde::Serialize>(row: &T) -> ApiResult<Json<Value>> {
    let value = serde_json::to_value(row)
        .map_err(|e| ApiError::internal(format!("serialization failed: {}", e)))?;
    Ok(Json(json!({
        "status": "success",
        "data": { "data": value },
    })))
}

/// List a collection, refined by the request's query parameters and
/// optionally scoped under a parent resource.
pub async fn get_all<R: CrudRepository>(
    repo: &R,
    params: &HashMap<String, String>,
    parent: Option<FilterClause>,
) -> ApiResult<Json<Value>> {
    let mut features = match parent {
        Some(clause) => ApiFeatures::new(params).with_parent(clause),
        None => ApiFeatures::new(params),
    };
    features.filter().sort().limit_fields().paginate();

    let select = features.select(repo.collection());
    let rows = repo
        .search(&select)
        .await
        .map_err(|e| ApiError::from_repository(e, R::RESOURCE))?;
    let total = repo
        .count()
        .await
        .map_err(|e| ApiError::from_repository(e, R::RESOURCE))?;

    Ok(Json(json!({
        "status": "success",
        "results": rows.len(),
        "total": total,
        "data": { "data": rows },
    })))
}

pub async fn get_one<R: CrudRepository>(repo: &R, id: Id) -> ApiResult<Json<Value>> {
    let row = repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::from_repository(e, R::RESOURCE))?
        .ok_or_else(|| ApiError::not_found(R::RESOURCE))?;
    success_one(&row)
}

pub async fn create_one<R: CrudRepository>(
    repo: &R,
    dto: R::Create,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let row = repo
        .create(dto)
        .await
        .map_err(|e| ApiError::from_repository(e, R::RESOURCE))?;
    Ok((StatusCode::CREATED, success_one(&row)?))
}

pub async fn update_one<R: CrudRepository>(
    repo: &R,
    id: Id,
    dto: R::Update,
) -> ApiResult<Json<Value>> {
    let row = repo
        .update(id, dto)
        .await
        .map_err(|e| ApiError::from_repository(e, R::RESOURCE))?;
    success_one(&row)
}

pub async fn delete_one<R: CrudRepository>(repo: &R, id: Id) -> ApiResult<StatusCode> {
    repo.delete(id)
        .await
        .map_err(|e| ApiError::from_repository(e, R::RESOURCE))?;
    Ok(StatusCode::NO_CONTENT)
}
