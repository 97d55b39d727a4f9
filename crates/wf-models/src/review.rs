//! Review model.
//!
//! One review per (tour, user) pair, enforced by a unique index. Rating
//! aggregates on the tour are recomputed by the repository after every
//! review write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use wf_core::Id;

/// Review database row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewRow {
    pub id: Id,
    pub body: String,
    pub rating: i32,
    pub tour_id: Id,
    pub user_id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub lock_version: i32,
}

/// Complete create payload, assembled by the handler from the request body
/// plus the authenticated user and (for nested routes) the path tour id.
#[derive(Debug, Clone, Validate)]
pub struct CreateReviewDto {
    #[validate(length(
        min = 10,
        max = 500,
        message = "must have between 10 and 500 characters"
    ))]
    pub body: String,
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i32,
    pub tour_id: Id,
    pub user_id: Id,
}

/// Partial review update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReviewDto {
    #[validate(length(
        min = 10,
        max = 500,
        message = "must have between 10 and 500 characters"
    ))]
    pub body: Option<String>,
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateReviewDto {
        CreateReviewDto {
            body: "Loved every minute of this tour!".into(),
            rating: 5,
            tour_id: 1,
            user_id: 1,
        }
    }

    #[test]
    fn test_valid_review_passes() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let mut dto = valid_create();
        dto.rating = 0;
        assert!(dto.validate().is_err());
        dto.rating = 6;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_body_too_short_rejected() {
        let mut dto = valid_create();
        dto.body = "Nice".into();
        assert!(dto.validate().is_err());
    }
}
