//! Tour model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use wf_core::Id;

/// Tour difficulty levels. Stored as a TEXT column (CHECK-constrained),
/// so the derived sqlx mapping stays string-typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

/// Tour database row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TourRow {
    pub id: Id,
    pub name: String,
    pub duration: i32,
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    pub price: f64,
    pub price_discount: Option<f64>,
    pub summary: String,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub ratings_average: f64,
    pub ratings_quantity: i32,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
    pub start_dates: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub lock_version: i32,
}

/// Payload for creating a tour
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_discount", skip_on_field_errors = true))]
pub struct CreateTourDto {
    #[validate(length(
        min = 10,
        max = 40,
        message = "must have between 10 and 40 characters"
    ))]
    pub name: String,
    #[validate(range(min = 1, message = "must be at least one day"))]
    pub duration: i32,
    #[validate(range(min = 1, message = "must allow at least one participant"))]
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    pub price_discount: Option<f64>,
    #[validate(length(min = 1, message = "can not be empty"))]
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_cover: Option<String>,
    #[serde(default)]
    pub start_lat: Option<f64>,
    #[serde(default)]
    pub start_lng: Option<f64>,
    #[serde(default)]
    pub start_dates: Vec<DateTime<Utc>>,
}

fn validate_discount(dto: &CreateTourDto) -> Result<(), ValidationError> {
    if let Some(discount) = dto.price_discount {
        if discount >= dto.price {
            return Err(ValidationError::new(
                "discount price should be below regular price",
            ));
        }
    }
    Ok(())
}

/// Payload for a partial tour update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTourDto {
    #[validate(length(
        min = 10,
        max = 40,
        message = "must have between 10 and 40 characters"
    ))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "must be at least one day"))]
    pub duration: Option<i32>,
    #[validate(range(min = 1, message = "must allow at least one participant"))]
    pub max_group_size: Option<i32>,
    pub difficulty: Option<Difficulty>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: Option<f64>,
    pub price_discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
    pub start_dates: Option<Vec<DateTime<Utc>>>,
}

/// One bucket of the per-difficulty statistics aggregate
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TourStats {
    pub difficulty: Difficulty,
    pub num_tours: i64,
    pub num_ratings: i64,
    pub avg_rating: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

/// One month of the monthly starts plan
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyPlanEntry {
    pub month: i32,
    pub num_tour_starts: i64,
    pub tours: Vec<String>,
}

/// A tour together with its distance from a reference point
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TourDistance {
    pub id: Id,
    pub name: String,
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateTourDto {
        CreateTourDto {
            name: "The Forest Hiker".into(),
            duration: 5,
            max_group_size: 25,
            difficulty: Difficulty::Easy,
            price: 397.0,
            price_discount: None,
            summary: "Breathtaking hike through the Canadian Banff National Park".into(),
            description: None,
            image_cover: None,
            start_lat: None,
            start_lng: None,
            start_dates: vec![],
        }
    }

    #[test]
    fn test_difficulty_is_text_in_the_database() {
        use sqlx::{Postgres, Type, TypeInfo};
        let info = <Difficulty as Type<Postgres>>::type_info();
        assert_eq!(info.name(), <str as Type<Postgres>>::type_info().name());
    }

    #[test]
    fn test_valid_tour_passes() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_short_name_rejected() {
        let mut dto = valid_create();
        dto.name = "Short".into();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_discount_must_be_below_price() {
        let mut dto = valid_create();
        dto.price_discount = Some(500.0);
        assert!(dto.validate().is_err());

        dto.price_discount = Some(300.0);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_validates_provided_fields_only() {
        let dto = UpdateTourDto::default();
        assert!(dto.validate().is_ok());

        let dto = UpdateTourDto {
            duration: Some(0),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
