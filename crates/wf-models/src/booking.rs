//! Booking model.
//!
//! A booking records that a user purchased a tour at a price. Payment
//! processing happens outside this system; only the result is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use wf_core::Id;

/// Booking database row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingRow {
    pub id: Id,
    pub tour_id: Id,
    pub user_id: Id,
    pub price: f64,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub lock_version: i32,
}

/// Create payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingDto {
    pub tour_id: Id,
    pub user_id: Id,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    #[serde(default = "default_paid")]
    pub paid: bool,
}

fn default_paid() -> bool {
    true
}

/// Partial booking update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBookingDto {
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: Option<f64>,
    pub paid: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_defaults_to_true() {
        let dto: CreateBookingDto =
            serde_json::from_str(r#"{"tour_id": 1, "user_id": 2, "price": 497.0}"#).unwrap();
        assert!(dto.paid);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let dto = CreateBookingDto {
            tour_id: 1,
            user_id: 2,
            price: -1.0,
            paid: true,
        };
        assert!(dto.validate().is_err());
    }
}
