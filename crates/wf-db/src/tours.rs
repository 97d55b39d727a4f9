//! Tour repository.
//!
//! Besides the generic CRUD surface this carries the aggregate views the
//! tours API exposes: per-difficulty statistics, the monthly starts plan,
//! and the two geo queries over the start location.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sqlx::PgPool;

use wf_core::Id;
use wf_models::tour::{MonthlyPlanEntry, TourDistance, TourStats};
use wf_models::{CreateTourDto, TourRow, UpdateTourDto};
use wf_queries::CollectionSpec;

use crate::repository::{CrudRepository, RepositoryError, RepositoryResult};

pub static TOURS_SPEC: CollectionSpec = CollectionSpec::new(
    "tours",
    &[
        "id",
        "name",
        "duration",
        "max_group_size",
        "difficulty",
        "price",
        "price_discount",
        "summary",
        "description",
        "image_cover",
        "ratings_average",
        "ratings_quantity",
        "start_lat",
        "start_lng",
        "start_dates",
        "created_at",
        "updated_at",
        "lock_version",
    ],
);

const COLUMNS: &str = "id, name, duration, max_group_size, difficulty, price, price_discount, \
                       summary, description, image_cover, ratings_average, ratings_quantity, \
                       start_lat, start_lng, start_dates, created_at, updated_at, lock_version";

/// Great-circle distance in kilometers between ($1, $2) and the tour's
/// start location, by the spherical law of cosines.
const DISTANCE_KM: &str = "6371.0 * acos(LEAST(1.0, \
                           cos(radians($1)) * cos(radians(start_lat)) * \
                           cos(radians(start_lng) - radians($2)) + \
                           sin(radians($1)) * sin(radians(start_lat))))";

pub struct TourRepository {
    pool: PgPool,
}

impl TourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Aggregate statistics per difficulty over well-rated tours
    pub async fn stats(&self) -> RepositoryResult<Vec<TourStats>> {
        let rows = sqlx::query_as::<_, TourStats>(
            r#"
            SELECT difficulty,
                   COUNT(*) AS num_tours,
                   COALESCE(SUM(ratings_quantity), 0) AS num_ratings,
                   AVG(ratings_average) AS avg_rating,
                   AVG(price) AS avg_price,
                   MIN(price) AS min_price,
                   MAX(price) AS max_price
            FROM tours
            WHERE ratings_average >= 4.5
            GROUP BY difficulty
            ORDER BY avg_price ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Busiest months of a year, from the tours' start dates
    pub async fn monthly_plan(&self, year: i32) -> RepositoryResult<Vec<MonthlyPlanEntry>> {
        let from = Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| RepositoryError::Validation(format!("invalid year {}", year)))?;
        let to = Utc
            .with_ymd_and_hms(year, 12, 31, 23, 59, 59)
            .single()
            .ok_or_else(|| RepositoryError::Validation(format!("invalid year {}", year)))?;

        let rows = sqlx::query_as::<_, MonthlyPlanEntry>(
            r#"
            SELECT EXTRACT(MONTH FROM d)::INT4 AS month,
                   COUNT(*) AS num_tour_starts,
                   ARRAY_AGG(name ORDER BY name) AS tours
            FROM tours, UNNEST(start_dates) AS d
            WHERE d >= $1 AND d <= $2
            GROUP BY 1
            ORDER BY num_tour_starts DESC
            LIMIT 12
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Tours whose start location lies within `radius_km` of (lat, lng)
    pub async fn find_within(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> RepositoryResult<Vec<TourRow>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM tours \
             WHERE start_lat IS NOT NULL AND start_lng IS NOT NULL \
             AND {DISTANCE_KM} <= $3"
        );
        let rows = sqlx::query_as::<_, TourRow>(&sql)
            .bind(lat)
            .bind(lng)
            .bind(radius_km)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Distance of every located tour from (lat, lng), scaled by
    /// `multiplier` (1.0 for kilometers, 0.621371 for miles)
    pub async fn distances(
        &self,
        lat: f64,
        lng: f64,
        multiplier: f64,
    ) -> RepositoryResult<Vec<TourDistance>> {
        let sql = format!(
            "SELECT id, name, {DISTANCE_KM} * $3 AS distance FROM tours \
             WHERE start_lat IS NOT NULL AND start_lng IS NOT NULL \
             ORDER BY distance ASC"
        );
        let rows = sqlx::query_as::<_, TourDistance>(&sql)
            .bind(lat)
            .bind(lng)
            .bind(multiplier)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[async_trait]
impl CrudRepository for TourRepository {
    type Row = TourRow;
    type Create = CreateTourDto;
    type Update = UpdateTourDto;

    const RESOURCE: &'static str = "tour";

    fn collection(&self) -> &'static CollectionSpec {
        &TOURS_SPEC
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<TourRow>> {
        let sql = format!("SELECT {COLUMNS} FROM tours WHERE id = $1");
        let row = sqlx::query_as::<_, TourRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, dto: CreateTourDto) -> RepositoryResult<TourRow> {
        let sql = format!(
            "INSERT INTO tours (name, duration, max_group_size, difficulty, price, \
             price_discount, summary, description, image_cover, start_lat, start_lng, \
             start_dates, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW()) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TourRow>(&sql)
            .bind(&dto.name)
            .bind(dto.duration)
            .bind(dto.max_group_size)
            .bind(dto.difficulty)
            .bind(dto.price)
            .bind(dto.price_discount)
            .bind(&dto.summary)
            .bind(&dto.description)
            .bind(&dto.image_cover)
            .bind(dto.start_lat)
            .bind(dto.start_lng)
            .bind(&dto.start_dates)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_unique_violation(e, "A tour with that name already exists")
            })?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateTourDto) -> RepositoryResult<TourRow> {
        let sql = format!(
            "UPDATE tours SET \
             name = COALESCE($1, name), \
             duration = COALESCE($2, duration), \
             max_group_size = COALESCE($3, max_group_size), \
             difficulty = COALESCE($4, difficulty), \
             price = COALESCE($5, price), \
             price_discount = COALESCE($6, price_discount), \
             summary = COALESCE($7, summary), \
             description = COALESCE($8, description), \
             image_cover = COALESCE($9, image_cover), \
             start_lat = COALESCE($10, start_lat), \
             start_lng = COALESCE($11, start_lng), \
             start_dates = COALESCE($12, start_dates), \
             updated_at = NOW(), \
             lock_version = lock_version + 1 \
             WHERE id = $13 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TourRow>(&sql)
            .bind(&dto.name)
            .bind(dto.duration)
            .bind(dto.max_group_size)
            .bind(dto.difficulty)
            .bind(dto.price)
            .bind(dto.price_discount)
            .bind(&dto.summary)
            .bind(&dto.description)
            .bind(&dto.image_cover)
            .bind(dto.start_lat)
            .bind(dto.start_lng)
            .bind(&dto.start_dates)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("tour {}", id)))?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("tour {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_covers_version_marker() {
        assert!(TOURS_SPEC.has_column("lock_version"));
        assert!(!TOURS_SPEC.default_columns().contains(&"lock_version"));
    }

    #[test]
    fn test_spec_rejects_unknown_columns() {
        assert!(!TOURS_SPEC.has_column("password_hash"));
        assert!(TOURS_SPEC.has_column("ratings_average"));
    }
}
