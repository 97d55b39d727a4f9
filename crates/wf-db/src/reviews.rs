//! Review repository.
//!
//! Every write that touches a review re-derives the owning tour's rating
//! aggregates from the surviving reviews. The two statements run without a
//! transaction; a concurrent write simply recomputes again and converges.

use async_trait::async_trait;
use sqlx::PgPool;

use wf_core::Id;
use wf_models::{CreateReviewDto, ReviewRow, UpdateReviewDto};
use wf_queries::CollectionSpec;

use crate::repository::{CrudRepository, RepositoryError, RepositoryResult};

pub static REVIEWS_SPEC: CollectionSpec = CollectionSpec::new(
    "reviews",
    &[
        "id",
        "body",
        "rating",
        "tour_id",
        "user_id",
        "created_at",
        "updated_at",
        "lock_version",
    ],
)
.with_parent("tour_id");

const COLUMNS: &str = "id, body, rating, tour_id, user_id, created_at, updated_at, lock_version";

/// Rating values a tour falls back to when it has no reviews
const DEFAULT_AVG_RATING: f64 = 4.5;

pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recompute the owning tour's `ratings_average` and `ratings_quantity`
    /// from its current reviews.
    async fn recalculate_ratings(&self, tour_id: Id) -> RepositoryResult<()> {
        let (count, avg): (i64, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*), AVG(rating::float8) FROM reviews WHERE tour_id = $1",
        )
        .bind(tour_id)
        .fetch_one(&self.pool)
        .await?;

        let average = avg.unwrap_or(DEFAULT_AVG_RATING);
        sqlx::query(
            "UPDATE tours SET ratings_average = $1, ratings_quantity = $2, \
             updated_at = NOW() WHERE id = $3",
        )
        .bind(average)
        .bind(count as i32)
        .bind(tour_id)
        .execute(&self.pool)
        .await?;

        tracing::debug!(tour_id, count, average, "tour ratings recalculated");
        Ok(())
    }
}

#[async_trait]
impl CrudRepository for ReviewRepository {
    type Row = ReviewRow;
    type Create = CreateReviewDto;
    type Update = UpdateReviewDto;

    const RESOURCE: &'static str = "review";

    fn collection(&self) -> &'static CollectionSpec {
        &REVIEWS_SPEC
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<ReviewRow>> {
        let sql = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, dto: CreateReviewDto) -> RepositoryResult<ReviewRow> {
        let sql = format!(
            "INSERT INTO reviews (body, rating, tour_id, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(&dto.body)
            .bind(dto.rating)
            .bind(dto.tour_id)
            .bind(dto.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_unique_violation(e, "You have already reviewed this tour")
            })?;

        self.recalculate_ratings(row.tour_id).await?;
        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateReviewDto) -> RepositoryResult<ReviewRow> {
        let sql = format!(
            "UPDATE reviews SET \
             body = COALESCE($1, body), \
             rating = COALESCE($2, rating), \
             updated_at = NOW(), \
             lock_version = lock_version + 1 \
             WHERE id = $3 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(&dto.body)
            .bind(dto.rating)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("review {}", id)))?;

        self.recalculate_ratings(row.tour_id).await?;
        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        // Need the owning tour before the row disappears
        let tour_id: Option<Id> =
            sqlx::query_scalar("SELECT tour_id FROM reviews WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        let tour_id =
            tour_id.ok_or_else(|| RepositoryError::NotFound(format!("review {}", id)))?;

        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.recalculate_ratings(tour_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_scopes_by_tour() {
        assert_eq!(REVIEWS_SPEC.parent_column, Some("tour_id"));
        assert!(REVIEWS_SPEC.has_column("rating"));
    }
}
