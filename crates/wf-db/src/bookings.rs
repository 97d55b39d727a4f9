//! Booking repository.

use async_trait::async_trait;
use sqlx::PgPool;

use wf_core::Id;
use wf_models::{BookingRow, CreateBookingDto, UpdateBookingDto};
use wf_queries::CollectionSpec;

use crate::repository::{CrudRepository, RepositoryError, RepositoryResult};

pub static BOOKINGS_SPEC: CollectionSpec = CollectionSpec::new(
    "bookings",
    &[
        "id",
        "tour_id",
        "user_id",
        "price",
        "paid",
        "created_at",
        "updated_at",
        "lock_version",
    ],
)
.with_parent("tour_id");

const COLUMNS: &str = "id, tour_id, user_id, price, paid, created_at, updated_at, lock_version";

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All bookings made by one user
    pub async fn find_by_user(&self, user_id: Id) -> RepositoryResult<Vec<BookingRow>> {
        let sql = format!("SELECT {COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl CrudRepository for BookingRepository {
    type Row = BookingRow;
    type Create = CreateBookingDto;
    type Update = UpdateBookingDto;

    const RESOURCE: &'static str = "booking";

    fn collection(&self) -> &'static CollectionSpec {
        &BOOKINGS_SPEC
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<BookingRow>> {
        let sql = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, dto: CreateBookingDto) -> RepositoryResult<BookingRow> {
        let sql = format!(
            "INSERT INTO bookings (tour_id, user_id, price, paid, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(dto.tour_id)
            .bind(dto.user_id)
            .bind(dto.price)
            .bind(dto.paid)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateBookingDto) -> RepositoryResult<BookingRow> {
        let sql = format!(
            "UPDATE bookings SET \
             price = COALESCE($1, price), \
             paid = COALESCE($2, paid), \
             updated_at = NOW(), \
             lock_version = lock_version + 1 \
             WHERE id = $3 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(dto.price)
            .bind(dto.paid)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("booking {}", id)))?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("booking {}", id)));
        }
        Ok(())
    }
}
