//! User repository.

use async_trait::async_trait;
use sqlx::PgPool;

use wf_core::Id;
use wf_models::{CreateUserDto, UpdateUserDto, UserRow};
use wf_queries::CollectionSpec;

use crate::repository::{CrudRepository, RepositoryError, RepositoryResult};

pub static USERS_SPEC: CollectionSpec = CollectionSpec::new(
    "users",
    &[
        "id",
        "name",
        "email",
        "photo",
        "role",
        "active",
        "created_at",
        "updated_at",
        "lock_version",
    ],
);

const COLUMNS: &str =
    "id, name, email, photo, role, password_hash, active, created_at, updated_at, lock_version";

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up an active user by email (login path)
    pub async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<UserRow>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1 AND active = TRUE");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Replace the stored password hash
    pub async fn update_password(&self, id: Id, password_hash: &str) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = NOW(), \
             lock_version = lock_version + 1 WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    /// Soft-delete: the account stays but stops matching login and listings
    pub async fn deactivate(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE users SET active = FALSE, updated_at = NOW(), \
             lock_version = lock_version + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl CrudRepository for UserRepository {
    type Row = UserRow;
    type Create = CreateUserDto;
    type Update = UpdateUserDto;

    const RESOURCE: &'static str = "user";

    fn collection(&self) -> &'static CollectionSpec {
        &USERS_SPEC
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<UserRow>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, dto: CreateUserDto) -> RepositoryResult<UserRow> {
        let sql = format!(
            "INSERT INTO users (name, email, role, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&dto.name)
            .bind(&dto.email)
            .bind(dto.role)
            .bind(&dto.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_unique_violation(e, "That email address is already in use")
            })?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateUserDto) -> RepositoryResult<UserRow> {
        let sql = format!(
            "UPDATE users SET \
             name = COALESCE($1, name), \
             email = COALESCE($2, email), \
             role = COALESCE($3, role), \
             active = COALESCE($4, active), \
             updated_at = NOW(), \
             lock_version = lock_version + 1 \
             WHERE id = $5 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&dto.name)
            .bind(&dto.email)
            .bind(dto.role)
            .bind(dto.active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_unique_violation(e, "That email address is already in use")
            })?
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", id)))?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_client_queryable() {
        // The hash column is deliberately missing from the collection spec,
        // so filters, sorts, and projections can never reference it.
        assert!(!USERS_SPEC.has_column("password_hash"));
        assert!(USERS_SPEC.has_column("email"));
    }
}
