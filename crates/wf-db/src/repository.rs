//! Generic CRUD surface shared by every resource repository.
//!
//! [`CrudRepository`] is the typed counterpart of a handler factory: the
//! resource is a type implementing the trait rather than a value passed at
//! runtime. The trait ships default implementations for the pieces that
//! only need the table name — existence checks, counting, and executing a
//! feature-built select.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Column, PgPool, Postgres, Row, TypeInfo};

use wf_core::Id;
use wf_queries::{CollectionSpec, FilterValue, SqlSelect};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Translate a unique-constraint violation into a conflict with the
    /// given message; anything else stays a database error.
    pub fn from_unique_violation(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("23505") {
                return RepositoryError::Conflict(message.to_string());
            }
        }
        RepositoryError::Database(err)
    }
}

/// Generic CRUD operations over one resource
#[async_trait]
pub trait CrudRepository: Send + Sync {
    type Row: serde::Serialize + Send + Sync + Unpin;
    type Create: Send + 'static;
    type Update: Send + 'static;

    /// Human-readable resource name for not-found messages
    const RESOURCE: &'static str;

    /// Static description of the queryable collection
    fn collection(&self) -> &'static CollectionSpec;

    fn pool(&self) -> &PgPool;

    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Self::Row>>;

    async fn create(&self, dto: Self::Create) -> RepositoryResult<Self::Row>;

    async fn update(&self, id: Id, dto: Self::Update) -> RepositoryResult<Self::Row>;

    async fn delete(&self, id: Id) -> RepositoryResult<()>;

    /// Execute a feature-built select. Rows come back as JSON objects
    /// because the projection decides which columns exist.
    async fn search(&self, select: &SqlSelect) -> RepositoryResult<Vec<Value>> {
        let rows = bind_select(select).fetch_all(self.pool()).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            self.collection().table
        );
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(self.pool())
            .await?;
        Ok(exists)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.collection().table);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}

/// Bind a rendered select's operands in placeholder order
pub fn bind_select(select: &SqlSelect) -> sqlx::query::Query<'_, Postgres, PgArguments> {
    let mut query = sqlx::query(select.sql.as_str());
    for value in &select.binds {
        query = match value {
            FilterValue::Int(n) => query.bind(*n),
            FilterValue::Float(f) => query.bind(*f),
            FilterValue::Bool(b) => query.bind(*b),
            FilterValue::Text(s) => query.bind(s.as_str()),
        };
    }
    query
}

/// Convert a dynamically-projected row into a JSON object, column by
/// column. Unsupported column types decode as null.
pub fn row_to_json(row: &PgRow) -> Value {
    let mut map = serde_json::Map::with_capacity(row.columns().len());
    for column in row.columns() {
        let idx = column.ordinal();
        let value = match column.type_info().name() {
            "INT2" => row
                .try_get::<Option<i16>, _>(idx)
                .ok()
                .flatten()
                .map(Value::from),
            "INT4" => row
                .try_get::<Option<i32>, _>(idx)
                .ok()
                .flatten()
                .map(Value::from),
            "INT8" => row
                .try_get::<Option<i64>, _>(idx)
                .ok()
                .flatten()
                .map(Value::from),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::from(v as f64)),
            "FLOAT8" => row
                .try_get::<Option<f64>, _>(idx)
                .ok()
                .flatten()
                .map(Value::from),
            "BOOL" => row
                .try_get::<Option<bool>, _>(idx)
                .ok()
                .flatten()
                .map(Value::from),
            "TIMESTAMPTZ" => row
                .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_rfc3339())),
            "DATE" => row
                .try_get::<Option<chrono::NaiveDate>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_string())),
            "TIMESTAMPTZ[]" => row
                .try_get::<Option<Vec<chrono::DateTime<chrono::Utc>>>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::Array(v.into_iter().map(|d| Value::String(d.to_rfc3339())).collect())),
            "TEXT[]" => row
                .try_get::<Option<Vec<String>>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::Array(v.into_iter().map(Value::String).collect())),
            _ => row
                .try_get::<Option<String>, _>(idx)
                .ok()
                .flatten()
                .map(Value::String),
        };
        map.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_select_preserves_placeholder_order() {
        let select = SqlSelect {
            sql: "SELECT id FROM tours WHERE price <= $1 AND difficulty = $2".into(),
            binds: vec![FilterValue::Int(1500), FilterValue::Text("easy".into())],
        };
        // Building the query must not panic; execution is covered by
        // integration environments with a live database.
        let _query = bind_select(&select);
        assert_eq!(select.binds.len(), 2);
    }
}
