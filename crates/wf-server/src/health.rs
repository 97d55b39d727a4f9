//! Health endpoints.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use wf_db::Database;

/// Overall health report
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// State for the health routes
#[derive(Clone)]
pub struct HealthState {
    pub db: Option<Database>,
    pub started_at: Instant,
}

/// Liveness check (process is up)
pub async fn liveness() -> &'static str {
    "OK"
}

/// Readiness check (database reachable)
pub async fn readiness(State(state): State<HealthState>) -> (StatusCode, Json<HealthReport>) {
    let database = match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => "up",
            Err(err) => {
                tracing::warn!(error = %err, "database ping failed");
                "down"
            }
        },
        None => "down",
    };

    let status = if database == "up" { "ok" } else { "unavailable" };
    let http_status = if database == "up" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let report = HealthReport {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database,
        timestamp: chrono::Utc::now(),
    };

    (http_status, Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_readiness_without_database_is_unavailable() {
        let state = HealthState {
            db: None,
            started_at: Instant::now(),
        };
        let (status, Json(report)) = readiness(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.database, "down");
    }
}
