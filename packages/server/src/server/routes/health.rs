use std::time::{Duration, Instant};

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::kernel::postgres::MIGRATOR;
use crate::server::app::AppState;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct HealthReport {
    status: HealthStatus,
    database: DatabaseCheck,
    pool: PoolStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    /// Database answers but the match tables are older than this binary
    MigrationsPending,
    DatabaseUnavailable,
}

#[derive(Debug, Serialize)]
pub struct DatabaseCheck {
    latency_ms: Option<u128>,
    schema_version: Option<i64>,
    expected_schema_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PoolStats {
    size: u32,
    idle: usize,
    max: u32,
}

/// `GET /health`: 200 only when discovery and matching can actually run
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthReport>) {
    let started = Instant::now();
    let probe = tokio::time::timeout(PROBE_TIMEOUT, applied_schema_version(&state.db_pool))
        .await
        .unwrap_or_else(|_| Err(format!("no answer within {}s", PROBE_TIMEOUT.as_secs())));
    let latency = probe.is_ok().then(|| started.elapsed());

    let (status, database) = assess(probe, latency, expected_schema_version());
    let pool = PoolStats {
        size: state.db_pool.size(),
        idle: state.db_pool.num_idle(),
        max: state.db_pool.options().get_max_connections(),
    };

    let code = if status == HealthStatus::Ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(HealthReport { status, database, pool }))
}

async fn applied_schema_version(pool: &PgPool) -> Result<Option<i64>, String> {
    sqlx::query_scalar::<_, Option<i64>>(
        "SELECT MAX(version) FROM _sqlx_migrations WHERE success",
    )
    .fetch_one(pool)
    .await
    .map_err(|e| e.to_string())
}

fn expected_schema_version() -> Option<i64> {
    MIGRATOR.iter().map(|m| m.version).max()
}

fn assess(
    probe: Result<Option<i64>, String>,
    latency: Option<Duration>,
    expected: Option<i64>,
) -> (HealthStatus, DatabaseCheck) {
    let latency_ms = latency.map(|d| d.as_millis());
    match probe {
        Ok(applied) => {
            let status = if applied >= expected {
                HealthStatus::Ok
            } else {
                HealthStatus::MigrationsPending
            };
            let check = DatabaseCheck {
                latency_ms,
                schema_version: applied,
                expected_schema_version: expected,
                error: None,
            };
            (status, check)
        }
        Err(error) => {
            let check = DatabaseCheck {
                latency_ms,
                schema_version: None,
                expected_schema_version: expected,
                error: Some(error),
            };
            (HealthStatus::DatabaseUnavailable, check)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_schema_is_ok() {
        let (status, check) = assess(
            Ok(Some(20260101000002)),
            Some(Duration::from_millis(3)),
            Some(20260101000002),
        );
        assert_eq!(status, HealthStatus::Ok);
        assert_eq!(check.latency_ms, Some(3));
        assert!(check.error.is_none());
    }

    #[test]
    fn test_older_schema_reports_pending_migrations() {
        let (status, _) = assess(Ok(Some(20260101000001)), None, Some(20260101000002));
        assert_eq!(status, HealthStatus::MigrationsPending);

        let (status, _) = assess(Ok(None), None, Some(20260101000002));
        assert_eq!(status, HealthStatus::MigrationsPending);
    }

    #[test]
    fn test_probe_failure_is_unavailable() {
        let (status, check) = assess(Err("connection refused".to_string()), None, Some(1));
        assert_eq!(status, HealthStatus::DatabaseUnavailable);
        assert_eq!(check.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_embedded_migrations_have_a_version() {
        assert!(expected_schema_version().is_some());
    }
}
