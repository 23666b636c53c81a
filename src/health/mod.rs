/*!
 * # Health Check Module
 *
 * - `/health` reports that the process is serving requests
 * - `/health/ready` pings the database and inspects the image directory
 * - `/health/version` returns build information
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, error};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
    Degraded,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthDetail {
    pub status: HealthStatus,
    pub message: Option<String>,
}

/// Overall readiness report
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub details: BTreeMap<String, HealthDetail>,
}

#[derive(Clone)]
pub struct HealthState {
    pub db_pool: Arc<DatabaseConnection>,
    pub upload_dir: PathBuf,
    pub start_time: SystemTime,
}

impl HealthState {
    pub fn new(db_pool: Arc<DatabaseConnection>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_pool,
            upload_dir: upload_dir.into(),
            start_time: SystemTime::now(),
        }
    }

    pub fn uptime(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.start_time)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }

    async fn database(&self) -> HealthDetail {
        match self.db_pool.ping().await {
            Ok(()) => HealthDetail {
                status: HealthStatus::Up,
                message: None,
            },
            Err(e) => {
                error!("Database health check failed: {}", e);
                HealthDetail {
                    status: HealthStatus::Down,
                    message: Some(e.to_string()),
                }
            }
        }
    }

    // The directory is created by the first upload, so absence only degrades.
    async fn image_storage(&self) -> HealthDetail {
        match tokio::fs::metadata(&self.upload_dir).await {
            Ok(meta) if meta.is_dir() => HealthDetail {
                status: HealthStatus::Up,
                message: None,
            },
            Ok(_) => HealthDetail {
                status: HealthStatus::Down,
                message: Some(format!("{} is not a directory", self.upload_dir.display())),
            },
            Err(_) => HealthDetail {
                status: HealthStatus::Degraded,
                message: Some(format!("{} does not exist yet", self.upload_dir.display())),
            },
        }
    }

    pub async fn check(&self) -> HealthInfo {
        let mut details = BTreeMap::new();
        details.insert("database".to_string(), self.database().await);
        details.insert("imageStorage".to_string(), self.image_storage().await);

        let status = if details.values().any(|d| d.status == HealthStatus::Down) {
            HealthStatus::Down
        } else if details.values().any(|d| d.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Up
        };

        HealthInfo {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            uptime_seconds: self.uptime(),
            details,
        }
    }
}

pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "commit": option_env!("GIT_HASH").unwrap_or("unknown"),
    }))
}

pub async fn health_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    debug!("Health check endpoint called");
    Json(json!({
        "status": HealthStatus::Up,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.uptime(),
    }))
}

pub async fn readiness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let health = state.check().await;
    let status_code = match health.status {
        HealthStatus::Up | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

pub fn health_routes(
    db_pool: Arc<DatabaseConnection>,
    upload_dir: impl Into<PathBuf>,
) -> Router {
    let state = Arc::new(HealthState::new(db_pool, upload_dir));
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/version", get(version_info))
        .with_state(state)
}
