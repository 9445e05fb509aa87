//! API Request/Response Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::models::errors::AppError;
use crate::utils::cache::CacheStats;

/// API Response wrapper for service endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Error body: `{"detail": ..., "code": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
    pub code: String,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            detail: err.message.clone(),
            code: err.code_str().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = self.code_str(), "❌ Request failed: {}", self.message);
        } else if self.code.is_invalid_address() {
            info!(code = self.code_str(), "🚫 Rejected address: {}", self.message);
        } else {
            warn!(code = self.code_str(), "⚠️ Request rejected: {}", self.message);
        }
        (status, Json(ApiError::from(&self))).into_response()
    }
}

// ============================================
// Health & Stats
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub ok: bool,
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub wallets_scored: u64,
    pub reports_rendered: u64,
    pub snapshots: CacheStats,
    pub uptime_seconds: u64,
    pub api_version: String,
}
