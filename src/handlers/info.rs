use crate::router::BuddyState;
use crate::types::info::{ApiInfo, HealthResponse};
use axum::{Json, extract::State};
use chrono::Utc;

pub const ENDPOINTS: &[&str] = &[
    "GET /",
    "GET /health",
    "POST /api/create_link_token",
    "POST /api/exchange_and_create_accounts",
];

/// GET /health
pub async fn health(State(state): State<BuddyState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        environment: state.environment.to_string(),
    })
}

/// GET /
pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Money Buddy Backend API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}
