//! Health check and service banner handlers

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ErrorDetail, ErrorResponse};
use crate::external::MlServiceClient;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime_secs: u64,
    pub environment: String,
    pub database: String,
    pub ml_service: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    let ml_status = if MlServiceClient::new(&state.config.ml_service).health().await {
        "connected"
    } else {
        "unavailable"
    };

    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        environment: state.config.environment.clone(),
        database: db_status,
        ml_service: ml_status.to_string(),
    })
}

/// Model service status passthrough
pub async fn ml_status(State(state): State<AppState>) -> Json<Value> {
    Json(MlServiceClient::new(&state.config.ml_service).status().await)
}

/// Service banner listing the API surface
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Crop Advisor API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "auth": "/api/auth",
            "crops": "/api/crops",
            "farmAI": "/api/farm-ai",
            "prices": "/api/prices",
            "ceda": "/api/ceda",
            "ml": "/api/ml/status",
        }
    }))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!("No route for {}", uri.path());
    let error = ErrorResponse {
        error: ErrorDetail::new(
            "NOT_FOUND",
            format!("Route {} not found", uri.path()),
            format!("रूट {} नहीं मिला", uri.path()),
        ),
    };
    (StatusCode::NOT_FOUND, Json(error))
}

