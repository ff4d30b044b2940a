//! Authentication and account handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::models::User;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::auth::{AuthResponse, AuthTokens, RegisterInput, UpdateProfileInput};
use crate::services::AuthService;
use crate::AppState;

use super::parse_id;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Register endpoint handler
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let result = auth_service.register(body).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let result = auth_service.login(&body.email, &body.password).await?;
    Ok(Json(result))
}

/// Refresh token endpoint handler
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<AuthTokens>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.refresh_token(&body.refresh_token).await?;
    Ok(Json(tokens))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<User>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    Ok(Json(auth_service.profile(user.user_id).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileInput>,
) -> AppResult<Json<User>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    Ok(Json(auth_service.update_profile(user.user_id, body).await?))
}

/// List all accounts (admin)
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let users = auth_service.list_users().await?;
    Ok(Json(json!({ "users": users, "total": users.len() })))
}

/// Delete an account (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Value>> {
    let user_id = parse_id(&user_id)?;
    if user.user_id == user_id {
        return Err(AppError::ValidationError(
            "Administrators cannot delete their own account".to_string(),
        ));
    }

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    auth_service.delete_user(user_id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
