//! Crop recommendation handlers

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::models::RecommendationResult;
use shared::types::Pagination;

use crate::error::AppResult;
use crate::external::MlServiceClient;
use crate::middleware::{AuthUser, MaybeUser};
use crate::services::recommendation::{
    RecommendInput, RecommendationFilter, RecommendationPage, RecommendationRecord,
};
use crate::services::RecommendationService;
use crate::AppState;

use super::parse_id;

const HISTORY_PAGE_SIZE: u32 = 10;
const ADMIN_PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub crop: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub crop: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
    pub format: Option<String>, // json or csv
}

/// Recommend a crop for the submitted soil and climate readings
pub async fn recommend_crop(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(body): Json<RecommendInput>,
) -> AppResult<Json<RecommendationResult>> {
    let service = RecommendationService::new(state.db.clone());
    let ml = MlServiceClient::new(&state.config.ml_service);
    let result = service.recommend(&ml, user.as_ref(), body).await?;
    Ok(Json(result))
}

pub async fn recommendation_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<RecommendationPage>> {
    let service = RecommendationService::new(state.db.clone());
    let pagination = Pagination::from_query(query.page, query.limit, HISTORY_PAGE_SIZE);
    let page = service.history(&user, query.crop, &pagination).await?;
    Ok(Json(page))
}

pub async fn get_recommendation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> AppResult<Json<RecommendationRecord>> {
    let id = parse_id(&id)?;
    let service = RecommendationService::new(state.db.clone());
    Ok(Json(service.get_by_id(&user, id).await?))
}

pub async fn delete_recommendation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    let service = RecommendationService::new(state.db.clone());
    service.delete(&user, id).await?;
    Ok(Json(json!({ "message": "Recommendation deleted successfully" })))
}

/// List every recommendation (admin), optionally as CSV
pub async fn list_all_recommendations(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> AppResult<Response> {
    let service = RecommendationService::new(state.db.clone());

    let filter = RecommendationFilter {
        user_id: None,
        crop: query.crop,
        status: query.status.and_then(|s| s.parse().ok()),
        start_date: query.start_date.and_then(|s| s.parse().ok()),
        end_date: query.end_date.and_then(|s| s.parse().ok()),
    };
    let pagination = Pagination::from_query(query.page, query.limit, ADMIN_PAGE_SIZE);

    let page = service.list(&filter, &pagination).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = RecommendationService::export_to_csv(&page.recommendations)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"recommendations.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(page).into_response())
    }
}
