//! Price lookup handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::services::prices::PriceLookup;
use crate::services::PriceService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PriceQueryParams {
    pub crop: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub block: Option<String>,
    pub limit: Option<u32>,
}

impl From<PriceQueryParams> for PriceLookup {
    fn from(q: PriceQueryParams) -> Self {
        Self {
            crop: q.crop,
            state: q.state,
            district: q.district,
            block: q.block,
            limit: q.limit,
        }
    }
}

pub async fn current_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQueryParams>,
) -> AppResult<Json<Value>> {
    let service = PriceService::new(state.ceda.clone());
    let current = service.current(&query.into()).await?;
    Ok(Json(json!({ "current": current })))
}

pub async fn price_history(
    State(state): State<AppState>,
    Query(query): Query<PriceQueryParams>,
) -> AppResult<Json<Value>> {
    let service = PriceService::new(state.ceda.clone());
    let history = service.history(&query.into()).await?;
    Ok(Json(json!({ "history": history })))
}
