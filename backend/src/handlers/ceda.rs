//! CEDA reference data and ID-based price search handlers

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use shared::models::parse_price_date;

use crate::error::{AppError, AppResult};
use crate::services::prices::PriceSearch;
use crate::services::PriceService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    pub refresh: Option<String>,
}

impl RefreshQuery {
    fn requested(&self) -> bool {
        self.refresh.as_deref() == Some("true")
    }
}

/// IDs arrive as JSON numbers or strings
fn flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketsRequest {
    #[serde(default, deserialize_with = "flexible_id")]
    pub commodity_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub state_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub district_id: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSearchRequest {
    #[serde(default, deserialize_with = "flexible_id")]
    pub commodity_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub state_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub district_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub market_id: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub limit: Option<u32>,
}

fn parse_date(field: &str, value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_price_date(raw)
            .map(Some)
            .ok_or_else(|| AppError::ValidationError(format!("Invalid {}: {}", field, raw))),
    }
}

impl PriceSearchRequest {
    fn into_search(self) -> AppResult<PriceSearch> {
        Ok(PriceSearch {
            from: parse_date("fromDate", self.from_date.as_deref())?,
            to: parse_date("toDate", self.to_date.as_deref())?,
            commodity_id: self.commodity_id,
            state_id: self.state_id,
            district_id: self.district_id,
            market_id: self.market_id,
            limit: self.limit,
        })
    }
}

pub async fn list_commodities(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> AppResult<Json<Value>> {
    let service = PriceService::new(state.ceda.clone());
    let commodities = service.commodities(query.requested()).await?;
    Ok(Json(json!({ "commodities": commodities })))
}

pub async fn list_geographies(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> AppResult<Json<Value>> {
    let service = PriceService::new(state.ceda.clone());
    let geographies = service.geographies(query.requested()).await?;
    Ok(Json(json!({ "geographies": geographies })))
}

pub async fn list_markets(
    State(state): State<AppState>,
    Json(body): Json<MarketsRequest>,
) -> AppResult<Json<Value>> {
    let service = PriceService::new(state.ceda.clone());
    let markets = service
        .markets(body.commodity_id, body.state_id, body.district_id, body.refresh)
        .await?;
    Ok(Json(json!({ "markets": markets })))
}

pub async fn search_prices_by_ids(
    State(state): State<AppState>,
    Json(body): Json<PriceSearchRequest>,
) -> AppResult<Json<Value>> {
    let service = PriceService::new(state.ceda.clone());
    let results = service.search_by_ids(&body.into_search()?).await?;
    Ok(Json(json!({ "results": results })))
}
