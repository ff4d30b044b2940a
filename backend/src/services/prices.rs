//! Market price lookups backed by the CEDA client

use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{Commodity, Geographies, Market, PriceRecord};

use crate::error::{AppError, AppResult};
use crate::external::ceda::{is_stale_ok, CedaClient, MarketQuery, PriceQuery};

/// Records requested for a "current price" lookup
pub const CURRENT_PRICE_LIMIT: u32 = 10;
/// Default number of records in a price history
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Name-based price lookup
#[derive(Debug, Clone, Default)]
pub struct PriceLookup {
    pub crop: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    /// Accepted for compatibility; the upstream has no block filter
    pub block: Option<String>,
    pub limit: Option<u32>,
}

impl PriceLookup {
    fn has_any_filter(&self) -> bool {
        [&self.crop, &self.state, &self.district, &self.block]
            .iter()
            .any(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    fn to_query(&self, limit: u32) -> PriceQuery {
        PriceQuery {
            crop: self.crop.clone(),
            state: self.state.clone(),
            district: self.district.clone(),
            limit,
            ..Default::default()
        }
    }
}

/// ID-based price search
#[derive(Debug, Clone, Default)]
pub struct PriceSearch {
    pub commodity_id: Option<String>,
    pub state_id: Option<String>,
    pub district_id: Option<String>,
    pub market_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u32>,
}

pub struct PriceService {
    ceda: Arc<CedaClient>,
}

fn required_id(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn ids_required() -> AppError {
    AppError::ValidationError("commodityId and stateId are required".to_string())
}

impl PriceService {
    pub fn new(ceda: Arc<CedaClient>) -> Self {
        Self { ceda }
    }

    fn check_lookup(&self, lookup: &PriceLookup) -> AppResult<()> {
        if !self.ceda.is_configured() {
            return Err(AppError::NotConfigured(
                "CEDA API not configured. Set CROP__CEDA__API_KEY in server environment.".to_string(),
            ));
        }
        if !lookup.has_any_filter() {
            return Err(AppError::ValidationError(
                "Provide at least one of: crop, state, district, block".to_string(),
            ));
        }
        Ok(())
    }

    /// Most recent price record, if any
    pub async fn current(&self, lookup: &PriceLookup) -> AppResult<Option<PriceRecord>> {
        self.check_lookup(lookup)?;
        let records = self
            .ceda
            .prices(&lookup.to_query(CURRENT_PRICE_LIMIT))
            .await?;
        Ok(records.into_iter().next())
    }

    pub async fn history(&self, lookup: &PriceLookup) -> AppResult<Vec<PriceRecord>> {
        self.check_lookup(lookup)?;
        let limit = lookup
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.ceda.prices(&lookup.to_query(limit)).await
    }

    /// Commodity list; upstream throttling or outage yields an empty list
    pub async fn commodities(&self, refresh: bool) -> AppResult<Vec<Commodity>> {
        match self.ceda.commodities(refresh).await {
            Err(err) if is_stale_ok(&err) => {
                tracing::warn!("Commodity list unavailable: {}", err);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Geography tree; upstream throttling or outage yields no states
    pub async fn geographies(&self, refresh: bool) -> AppResult<Geographies> {
        match self.ceda.geographies(refresh).await {
            Err(err) if is_stale_ok(&err) => {
                tracing::warn!("Geographies unavailable: {}", err);
                Ok(Geographies::default())
            }
            other => other,
        }
    }

    pub async fn markets(
        &self,
        commodity_id: Option<String>,
        state_id: Option<String>,
        district_id: Option<String>,
        refresh: bool,
    ) -> AppResult<Vec<Market>> {
        let query = MarketQuery {
            commodity_id: required_id(&commodity_id).ok_or_else(ids_required)?,
            state_id: required_id(&state_id).ok_or_else(ids_required)?,
            district_id: required_id(&district_id),
        };
        self.ceda.markets(&query, refresh).await
    }

    pub async fn search_by_ids(&self, search: &PriceSearch) -> AppResult<Vec<PriceRecord>> {
        let query = PriceQuery {
            commodity_id: Some(required_id(&search.commodity_id).ok_or_else(ids_required)?),
            state_id: Some(required_id(&search.state_id).ok_or_else(ids_required)?),
            district_id: required_id(&search.district_id),
            market_id: required_id(&search.market_id),
            from: search.from,
            to: search.to,
            limit: search
                .limit
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_HISTORY_LIMIT),
            ..Default::default()
        };
        self.ceda.prices(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CedaConfig;

    fn service(api_key: Option<&str>) -> PriceService {
        let config = CedaConfig {
            api_key: api_key.map(String::from),
            base_url: "http://127.0.0.1:9".into(),
            prices_endpoint: "/agmarknet/prices".into(),
            commodities_endpoint: "/agmarknet/commodities".into(),
            geographies_endpoint: "/agmarknet/geographies".into(),
            markets_endpoint: "/agmarknet/markets".into(),
            api_key_header: "x-api-key".into(),
            api_key_query: "x-api-key".into(),
            cache_ttl_secs: 60,
            timeout_secs: 1,
            max_throttle_retries: 0,
        };
        PriceService::new(Arc::new(CedaClient::new(&config).unwrap()))
    }

    #[test]
    fn test_lookup_filters() {
        assert!(!PriceLookup::default().has_any_filter());
        let blank = PriceLookup {
            crop: Some("  ".into()),
            ..Default::default()
        };
        assert!(!blank.has_any_filter());
        let block_only = PriceLookup {
            block: Some("Haveli".into()),
            ..Default::default()
        };
        assert!(block_only.has_any_filter());
    }

    #[tokio::test]
    async fn test_current_requires_key() {
        let lookup = PriceLookup {
            crop: Some("Wheat".into()),
            ..Default::default()
        };
        let err = service(None).current(&lookup).await.unwrap_err();
        assert!(
            matches!(err, AppError::NotConfigured(msg) if msg.contains("Set CROP__CEDA__API_KEY"))
        );
    }

    #[tokio::test]
    async fn test_history_requires_a_filter() {
        let err = service(Some("key"))
            .history(&PriceLookup::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg.starts_with("Provide at least one")));
    }

    #[tokio::test]
    async fn test_markets_require_ids() {
        let err = service(Some("key"))
            .markets(Some("1".into()), Some(" ".into()), None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg == "commodityId and stateId are required"));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_yields_empty_lists() {
        let svc = service(Some("key"));
        let commodities = tokio_test::assert_ok!(svc.commodities(false).await);
        assert!(commodities.is_empty());
        let geographies = tokio_test::assert_ok!(svc.geographies(true).await);
        assert!(geographies.states.is_empty());
    }
}
