//! CEDA market price API client
//!
//! The upstream's auth scheme, request field names and response shapes are
//! all inconsistent, so each call walks a list of variants:
//! - key placements (see [`auth`]), with a small retry budget for throttling
//! - request body spellings for markets and prices
//! - response shapes (see [`shapes`])
//!
//! Commodity, geography and market lists are cached for `cache_ttl_secs`.

pub mod auth;
pub mod cache;
pub mod shapes;

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use reqwest::{header::RETRY_AFTER, Client, Method};
use serde_json::{json, Map, Value};
use shared::models::{
    find_commodity, Commodity, Geographies, Market, PriceLevel, PriceRecord,
};

use crate::config::CedaConfig;
use crate::error::{AppError, AppResult};

use self::auth::{auth_variants, next_step, throttle_delay, NextStep};
use self::cache::TtlCache;

/// Statuses on which a cached list is served instead of failing
const STALE_OK_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Statuses after which the next request body spelling is tried
const TRY_NEXT_BODY_STATUSES: [u16; 3] = [400, 401, 422];

/// Default price window when no start date is given
const DEFAULT_WINDOW_DAYS: i64 = 60;

pub fn is_stale_ok(err: &AppError) -> bool {
    err.upstream_status()
        .is_some_and(|status| STALE_OK_STATUSES.contains(&status))
}

fn tries_next_body(err: &AppError) -> bool {
    err.upstream_status()
        .is_some_and(|status| TRY_NEXT_BODY_STATUSES.contains(&status))
}

/// IDs identifying a market list
#[derive(Debug, Clone)]
pub struct MarketQuery {
    pub commodity_id: String,
    pub state_id: String,
    pub district_id: Option<String>,
}

impl MarketQuery {
    fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.commodity_id,
            self.state_id,
            self.district_id.as_deref().unwrap_or_default()
        )
    }
}

/// Price search by names and/or IDs
#[derive(Debug, Clone, Default)]
pub struct PriceQuery {
    pub crop: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub market: Option<String>,
    pub commodity_id: Option<String>,
    pub state_id: Option<String>,
    pub district_id: Option<String>,
    pub market_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: u32,
}

/// Outcome of the last failed attempt in an auth walk
enum LastFailure {
    Http { status: u16, body: Value },
    Transport(String),
}

pub struct CedaClient {
    client: Client,
    config: CedaConfig,
    commodities: TtlCache<(), Vec<Commodity>>,
    geographies: TtlCache<(), Geographies>,
    markets: TtlCache<String, Vec<Market>>,
}

impl CedaClient {
    pub fn new(config: &CedaConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build CEDA client: {}", e)))?;
        let ttl = Duration::from_secs(config.cache_ttl_secs);

        if !config.is_configured() {
            tracing::warn!("CEDA API key is not set. Price endpoints will fail until configured.");
        }

        Ok(Self {
            client,
            config: config.clone(),
            commodities: TtlCache::new(ttl),
            geographies: TtlCache::new(ttl),
            markets: TtlCache::new(ttl),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn key(&self) -> AppResult<&str> {
        self.config.key().ok_or_else(|| {
            AppError::NotConfigured("CEDA API not configured: missing CROP__CEDA__API_KEY".to_string())
        })
    }

    /// Send one request, walking auth placements until one is accepted
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> AppResult<Value> {
        let key = self.key()?;
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let variants = auth_variants(key, &self.config.api_key_header, &self.config.api_key_query);

        let mut attempt = 0u32;
        let mut last: Option<LastFailure> = None;

        'variants: for variant in &variants {
            loop {
                tracing::debug!("CEDA {} {} via {:?}", method, path, variant_label(variant));

                let mut request = self
                    .client
                    .request(method.clone(), &url)
                    .header("Accept", "application/json");
                if let Some(body) = body {
                    request = request.json(body);
                }

                let response = match variant.apply(request).send().await {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::warn!("CEDA {} {} transport error: {}", method, path, e);
                        last = Some(LastFailure::Transport(e.to_string()));
                        continue 'variants;
                    }
                };

                let status = response.status();
                if status.is_success() {
                    return response.json::<Value>().await.map_err(|e| AppError::PriceApi {
                        status: 502,
                        message: format!("CEDA {} {} returned invalid JSON: {}", method, path, e),
                    });
                }

                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let text = response.text().await.unwrap_or_default();
                let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
                tracing::warn!("CEDA {} {} returned {}", method, path, status);
                last = Some(LastFailure::Http {
                    status: status.as_u16(),
                    body,
                });

                match next_step(status) {
                    NextStep::RetrySameVariant if attempt < self.config.max_throttle_retries => {
                        let delay = throttle_delay(attempt, retry_after.as_deref());
                        attempt += 1;
                        tokio::time::sleep(delay).await;
                    }
                    NextStep::NextVariant => continue 'variants,
                    _ => break 'variants,
                }
            }
        }

        Err(match last {
            Some(LastFailure::Http { status, body }) => AppError::PriceApi {
                status,
                message: format!(
                    "CEDA {} {} failed ({}): {}",
                    method,
                    path,
                    status,
                    shapes::error_message(&body).unwrap_or_else(|| "CEDA request failed".into())
                ),
            },
            Some(LastFailure::Transport(reason)) => {
                tracing::debug!("CEDA {} {} gave no response: {}", method, path, reason);
                AppError::PriceApi {
                    status: 502,
                    message: "CEDA request failed".to_string(),
                }
            }
            None => AppError::PriceApi {
                status: 502,
                message: "CEDA request failed".to_string(),
            },
        })
    }

    // ========================================================================
    // Reference lists
    // ========================================================================

    pub async fn commodities(&self, refresh: bool) -> AppResult<Vec<Commodity>> {
        if !refresh {
            if let Some(items) = self.commodities.get_fresh(&()).await {
                return Ok(items);
            }
        }

        let data = match self
            .request(Method::GET, &self.config.commodities_endpoint, None)
            .await
        {
            Ok(data) => data,
            Err(err) => {
                if is_stale_ok(&err) {
                    if let Some(items) = self.commodities.get_stale(&()).await {
                        tracing::info!("Serving stale commodity list after upstream error");
                        return Ok(items);
                    }
                }
                return Err(err);
            }
        };

        let items = shapes::normalize_commodities(&data);
        if !items.is_empty() {
            self.commodities.insert((), items.clone()).await;
        }
        Ok(items)
    }

    pub async fn geographies(&self, refresh: bool) -> AppResult<Geographies> {
        if !refresh {
            if let Some(geo) = self.geographies.get_fresh(&()).await {
                return Ok(geo);
            }
        }

        let data = match self
            .request(Method::GET, &self.config.geographies_endpoint, None)
            .await
        {
            Ok(data) => data,
            Err(err) => {
                if is_stale_ok(&err) {
                    if let Some(geo) = self.geographies.get_stale(&()).await {
                        tracing::info!("Serving stale geographies after upstream error");
                        return Ok(geo);
                    }
                }
                return Err(err);
            }
        };

        let geo = shapes::normalize_geographies(&data);
        self.geographies.insert((), geo.clone()).await;
        Ok(geo)
    }

    pub async fn markets(&self, query: &MarketQuery, refresh: bool) -> AppResult<Vec<Market>> {
        let cache_key = query.cache_key();
        if !refresh {
            if let Some(markets) = self.markets.get_fresh(&cache_key).await {
                return Ok(markets);
            }
        }

        let commodity = shapes::id_value(&query.commodity_id);
        let state = shapes::id_value(&query.state_id);
        let district = query.district_id.as_deref().map(shapes::id_value);

        let bodies = [
            ("commodity_id", "state_id", "district_id"),
            ("commodityId", "stateId", "districtId"),
            ("commodity", "state", "district"),
        ]
        .map(|(c, s, d)| {
            let mut body = Map::new();
            body.insert(c.to_string(), commodity.clone());
            body.insert(s.to_string(), state.clone());
            if let Some(district) = &district {
                body.insert(d.to_string(), district.clone());
            }
            Value::Object(body)
        });

        let mut last_err = None;
        for body in &bodies {
            match self
                .request(Method::POST, &self.config.markets_endpoint, Some(body))
                .await
            {
                Ok(data) => {
                    let markets = shapes::normalize_markets(&data);
                    self.markets.insert(cache_key, markets.clone()).await;
                    return Ok(markets);
                }
                Err(err) => {
                    let keep_trying = tries_next_body(&err);
                    last_err = Some(err);
                    if !keep_trying {
                        break;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| AppError::PriceApi {
            status: 502,
            message: "CEDA markets request failed".to_string(),
        }))
    }

    // ========================================================================
    // Name resolution
    // ========================================================================

    async fn resolve_commodity_id(&self, name: Option<&str>) -> AppResult<String> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| prices_error(400, "Commodity name is required"))?;

        let items = self.commodities(false).await?;
        find_commodity(&items, name)
            .map(|c| c.id.clone())
            .ok_or_else(|| prices_error(404, &format!("Unknown commodity: {}", name)))
    }

    async fn resolve_geo_ids(
        &self,
        state: Option<&str>,
        district: Option<&str>,
    ) -> AppResult<(Option<String>, Option<String>)> {
        let state_name = state.map(str::trim).unwrap_or_default();
        let district_name = district.map(str::trim).filter(|d| !d.is_empty());
        if state_name.is_empty() {
            return Ok((None, None));
        }

        let geo = self.geographies(false).await?;
        let state_entry = geo
            .find_state(state_name)
            .ok_or_else(|| prices_error(404, &format!("Unknown state: {}", state_name)))?;

        let district_id = match district_name {
            Some(name) => Some(
                state_entry
                    .find_district(name)
                    .map(|d| d.id.clone())
                    .ok_or_else(|| {
                        prices_error(
                            404,
                            &format!("Unknown district: {} (state: {})", name, state_name),
                        )
                    })?,
            ),
            None => None,
        };

        Ok((Some(state_entry.id.clone()), district_id))
    }

    // ========================================================================
    // Prices
    // ========================================================================

    /// Search prices, resolving names to IDs where IDs are not supplied
    pub async fn prices(&self, query: &PriceQuery) -> AppResult<Vec<PriceRecord>> {
        let commodity_id = match &query.commodity_id {
            Some(id) => id.clone(),
            None => self.resolve_commodity_id(query.crop.as_deref()).await?,
        };
        let (state_id, district_id) = if query.state_id.is_some() || query.district_id.is_some() {
            (query.state_id.clone(), query.district_id.clone())
        } else {
            self.resolve_geo_ids(query.state.as_deref(), query.district.as_deref())
                .await?
        };

        let today = Utc::now().date_naive();
        let start = query
            .from
            .unwrap_or_else(|| today - chrono::Duration::days(DEFAULT_WINDOW_DAYS));
        let end = query.to.unwrap_or(today);

        let level = PriceLevel::infer(
            query.state.as_deref().or(state_id.as_deref()),
            query.district.as_deref().or(district_id.as_deref()),
            query.market.as_deref().or(query.market_id.as_deref()),
        );

        let ids = ResolvedIds {
            commodity: shapes::id_value(&commodity_id),
            state: state_id.as_deref().map(shapes::id_value),
            district: district_id.as_deref().map(shapes::id_value),
            market: query.market_id.as_deref().map(shapes::id_value),
        };
        let bodies = price_bodies(&ids, level, start, end, query.limit);

        let mut last_err = None;
        for body in &bodies {
            match self
                .request(Method::POST, &self.config.prices_endpoint, Some(body))
                .await
            {
                Ok(data) => {
                    let mut records = shapes::normalize_records(&data);
                    if !records.is_empty() {
                        records.truncate(query.limit as usize);
                        return Ok(records);
                    }
                }
                Err(err) => {
                    let keep_trying = tries_next_body(&err);
                    last_err = Some(err);
                    if !keep_trying {
                        break;
                    }
                }
            }
        }

        match last_err {
            Some(err) => {
                let status = err.upstream_status().unwrap_or(502);
                Err(prices_error(status, &err.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Upstream identifiers in request form
pub struct ResolvedIds {
    pub commodity: Value,
    pub state: Option<Value>,
    pub district: Option<Value>,
    pub market: Option<Value>,
}

/// Request body spellings for a price search, in the order they are tried
pub fn price_bodies(
    ids: &ResolvedIds,
    level: PriceLevel,
    start: NaiveDate,
    end: NaiveDate,
    limit: u32,
) -> Vec<Value> {
    let start = start.format("%Y-%m-%d").to_string();
    let end = end.format("%Y-%m-%d").to_string();

    let build = |keys: [&str; 4], dates: [&str; 2], extra: Option<(&str, Value)>, with_local: bool| {
        let mut body = Map::new();
        body.insert("limit".into(), json!(limit));
        body.insert("sort".into(), json!("desc"));
        if let Some((k, v)) = extra {
            body.insert(k.into(), v);
        }
        body.insert(keys[0].into(), ids.commodity.clone());
        if let Some(state) = &ids.state {
            body.insert(keys[1].into(), state.clone());
        }
        if with_local {
            if let Some(district) = &ids.district {
                body.insert(keys[2].into(), district.clone());
            }
            if let Some(market) = &ids.market {
                body.insert(keys[3].into(), market.clone());
            }
        }
        body.insert(dates[0].into(), json!(start));
        body.insert(dates[1].into(), json!(end));
        Value::Object(body)
    };

    let snake = ["commodity_id", "state_id", "district_id", "market_id"];
    vec![
        build(snake, ["start_date", "end_date"], None, true),
        build(["commodityId", "stateId", "districtId", "marketId"], ["start", "end"], None, true),
        build(snake, ["from", "to"], None, true),
        build(["commodity", "state", "district", "market"], ["start_date", "end_date"], None, true),
        build(
            snake,
            ["start_date", "end_date"],
            Some(("level", json!(level.as_str()))),
            false,
        ),
    ]
}

fn prices_error(status: u16, message: &str) -> AppError {
    AppError::PriceApi {
        status,
        message: format!("CEDA prices request failed ({}): {}", status, message),
    }
}

fn variant_label(variant: &auth::AuthVariant) -> String {
    match variant {
        auth::AuthVariant::Header { name, .. } => format!("header {}", name),
        auth::AuthVariant::Query { name, .. } => format!("query {}", name),
    }
}
