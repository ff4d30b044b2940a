//! API key placement variants and throttle backoff
//!
//! The price API has documented its key under several names over time, so a
//! request walks a fixed list of header and query placements until one is
//! accepted.

use std::time::Duration;

use reqwest::StatusCode;

/// Where the key goes on a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthVariant {
    Header { name: String, value: String },
    Query { name: String, value: String },
}

impl AuthVariant {
    fn header(name: &str, value: String) -> Self {
        AuthVariant::Header {
            name: name.to_string(),
            value,
        }
    }

    fn query(name: &str, value: &str) -> Self {
        AuthVariant::Query {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            AuthVariant::Header { name, value } => request.header(name.as_str(), value.as_str()),
            AuthVariant::Query { name, value } => {
                request.query(&[(name.as_str(), value.as_str())])
            }
        }
    }
}

/// All placements in the order they are tried: headers first, then query parameters
pub fn auth_variants(key: &str, header_name: &str, query_name: &str) -> Vec<AuthVariant> {
    let mut variants: Vec<AuthVariant> = [
        "x-api-key",
        header_name,
        "X-API-Key",
        "X-API-KEY",
        "api-key",
        "apikey",
        "api_key",
    ]
    .iter()
    .map(|name| AuthVariant::header(name, key.to_string()))
    .collect();

    variants.push(AuthVariant::header("Authorization", format!("ApiKey {}", key)));
    variants.push(AuthVariant::header("Authorization", format!("Bearer {}", key)));

    variants.extend(
        [
            query_name,
            "x-api-key",
            "X-API-Key",
            "X-API-KEY",
            "api_key",
            "apikey",
            "api-key",
            "key",
        ]
        .iter()
        .map(|name| AuthVariant::query(name, key)),
    );

    variants
}

/// What to do after an HTTP error status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Throttled: retry the same variant if budget remains
    RetrySameVariant,
    /// Key rejected in this placement: try the next one
    NextVariant,
    /// Any other failure ends the search
    Stop,
}

pub fn next_step(status: StatusCode) -> NextStep {
    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
            NextStep::RetrySameVariant
        }
        StatusCode::UNAUTHORIZED => NextStep::NextVariant,
        _ => NextStep::Stop,
    }
}

/// Wait before retry `attempt` (0-based): 300ms doubled per attempt, or
/// longer if the server asked for it with `Retry-After` seconds
pub fn throttle_delay(attempt: u32, retry_after: Option<&str>) -> Duration {
    let backoff = Duration::from_millis(300u64.saturating_mul(1u64 << attempt.min(16)));
    let requested = retry_after
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
        .unwrap_or(Duration::ZERO);
    backoff.max(requested)
}
