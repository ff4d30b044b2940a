//! Commodity market price models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit assumed when the upstream record does not state one
pub const DEFAULT_PRICE_UNIT: &str = "₹/quintal";

/// A single normalized price observation from a market
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub commodity: String,
    pub state: String,
    pub district: String,
    pub block: String,
    pub mandi: String,
    pub unit: String,
    pub date: Option<String>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub modal: Option<Decimal>,
    /// Upstream record as received
    pub raw: serde_json::Value,
}

impl PriceRecord {
    /// Observation date, when it can be read
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_price_date)
    }
}

/// Parse the date formats seen in price feeds
pub fn parse_price_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Sort records newest first; undated records go last
pub fn sort_newest_first(records: &mut [PriceRecord]) {
    records.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
}

/// A commodity known to the price API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commodity {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub raw: serde_json::Value,
}

/// A district within a state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct District {
    pub id: String,
    pub name: String,
}

/// A state and its districts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateGeography {
    pub id: String,
    pub name: String,
    pub districts: Vec<District>,
}

/// Geography tree used to resolve state and district names
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Geographies {
    pub states: Vec<StateGeography>,
}

/// A market (mandi)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Market {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub raw: serde_json::Value,
}

/// Aggregation level of a price query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceLevel {
    National,
    State,
    District,
    Market,
}

impl PriceLevel {
    /// The most specific level for which a value was given
    pub fn infer(state: Option<&str>, district: Option<&str>, market: Option<&str>) -> Self {
        let given = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
        if given(market) {
            PriceLevel::Market
        } else if given(district) {
            PriceLevel::District
        } else if given(state) {
            PriceLevel::State
        } else {
            PriceLevel::National
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceLevel::National => "national",
            PriceLevel::State => "state",
            PriceLevel::District => "district",
            PriceLevel::Market => "market",
        }
    }
}

/// Find a commodity by name: exact case-insensitive match first, then substring
pub fn find_commodity<'a>(items: &'a [Commodity], name: &str) -> Option<&'a Commodity> {
    let needle = name.trim().to_lowercase();
    items
        .iter()
        .find(|c| c.name.to_lowercase() == needle)
        .or_else(|| items.iter().find(|c| c.name.to_lowercase().contains(&needle)))
}

impl Geographies {
    /// Find a state by name: exact case-insensitive match first, then substring
    pub fn find_state(&self, name: &str) -> Option<&StateGeography> {
        let needle = name.trim().to_lowercase();
        self.states
            .iter()
            .find(|s| s.name.to_lowercase() == needle)
            .or_else(|| self.states.iter().find(|s| s.name.to_lowercase().contains(&needle)))
    }
}

impl StateGeography {
    /// Find a district by name: exact case-insensitive match first, then substring
    pub fn find_district(&self, name: &str) -> Option<&District> {
        let needle = name.trim().to_lowercase();
        self.districts
            .iter()
            .find(|d| d.name.to_lowercase() == needle)
            .or_else(|| self.districts.iter().find(|d| d.name.to_lowercase().contains(&needle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: Option<&str>) -> PriceRecord {
        PriceRecord {
            commodity: "Wheat".into(),
            state: String::new(),
            district: String::new(),
            block: String::new(),
            mandi: String::new(),
            unit: DEFAULT_PRICE_UNIT.into(),
            date: date.map(String::from),
            min: None,
            max: None,
            modal: None,
            raw: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_parse_price_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_price_date("2024-03-09"), expected);
        assert_eq!(parse_price_date("09/03/2024"), expected);
        assert_eq!(parse_price_date("2024-03-09T10:00:00Z"), expected);
        assert_eq!(parse_price_date("2024-03-09 10:00:00"), expected);
        assert_eq!(parse_price_date("yesterday"), None);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut records = vec![
            record(Some("2024-01-01")),
            record(None),
            record(Some("2024-02-01")),
        ];
        sort_newest_first(&mut records);
        assert_eq!(records[0].date.as_deref(), Some("2024-02-01"));
        assert_eq!(records[1].date.as_deref(), Some("2024-01-01"));
        assert_eq!(records[2].date, None);
    }

    #[test]
    fn test_infer_level() {
        assert_eq!(PriceLevel::infer(None, None, None), PriceLevel::National);
        assert_eq!(PriceLevel::infer(Some("Punjab"), None, None), PriceLevel::State);
        assert_eq!(
            PriceLevel::infer(Some("Punjab"), Some("Ludhiana"), None),
            PriceLevel::District
        );
        assert_eq!(
            PriceLevel::infer(Some("Punjab"), Some(""), Some("Khanna")),
            PriceLevel::Market
        );
    }

    #[test]
    fn test_find_commodity_prefers_exact() {
        let items = vec![
            Commodity { id: "1".into(), name: "Paddy(Dhan)".into(), raw: serde_json::Value::Null },
            Commodity { id: "2".into(), name: "Dhan".into(), raw: serde_json::Value::Null },
        ];
        assert_eq!(find_commodity(&items, "dhan").map(|c| c.id.as_str()), Some("2"));
        assert_eq!(find_commodity(&items, "paddy").map(|c| c.id.as_str()), Some("1"));
        assert!(find_commodity(&items, "cotton").is_none());
    }

    #[test]
    fn test_find_state_and_district() {
        let geos = Geographies {
            states: vec![StateGeography {
                id: "27".into(),
                name: "Maharashtra".into(),
                districts: vec![
                    District { id: "1".into(), name: "Pune".into() },
                    District { id: "2".into(), name: "Pune Rural".into() },
                ],
            }],
        };
        let state = geos.find_state("maharashtra").unwrap();
        assert_eq!(state.id, "27");
        assert_eq!(state.find_district("PUNE").unwrap().id, "1");
        assert_eq!(state.find_district("rural").unwrap().id, "2");
        assert!(geos.find_state("Kerala").is_none());
    }
}
