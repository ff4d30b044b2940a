//! Normalization of price API payloads
//!
//! The upstream nests its lists under varying keys and sometimes returns
//! id→name maps instead of arrays. Everything here is pure so the shape
//! handling can be tested without network access.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use shared::models::{
    Commodity, District, Geographies, Market, PriceRecord, StateGeography, DEFAULT_PRICE_UNIT,
};

const COMMODITY_ID_KEYS: &[&str] = &["id", "commodity_id", "commodityId", "code", "value", "_id", "uid"];
const COMMODITY_NAME_KEYS: &[&str] = &[
    "name",
    "commodity",
    "commodity_name",
    "label",
    "short_name",
    "display",
    "text",
    "title",
];
const STATE_ID_KEYS: &[&str] = &["id", "state_id", "stateId", "code", "value"];
const STATE_NAME_KEYS: &[&str] = &["name", "state", "state_name"];
const DISTRICT_ID_KEYS: &[&str] = &["id", "district_id", "districtId", "code", "value"];
const DISTRICT_NAME_KEYS: &[&str] = &["name", "district", "district_name"];
const MARKET_ID_KEYS: &[&str] = &["id", "market_id", "marketId", "code", "value"];
const MARKET_NAME_KEYS: &[&str] = &["name", "market", "market_name", "label"];

/// JS-style truthiness, used to pick the first meaningful candidate
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Turn an array or an object map into a list of entries.
///
/// Map values that are not objects become `{ id: key, name: value }`.
pub fn to_entries(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(key, val)| match val {
                Value::Object(_) | Value::Array(_) => val.clone(),
                other => json!({ "id": key, "name": scalar_to_string(other), "value": other }),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First candidate key holding a usable identifier
pub fn pick_id(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match entry.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First candidate key holding a non-empty string
pub fn pick_name(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Identifier as sent back upstream: numeric when it looks numeric
pub fn id_value(id: &str) -> Value {
    id.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.to_string()))
}

// ============================================================================
// Commodities
// ============================================================================

pub fn normalize_commodities(data: &Value) -> Vec<Commodity> {
    let candidates = [
        data.get("commodities"),
        data.pointer("/data/commodities"),
        data.get("results"),
        data.get("items"),
        data.get("payload"),
        data.get("list"),
        data.get("data"),
        Some(data),
    ];

    let entries = candidates
        .into_iter()
        .flatten()
        .map(to_entries)
        .find(|entries| !entries.is_empty())
        .unwrap_or_default();

    entries
        .into_iter()
        .filter_map(|entry| {
            let id = pick_id(&entry, COMMODITY_ID_KEYS)?;
            let name = pick_name(&entry, COMMODITY_NAME_KEYS)?;
            Some(Commodity {
                id,
                name,
                raw: entry,
            })
        })
        .collect()
}

// ============================================================================
// Geographies
// ============================================================================

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Look up the first of `names` ignoring case and punctuation
fn get_loose<'a>(obj: &'a Value, names: &[&str]) -> Option<&'a Value> {
    let map: &Map<String, Value> = obj.as_object()?;
    names.iter().find_map(|name| {
        let wanted = normalize_key(name);
        map.iter()
            .find(|(key, _)| normalize_key(key) == wanted)
            .map(|(_, value)| value)
            .filter(|value| !value.is_null())
    })
}

pub fn normalize_geographies(data: &Value) -> Geographies {
    let root = ["geographies", "data", "output", "payload"]
        .iter()
        .find_map(|key| data.get(key).filter(|v| !v.is_null()))
        .unwrap_or(data);

    let raw_states = get_loose(root, &["states", "state", "states_list", "state_list"]).unwrap_or(root);

    let states = to_entries(raw_states)
        .iter()
        .filter_map(|state| {
            let id = pick_id(state, STATE_ID_KEYS)?;
            let name = pick_name(state, STATE_NAME_KEYS)?;
            let districts = get_loose(
                state,
                &["districts", "district", "districts_list", "district_list", "children"],
            )
            .map(to_entries)
            .unwrap_or_default()
            .iter()
            .filter_map(|district| {
                Some(District {
                    id: pick_id(district, DISTRICT_ID_KEYS)?,
                    name: pick_name(district, DISTRICT_NAME_KEYS)?,
                })
            })
            .collect();

            Some(StateGeography {
                id,
                name,
                districts,
            })
        })
        .collect();

    Geographies { states }
}

// ============================================================================
// Markets
// ============================================================================

pub fn normalize_markets(data: &Value) -> Vec<Market> {
    let candidate = ["results", "data", "items"]
        .iter()
        .find_map(|key| data.get(key).filter(|v| !v.is_null()))
        .unwrap_or(data);

    to_entries(candidate)
        .into_iter()
        .filter_map(|entry| {
            let id = pick_id(&entry, MARKET_ID_KEYS)?;
            let name = pick_name(&entry, MARKET_NAME_KEYS)?;
            Some(Market {
                id,
                name,
                raw: entry,
            })
        })
        .collect()
}

// ============================================================================
// Price records
// ============================================================================

/// Rows of a price response: `results`, else `data`, else the root, if it is an array
pub fn price_rows(data: &Value) -> &[Value] {
    let list = ["results", "data"]
        .iter()
        .find_map(|key| data.get(key).filter(|v| is_truthy(v)))
        .unwrap_or(data);
    list.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn first_text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(key))
        .find(|value| is_truthy(value))
        .map(scalar_to_string)
}

/// First non-null candidate read as a positive amount
fn first_amount(record: &Value, keys: &[&str]) -> Option<Decimal> {
    let value = keys
        .iter()
        .filter_map(|key| record.get(key))
        .find(|value| !value.is_null())?;

    let amount = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64_retain)),
        Value::String(s) => Decimal::from_str(s.trim().replace(',', "").as_str()).ok(),
        _ => None,
    }?;

    Some(amount).filter(|a| !a.is_zero())
}

pub fn normalize_record(record: &Value) -> Option<PriceRecord> {
    if !record.is_object() {
        return None;
    }

    let text = |keys: &[&str]| first_text(record, keys).unwrap_or_default();

    Some(PriceRecord {
        commodity: text(&["commodity", "crop", "product"]),
        state: text(&["state", "state_name"]),
        district: text(&["district", "district_name"]),
        block: text(&["block", "block_name", "subdistrict"]),
        mandi: text(&["mandi", "market", "market_name"]),
        unit: first_text(record, &["unit", "price_unit"])
            .unwrap_or_else(|| DEFAULT_PRICE_UNIT.to_string()),
        date: first_text(record, &["date", "reported_on", "arrival_date", "timestamp"]),
        min: first_amount(record, &["min_price", "min", "minimum"]),
        max: first_amount(record, &["max_price", "max", "maximum"]),
        modal: first_amount(record, &["modal_price", "modal", "average"]),
        raw: record.clone(),
    })
}

/// Normalize every row, newest first
pub fn normalize_records(data: &Value) -> Vec<PriceRecord> {
    let mut records: Vec<PriceRecord> = price_rows(data).iter().filter_map(normalize_record).collect();
    shared::models::sort_newest_first(&mut records);
    records
}

/// Human-readable message from an upstream error body
pub fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => ["message", "error"]
            .iter()
            .find_map(|key| other.get(key).filter(|v| is_truthy(v)).map(scalar_to_string))
            .or_else(|| Some(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_commodities_nested_array() {
        let data = json!({
            "data": { "commodities": [
                { "commodity_id": 1, "commodity_name": "Wheat" },
                { "commodity_id": 2, "commodity_name": "Rice" },
                { "commodity_id": 3 }
            ]}
        });
        let items = normalize_commodities(&data);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "1");
        assert_eq!(items[1].name, "Rice");
    }

    #[test]
    fn test_commodities_object_map() {
        let data = json!({ "payload": { "17": "Onion", "23": "Potato" } });
        let items = normalize_commodities(&data);
        assert_eq!(items.len(), 2);
        assert!(items.iter().any(|c| c.id == "17" && c.name == "Onion"));
    }

    #[test]
    fn test_commodities_skip_empty_candidates() {
        let data = json!({ "commodities": [], "results": [{ "id": "w", "label": "Wheat" }] });
        let items = normalize_commodities(&data);
        assert_eq!(items[0].name, "Wheat");
    }

    #[test]
    fn test_geographies_loose_keys() {
        let data = json!({
            "data": {
                "States_List": [
                    {
                        "state_id": 27,
                        "state_name": "Maharashtra",
                        "District-List": [
                            { "district_id": 1, "district_name": "Pune" },
                            { "district_name": "Nameless" }
                        ]
                    },
                    { "state_name": "No id" }
                ]
            }
        });
        let geo = normalize_geographies(&data);
        assert_eq!(geo.states.len(), 1);
        assert_eq!(geo.states[0].id, "27");
        assert_eq!(geo.states[0].districts.len(), 1);
        assert_eq!(geo.states[0].districts[0].name, "Pune");
    }

    #[test]
    fn test_geographies_children() {
        let data = json!([
            { "id": "MH", "name": "Maharashtra", "children": { "1": "Pune" } }
        ]);
        let geo = normalize_geographies(&data);
        assert_eq!(geo.states[0].districts[0].id, "1");
    }

    #[test]
    fn test_markets() {
        let data = json!({ "results": [
            { "market_id": 5, "market_name": "Lasalgaon" },
            { "market_id": 6 }
        ]});
        let markets = normalize_markets(&data);
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].name, "Lasalgaon");
    }

    #[test]
    fn test_record_field_fallbacks() {
        let raw = json!({
            "crop": "Onion",
            "state_name": "Maharashtra",
            "market_name": "Lasalgaon",
            "arrival_date": "2024-03-02",
            "min_price": "1200",
            "max": 1800.5,
            "modal_price": 0
        });
        let record = normalize_record(&raw).unwrap();
        assert_eq!(record.commodity, "Onion");
        assert_eq!(record.mandi, "Lasalgaon");
        assert_eq!(record.unit, DEFAULT_PRICE_UNIT);
        assert_eq!(record.date.as_deref(), Some("2024-03-02"));
        assert_eq!(record.min, Some(dec("1200")));
        assert_eq!(record.max, Some(dec("1800.5")));
        assert_eq!(record.modal, None);
        assert_eq!(record.raw, raw);
    }

    #[test]
    fn test_records_sorted_newest_first() {
        let data = json!({ "data": [
            { "commodity": "Wheat", "date": "2024-01-01" },
            { "commodity": "Wheat" },
            { "commodity": "Wheat", "date": "2024-02-01" },
            null
        ]});
        let records = normalize_records(&data);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date.as_deref(), Some("2024-02-01"));
        assert_eq!(records[2].date, None);
    }

    #[test]
    fn test_price_rows_non_array() {
        assert!(price_rows(&json!({ "results": { "a": 1 } })).is_empty());
        assert_eq!(price_rows(&json!([{}, {}])).len(), 2);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(&json!({"message": "bad key"})).as_deref(), Some("bad key"));
        assert_eq!(error_message(&json!({"error": "nope"})).as_deref(), Some("nope"));
        assert_eq!(error_message(&json!({"detail": "x"})).as_deref(), Some(r#"{"detail":"x"}"#));
        assert_eq!(error_message(&Value::Null), None);
    }

    #[test]
    fn test_id_value() {
        assert_eq!(id_value("27"), json!(27));
        assert_eq!(id_value("MH"), json!("MH"));
    }
}
