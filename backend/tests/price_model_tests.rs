//! Market price model tests
//!
//! Covers date parsing, ordering, level inference and name resolution.

use chrono::NaiveDate;
use proptest::prelude::*;
use shared::{
    find_commodity, parse_price_date, sort_newest_first, Commodity, PriceLevel, PriceRecord,
    DEFAULT_PRICE_UNIT,
};

fn record(date: Option<String>) -> PriceRecord {
    PriceRecord {
        commodity: "Onion".into(),
        state: "Maharashtra".into(),
        district: "Nashik".into(),
        block: String::new(),
        mandi: "Lasalgaon".into(),
        unit: DEFAULT_PRICE_UNIT.into(),
        date,
        min: None,
        max: None,
        modal: None,
        raw: serde_json::Value::Null,
    }
}

/// Generate calendar dates in a plausible range
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2035, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    /// ISO and day-first formats parse to the same date
    #[test]
    fn test_date_formats_agree(date in date_strategy()) {
        let iso = date.format("%Y-%m-%d").to_string();
        let day_first = date.format("%d/%m/%Y").to_string();
        prop_assert_eq!(parse_price_date(&iso), Some(date));
        prop_assert_eq!(parse_price_date(&day_first), Some(date));
    }

    /// Sorted records never have an older date before a newer one
    #[test]
    fn test_sort_is_newest_first(dates in proptest::collection::vec(proptest::option::of(date_strategy()), 0..20)) {
        let mut records: Vec<PriceRecord> = dates
            .iter()
            .map(|d| record(d.map(|d| d.format("%Y-%m-%d").to_string())))
            .collect();
        sort_newest_first(&mut records);

        let parsed: Vec<Option<NaiveDate>> = records.iter().map(|r| r.parsed_date()).collect();
        for pair in parsed.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }
}

#[cfg(test)]
mod level_tests {
    use super::*;

    #[test]
    fn test_blank_values_do_not_count() {
        assert_eq!(
            PriceLevel::infer(Some(" "), Some(""), None),
            PriceLevel::National
        );
        assert_eq!(PriceLevel::Market.as_str(), "market");
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PriceLevel::District).unwrap(),
            "\"district\""
        );
    }
}

#[cfg(test)]
mod resolution_tests {
    use super::*;

    fn commodity(id: &str, name: &str) -> Commodity {
        Commodity {
            id: id.into(),
            name: name.into(),
            raw: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_exact_match_beats_earlier_substring() {
        let items = vec![commodity("1", "Green Chilli"), commodity("2", "Chilli")];
        assert_eq!(find_commodity(&items, "CHILLI").unwrap().id, "2");
    }

    #[test]
    fn test_substring_fallback() {
        let items = vec![commodity("7", "Wheat (Atta)")];
        assert_eq!(find_commodity(&items, "wheat").unwrap().id, "7");
        assert!(find_commodity(&items, "barley").is_none());
    }
}
