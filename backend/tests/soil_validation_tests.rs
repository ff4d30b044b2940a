//! Soil and climate input validation tests
//!
//! Property-based and unit tests for:
//! - Range checks on the seven model inputs
//! - Violation ordering and messages
//! - Location and notes limits

use proptest::prelude::*;
use shared::{
    validate_location, validate_notes, validate_soil_form, validate_soil_input, Location,
    SoilForm, SoilParameters, SOIL_PARAMETER_RANGES,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate soil readings inside every accepted range
fn valid_soil_strategy() -> impl Strategy<Value = SoilParameters> {
    (
        0.0f64..=140.0,
        5.0f64..=145.0,
        5.0f64..=205.0,
        8.8f64..=43.7,
        14.0f64..=100.0,
        3.5f64..=10.0,
        20.0f64..=300.0,
    )
        .prop_map(|(n, p, k, temperature, humidity, ph, rainfall)| SoilParameters {
            n,
            p,
            k,
            temperature,
            humidity,
            ph,
            rainfall,
        })
}

fn sample_soil() -> SoilParameters {
    SoilParameters {
        n: 90.0,
        p: 42.0,
        k: 43.0,
        temperature: 20.8,
        humidity: 82.0,
        ph: 6.5,
        rainfall: 202.9,
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Readings inside every range always pass
    #[test]
    fn test_in_range_soil_is_valid(soil in valid_soil_strategy()) {
        prop_assert!(validate_soil_input(&soil).is_ok());
    }

    /// Nitrogen above 140 produces exactly the nitrogen message
    #[test]
    fn test_high_nitrogen_rejected(n in 140.001f64..10_000.0) {
        let soil = SoilParameters { n, ..sample_soil() };
        let errors = validate_soil_input(&soil).unwrap_err();
        prop_assert_eq!(errors, vec!["Nitrogen (N) must be between 0-140 kg/ha".to_string()]);
    }

    /// pH outside 3.5-10.0 is rejected on either side
    #[test]
    fn test_ph_bounds(ph in prop_oneof![-5.0f64..3.499, 10.001f64..20.0]) {
        let soil = SoilParameters { ph, ..sample_soil() };
        let errors = validate_soil_input(&soil).unwrap_err();
        prop_assert_eq!(errors.len(), 1);
        prop_assert!(errors[0].starts_with("pH"));
    }

    /// Coordinates within bounds are accepted
    #[test]
    fn test_valid_coordinates(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
        prop_assert!(validate_location(&Location::new(lat, lng)).is_ok());
    }

    /// Latitudes beyond the poles are rejected
    #[test]
    fn test_invalid_latitude(lat in 90.001f64..1000.0) {
        prop_assert!(validate_location(&Location::new(lat, 0.0)).is_err());
        prop_assert!(validate_location(&Location::new(-lat, 0.0)).is_err());
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod soil_tests {
    use super::*;

    #[test]
    fn test_all_violations_reported_in_field_order() {
        let soil = SoilParameters {
            n: 200.0,
            p: 1.0,
            k: 300.0,
            temperature: 50.0,
            humidity: 5.0,
            ph: 12.0,
            rainfall: 10.0,
        };
        let errors = validate_soil_input(&soil).unwrap_err();
        let expected: Vec<String> = SOIL_PARAMETER_RANGES
            .iter()
            .map(|r| r.message.to_string())
            .collect();
        assert_eq!(errors, expected);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let low = SoilParameters {
            n: 0.0,
            p: 5.0,
            k: 5.0,
            temperature: 8.8,
            humidity: 14.0,
            ph: 3.5,
            rainfall: 20.0,
        };
        let high = SoilParameters {
            n: 140.0,
            p: 145.0,
            k: 205.0,
            temperature: 43.7,
            humidity: 100.0,
            ph: 10.0,
            rainfall: 300.0,
        };
        assert!(validate_soil_input(&low).is_ok());
        assert!(validate_soil_input(&high).is_ok());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let soil = SoilParameters {
            rainfall: f64::NAN,
            ..sample_soil()
        };
        assert_eq!(
            validate_soil_input(&soil).unwrap_err(),
            vec!["Rainfall must be between 20-300 mm".to_string()]
        );
    }

    #[test]
    fn test_incomplete_form() {
        let form = SoilForm {
            n: Some(90.0),
            ..Default::default()
        };
        assert_eq!(
            validate_soil_form(&form).unwrap_err(),
            vec!["All soil and climate parameters are required".to_string()]
        );
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(sample_soil()).unwrap();
        assert_eq!(json["N"], 90.0);
        assert_eq!(json["ph"], 6.5);
        assert!(json.get("n").is_none());
    }

    #[test]
    fn test_location_name_and_notes_limits() {
        let long_name = Location::new(10.0, 76.0).with_name("x".repeat(101));
        assert!(validate_location(&long_name).is_err());
        assert!(validate_notes(&"n".repeat(500)).is_ok());
        assert!(validate_notes(&"n".repeat(501)).is_err());
    }
}
