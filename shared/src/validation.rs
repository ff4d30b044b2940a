//! Validation utilities for the Crop Advisor platform
//!
//! The same rules run on the server and, through the WASM module, in the
//! browser form before submission.

use thiserror::Error;

use crate::models::{ConfidenceLevel, SoilForm, SoilParameters};
use crate::types::Location;

/// Maximum length of a location name
pub const MAX_LOCATION_NAME_LEN: usize = 100;
/// Maximum length of free-text notes on a soil input
pub const MAX_NOTES_LEN: usize = 500;
/// Maximum length of a user's display name
pub const MAX_USER_NAME_LEN: usize = 50;
/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// A single field-level validation failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

// ============================================================================
// Soil and climate
// ============================================================================

/// Check every parameter and report all range violations in field order
pub fn validate_soil_input(soil: &SoilParameters) -> Result<(), Vec<String>> {
    let errors: Vec<String> = soil
        .out_of_range()
        .into_iter()
        .map(|range| range.message.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a form submission that may be missing fields
pub fn validate_soil_form(form: &SoilForm) -> Result<SoilParameters, Vec<String>> {
    let soil = form
        .complete()
        .ok_or_else(|| vec!["All soil and climate parameters are required".to_string()])?;
    validate_soil_input(&soil)?;
    Ok(soil)
}

// ============================================================================
// Location
// ============================================================================

pub fn validate_latitude(latitude: f64) -> Result<(), ValidationError> {
    if latitude.is_finite() && (-90.0..=90.0).contains(&latitude) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "latitude",
            "Latitude must be between -90 and 90 degrees",
        ))
    }
}

pub fn validate_longitude(longitude: f64) -> Result<(), ValidationError> {
    if longitude.is_finite() && (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "longitude",
            "Longitude must be between -180 and 180 degrees",
        ))
    }
}

/// Validate coordinates and the optional place name
pub fn validate_location(location: &Location) -> Result<(), ValidationError> {
    validate_latitude(location.latitude)?;
    validate_longitude(location.longitude)?;
    if let Some(name) = &location.name {
        if name.trim().chars().count() > MAX_LOCATION_NAME_LEN {
            return Err(ValidationError::new(
                "location.name",
                "Location name cannot exceed 100 characters",
            ));
        }
    }
    Ok(())
}

pub fn validate_notes(notes: &str) -> Result<(), ValidationError> {
    if notes.trim().chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::new(
            "notes",
            "Notes cannot exceed 500 characters",
        ));
    }
    Ok(())
}

// ============================================================================
// Accounts
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("email", "Please enter a valid email"))
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new("name", "Name is required"));
    }
    if name.chars().count() > MAX_USER_NAME_LEN {
        return Err(ValidationError::new(
            "name",
            "Name cannot exceed 50 characters",
        ));
    }
    Ok(())
}

// ============================================================================
// Model output
// ============================================================================

/// Confidence bucket for a model probability
pub fn confidence_level_for_score(score: f64) -> ConfidenceLevel {
    ConfidenceLevel::from_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_soil() -> SoilParameters {
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

    #[test]
    fn test_valid_soil_passes() {
        assert!(validate_soil_input(&valid_soil()).is_ok());
    }

    #[test]
    fn test_all_violations_reported_in_order() {
        let soil = SoilParameters {
            n: 150.0,
            p: 4.0,
            k: 43.0,
            temperature: 50.0,
            humidity: 82.0,
            ph: 11.0,
            rainfall: 10.0,
        };
        let errors = validate_soil_input(&soil).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Nitrogen (N) must be between 0-140 kg/ha",
                "Phosphorus (P) must be between 5-145 kg/ha",
                "Temperature must be between 8.8-43.7°C",
                "pH must be between 3.5-10.0",
                "Rainfall must be between 20-300 mm",
            ]
        );
    }

    #[test]
    fn test_missing_field_in_form() {
        let form = SoilForm {
            n: Some(90.0),
            p: Some(42.0),
            ..Default::default()
        };
        let errors = validate_soil_form(&form).unwrap_err();
        assert_eq!(errors, vec!["All soil and climate parameters are required"]);
    }

    #[test]
    fn test_location_bounds() {
        assert!(validate_location(&Location::new(18.52, 73.85)).is_ok());
        assert!(validate_location(&Location::new(-90.0, 180.0)).is_ok());
        assert_eq!(
            validate_location(&Location::new(91.0, 0.0)).unwrap_err().field,
            "latitude"
        );
        assert_eq!(
            validate_location(&Location::new(0.0, -180.5)).unwrap_err().field,
            "longitude"
        );
        let long_name = "x".repeat(101);
        assert_eq!(
            validate_location(&Location::new(0.0, 0.0).with_name(long_name))
                .unwrap_err()
                .field,
            "location.name"
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("farmer@example.in").is_ok());
        assert!(validate_email("farmer@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("farmer.example.com").is_err());
    }

    #[test]
    fn test_password_and_name() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_name("Ramesh").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(51)).is_err());
    }
}
