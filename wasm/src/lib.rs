//! WebAssembly module for the Crop Advisor platform
//!
//! Provides client-side checks for the browser forms:
//! - Soil and climate parameter validation
//! - Location coordinate checks
//! - Confidence and language labels

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("crop-advisor-wasm loaded"));
}

/// Validate a soil form given as JSON.
///
/// Returns a JSON array of messages, empty when the form is valid.
#[wasm_bindgen]
pub fn validate_soil_form(form_json: &str) -> Result<String, JsValue> {
    let form: SoilForm = serde_json::from_str(form_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid soil form JSON: {}", e)))?;

    let messages = match shared::validation::validate_soil_form(&form) {
        Ok(_) => Vec::new(),
        Err(messages) => messages,
    };

    serde_json::to_string(&messages)
        .map_err(|e| JsValue::from_str(&format!("Failed to encode messages: {}", e)))
}

/// Confidence label ("Low", "Medium", "High") for a model score
#[wasm_bindgen]
pub fn confidence_label(score: f64) -> String {
    confidence_level_for_score(score).to_string()
}

#[wasm_bindgen]
pub fn is_valid_latitude(latitude: f64) -> bool {
    validate_latitude(latitude).is_ok()
}

#[wasm_bindgen]
pub fn is_valid_longitude(longitude: f64) -> bool {
    validate_longitude(longitude).is_ok()
}

/// English name of a language code; unknown codes map to English
#[wasm_bindgen]
pub fn language_label(code: &str) -> String {
    Language::from_code(code).label().to_string()
}

/// Current time as an ISO string, for stamping offline submissions
#[wasm_bindgen]
pub fn now_iso() -> String {
    js_sys::Date::new_0()
        .to_iso_string()
        .as_string()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_label() {
        assert_eq!(confidence_label(0.92), "High");
        assert_eq!(confidence_label(0.65), "Medium");
        assert_eq!(confidence_label(0.1), "Low");
    }

    #[test]
    fn test_coordinates() {
        assert!(is_valid_latitude(19.07));
        assert!(!is_valid_latitude(91.0));
        assert!(is_valid_longitude(-180.0));
        assert!(!is_valid_longitude(f64::NAN));
    }

    #[test]
    fn test_language_label() {
        assert_eq!(language_label("hi"), "Hindi");
        assert_eq!(language_label("xx"), "English");
    }
}
