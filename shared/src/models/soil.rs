//! Soil and climate input models

use serde::{Deserialize, Serialize};

/// Soil nutrients and climate readings submitted on the crop form.
///
/// Field names on the wire follow the model's feature names (`N`, `P`, `K`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SoilParameters {
    /// Nitrogen, kg/ha
    #[serde(rename = "N")]
    pub n: f64,
    /// Phosphorus, kg/ha
    #[serde(rename = "P")]
    pub p: f64,
    /// Potassium, kg/ha
    #[serde(rename = "K")]
    pub k: f64,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    pub ph: f64,
    /// Millimetres
    pub rainfall: f64,
}

/// Inclusive bounds for one soil or climate parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
    pub message: &'static str,
}

impl ParameterRange {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Accepted ranges, in the order violations are reported
pub const SOIL_PARAMETER_RANGES: [ParameterRange; 7] = [
    ParameterRange {
        field: "N",
        min: 0.0,
        max: 140.0,
        message: "Nitrogen (N) must be between 0-140 kg/ha",
    },
    ParameterRange {
        field: "P",
        min: 5.0,
        max: 145.0,
        message: "Phosphorus (P) must be between 5-145 kg/ha",
    },
    ParameterRange {
        field: "K",
        min: 5.0,
        max: 205.0,
        message: "Potassium (K) must be between 5-205 kg/ha",
    },
    ParameterRange {
        field: "temperature",
        min: 8.8,
        max: 43.7,
        message: "Temperature must be between 8.8-43.7°C",
    },
    ParameterRange {
        field: "humidity",
        min: 14.0,
        max: 100.0,
        message: "Humidity must be between 14-100%",
    },
    ParameterRange {
        field: "ph",
        min: 3.5,
        max: 10.0,
        message: "pH must be between 3.5-10.0",
    },
    ParameterRange {
        field: "rainfall",
        min: 20.0,
        max: 300.0,
        message: "Rainfall must be between 20-300 mm",
    },
];

impl SoilParameters {
    /// Value of a parameter by its wire name
    pub fn value_of(&self, field: &str) -> Option<f64> {
        match field {
            "N" => Some(self.n),
            "P" => Some(self.p),
            "K" => Some(self.k),
            "temperature" => Some(self.temperature),
            "humidity" => Some(self.humidity),
            "ph" => Some(self.ph),
            "rainfall" => Some(self.rainfall),
            _ => None,
        }
    }

    /// Ranges this input falls outside of
    pub fn out_of_range(&self) -> Vec<&'static ParameterRange> {
        SOIL_PARAMETER_RANGES
            .iter()
            .filter(|range| {
                self.value_of(range.field)
                    .map(|v| !range.contains(v))
                    .unwrap_or(true)
            })
            .collect()
    }
}

/// Optional submission fields, as sent by the form.
///
/// Every parameter is optional here so a missing value can be reported
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoilForm {
    #[serde(rename = "N")]
    pub n: Option<f64>,
    #[serde(rename = "P")]
    pub p: Option<f64>,
    #[serde(rename = "K")]
    pub k: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub rainfall: Option<f64>,
}

impl SoilForm {
    /// Convert to complete parameters, or `None` if any field is absent
    pub fn complete(&self) -> Option<SoilParameters> {
        Some(SoilParameters {
            n: self.n?,
            p: self.p?,
            k: self.k?,
            temperature: self.temperature?,
            humidity: self.humidity?,
            ph: self.ph?,
            rainfall: self.rainfall?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SoilParameters {
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
    fn test_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["N"], 90.0);
        assert_eq!(json["P"], 42.0);
        assert_eq!(json["K"], 43.0);
        assert!(json.get("n").is_none());
    }

    #[test]
    fn test_range_edges_are_inclusive() {
        let mut soil = sample();
        soil.n = 0.0;
        soil.temperature = 43.7;
        soil.ph = 3.5;
        assert!(soil.out_of_range().is_empty());
    }

    #[test]
    fn test_nan_is_out_of_range() {
        let mut soil = sample();
        soil.humidity = f64::NAN;
        let bad = soil.out_of_range();
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].field, "humidity");
    }

    #[test]
    fn test_incomplete_form() {
        let form = SoilForm {
            n: Some(10.0),
            ..Default::default()
        };
        assert!(form.complete().is_none());
    }
}
