//! Crop recommendation models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::types::Location;

/// Coarse confidence bucket reported alongside a prediction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ConfidenceLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Bucket a probability: >= 0.8 is High, >= 0.6 is Medium, anything else Low
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            ConfidenceLevel::High
        } else if score >= 0.6 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::High => "High",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(ConfidenceLevel::Low),
            "medium" => Ok(ConfidenceLevel::Medium),
            "high" => Ok(ConfidenceLevel::High),
            other => Err(format!("unknown confidence level: {}", other)),
        }
    }
}

/// Lifecycle of a stored recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStatus {
    Pending,
    #[default]
    Completed,
    Failed,
}

impl RecommendationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationStatus::Pending => "pending",
            RecommendationStatus::Completed => "completed",
            RecommendationStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RecommendationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RecommendationStatus::Pending),
            "completed" => Ok(RecommendationStatus::Completed),
            "failed" => Ok(RecommendationStatus::Failed),
            other => Err(format!("unknown recommendation status: {}", other)),
        }
    }
}

/// A runner-up crop from the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlternativeCrop {
    pub crop: String,
    #[serde(default)]
    pub confidence: ConfidenceLevel,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

/// Recommendation as returned to the crop form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub recommendation_id: Uuid,
    pub crop: String,
    pub confidence: ConfidenceLevel,
    pub confidence_score: f64,
    pub alternative_crops: Vec<AlternativeCrop>,
    pub reasoning: String,
    /// Formatted as `"<n>ms"`
    pub processing_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
}

/// Format a processing duration the way the form displays it
pub fn format_processing_time(millis: i64) -> String {
    format!("{}ms", millis.max(0))
}
