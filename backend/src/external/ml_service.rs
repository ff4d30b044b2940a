//! Crop recommendation model service client
//!
//! Talks to the Python inference service that hosts the trained classifier.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{AlternativeCrop, ConfidenceLevel, SoilParameters};
use shared::types::Location;

use crate::config::MlServiceConfig;
use crate::error::{AppError, AppResult};

pub const DEFAULT_CONFIDENCE_SCORE: f64 = 0.85;
pub const DEFAULT_REASONING: &str = "Based on soil and climate analysis";
pub const DEFAULT_MODEL_VERSION: &str = "1.0.0";

/// Model service client
#[derive(Clone)]
pub struct MlServiceClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    health_timeout: Duration,
}

/// Body sent to `/predict`
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    #[serde(flatten)]
    pub soil: SoilParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl PredictRequest {
    pub fn new(soil: SoilParameters, location: Option<&Location>) -> Self {
        Self {
            soil,
            latitude: location.map(|l| l.latitude),
            longitude: location.map(|l| l.longitude),
        }
    }
}

/// Raw `/predict` response; every field but the crop may be missing
#[derive(Debug, Deserialize)]
struct RawPrediction {
    crop: String,
    confidence: Option<String>,
    confidence_score: Option<f64>,
    alternative_crops: Option<Vec<AlternativeCrop>>,
    reasoning: Option<String>,
    model_version: Option<String>,
}

/// Prediction with defaults applied
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub crop: String,
    pub confidence: ConfidenceLevel,
    pub confidence_score: f64,
    pub alternative_crops: Vec<AlternativeCrop>,
    pub reasoning: String,
    pub model_version: String,
}

impl From<RawPrediction> for Prediction {
    fn from(raw: RawPrediction) -> Self {
        Self {
            crop: raw.crop,
            confidence: raw
                .confidence
                .and_then(|c| c.parse().ok())
                .unwrap_or(ConfidenceLevel::High),
            confidence_score: raw
                .confidence_score
                .filter(|score| *score > 0.0)
                .unwrap_or(DEFAULT_CONFIDENCE_SCORE),
            alternative_crops: raw.alternative_crops.unwrap_or_default(),
            reasoning: raw
                .reasoning
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REASONING.to_string()),
            model_version: raw
                .model_version
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiseaseResponse {
    result: Option<String>,
}

impl MlServiceClient {
    pub fn new(config: &MlServiceConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
        }
    }

    /// Ask the model for a crop recommendation
    pub async fn predict(&self, request: &PredictRequest) -> AppResult<Prediction> {
        let url = format!("{}/predict", self.base_url);
        tracing::debug!("Calling ML service at {}", url);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("ML service request failed: {}", e);
                AppError::MlServiceUnavailable(describe_transport_error(&e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = upstream_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            tracing::warn!("ML service returned {}: {}", status, message);
            return Err(AppError::MlServiceUnavailable(format!(
                "ML service error: {}",
                message
            )));
        }

        let raw: RawPrediction = response.json().await.map_err(|e| {
            AppError::MlServiceUnavailable(format!("Failed to parse ML response: {}", e))
        })?;

        Ok(raw.into())
    }

    /// True when `/health` answers 200 within the health timeout
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                tracing::warn!("ML service health check failed: {}", e);
                false
            }
        }
    }

    /// Service status document, or an "unavailable" placeholder
    pub async fn status(&self) -> Value {
        let url = format!("{}/status", self.base_url);
        let result = async {
            self.client
                .get(&url)
                .timeout(self.health_timeout)
                .send()
                .await?
                .error_for_status()?
                .json::<Value>()
                .await
        }
        .await;

        match result {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("ML service status check failed: {}", e);
                serde_json::json!({
                    "status": "unavailable",
                    "error": e.to_string(),
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                })
            }
        }
    }

    /// Upload a crop image to the disease detection endpoint
    pub async fn detect_disease(
        &self,
        image: Vec<u8>,
        file_name: &str,
        mime: &str,
        lang: &str,
    ) -> AppResult<String> {
        let url = format!("{}/detect-disease", self.base_url);

        let part = reqwest::multipart::Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| AppError::ExternalService(format!("Invalid image type: {}", e)))?;
        let form = reqwest::multipart::Form::new()
            .part("image", part)
            .text("lang", lang.to_string());

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(describe_transport_error(&e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Disease detection returned {}: {}",
                status, body
            )));
        }

        let data: DiseaseResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse disease response: {}", e))
        })?;

        data.result
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| AppError::ExternalService("Disease detection returned no result".into()))
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_connect() {
        "ML service is not running. Please start the Python service.".to_string()
    } else if e.is_timeout() {
        "ML service is not responding. Please check if the service is running.".to_string()
    } else {
        format!("ML service error: {}", e)
    }
}

fn upstream_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}
