//! HuggingFace inference API client

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::HuggingFaceConfig;
use crate::error::{AppError, AppResult};

const NO_ANSWER: &str = "No answer";

#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    api_key: String,
    url: String,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

impl HuggingFaceClient {
    pub fn from_config(config: &HuggingFaceConfig) -> Option<Self> {
        let api_key = config.key()?;
        Some(Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            url: format!("{}/{}", config.base_url.trim_end_matches('/'), config.model),
        })
    }

    /// Run text generation for a prompt
    pub async fn generate(&self, inputs: &str) -> AppResult<String> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&InferenceRequest { inputs })
            .send()
            .await
            .map_err(|e| AppError::AiService(format!("HuggingFace request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AiService(format!(
                "HuggingFace API error: {} - {}",
                status, body
            )));
        }

        let data: Value = response.json().await.map_err(|e| {
            AppError::AiService(format!("Failed to parse HuggingFace response: {}", e))
        })?;

        Ok(generated_text(&data))
    }
}

/// `generated_text` from an object or the first array element
fn generated_text(data: &Value) -> String {
    data.get("generated_text")
        .or_else(|| data.get(0).and_then(|first| first.get("generated_text")))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_ANSWER)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_text_shapes() {
        assert_eq!(generated_text(&json!({"generated_text": "a"})), "a");
        assert_eq!(generated_text(&json!([{"generated_text": "b"}])), "b");
        assert_eq!(generated_text(&json!([])), NO_ANSWER);
        assert_eq!(generated_text(&json!({"error": "loading"})), NO_ANSWER);
    }
}
