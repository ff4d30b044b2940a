//! Farming assistant handlers

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::types::Language;

use crate::error::{AppError, AppResult};
use crate::services::assistant::UploadedImage;
use crate::services::AssistantService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TextQueryRequest {
    #[serde(default)]
    pub query: String,
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub target_lang: String,
}

fn language(code: Option<&str>) -> Language {
    code.map(Language::from_code).unwrap_or_default()
}

pub async fn assistant_test() -> Json<Value> {
    Json(json!({
        "message": "FarmAI API is working!",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn assistant_quick_test(State(state): State<AppState>) -> Json<Value> {
    let service = AssistantService::new(&state.config);
    match service.self_test().await {
        Ok((query, answer)) => Json(json!({
            "test": "success",
            "query": query,
            "result": { "answer": answer },
        })),
        Err(e) => Json(json!({ "test": "error", "error": e.to_string() })),
    }
}

/// Answer a typed or transcribed question
pub async fn text_query(
    State(state): State<AppState>,
    Json(body): Json<TextQueryRequest>,
) -> AppResult<Json<Value>> {
    let service = AssistantService::new(&state.config);
    let answer = service
        .answer(&body.query, language(body.lang.as_deref()))
        .await?;
    Ok(Json(json!({ "answer": answer })))
}

/// Analyse an uploaded crop photo (multipart fields `image` and `lang`)
pub async fn disease_detection(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let mut image = None;
    let mut lang = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid upload: {}", e)))?
    {
        match field.name() {
            Some("image") => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::ValidationError(format!("Invalid upload: {}", e)))?;
                if !bytes.is_empty() {
                    image = Some(UploadedImage {
                        bytes: bytes.to_vec(),
                        file_name,
                        mime_type,
                    });
                }
            }
            Some("lang") => {
                lang = field.text().await.ok();
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::ValidationError("No image uploaded".to_string()))?;
    tracing::debug!(
        "Disease detection upload {} ({} bytes)",
        image.file_name,
        image.bytes.len()
    );

    let service = AssistantService::new(&state.config);
    let result = service
        .detect_disease(image, language(lang.as_deref()))
        .await?;
    Ok(Json(json!({ "result": result })))
}

pub async fn translate_text(
    State(state): State<AppState>,
    Json(body): Json<TranslateRequest>,
) -> AppResult<Json<Value>> {
    let service = AssistantService::new(&state.config);
    let translated = service.translate(&body.text, &body.target_lang).await?;
    Ok(Json(json!({ "translated": translated })))
}
