//! Farming assistant: chat answers, crop disease detection and translation
//!
//! Each operation tries Gemini first and falls back to the next provider.

use shared::advice::{
    assistant_prompt, disease_prompt, fallback_answer, image_analysis_failure_message,
    technical_difficulty_message, translation_prompt, SELF_TEST_QUERY,
};
use shared::types::Language;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{GeminiClient, HuggingFaceClient, MlServiceClient};

/// Which provider produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Gemini,
    HuggingFace,
    Fallback,
}

/// An uploaded crop photo
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

#[derive(Clone)]
pub struct AssistantService {
    gemini: Option<GeminiClient>,
    huggingface: Option<HuggingFaceClient>,
    ml: MlServiceClient,
}

impl AssistantService {
    pub fn new(config: &Config) -> Self {
        Self::with_clients(
            GeminiClient::from_config(&config.gemini),
            HuggingFaceClient::from_config(&config.huggingface),
            MlServiceClient::new(&config.ml_service),
        )
    }

    /// Build from explicit clients
    pub fn with_clients(
        gemini: Option<GeminiClient>,
        huggingface: Option<HuggingFaceClient>,
        ml: MlServiceClient,
    ) -> Self {
        Self {
            gemini,
            huggingface,
            ml,
        }
    }

    /// Answer a farming question. Provider failures degrade to canned text.
    pub async fn answer(&self, query: &str, lang: Language) -> AppResult<String> {
        self.answer_with_source(query, lang)
            .await
            .map(|(answer, _)| answer)
    }

    pub async fn answer_with_source(
        &self,
        query: &str,
        lang: Language,
    ) -> AppResult<(String, AnswerSource)> {
        let query = query.trim();
        if query.is_empty() {
            return Ok((fallback_answer(lang, query).to_string(), AnswerSource::Fallback));
        }
        tracing::debug!("Assistant query ({}): {}", lang.code(), query);

        if let Some(gemini) = &self.gemini {
            match gemini.generate_text(&assistant_prompt(lang, query)).await {
                Ok(answer) => return Ok((answer, AnswerSource::Gemini)),
                Err(e) => tracing::warn!("Gemini answer failed, falling back: {}", e),
            }
        }

        if let Some(huggingface) = &self.huggingface {
            tracing::info!("Answering with HuggingFace");
            return match huggingface.generate(query).await {
                Ok(answer) => Ok((answer, AnswerSource::HuggingFace)),
                Err(e) => {
                    tracing::error!("HuggingFace answer failed: {}", e);
                    Ok((
                        technical_difficulty_message(lang).to_string(),
                        AnswerSource::Fallback,
                    ))
                }
            };
        }

        tracing::info!("Answering from the keyword table");
        Ok((
            fallback_answer(lang, query).to_string(),
            AnswerSource::Fallback,
        ))
    }

    /// Describe diseases visible in a crop photo
    pub async fn detect_disease(&self, image: UploadedImage, lang: Language) -> AppResult<String> {
        if let Some(gemini) = &self.gemini {
            match gemini
                .generate_with_image(&disease_prompt(lang), &image.bytes, &image.mime_type)
                .await
            {
                Ok(result) => {
                    tracing::info!("Disease analysis completed by Gemini");
                    return Ok(result);
                }
                Err(e) => tracing::warn!("Gemini vision failed, trying ML service: {}", e),
            }
        }

        self.ml
            .detect_disease(image.bytes, &image.file_name, &image.mime_type, lang.code())
            .await
            .map_err(|e| {
                tracing::error!("Disease detection failed: {}", e);
                AppError::DiseaseDetectionFailed {
                    result: image_analysis_failure_message(lang).to_string(),
                    details: e.to_string(),
                }
            })
    }

    /// Translate text for a farmer
    pub async fn translate(&self, text: &str, target_lang: &str) -> AppResult<String> {
        if text.trim().is_empty() || target_lang.trim().is_empty() {
            return Err(AppError::ValidationError(
                "text and targetLang are required".to_string(),
            ));
        }
        let gemini = self
            .gemini
            .as_ref()
            .ok_or_else(|| AppError::NotConfigured("Gemini API key not configured".to_string()))?;

        let target = Language::from_code(target_lang);
        gemini
            .generate_text(&translation_prompt(target, text))
            .await
            .map_err(|e| AppError::Internal(format!("Translation failed: {}", e)))
    }

    /// Run the canned self-test question
    pub async fn self_test(&self) -> AppResult<(&'static str, String)> {
        let answer = self.answer(SELF_TEST_QUERY, Language::English).await?;
        Ok((SELF_TEST_QUERY, answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> AssistantService {
        AssistantService::with_clients(
            None,
            None,
            MlServiceClient::with_base_url("http://127.0.0.1:9"),
        )
    }

    #[tokio::test]
    async fn test_blank_query_gets_general_advice() {
        let (answer, source) = offline()
            .answer_with_source("   ", Language::Hindi)
            .await
            .unwrap();
        assert_eq!(source, AnswerSource::Fallback);
        assert_eq!(answer, fallback_answer(Language::Hindi, ""));
    }

    #[tokio::test]
    async fn test_keyword_fallback_without_providers() {
        let (answer, source) = offline()
            .answer_with_source("Which fertilizer for wheat?", Language::Hindi)
            .await
            .unwrap();
        assert_eq!(source, AnswerSource::Fallback);
        assert_eq!(answer, fallback_answer(Language::Hindi, "fertilizer"));
    }

    #[tokio::test]
    async fn test_self_test_uses_yellow_leaf_question() {
        let (query, answer) = offline().self_test().await.unwrap();
        assert_eq!(query, SELF_TEST_QUERY);
        assert_eq!(answer, fallback_answer(Language::English, SELF_TEST_QUERY));
    }

    #[tokio::test]
    async fn test_translate_requires_gemini() {
        let err = offline().translate("hello", "hi").await.unwrap_err();
        assert!(matches!(err, AppError::NotConfigured(msg) if msg == "Gemini API key not configured"));

        let err = offline().translate("", "hi").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_disease_detection_failure_is_localized() {
        let image = UploadedImage {
            bytes: vec![0xff, 0xd8, 0xff],
            file_name: "leaf.jpg".into(),
            mime_type: "image/jpeg".into(),
        };
        let err = offline()
            .detect_disease(image, Language::Marathi)
            .await
            .unwrap_err();
        match err {
            AppError::DiseaseDetectionFailed { result, .. } => {
                assert_eq!(result, image_analysis_failure_message(Language::Marathi));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
