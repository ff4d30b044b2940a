//! Error handling for the Crop Advisor platform
//!
//! Provides consistent error responses in English and Hindi

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        message_hi: String,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_hi: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Several input violations reported together
    #[error("Validation errors: {0:?}")]
    ValidationErrors(Vec<String>),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // External service errors
    #[error("ML service unavailable: {0}")]
    MlServiceUnavailable(String),

    #[error("AI service error: {0}")]
    AiService(String),

    #[error("Disease detection failed: {details}")]
    DiseaseDetectionFailed { result: String, details: String },

    /// Upstream price API failure, carrying the upstream status
    #[error("{message}")]
    PriceApi { status: u16, message: String },

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Status code the upstream price API reported, if this came from it
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::PriceApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_hi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorDetail {
    pub fn new(code: &str, message_en: impl Into<String>, message_hi: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message_en: message_en.into(),
            message_hi: message_hi.into(),
            field: None,
            errors: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Body returned when every disease detection path failed
#[derive(Serialize)]
struct DiseaseFailureBody<'a> {
    error: &'static str,
    result: &'a str,
    details: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        if let AppError::DiseaseDetectionFailed { result, details } = &self {
            let body = DiseaseFailureBody {
                error: "Disease detection failed",
                result,
                details,
            };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }

        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new(
                    "INVALID_CREDENTIALS",
                    "Invalid email or password",
                    "ईमेल या पासवर्ड गलत है",
                ),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("INVALID_TOKEN", "Invalid token", "टोकन अमान्य है"),
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new(
                    "INSUFFICIENT_PERMISSIONS",
                    "Access denied. Admin privileges required.",
                    "पहुंच अस्वीकृत। व्यवस्थापक अधिकार आवश्यक हैं।",
                ),
            ),
            AppError::Unauthorized {
                message,
                message_hi,
            } => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", message.clone(), message_hi.clone()),
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new("FORBIDDEN", msg.clone(), "पहुंच अस्वीकृत"),
            ),
            AppError::Validation {
                field,
                message,
                message_hi,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", message.clone(), message_hi.clone())
                    .with_field(field.clone()),
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "VALIDATION_ERROR",
                    msg.clone(),
                    format!("अमान्य इनपुट: {}", msg),
                ),
            ),
            AppError::ValidationErrors(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    errors: Some(errors.clone()),
                    ..ErrorDetail::new(
                        "VALIDATION_ERROR",
                        "Validation errors",
                        "सत्यापन त्रुटियां",
                    )
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail::new(
                    "DUPLICATE_ENTRY",
                    format!("A record with this {} already exists", field),
                    format!("इस {} के साथ रिकॉर्ड पहले से मौजूद है", field),
                )
                .with_field(field.clone()),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new(
                    "NOT_FOUND",
                    format!("{} not found", resource),
                    format!("{} नहीं मिला", resource),
                ),
            ),
            AppError::MlServiceUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new(
                    "ML_SERVICE_UNAVAILABLE",
                    "ML service is currently unavailable. Please try again later.",
                    "ML सेवा अभी उपलब्ध नहीं है। कृपया बाद में पुनः प्रयास करें।",
                ),
            ),
            AppError::AiService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new(
                    "AI_SERVICE_ERROR",
                    format!("AI service error: {}", msg),
                    "AI सेवा में त्रुटि",
                ),
            ),
            AppError::PriceApi { status, message } => (
                StatusCode::from_u16(*status)
                    .ok()
                    .filter(|code| code.is_client_error() || code.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorDetail::new(
                    "PRICE_API_ERROR",
                    message.clone(),
                    "बाजार भाव सेवा में त्रुटि",
                ),
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new(
                    "EXTERNAL_SERVICE_ERROR",
                    format!("External service error: {}", msg),
                    "बाहरी सेवा में त्रुटि",
                ),
            ),
            AppError::NotConfigured(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("NOT_CONFIGURED", msg.clone(), "सेवा कॉन्फ़िगर नहीं है"),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "DATABASE_ERROR",
                    "A database error occurred",
                    "डेटाबेस त्रुटि हुई",
                ),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone(), "आंतरिक सर्वर त्रुटि"),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "INTERNAL_ERROR",
                    "An internal server error occurred",
                    "आंतरिक सर्वर त्रुटि",
                ),
            ),
            AppError::DiseaseDetectionFailed { result, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("DISEASE_DETECTION_FAILED", details.clone(), result.clone()),
            ),
        };

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

impl From<shared::validation::ValidationError> for AppError {
    fn from(err: shared::validation::ValidationError) -> Self {
        AppError::Validation {
            field: err.field.to_string(),
            message: err.message,
            message_hi: "अमान्य इनपुट".to_string(),
        }
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
