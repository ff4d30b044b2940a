//! External API integrations

pub mod ceda;
pub mod gemini;
pub mod huggingface;
pub mod ml_service;

pub use ceda::CedaClient;
pub use gemini::GeminiClient;
pub use huggingface::HuggingFaceClient;
pub use ml_service::MlServiceClient;
