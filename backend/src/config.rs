//! Configuration management for the Crop Advisor platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CROP_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Crop recommendation model service
    pub ml_service: MlServiceConfig,

    /// Gemini generative AI
    pub gemini: GeminiConfig,

    /// HuggingFace inference fallback
    pub huggingface: HuggingFaceConfig,

    /// CEDA market price API
    pub ceda: CedaConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Origin allowed by CORS
    pub frontend_url: String,

    /// Maximum request body size
    pub body_limit_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MlServiceConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub health_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HuggingFaceConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CedaConfig {
    /// API key; price routes are disabled without it
    pub api_key: Option<String>,
    pub base_url: String,
    pub prices_endpoint: String,
    pub commodities_endpoint: String,
    pub geographies_endpoint: String,
    pub markets_endpoint: String,
    /// Preferred header name for the key
    pub api_key_header: String,
    /// Preferred query parameter name for the key
    pub api_key_query: String,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
    /// Retries spent on 429/503 across all auth variants of one request
    pub max_throttle_retries: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.frontend_url", "http://localhost:3000")?
            .set_default("server.body_limit_bytes", 10 * 1024 * 1024)?
            .set_default("database.url", "postgres://localhost/crop_advisor")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.secret", "development-secret-key")?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            .set_default("ml_service.url", "http://localhost:5001")?
            .set_default("ml_service.timeout_secs", 30)?
            .set_default("ml_service.health_timeout_secs", 5)?
            .set_default("gemini.model", "gemini-1.5-flash")?
            .set_default(
                "gemini.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("huggingface.model", "gpt2")?
            .set_default(
                "huggingface.base_url",
                "https://api-inference.huggingface.co/models",
            )?
            .set_default("ceda.base_url", "https://api.ceda.ashoka.edu.in/v1")?
            .set_default("ceda.prices_endpoint", "/agmarknet/prices")?
            .set_default("ceda.commodities_endpoint", "/agmarknet/commodities")?
            .set_default("ceda.geographies_endpoint", "/agmarknet/geographies")?
            .set_default("ceda.markets_endpoint", "/agmarknet/markets")?
            .set_default("ceda.api_key_header", "x-api-key")?
            .set_default("ceda.api_key_query", "x-api-key")?
            .set_default("ceda.cache_ttl_secs", 6 * 60 * 60)?
            .set_default("ceda.timeout_secs", 20)?
            .set_default("ceda.max_throttle_retries", 2)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROP_ prefix)
            .add_source(
                Environment::with_prefix("CROP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl CedaConfig {
    /// Key with surrounding whitespace removed, if one is set
    pub fn key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.key().is_some()
    }
}

impl GeminiConfig {
    pub fn key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl HuggingFaceConfig {
    pub fn key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
