//! Business logic services for the Crop Advisor platform

pub mod assistant;
pub mod auth;
pub mod prices;
pub mod recommendation;

pub use assistant::AssistantService;
pub use auth::AuthService;
pub use prices::PriceService;
pub use recommendation::RecommendationService;
