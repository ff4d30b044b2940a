//! Shared types and models for the Crop Advisor platform
//!
//! This crate contains the domain types, validation rules and canned
//! assistant text shared between the backend and the browser (via WASM).

pub mod advice;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
