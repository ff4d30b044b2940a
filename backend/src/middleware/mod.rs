//! HTTP middleware

pub mod auth;

pub use auth::{admin_middleware, auth_middleware, optional_auth_middleware, AuthUser, MaybeUser};
