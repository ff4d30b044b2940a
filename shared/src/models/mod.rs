//! Domain models for the Crop Advisor platform

mod price;
mod recommendation;
mod soil;
mod user;

pub use price::*;
pub use recommendation::*;
pub use soil::*;
pub use user::*;
