//! HTTP request handlers

pub mod auth;
pub mod ceda;
pub mod crop;
pub mod farm_ai;
pub mod health;
pub mod prices;

pub use auth::*;
pub use ceda::*;
pub use crop::*;
pub use farm_ai::*;
pub use health::*;
pub use prices::*;

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Parse a record id from the path; malformed ids get the JSON error body
pub(crate) fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation {
        field: "id".to_string(),
        message: format!("Invalid id: {}", raw),
        message_hi: "अमान्य आईडी".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);

        match parse_id("not-a-uuid").unwrap_err() {
            AppError::Validation { field, message, .. } => {
                assert_eq!(field, "id");
                assert_eq!(message, "Invalid id: not-a-uuid");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
