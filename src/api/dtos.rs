use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::ExtractMode;

pub const MAX_URL_CHARS: usize = 2048;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExtractRequest {
    /// Absolute http(s) URL of a catalog or detail page.
    pub url: String,
    #[serde(default)]
    pub mode: ExtractMode,
}

impl ExtractRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("URL cannot be empty".to_string());
        }
        if self.url.chars().count() > MAX_URL_CHARS {
            return Err("URL too long".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_request_valid() {
        let request: ExtractRequest =
            serde_json::from_str(r#"{"url":"https://www.cars24.com/buy-used-cars-pune/"}"#).unwrap();
        assert_eq!(request.mode, ExtractMode::Auto);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_extract_request_empty_url() {
        let request = ExtractRequest {
            url: "   ".to_string(),
            mode: ExtractMode::Catalog,
        };
        assert_eq!(request.validate().unwrap_err(), "URL cannot be empty");
    }

    #[test]
    fn test_extract_request_url_too_long() {
        let request = ExtractRequest {
            url: format!("https://example.com/{}", "a".repeat(MAX_URL_CHARS)),
            mode: ExtractMode::Detail,
        };
        assert_eq!(request.validate().unwrap_err(), "URL too long");
    }

    #[test]
    fn test_extract_request_rejects_unknown_mode() {
        let result: Result<ExtractRequest, _> =
            serde_json::from_str(r#"{"url":"https://example.com","mode":"everything"}"#);
        assert!(result.is_err());
    }
}
