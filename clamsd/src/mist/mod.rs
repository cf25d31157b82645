pub mod client;

use std::future::Future;
use reqwest::Url;
use serde_json::Value;
use thiserror::Error;
use shared::protocol::{
    CLIENTS_SEARCH_PATH, DEVICES_SEARCH_PATH, ORGS_PATH, PARAM_MAC, PARAM_TEXT,
};
use crate::config::MistConfig;

pub use client::MistClient;

/// Errors from a single Mist API call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Credentials missing or still placeholders; no request was sent
    #[error("{0}")]
    Configuration(String),

    /// Connection, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-200 response
    #[error("{message}")]
    ApiStatus { status: u16, message: String },

    /// Successful call with a body we cannot use
    #[error("{0}")]
    Format(String),
}

impl ApiError {
    pub fn not_configured() -> Self {
        Self::Configuration("API Token or Org ID is not configured.".to_string())
    }

    pub fn unexpected_format() -> Self {
        Self::Format("API returned an unexpected response format.".to_string())
    }

    /// Build an ApiStatus error, preferring the `detail` field of a JSON body
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string));

        let message = detail.unwrap_or_else(|| {
            format!(
                "HTTP Code {}. Check API Token, Org ID, or Base URL. Response Body: {}",
                status, body
            )
        });

        Self::ApiStatus { status, message }
    }

    /// Short machine-readable name, used in diagnostics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Transport(_) => "transport",
            Self::ApiStatus { .. } => "api_status",
            Self::Format(_) => "format",
        }
    }
}

/// Organization-scoped endpoint URLs
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
    org_id: String,
}

impl Endpoints {
    pub fn new(config: &MistConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url().to_string();

        let parsed = Url::parse(&base_url).map_err(|e| {
            ApiError::Configuration(format!("Invalid API base URL {}: {}", base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Configuration(format!(
                "Unsupported API base URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url,
            org_id: config.org_id.trim().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Free-text client search: name, hostname or MAC
    pub fn client_search(&self, text: &str) -> Result<String, ApiError> {
        self.org_search(CLIENTS_SEARCH_PATH, PARAM_TEXT, text)
    }

    /// Device search filtered by MAC
    pub fn device_search(&self, mac: &str) -> Result<String, ApiError> {
        self.org_search(DEVICES_SEARCH_PATH, PARAM_MAC, mac)
    }

    fn org_search(&self, path: &str, param: &str, value: &str) -> Result<String, ApiError> {
        let raw = format!("{}/{}/{}/{}", self.base_url, ORGS_PATH, self.org_id, path);
        Url::parse_with_params(&raw, &[(param, value)])
            .map(|url| url.to_string())
            .map_err(|e| ApiError::Configuration(format!("Invalid API URL {}: {}", raw, e)))
    }
}

/// Read-only access to the Mist API.
///
/// `call` takes a fully built URL (see [`Endpoints`]) and returns the decoded
/// JSON body. Implementations must not retry.
pub trait MistApi: Send + Sync {
    fn endpoints(&self) -> &Endpoints;

    fn call(&self, url: &str) -> impl Future<Output = Result<Value, ApiError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        let config = MistConfig {
            base_url: "https://api.mist.com/api/v1/".to_string(),
            api_token: "secret".to_string(),
            org_id: "org-1".to_string(),
            timeout_secs: 30,
        };
        Endpoints::new(&config).unwrap()
    }

    #[test]
    fn test_client_search_url_encodes_text() {
        let url = endpoints().client_search("Jane's Laptop&x=1").unwrap();
        assert_eq!(
            url,
            "https://api.mist.com/api/v1/orgs/org-1/clients/search?text=Jane%27s+Laptop%26x%3D1"
        );
    }

    #[test]
    fn test_device_search_url() {
        let url = endpoints().device_search("112233445566").unwrap();
        assert_eq!(
            url,
            "https://api.mist.com/api/v1/orgs/org-1/devices/search?mac=112233445566"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = MistConfig {
            base_url: "not a url".to_string(),
            ..MistConfig::default()
        };
        let err = Endpoints::new(&config).unwrap_err();
        assert_eq!(err.kind(), "configuration");

        let config = MistConfig {
            base_url: "ftp://api.mist.com".to_string(),
            ..MistConfig::default()
        };
        assert!(Endpoints::new(&config).is_err());
    }

    #[test]
    fn test_status_error_uses_detail() {
        let err = ApiError::from_status(403, r#"{"detail": "You do not have permission"}"#);
        assert_eq!(
            err,
            ApiError::ApiStatus {
                status: 403,
                message: "You do not have permission".to_string(),
            }
        );
    }

    #[test]
    fn test_status_error_falls_back_to_body() {
        let err = ApiError::from_status(502, "<html>Bad Gateway</html>");
        let message = err.to_string();

        assert!(message.starts_with("HTTP Code 502."));
        assert!(message.ends_with("Response Body: <html>Bad Gateway</html>"));

        // JSON without a string detail still falls back
        let err = ApiError::from_status(404, r#"{"detail": 42}"#);
        assert!(err.to_string().contains("HTTP Code 404"));
    }
}
