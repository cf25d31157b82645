use std::sync::Arc;
use anyhow::{Context, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use shared::protocol::AUTH_SCHEME;
use crate::config::MistConfig;
use super::{ApiError, Endpoints, MistApi};

/// HTTP client for the Mist API.
/// Cheap to clone; the connection pool is shared between clones.
#[derive(Clone)]
pub struct MistClient {
    http: reqwest::Client,
    config: Arc<MistConfig>,
    endpoints: Endpoints,
}

impl MistClient {
    pub fn new(config: MistConfig) -> Result<Self> {
        let endpoints = Endpoints::new(&config).context("Invalid Mist API configuration")?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            config: Arc::new(config),
            endpoints,
        })
    }

    pub fn config(&self) -> &MistConfig {
        &self.config
    }

    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        if !self.config.is_configured() {
            return Err(ApiError::not_configured());
        }

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("{} {}", AUTH_SCHEME, self.config.api_token.trim()))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if status != StatusCode::OK {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Response from {} is not valid JSON: {}", url, e);
            ApiError::unexpected_format()
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Transport(format!(
                "request timed out after {}s",
                self.config.timeout_secs
            ))
        } else if e.is_connect() {
            ApiError::Transport(format!("connection failed: {}", e))
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl MistApi for MistClient {
    fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn call(&self, url: &str) -> Result<Value, ApiError> {
        self.get_json(url).await
    }
}
