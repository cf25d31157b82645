use std::path::Path;
use std::time::Duration;
use serde::Deserialize;
use anyhow::{Context, Result};
use shared::protocol::DEFAULT_API_BASE_URL;

/// Values shipped in the sample config; treated as "not configured"
pub const PLACEHOLDER_API_TOKEN: &str = "YOUR_MIST_API_TOKEN_HERE";
pub const PLACEHOLDER_ORG_ID: &str = "YOUR_MIST_ORG_ID_HERE";

/// Environment overrides so the token need not live in the config file
pub const ENV_API_TOKEN: &str = "CLAMS_API_TOKEN";
pub const ENV_ORG_ID: &str = "CLAMS_ORG_ID";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mist: MistConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MistConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_token")]
    pub api_token: String,
    #[serde(default = "default_org_id")]
    pub org_id: String,
    /// Upper bound for each outbound request
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_api_token() -> String {
    PLACEHOLDER_API_TOKEN.to_string()
}

fn default_org_id() -> String {
    PLACEHOLDER_ORG_ID.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_listen() -> String {
    "[::]:8080".to_string()
}

impl Default for MistConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: default_api_token(),
            org_id: default_org_id(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl MistConfig {
    /// True once both the API token and org ID are set to real values
    pub fn is_configured(&self) -> bool {
        let token = self.api_token.trim();
        let org = self.org_id.trim();
        !token.is_empty()
            && token != PLACEHOLDER_API_TOKEN
            && !org.is_empty()
            && org != PLACEHOLDER_ORG_ID
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API root without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Replace credentials with non-empty values from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(ENV_API_TOKEN) {
            self.mist.api_token = token;
        }
        if let Some(org_id) = non_empty(ENV_ORG_ID) {
            self.mist.org_id = org_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [mist]
            base_url = "https://api.eu.mist.com/api/v1/"
            api_token = "secret"
            org_id = "1234-abcd"
            timeout_secs = 10

            [api]
            listen = "127.0.0.1:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.mist.base_url(), "https://api.eu.mist.com/api/v1");
        assert_eq!(config.mist.timeout(), Duration::from_secs(10));
        assert_eq!(config.api.listen, "127.0.0.1:9000");
        assert!(config.mist.is_configured());
    }

    #[test]
    fn test_defaults_are_placeholders() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.mist.base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.mist.timeout_secs, 30);
        assert_eq!(config.api.listen, "[::]:8080");
        assert!(!config.mist.is_configured());
    }

    #[test]
    fn test_placeholder_or_blank_not_configured() {
        let mut mist = MistConfig {
            api_token: "secret".to_string(),
            ..MistConfig::default()
        };
        assert!(!mist.is_configured(), "placeholder org id");

        mist.org_id = "   ".to_string();
        assert!(!mist.is_configured(), "blank org id");

        mist.org_id = "1234".to_string();
        assert!(mist.is_configured());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::parse(
            r#"
            [mist]
            api_token = "from-file"
            "#,
        )
        .unwrap();

        config.apply_overrides(|key| match key {
            ENV_API_TOKEN => Some(String::new()),
            ENV_ORG_ID => Some("org-from-env".to_string()),
            _ => None,
        });

        assert_eq!(config.mist.api_token, "from-file", "empty override is ignored");
        assert_eq!(config.mist.org_id, "org-from-env");
    }
}
