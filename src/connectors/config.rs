use serde::{Deserialize, Serialize};

/// Public Lago cloud endpoint
pub const DEFAULT_LAGO_URL: &str = "https://api.getlago.com/api/v1/";

/// Lago connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LagoConfig {
    /// Base URL for the Lago API (e.g., https://api.getlago.com/api/v1/)
    pub base_url: String,
    /// API key sent as a bearer token (from env: LAGO_API_KEY)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LagoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LAGO_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl LagoConfig {
    /// Override file values with LAGO_API_KEY, LAGO_BASE_URL and LAGO_TIMEOUT_SECS
    pub fn apply_env(&mut self) -> Result<(), config::ConfigError> {
        if let Ok(api_key) = std::env::var("LAGO_API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Ok(base_url) = std::env::var("LAGO_BASE_URL") {
            self.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("LAGO_TIMEOUT_SECS") {
            self.timeout_secs = timeout.parse().map_err(|err| {
                config::ConfigError::Message(format!("Invalid LAGO_TIMEOUT_SECS: {}", err))
            })?;
        }
        Ok(())
    }
}
