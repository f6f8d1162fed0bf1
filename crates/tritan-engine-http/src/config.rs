use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Where the engine lives and how long to wait for it.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Base URL of the engine API, without the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout. Execution can take as long as the slowest node.
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl EngineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds a config from `TRITAN_API_URL` and `TRITAN_API_TIMEOUT_SECS`; unset or blank
    /// variables keep the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(url) = non_blank("TRITAN_API_URL") {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = non_blank("TRITAN_API_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout {
                    key: "TRITAN_API_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Overrides the engine base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the default HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn validate_url(&self) -> String {
        format!("{}/api/workflows/validate", self.root())
    }

    pub fn execute_url(&self) -> String {
        format!("{}/api/execute/", self.root())
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.root())
    }
}
