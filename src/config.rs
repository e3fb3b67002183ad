use std::env;
use std::time::Duration;

/// Default IP Netblocks API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://ip-netblocks.whoisxmlapi.com/api/v2";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// API key in the `at_` + 29 alphanumerics form.
    pub api_key: String,
    pub base_url: String,
    /// Handed to the HTTP client for every request.
    pub timeout: Duration,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates Config from environment variables with defaults.
    ///
    /// Reads `IPNETBLOCKS_API_KEY`, `IPNETBLOCKS_BASE_URL` and
    /// `IPNETBLOCKS_TIMEOUT_SECS`. A missing key is left empty and rejected
    /// when the client is built.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("IPNETBLOCKS_API_KEY").unwrap_or_default(),
            base_url: env::var("IPNETBLOCKS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            timeout: env::var("IPNETBLOCKS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .map(Duration::from_secs_f64)
                .unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
