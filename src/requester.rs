//! HTTP transport for the IP Netblocks API.

use std::time::Duration;

use reqwest::Url;
use tracing::{debug, warn};

use crate::error::{IpNetblocksError, Result};
use crate::models::ErrorMessage;
use crate::query::Payload;

const USER_AGENT: &str = concat!("ipnetblocks-rust/", env!("CARGO_PKG_VERSION"));

/// Longest slice of a non-JSON error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Sends a validated payload and returns the raw response body.
#[derive(Debug, Clone)]
pub struct ApiRequester {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiRequester {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base_url = parse_base_url(base_url)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Performs one GET request. Statuses of 300 and above are mapped by
    /// [`classify_status`]; connection failures come back as
    /// [`IpNetblocksError::Transport`].
    pub async fn get(&self, payload: &Payload) -> Result<String> {
        debug!(
            url = %self.base_url,
            params = payload.len(),
            timeout_secs = self.timeout.as_secs_f64(),
            "Sending IP netblocks request"
        );

        let response = self
            .http
            .get(self.base_url.clone())
            .query(payload.pairs())
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        if let Some(err) = classify_status(status, &body) {
            warn!(status, "IP netblocks API request failed: {}", err);
            return Err(err);
        }

        debug!(status, bytes = body.len(), "Received IP netblocks response");
        Ok(body)
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url)
        .map_err(|e| IpNetblocksError::parameter(format!("Invalid base URL '{base_url}': {e}")))
}

/// Maps an HTTP status to its error kind, or `None` below 300.
///
/// The message comes from the service's error envelope when the body has
/// one, otherwise from the start of the body text.
pub fn classify_status(status: u16, body: &str) -> Option<IpNetblocksError> {
    if status < 300 {
        return None;
    }

    let message = ErrorMessage::from_body(body)
        .map(|m| m.message)
        .unwrap_or_else(|| truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS));

    Some(match status {
        401..=403 => IpNetblocksError::Auth { status, message },
        400 | 422 => IpNetblocksError::BadRequest { status, message },
        _ => IpNetblocksError::Http { status, message },
    })
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}
