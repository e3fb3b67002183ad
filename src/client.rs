//! High-level IP Netblocks client.
//!
//! [`Client`] validates search parameters, sends them through an
//! [`ApiRequester`] and, for the JSON output format, turns the body into a
//! [`Response`]. Results are only returned, never cached on the client, so
//! one client can serve concurrent lookups.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::config::{Config, DEFAULT_BASE_URL};
use crate::error::{IpNetblocksError, Result};
use crate::models::{ErrorMessage, Response};
use crate::query::{build_payload, SearchQuery};
use crate::requester::ApiRequester;
use crate::validate::{validate_api_key, OrgTerms, OutputFormat};

#[derive(Debug, Clone)]
pub struct Client {
    api_key: String,
    requester: ApiRequester,
}

impl Client {
    /// Client for the default endpoint. Fails when `api_key` is malformed.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(Config::new(api_key))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let api_key = validate_api_key(&config.api_key)?;
        let requester = ApiRequester::new(&config.base_url, config.timeout)?;
        Ok(Self { api_key, requester })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Replaces the key; a malformed key leaves the current one in place.
    pub fn set_api_key(&mut self, api_key: &str) -> Result<()> {
        self.api_key = validate_api_key(api_key)?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.requester.base_url()
    }

    /// `None` restores the default endpoint.
    pub fn set_base_url(&mut self, base_url: Option<&str>) -> Result<()> {
        let base_url = base_url.unwrap_or(DEFAULT_BASE_URL);
        self.requester.set_base_url(base_url)
    }

    pub fn timeout(&self) -> Duration {
        self.requester.timeout()
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.requester.set_timeout(timeout);
    }

    /// Looks up netblocks and parses the JSON result.
    pub async fn get(&self, query: &SearchQuery) -> Result<Response> {
        let body = self.get_raw(query, OutputFormat::Json).await?;
        parse_response(&body)
    }

    /// Looks up netblocks and returns the body as sent by the service.
    pub async fn get_raw(&self, query: &SearchQuery, format: OutputFormat) -> Result<String> {
        let payload = build_payload(&self.api_key, query, format)?;
        self.requester.get(&payload).await
    }

    /// Netblocks announced by an autonomous system.
    pub async fn get_by_asn(&self, asn: i64, limit: Option<i64>) -> Result<Response> {
        self.get(&SearchQuery::by_asn(asn).limit(limit)).await
    }

    /// Netblocks whose netblock or organization fields contain the terms.
    pub async fn get_by_org(
        &self,
        org: impl Into<OrgTerms>,
        limit: Option<i64>,
    ) -> Result<Response> {
        self.get(&SearchQuery::by_org(org).limit(limit)).await
    }
}

/// Parses a JSON body into a [`Response`].
///
/// A body without `result` that carries the service's error envelope fails
/// with [`IpNetblocksError::Response`]; any other body without `result`
/// is unparsable.
pub fn parse_response(body: &str) -> Result<Response> {
    let parsed: Value = serde_json::from_str(body)?;
    if let Some(message) = ErrorMessage::from_envelope(&parsed) {
        return Err(IpNetblocksError::Response(message));
    }
    let response = Response::from_value(&parsed)?;
    debug!(
        search = %response.search,
        count = response.count,
        returned = response.inetnums.len(),
        "Parsed IP netblocks response"
    );
    Ok(response)
}
