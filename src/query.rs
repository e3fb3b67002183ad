//! Search parameters and their wire payload.

use serde::Serialize;

use crate::error::{IpNetblocksError, Result};
use crate::validate::{
    validate_asn, validate_ip, validate_limit, validate_mask, validate_org, OrgTerms,
    OutputFormat,
};

/// Default number of records requested.
pub const DEFAULT_LIMIT: i64 = 100;

/// Search terms for one lookup. At least one of `ip`, `asn` or `org` must be
/// set before the query is sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub ip: Option<String>,
    pub asn: Option<i64>,
    pub org: Option<OrgTerms>,
    /// CIDR prefix length, only meaningful together with `ip`.
    pub mask: Option<i64>,
    pub limit: Option<i64>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            ip: None,
            asn: None,
            org: None,
            mask: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_ip(ip: impl Into<String>) -> Self {
        Self::new().ip(ip)
    }

    pub fn by_asn(asn: i64) -> Self {
        Self::new().asn(asn)
    }

    pub fn by_org(org: impl Into<OrgTerms>) -> Self {
        Self::new().org(org)
    }

    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn asn(mut self, asn: i64) -> Self {
        self.asn = Some(asn);
        self
    }

    pub fn org(mut self, org: impl Into<OrgTerms>) -> Self {
        self.org = Some(org.into());
        self
    }

    pub fn mask(mut self, mask: i64) -> Self {
        self.mask = Some(mask);
        self
    }

    /// `None` leaves the record cap to the service.
    pub fn limit(mut self, limit: Option<i64>) -> Self {
        self.limit = limit;
        self
    }

    fn has_search_term(&self) -> bool {
        self.ip.is_some() || self.asn.is_some() || self.org.is_some()
    }
}

/// Ordered query-string pairs using the service's parameter names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pairs: Vec<(&'static str, String)>,
}

impl Payload {
    fn push(&mut self, key: &'static str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// First value sent under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| *k == key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Validates `query` and assembles the wire payload.
///
/// The search-term rule is checked before any field validation. Fields
/// whose value is absent are left out of the payload entirely; each org
/// term becomes its own `org[]` pair.
pub fn build_payload(
    api_key: &str,
    query: &SearchQuery,
    format: OutputFormat,
) -> Result<Payload> {
    if api_key.is_empty() {
        return Err(IpNetblocksError::EmptyApiKey);
    }
    if !query.has_search_term() {
        return Err(IpNetblocksError::parameter(
            "Required one of the following input fields: ip, org, asn.",
        ));
    }

    let ip = validate_ip(query.ip.as_deref())?;
    let mask = validate_mask(query.mask, query.ip.as_deref())?;
    let limit = validate_limit(query.limit)?;
    let asn = validate_asn(query.asn)?;
    let org = validate_org(query.org.clone())?;

    let mut payload = Payload::default();
    payload.push("apiKey", Some(api_key));
    payload.push("ip", ip);
    payload.push("asn", asn);
    if let Some(org) = &org {
        for term in org.terms() {
            payload.push("org[]", Some(term));
        }
    }
    payload.push("mask", mask);
    payload.push("limit", limit);
    payload.push("outputFormat", Some(format));
    Ok(payload)
}
