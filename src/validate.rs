//! Request parameter validation.
//!
//! Every check runs before a request is built, so malformed input never
//! reaches the network. Each validator returns the value in the exact form
//! the service expects on the wire.

use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{IpNetblocksError, Result};

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = r"(?i)^at_[a-z0-9]{29}$";
    Regex::new(pattern).expect("api key pattern")
});

/// Strict dotted quad: no leading zeros, each octet at most 255.
static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    let octet = "([0-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])";
    let pattern = format!(r"^({octet}\.){{3}}{octet}$");
    Regex::new(&pattern).expect("ipv4 pattern")
});

const MAX_IPV4_MASK: i64 = 32;
const MAX_IPV6_MASK: i64 = 128;
const MAX_ASN: i64 = 4_294_967_295;
const MAX_LIMIT: i64 = 1000;

/// Wire encoding of the API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Parsed into a [`crate::Response`] by the client.
    #[default]
    Json,
    /// Returned to the caller verbatim.
    Xml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = IpNetblocksError;

    fn from_str(s: &str) -> Result<Self> {
        validate_output_format(s)
    }
}

/// Organization search terms: one term or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OrgTerms {
    Single(String),
    Many(Vec<String>),
}

impl OrgTerms {
    /// Terms in the order they are sent.
    pub fn terms(&self) -> Vec<&str> {
        match self {
            OrgTerms::Single(term) => vec![term.as_str()],
            OrgTerms::Many(terms) => terms.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for OrgTerms {
    fn from(term: &str) -> Self {
        OrgTerms::Single(term.to_string())
    }
}

impl From<String> for OrgTerms {
    fn from(term: String) -> Self {
        OrgTerms::Single(term)
    }
}

impl From<Vec<String>> for OrgTerms {
    fn from(terms: Vec<String>) -> Self {
        OrgTerms::Many(terms)
    }
}

impl From<Vec<&str>> for OrgTerms {
    fn from(terms: Vec<&str>) -> Self {
        OrgTerms::Many(terms.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OrgTerms {
    fn from(terms: [&str; N]) -> Self {
        OrgTerms::Many(terms.iter().map(|t| t.to_string()).collect())
    }
}

pub fn validate_api_key(key: &str) -> Result<String> {
    if API_KEY_RE.is_match(key) {
        Ok(key.to_string())
    } else {
        Err(IpNetblocksError::parameter("Invalid API key format."))
    }
}

pub fn is_ipv4(value: &str) -> bool {
    IPV4_RE.is_match(value)
}

/// Full IPv6 text form, with optional `%zone` suffix and surrounding
/// whitespace. The zone is any non-empty text, whitespace included.
pub fn is_ipv6(value: &str) -> bool {
    let value = value.trim_start();
    let address = match value.split_once('%') {
        Some((_, "")) => return false,
        Some((address, _zone)) => address,
        None => value.trim_end(),
    };
    address.parse::<Ipv6Addr>().is_ok()
}

pub fn validate_ip(ip: Option<&str>) -> Result<Option<String>> {
    match ip {
        None => Ok(None),
        Some(value) if is_ipv4(value) || is_ipv6(value) => Ok(Some(value.to_string())),
        Some(_) => Err(IpNetblocksError::parameter("Invalid ip address")),
    }
}

/// The mask bound depends on the address family of `ip`.
pub fn validate_mask(mask: Option<i64>, ip: Option<&str>) -> Result<Option<u32>> {
    let Some(value) = mask else {
        return Ok(None);
    };
    let max = match ip {
        Some(ip) if is_ipv4(ip) => MAX_IPV4_MASK,
        Some(ip) if is_ipv6(ip) => MAX_IPV6_MASK,
        _ => 0,
    };
    if value > 0 && value <= max {
        Ok(Some(value as u32))
    } else {
        Err(IpNetblocksError::parameter(
            "mask should be an int between 0 and 32 for IPv4 (0 and 128 for IPv6) or None",
        ))
    }
}

pub fn validate_asn(asn: Option<i64>) -> Result<Option<u32>> {
    match asn {
        None => Ok(None),
        Some(value) if value > 0 && value <= MAX_ASN => Ok(Some(value as u32)),
        Some(_) => Err(IpNetblocksError::parameter(
            "asn should be an int between 1 and 4294967295 or None",
        )),
    }
}

pub fn validate_limit(limit: Option<i64>) -> Result<Option<u32>> {
    match limit {
        None => Ok(None),
        Some(value) if value > 0 && value <= MAX_LIMIT => Ok(Some(value as u32)),
        Some(_) => {
            Err(IpNetblocksError::parameter("limit should be an int between 1 and 1000 or None"))
        }
    }
}

pub fn validate_org(org: Option<OrgTerms>) -> Result<Option<OrgTerms>> {
    match org {
        Some(OrgTerms::Single(ref term)) if term.is_empty() => {
            Err(IpNetblocksError::parameter("org should be str or [str] or None"))
        }
        Some(OrgTerms::Many(ref terms)) if terms.is_empty() => {
            Err(IpNetblocksError::parameter("org should be str or [str] or None"))
        }
        other => Ok(other),
    }
}

pub fn validate_output_format(format: &str) -> Result<OutputFormat> {
    match format.to_lowercase().as_str() {
        "json" => Ok(OutputFormat::Json),
        "xml" => Ok(OutputFormat::Xml),
        _ => Err(IpNetblocksError::parameter(format!(
            "Response format must be {} or {}",
            OutputFormat::Json,
            OutputFormat::Xml
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod api_key_tests {
        use super::*;

        #[test]
        fn test_valid_key() {
            let key = "at_00000000000000000000000000000";
            assert_eq!(validate_api_key(key).unwrap(), key);
        }

        #[test]
        fn test_key_is_case_insensitive() {
            assert!(validate_api_key("AT_ABCDEFGHIJKLMNOPQRSTUVWXYZ012").is_ok());
        }

        #[test]
        fn test_wrong_length_rejected() {
            assert!(validate_api_key("at_0000").is_err());
            assert!(validate_api_key("at_000000000000000000000000000000").is_err());
        }

        #[test]
        fn test_empty_key_rejected() {
            assert!(validate_api_key("").unwrap_err().is_parameter_error());
        }
    }

    mod ip_tests {
        use super::*;

        #[test]
        fn test_ipv4_passes_unchanged() {
            for ip in ["8.8.8.8", "0.0.0.0", "255.255.255.255", "10.0.100.1"] {
                assert_eq!(validate_ip(Some(ip)).unwrap().as_deref(), Some(ip));
            }
        }

        #[test]
        fn test_invalid_ipv4_rejected() {
            let invalid = ["345.567.890.12", "1.1.1", "1.1.1.1.1", "01.1.1.1"];
            for ip in invalid.into_iter().chain(["a.b.c.d", ""]) {
                assert!(validate_ip(Some(ip)).is_err(), "{ip} should fail");
            }
        }

        #[test]
        fn test_ipv6_forms() {
            for ip in [
                "2001:db8::1",
                "::",
                "::1",
                "fe80::1%eth0",
                "::ffff:192.168.1.1",
                "2001:0db8:0000:0000:0000:ff00:0042:8329",
            ] {
                assert_eq!(validate_ip(Some(ip)).unwrap().as_deref(), Some(ip));
            }
        }

        #[test]
        fn test_whitespace_zone_accepted() {
            assert!(is_ipv6("::% "));
            assert!(is_ipv6("fe80::1% "));
            assert!(is_ipv6("  fe80::1%eth0  "));
            assert!(!is_ipv6("fe80::1%"));
            assert!(!is_ipv6("fe80::1 %eth0"));
        }

        #[test]
        fn test_invalid_ipv6_rejected() {
            for ip in ["2001:db8:::1", "fe80::1%", "12345::", "1:2:3:4:5:6:7:8:9"] {
                assert!(validate_ip(Some(ip)).is_err(), "{ip} should fail");
            }
        }

        #[test]
        fn test_none_passes() {
            assert_eq!(validate_ip(None).unwrap(), None);
        }
    }

    mod mask_tests {
        use super::*;

        #[test]
        fn test_ipv4_bounds() {
            assert_eq!(validate_mask(Some(32), Some("1.1.1.1")).unwrap(), Some(32));
            assert_eq!(validate_mask(Some(1), Some("1.1.1.1")).unwrap(), Some(1));
            assert!(validate_mask(Some(33), Some("1.1.1.1")).is_err());
            assert!(validate_mask(Some(0), Some("1.1.1.1")).is_err());
        }

        #[test]
        fn test_ipv6_bounds() {
            let ip = Some("2001:db8::");
            assert_eq!(validate_mask(Some(128), ip).unwrap(), Some(128));
            assert!(validate_mask(Some(129), ip).is_err());
            assert!(validate_mask(Some(-1), ip).is_err());
        }

        #[test]
        fn test_mask_without_ip_rejected() {
            assert!(validate_mask(Some(24), None).is_err());
        }

        #[test]
        fn test_none_always_passes() {
            assert_eq!(validate_mask(None, None).unwrap(), None);
            assert_eq!(validate_mask(None, Some("bogus")).unwrap(), None);
        }
    }

    mod range_tests {
        use super::*;

        #[test]
        fn test_asn_range() {
            assert_eq!(validate_asn(Some(1)).unwrap(), Some(1));
            assert_eq!(validate_asn(Some(4_294_967_295)).unwrap(), Some(u32::MAX));
            assert!(validate_asn(Some(0)).is_err());
            assert!(validate_asn(Some(4_294_967_296)).is_err());
            assert_eq!(validate_asn(None).unwrap(), None);
        }

        #[test]
        fn test_limit_range() {
            assert_eq!(validate_limit(Some(1000)).unwrap(), Some(1000));
            assert!(validate_limit(Some(1001)).is_err());
            assert!(validate_limit(Some(0)).is_err());
            assert_eq!(validate_limit(None).unwrap(), None);
        }
    }

    mod org_tests {
        use super::*;

        #[test]
        fn test_single_and_many() {
            assert!(validate_org(Some("google".into())).is_ok());
            assert!(validate_org(Some(["gogl", "google"].into())).is_ok());
            assert_eq!(validate_org(None).unwrap(), None);
        }

        #[test]
        fn test_empty_rejected() {
            assert!(validate_org(Some("".into())).is_err());
            assert!(validate_org(Some(OrgTerms::Many(vec![]))).is_err());
        }

        #[test]
        fn test_terms_order() {
            let org: OrgTerms = ["a", "b"].into();
            assert_eq!(org.terms(), vec!["a", "b"]);
        }
    }

    mod output_format_tests {
        use super::*;

        #[test]
        fn test_case_insensitive() {
            assert_eq!(validate_output_format("XML").unwrap(), OutputFormat::Xml);
            assert_eq!(validate_output_format("Json").unwrap(), OutputFormat::Json);
            assert_eq!("xml".parse::<OutputFormat>().unwrap().as_str(), "xml");
        }

        #[test]
        fn test_unknown_rejected() {
            assert!(validate_output_format("yaml").is_err());
        }
    }
}
