//! Data models for IP netblock lookups.
//!
//! The service's JSON is loosely typed: keys go missing, values arrive as
//! `null`, numbers sometimes come as strings. Each model is therefore built
//! by hand from a [`serde_json::Value`] rather than derived, and every field
//! falls back to its zero value instead of failing. Only two conditions
//! abort a parse: a root without a `result` envelope, and a netblock whose
//! `modified` timestamp does not match `YYYY-MM-DDTHH:MM:SSZ`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::error::{IpNetblocksError, Result};

/// Mirrors the service's truthiness: null, false, 0, "", [] and {} are
/// treated the same as a missing key.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn field<'a>(values: &'a Value, key: &str) -> Option<&'a Value> {
    values.get(key).filter(|v| is_truthy(v))
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_value(values: &Value, key: &str) -> String {
    field(values, key).map(stringify).unwrap_or_default()
}

fn int_value(values: &Value, key: &str) -> i64 {
    match field(values, key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or_default()
        }
        Some(Value::Bool(true)) => 1,
        _ => 0,
    }
}

/// Reads a 64-bit bound from its decimal-string key, which keeps full
/// precision, then from the plain numeric key.
fn u64_value(values: &Value, string_key: &str, numeric_key: &str) -> u64 {
    field(values, string_key)
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse::<u64>().ok())
        .or_else(|| field(values, numeric_key).and_then(Value::as_u64))
        .unwrap_or_default()
}

/// Null elements are skipped; any other non-string element, nested
/// objects included, is kept as its JSON text.
fn list_value(values: &Value, key: &str) -> Vec<String> {
    match values.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(stringify)
            .collect(),
        _ => Vec::new(),
    }
}

fn list_of_objects<T>(values: &Value, key: &str, build: fn(&Value) -> T) -> Vec<T> {
    match values.get(key) {
        Some(Value::Array(items)) => items.iter().map(build).collect(),
        _ => Vec::new(),
    }
}

fn try_list_of_objects<T>(
    values: &Value,
    key: &str,
    build: fn(&Value) -> Result<T>,
) -> Result<Vec<T>> {
    match values.get(key) {
        Some(Value::Array(items)) => items.iter().map(build).collect(),
        _ => Ok(Vec::new()),
    }
}

static NULL: Value = Value::Null;

/// A missing key and an explicit `null` both yield the zero-valued object.
fn object_value<T>(values: &Value, key: &str, build: fn(&Value) -> T) -> T {
    build(values.get(key).unwrap_or(&NULL))
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime> {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
    match PrimitiveDateTime::parse(value, format) {
        Ok(parsed) => Ok(parsed.assume_utc()),
        Err(e) => {
            let message = format!("Invalid modified timestamp '{value}': {e}");
            Err(IpNetblocksError::unparsable(message))
        }
    }
}

/// Autonomous system announcing a netblock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutonomousSystem {
    pub asn: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub as_type: String,
    pub route: String,
    pub domain: String,
}

impl AutonomousSystem {
    pub fn from_value(values: &Value) -> Self {
        Self {
            asn: int_value(values, "asn"),
            name: string_value(values, "name"),
            as_type: string_value(values, "type"),
            route: string_value(values, "route"),
            domain: string_value(values, "domain"),
        }
    }
}

/// Abuse, admin or tech contact of a netblock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub id: String,
    pub person: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub city: String,
    pub address: Vec<String>,
}

impl Contact {
    pub fn from_value(values: &Value) -> Self {
        Self {
            id: string_value(values, "id"),
            person: string_value(values, "person"),
            role: string_value(values, "role"),
            email: string_value(values, "email"),
            phone: string_value(values, "phone"),
            country: string_value(values, "country"),
            city: string_value(values, "city"),
            address: list_value(values, "address"),
        }
    }
}

/// Registry maintainer object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Maintainer {
    pub mntner: String,
    pub email: String,
}

impl Maintainer {
    pub fn from_value(values: &Value) -> Self {
        Self {
            mntner: string_value(values, "mntner"),
            email: string_value(values, "email"),
        }
    }
}

/// Organization a netblock is registered to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Org {
    pub org: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub city: String,
    pub postal_code: String,
    pub address: Vec<String>,
}

impl Org {
    pub fn from_value(values: &Value) -> Self {
        Self {
            org: string_value(values, "org"),
            name: string_value(values, "name"),
            email: string_value(values, "email"),
            phone: string_value(values, "phone"),
            country: string_value(values, "country"),
            city: string_value(values, "city"),
            postal_code: string_value(values, "postalCode"),
            address: list_value(values, "address"),
        }
    }
}

/// One registered address range and its registry metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inetnum {
    /// Human-readable range, e.g. `1.1.1.0 - 1.1.1.255`.
    pub inetnum: String,
    pub inetnum_first: u64,
    pub inetnum_last: u64,
    pub parent: String,
    #[serde(rename = "as")]
    pub autonomous_system: Option<AutonomousSystem>,
    pub netname: String,
    pub nethandle: String,
    pub description: Vec<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub modified: Option<OffsetDateTime>,
    pub country: String,
    pub city: String,
    pub address: Vec<String>,
    pub abuse_contact: Vec<Contact>,
    pub admin_contact: Vec<Contact>,
    pub tech_contact: Vec<Contact>,
    pub org: Option<Org>,
    pub mnt_by: Vec<Maintainer>,
    pub mnt_domains: Vec<Maintainer>,
    pub mnt_lower: Vec<Maintainer>,
    pub mnt_routes: Vec<Maintainer>,
    pub remarks: Vec<String>,
    pub source: String,
}

impl Inetnum {
    /// An empty or null node yields the all-default record with no `as`,
    /// `org` or `modified`. Any other node must carry a valid `modified`.
    pub fn from_value(values: &Value) -> Result<Self> {
        if !is_truthy(values) {
            return Ok(Self::default());
        }

        let contact = Contact::from_value;
        let maintainer = Maintainer::from_value;
        Ok(Self {
            inetnum: string_value(values, "inetnum"),
            inetnum_first: u64_value(values, "inetnumFirstString", "inetnumFirst"),
            inetnum_last: u64_value(values, "inetnumLastString", "inetnumLast"),
            parent: string_value(values, "parent"),
            autonomous_system: Some(object_value(values, "as", AutonomousSystem::from_value)),
            netname: string_value(values, "netname"),
            nethandle: string_value(values, "nethandle"),
            description: list_value(values, "description"),
            modified: Some(parse_timestamp(&string_value(values, "modified"))?),
            country: string_value(values, "country"),
            city: string_value(values, "city"),
            address: list_value(values, "address"),
            abuse_contact: list_of_objects(values, "abuseContact", contact),
            admin_contact: list_of_objects(values, "adminContact", contact),
            tech_contact: list_of_objects(values, "techContact", contact),
            org: Some(object_value(values, "org", Org::from_value)),
            mnt_by: list_of_objects(values, "mntBy", maintainer),
            mnt_domains: list_of_objects(values, "mntDomains", maintainer),
            mnt_lower: list_of_objects(values, "mntLower", maintainer),
            mnt_routes: list_of_objects(values, "mntRoutes", maintainer),
            remarks: list_value(values, "remarks"),
            source: string_value(values, "source"),
        })
    }
}

/// Parsed lookup result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    /// The search term echoed back by the service.
    pub search: String,
    /// Total matches known to the service, not the number returned.
    pub count: i64,
    pub limit: i64,
    pub inetnums: Vec<Inetnum>,
}

impl Response {
    /// Fails when the root is not an object carrying a `result` key.
    pub fn from_value(values: &Value) -> Result<Self> {
        let Some(result) = values.as_object().and_then(|root| root.get("result")) else {
            let message = "Could not find the correct root element.";
            return Err(IpNetblocksError::unparsable(message));
        };

        Ok(Self {
            search: string_value(values, "search"),
            count: int_value(result, "count"),
            limit: int_value(result, "limit"),
            inetnums: try_list_of_objects(result, "inetnums", Inetnum::from_value)?,
        })
    }
}

impl FromStr for Response {
    type Err = IpNetblocksError;

    fn from_str(s: &str) -> Result<Self> {
        let parsed: Value = serde_json::from_str(s)?;
        Self::from_value(&parsed)
    }
}

/// Error envelope returned in place of a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub code: i64,
    pub message: String,
}

impl ErrorMessage {
    pub fn from_value(values: &Value) -> Self {
        Self {
            code: int_value(values, "code"),
            message: string_value(values, "messages"),
        }
    }

    /// Recognizes the envelope: a JSON object with a `messages` key and no
    /// `result`.
    pub fn from_envelope(values: &Value) -> Option<Self> {
        let root = values.as_object()?;
        if root.contains_key("result") || !root.contains_key("messages") {
            return None;
        }
        Some(Self::from_value(values))
    }

    pub fn from_body(body: &str) -> Option<Self> {
        let parsed: Value = serde_json::from_str(body).ok()?;
        Self::from_envelope(&parsed)
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
