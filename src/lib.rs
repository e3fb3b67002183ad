//! Client for the IP Netblocks WHOIS API.
//!
//! Look up registered address ranges by IP or CIDR, by autonomous system
//! number, or by organization search terms.
//!
//! ```no_run
//! use ipnetblocks::{Client, SearchQuery};
//!
//! # async fn run() -> ipnetblocks::Result<()> {
//! let client = Client::new("at_00000000000000000000000000000")?;
//! let response = client.get(&SearchQuery::by_ip("1.1.1.1").limit(Some(10))).await?;
//! for block in &response.inetnums {
//!     println!("{} {}", block.inetnum, block.netname);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod requester;
pub mod validate;

pub use client::{parse_response, Client};
pub use config::{Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{IpNetblocksError, Result};
pub use models::{AutonomousSystem, Contact, ErrorMessage, Inetnum, Maintainer, Org, Response};
pub use query::{build_payload, Payload, SearchQuery, DEFAULT_LIMIT};
pub use requester::ApiRequester;
pub use validate::{OrgTerms, OutputFormat};
