use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ipnetblocks::{Client, Config, OrgTerms, OutputFormat, SearchQuery, DEFAULT_LIMIT};

/// Look up IP netblocks by address, ASN or organization.
///
/// The API key is read from IPNETBLOCKS_API_KEY; IPNETBLOCKS_BASE_URL and
/// IPNETBLOCKS_TIMEOUT_SECS override the endpoint and timeout.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// IPv4/IPv6 address or CIDR to search for
    #[arg(long)]
    ip: Option<String>,

    /// Prefix length for --ip (1-32 for IPv4, 1-128 for IPv6)
    #[arg(long, requires = "ip")]
    mask: Option<i64>,

    /// Autonomous system number
    #[arg(long, alias = "as")]
    asn: Option<i64>,

    /// Organization search term, repeat for several
    #[arg(long)]
    org: Vec<String>,

    /// Maximum number of records (1-1000)
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    limit: i64,

    /// Response format: json or xml
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Print the response body as received instead of the parsed result
    #[arg(long)]
    raw: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = Config::from_env();
    if config.api_key.is_empty() {
        bail!("IPNETBLOCKS_API_KEY is not set");
    }
    let client = Client::with_config(config).context("Failed to create client")?;

    let mut query = SearchQuery::new().limit(Some(args.limit));
    query.ip = args.ip;
    query.mask = args.mask;
    query.asn = args.asn;
    query.org = match args.org.len() {
        0 => None,
        1 => args.org.into_iter().next().map(OrgTerms::Single),
        _ => Some(OrgTerms::Many(args.org)),
    };

    if args.raw || args.format == OutputFormat::Xml {
        let body = client.get_raw(&query, args.format).await?;
        println!("{}", body);
        return Ok(());
    }

    let response = client.get(&query).await?;
    info!(
        "Found {} netblocks for '{}', showing {}",
        response.count,
        response.search,
        response.inetnums.len()
    );
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(["ipnetblocks"].iter().chain(argv))
    }

    #[test]
    fn test_asn_flag() {
        assert_eq!(parse(&["--asn", "13335"]).unwrap().asn, Some(13335));
        assert_eq!(parse(&["--as", "15169"]).unwrap().asn, Some(15169));
    }

    #[test]
    fn test_mask_requires_ip() {
        assert!(parse(&["--mask", "24"]).is_err());
        assert!(parse(&["--ip", "1.1.1.0", "--mask", "24"]).is_ok());
    }
}
