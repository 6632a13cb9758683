use std::time::Duration;

use anyhow::{Context, Result, bail};
use bunnydns::{BatchError, BunnyProvider, DnsProvider, ProviderConfig, Record, codec, config};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// Bunny.net API access key
    #[arg(long, value_name = "KEY", env = "BUNNY_API_KEY", hide_env_values = true)]
    access_key: String,
    /// Bunny.net API base URL
    #[arg(long, value_name = "URL", default_value = config::DEFAULT_BASE_URL)]
    base_url: String,
    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
    /// Log every API request
    #[arg(long)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the zones the access key can manage
    Zones,
    /// List the records under a domain
    Records {
        /// Zone apex or subdomain (e.g. example.com or sub.example.com)
        domain: String,
    },
    /// Create a record
    Append(RecordArgs),
    /// Create a record, or update the one with the same name and type
    Set(RecordArgs),
    /// Delete the record with the same name and type
    Delete(RecordArgs),
}

#[derive(Args, Debug)]
struct RecordArgs {
    /// Zone apex or subdomain the name is relative to
    domain: String,
    /// Relative record name, "@" for the domain itself
    #[arg(long, value_name = "NAME", default_value = "@")]
    name: String,
    /// Record type (A, AAAA, CNAME, TXT, MX, SRV, CAA, NS, PTR, ...)
    #[arg(long = "type", value_name = "TYPE")]
    rtype: String,
    /// TTL in seconds
    #[arg(long, value_name = "SECS", default_value_t = 300)]
    ttl: u64,
    /// Record value in presentation format (e.g. "10 mail.example.com" for MX)
    #[arg(long, value_name = "VALUE")]
    value: String,
}

impl RecordArgs {
    fn record(&self) -> Result<Record> {
        let rtype = codec::canonical_type(&self.rtype)
            .map(str::to_string)
            .unwrap_or_else(|| self.rtype.to_ascii_uppercase());
        Record::parse(
            &self.name,
            &rtype,
            Duration::from_secs(self.ttl),
            &self.value,
        )
        .with_context(|| format!("invalid {} record '{}'", self.rtype, self.name))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = build_provider_config(&cli)?;
    let provider = BunnyProvider::new(&config).context("failed to build HTTP client")?;

    match &cli.command {
        Command::Zones => {
            for zone in provider.list_zones().await.context("failed to list zones")? {
                println!("{}", zone.name);
            }
        }
        Command::Records { domain } => {
            let records = provider
                .get_records(domain)
                .await
                .with_context(|| format!("failed to list records of {domain}"))?;
            for record in &records {
                print_record(record);
            }
        }
        Command::Append(args) => {
            let records = [args.record()?];
            let applied = batch(provider.append_records(&args.domain, &records).await)?;
            applied.iter().for_each(print_record);
        }
        Command::Set(args) => {
            let records = [args.record()?];
            let applied = batch(provider.set_records(&args.domain, &records).await)?;
            applied.iter().for_each(print_record);
        }
        Command::Delete(args) => {
            let records = [args.record()?];
            let deleted = batch(provider.delete_records(&args.domain, &records).await)?;
            info!("deleted {} record(s) from {}", deleted.len(), args.domain);
        }
    }

    Ok(())
}

fn batch(result: std::result::Result<Vec<Record>, BatchError>) -> Result<Vec<Record>> {
    result.map_err(|err| {
        for record in &err.applied {
            warn!("already applied: {} {}", record.owner_name(), record.rtype());
        }
        anyhow::Error::new(err)
    })
}

fn print_record(record: &Record) {
    println!(
        "{}\t{}\t{}\t{}",
        record.owner_name(),
        record.ttl.as_secs(),
        record.rtype(),
        record.value()
    );
}

fn build_provider_config(cli: &Cli) -> Result<ProviderConfig> {
    if cli.access_key.trim().is_empty() {
        bail!("--access-key must not be empty");
    }
    if cli.timeout_secs == 0 {
        bail!("--timeout-secs must be at least 1");
    }

    Ok(ProviderConfig::new(cli.access_key.trim())
        .with_base_url(cli.base_url.trim())
        .with_timeout(Duration::from_secs(cli.timeout_secs)))
}

fn init_tracing(debug: bool) {
    let default = if debug { "info,bunnydns=debug" } else { "info" };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
