//! chainreg CLI: inspect known chains and pick healthy RPC endpoints.
//!
//! # Commands
//! ```text
//! chainreg chains    [--testnets]
//! chainreg show      <chain>
//! chainreg rpcs      <chain>
//! chainreg check     <chain> [--timeout-ms <ms>] [--no-http] [--no-ws] [--provider <name>...]
//! chainreg fastest   <chain> [--ws] [--no-http] [--provider <name>...]
//! chainreg first     <chain> [--ws] [--no-http] [--provider <name>...]
//! chainreg random    <chain> [--ws] [--no-http] [--provider <name>...]
//! ```
//!
//! `<chain>` is a chain ID (`8453`, `0x2105`) or a name (`Base`).

mod logging;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use chainreg::{
    CallContext, ChainIdentifier, ChainRegistry, CheckOptions, EndpointStatus, RegistryConfig,
    SelectionCriteria, PROVIDER_DEFAULT, PROVIDER_PUBLIC,
};

#[derive(Parser)]
#[command(
    name = "chainreg",
    about = "EVM chain registry: list networks, health-check and select RPC endpoints",
    version
)]
struct Cli {
    /// JSON config file (timeouts, cache TTL, extra catalogs, RPC overrides, logging)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered chains
    Chains {
        /// Only show testnets
        #[arg(long)]
        testnets: bool,
    },

    /// Show the full record of one chain
    Show { chain: String },

    /// Default HTTP RPC URLs of a chain (overrides applied)
    Rpcs { chain: String },

    /// Probe every endpoint of a chain with eth_blockNumber
    Check {
        chain: String,
        /// Per-endpoint timeout
        #[arg(long, default_value_t = 5_000)]
        timeout_ms: u64,
        /// Skip HTTP endpoints
        #[arg(long)]
        no_http: bool,
        /// Skip WebSocket endpoints
        #[arg(long)]
        no_ws: bool,
        #[command(flatten)]
        providers: ProviderArgs,
    },

    /// Lowest-latency healthy endpoint
    Fastest {
        chain: String,
        #[command(flatten)]
        select: SelectArgs,
    },

    /// First configured endpoint matching the criteria (no network I/O)
    First {
        chain: String,
        #[command(flatten)]
        select: SelectArgs,
    },

    /// Random endpoint matching the criteria (no network I/O)
    Random {
        chain: String,
        #[command(flatten)]
        select: SelectArgs,
    },
}

#[derive(Args)]
struct ProviderArgs {
    /// Provider groups to use, in order (default: default, public)
    #[arg(long = "provider")]
    providers: Vec<String>,
    /// Use every provider group on the chain
    #[arg(long, conflicts_with = "providers")]
    all_providers: bool,
}

impl ProviderArgs {
    fn resolve(&self) -> Vec<String> {
        if self.all_providers {
            Vec::new()
        } else if self.providers.is_empty() {
            vec![PROVIDER_DEFAULT.into(), PROVIDER_PUBLIC.into()]
        } else {
            self.providers.clone()
        }
    }
}

#[derive(Args)]
struct SelectArgs {
    /// Allow WebSocket endpoints
    #[arg(long)]
    ws: bool,
    /// Disallow HTTP endpoints
    #[arg(long)]
    no_http: bool,
    #[command(flatten)]
    providers: ProviderArgs,
}

impl SelectArgs {
    fn criteria(&self) -> SelectionCriteria {
        SelectionCriteria {
            allow_http: !self.no_http,
            allow_websocket: self.ws,
            providers: self.providers.resolve(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RegistryConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    logging::init_tracing(&config.log, cli.verbose);

    let registry = ChainRegistry::from_config(&config).context("building chain registry")?;
    tracing::debug!(chains = registry.chains().len(), "registry loaded");

    match cli.command {
        Commands::Chains { testnets } => cmd_chains(&registry, testnets, cli.json),
        Commands::Show { chain } => cmd_show(&registry, &chain),
        Commands::Rpcs { chain } => {
            let urls = registry.get_chain_rpcs(identifier(&chain))?;
            print_urls(&urls, cli.json)
        }
        Commands::Check {
            chain,
            timeout_ms,
            no_http,
            no_ws,
            providers,
        } => {
            let options = CheckOptions {
                timeout_per_check: Duration::from_millis(timeout_ms),
                check_http: !no_http,
                check_websocket: !no_ws,
                providers: providers.resolve(),
            };
            cmd_check(&registry, &chain, &options, cli.json).await
        }
        Commands::Fastest { chain, select } => {
            let url = registry
                .get_fastest_rpc(&CallContext::background(), identifier(&chain), &select.criteria())
                .await?;
            print_urls(&[url], cli.json)
        }
        Commands::First { chain, select } => {
            let url = registry.get_first_rpc(identifier(&chain), &select.criteria())?;
            print_urls(&[url], cli.json)
        }
        Commands::Random { chain, select } => {
            let url = registry.get_random_rpc(identifier(&chain), &select.criteria())?;
            print_urls(&[url], cli.json)
        }
    }
}

fn identifier(chain: &str) -> ChainIdentifier {
    ChainIdentifier::from(chain)
}

fn cmd_chains(registry: &ChainRegistry, testnets: bool, json: bool) -> Result<()> {
    let chains: Vec<_> = registry
        .chains()
        .into_iter()
        .filter(|c| !testnets || c.is_testnet)
        .collect();

    if json {
        let records: Vec<_> = chains.iter().map(|c| c.as_ref()).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("{:<12} {:<32} {:<8} {}", "ID", "NAME", "SYMBOL", "TESTNET");
    for chain in chains {
        println!(
            "{:<12} {:<32} {:<8} {}",
            chain.id_string(),
            chain.name,
            chain.native_currency.symbol,
            if chain.is_testnet { "yes" } else { "" }
        );
    }
    Ok(())
}

fn cmd_show(registry: &ChainRegistry, chain: &str) -> Result<()> {
    let record = registry
        .directory()
        .resolve(&identifier(chain))?;
    println!("{}", serde_json::to_string_pretty(record.as_ref())?);
    Ok(())
}

async fn cmd_check(
    registry: &ChainRegistry,
    chain: &str,
    options: &CheckOptions,
    json: bool,
) -> Result<()> {
    let statuses = registry
        .check_rpcs(&CallContext::background(), identifier(chain), options)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("no endpoints match");
        return Ok(());
    }
    for status in &statuses {
        println!("{}", describe(status));
    }
    let up = statuses.iter().filter(|s| s.available).count();
    println!("\n{up}/{} endpoints available", statuses.len());
    Ok(())
}

fn describe(status: &EndpointStatus) -> String {
    match (&status.block_number, &status.error) {
        (Some(block), _) if status.available => format!(
            "  ok    {:>6}ms  block {:<12} {}",
            status.latency.as_millis(),
            block,
            status.url
        ),
        (_, Some(err)) => format!("  FAIL  {}  ({err})", status.url),
        _ => format!("  ?     {}", status.url),
    }
}

fn print_urls(urls: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(urls)?);
    } else {
        for url in urls {
            println!("{url}");
        }
    }
    Ok(())
}
