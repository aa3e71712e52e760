//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod locate;
pub mod search;
pub mod serve;
pub mod session;
pub mod status;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, url::UrlFormatter, OutputFormatter};
use crate::geo::ProviderChain;
use crate::location::LocationData;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Address search, geocoding and reverse geocoding
#[derive(Parser)]
#[command(name = "wayfind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show address suggestions for a partial query
    Suggest(search::SuggestArgs),

    /// Resolve text (or one of its suggestions) to a location
    Resolve(search::ResolveArgs),

    /// Find the address at a coordinate
    Reverse(locate::ReverseArgs),

    /// Show the current position and its address
    Here(locate::HereArgs),

    /// Interactive location picker over stdin
    Session(session::SessionArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show provider and server status
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    init_logging(level);

    match cli.command {
        Commands::Suggest(args) => search::run_suggest(args).await,
        Commands::Resolve(args) => search::run_resolve(args).await,
        Commands::Reverse(args) => locate::run_reverse(args).await,
        Commands::Here(args) => locate::run_here(args).await,
        Commands::Session(args) => session::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}

/// Log to stderr so stdout stays machine-readable
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load config and build the provider chain
pub(crate) fn load_chain() -> Result<(Config, ProviderChain)> {
    let config = Config::load()?;
    let chain = ProviderChain::from_config(&config)?;
    Ok((config, chain))
}

/// Look up an output formatter, with an optional "open in maps" provider
pub(crate) fn formatter(name: &str, url_provider: Option<String>) -> Result<Box<dyn OutputFormatter>> {
    if name.eq_ignore_ascii_case("url") {
        return Ok(Box::new(UrlFormatter::with_provider(url_provider)));
    }
    get_formatter(name).ok_or_else(|| {
        let known: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
        Error::Config(format!("Unknown format: {} (expected one of: {})", name, known.join(", ")))
    })
}

/// Print a single location in the chosen format
pub(crate) fn print_location(
    location: &LocationData,
    format: &str,
    url_provider: Option<String>,
    config: &Config,
) -> Result<()> {
    let output = formatter(format, url_provider)?.format(location, config)?;
    println!("{}", output.trim_end());
    Ok(())
}
