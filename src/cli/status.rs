//! Status command handler
//!
//! Shows the active provider chain and, optionally, a running server.

use crate::config::Config;
use crate::error::Result;
use crate::geo::ProviderChain;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    println!("wayfind v{}", env!("CARGO_PKG_VERSION"));
    println!();

    match ProviderChain::from_config(&config) {
        Ok(chain) => {
            let names: Vec<&str> = chain.kinds().into_iter().map(|k| k.as_str()).collect();
            println!("Providers: {}", names.join(" -> "));
        }
        Err(e) => println!("Providers: ERROR ({})", e),
    }
    if config.api_keys.google.is_empty() {
        println!("  google: skipped (no api key)");
    }
    println!(
        "Geolocation: {}",
        if config.geolocation.enabled { "enabled" } else { "disabled" }
    );
    println!(
        "Map: {}",
        if config.map.enabled { "enabled" } else { "disabled" }
    );
    println!();

    if args.server {
        check_server_status(&config).await;
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(body) = response.text().await {
                    if let Ok(status) = serde_json::from_str::<serde_json::Value>(&body) {
                        if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                            println!("  Version: {}", version);
                        }
                        if let Some(uptime) = status.get("uptime_secs").and_then(|v| v.as_u64()) {
                            println!("  Uptime: {}s", uptime);
                        }
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
}
