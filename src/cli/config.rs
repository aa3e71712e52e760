//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "session.debounce_ms")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    // Show path
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Reset config
    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            show_all_config(&config);
        }

        // Key only: show that value
        (Some(key), None) => {
            if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                eprintln!("Unknown config key: {}", key);
                eprintln!("\nAvailable keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                std::process::exit(1);
            }
        }

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        // Value without key: not valid
        (None, Some(_)) => {
            eprintln!("Error: Must specify a key to set a value");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    let quoted = |items: &[String]| {
        items
            .iter()
            .map(|s| format!("\"{}\"", s))
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!("[providers]");
    println!("order = [{}]", quoted(&config.providers.order));
    println!("google_url = \"{}\"", config.providers.google_url);
    println!("photon_url = \"{}\"", config.providers.photon_url);
    println!("nominatim_url = \"{}\"", config.providers.nominatim_url);
    println!("language = \"{}\"", config.providers.language);
    println!("max_suggestions = {}", config.providers.max_suggestions);
    println!();

    println!("[session]");
    println!("debounce_ms = {}", config.session.debounce_ms);
    println!("min_query_chars = {}", config.session.min_query_chars);
    println!("default_type = \"{}\"", config.session.default_type);
    println!();

    println!("[geolocation]");
    println!("enabled = {}", config.geolocation.enabled);
    println!("timeout_secs = {}", config.geolocation.timeout_secs);
    println!("ip_api_url = \"{}\"", config.geolocation.ip_api_url);
    println!();

    println!("[map]");
    println!("enabled = {}", config.map.enabled);
    println!("default_lat = {}", config.map.default_lat);
    println!("default_lng = {}", config.map.default_lng);
    println!("overview_zoom = {}", config.map.overview_zoom);
    println!("pinned_zoom = {}", config.map.pinned_zoom);
    println!("tile_url = \"{}\"", config.map.tile_url);
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[url]");
    println!("default = \"{}\"", config.url.default);
    println!();

    println!("[url.providers]");
    let mut providers: Vec<_> = config.url.providers.iter().collect();
    providers.sort();
    for (name, template) in providers {
        println!("{} = \"{}\"", name, template);
    }
    println!();

    println!("[api_keys]");
    if config.api_keys.google.is_empty() {
        println!("google = \"\" # not configured");
    } else {
        println!("google = \"***\" # configured");
    }
}
