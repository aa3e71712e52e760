//! Reverse and here command handlers

use crate::error::Result;
use crate::geolocation::{locate_with_timeout, source_from_config};
use crate::location::{Coordinates, LocationData};
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Output format (text, json, url)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Map provider for the url format
    #[arg(long)]
    pub provider: Option<String>,
}

/// Here command arguments
#[derive(Args)]
pub struct HereArgs {
    /// Output format (text, json, url)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Map provider for the url format
    #[arg(long)]
    pub provider: Option<String>,
}

/// Run the reverse command
pub async fn run_reverse(args: ReverseArgs) -> Result<()> {
    let (config, chain) = super::load_chain()?;
    let coords = Coordinates::new(args.lat, args.lng);

    match chain.reverse(coords).await? {
        Some(location) => super::print_location(&location, &args.format, args.provider, &config),
        None => {
            eprintln!("No address found at {}", coords);
            super::print_location(&coordinate_only(coords), &args.format, args.provider, &config)
        }
    }
}

/// Run the here command
pub async fn run_here(args: HereArgs) -> Result<()> {
    let (config, chain) = super::load_chain()?;
    let source = source_from_config(&config.geolocation);

    let coords = match locate_with_timeout(source.as_ref(), config.geolocation_timeout()).await {
        Ok(coords) => coords,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    let location = chain
        .reverse(coords)
        .await?
        .unwrap_or_else(|| coordinate_only(coords));
    super::print_location(&location, &args.format, args.provider, &config)
}

/// A location whose address is just the coordinate
fn coordinate_only(coords: Coordinates) -> LocationData {
    LocationData::resolved(coords.to_string(), coords, "", "")
}
