//! wayfind CLI entry point
//!
//! Address search and geocoding - CLI + web API

use wayfind::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
