//! wayfind: address search with provider fallback
//!
//! A library and CLI tool that turns free-text address input into a
//! structured location (address, coordinates, city, country).
//!
//! ## Features
//!
//! - Debounced as-you-type suggestions with stale-result protection
//! - Provider fallback chain: Google Places (with an API key), Photon, Nominatim
//! - Reverse geocoding for map pin drags and "use my current location"
//! - Headless map view model (center, zoom, single draggable marker)
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use wayfind::geo::ProviderChain;
//! use wayfind::geolocation::IpPositionSource;
//! use wayfind::session::{LocationSession, SessionEvent, SessionOptions};
//!
//! # async fn demo() -> wayfind::Result<()> {
//! let config = wayfind::Config::load()?;
//! let chain = Arc::new(ProviderChain::from_config(&config)?);
//! let position = Arc::new(IpPositionSource::new());
//!
//! let (mut session, mut events) =
//!     LocationSession::new(chain, position, SessionOptions::from_config(&config));
//!
//! session.input("Eiffel Tower").await;
//! while let Some(event) = events.recv().await {
//!     if let SessionEvent::Suggestions(records) = event {
//!         session.select_record(records[0].clone()).await?;
//!         break;
//!     }
//! }
//! println!("{:?}", session.location());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod geolocation;
pub mod location;
pub mod map;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::{GeoProvider, ProviderChain};
pub use location::{Coordinates, LocationData, LocationType, ProviderKind, SuggestionRecord};
pub use session::{LocationSession, SessionEvent};
