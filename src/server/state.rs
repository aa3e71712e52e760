//! Server shared state
//!
//! Holds configuration and the geocoding engine shared by every request.

use crate::config::Config;
use crate::error::Result;
use crate::geo::ProviderChain;
use crate::geolocation::{source_from_config, PositionSource};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Provider chain, built once at startup
    pub chain: Arc<ProviderChain>,

    /// Device position source
    pub position: Arc<dyn PositionSource>,

    started_at: DateTime<Utc>,
}

impl AppState {
    /// Create application state from configuration
    pub fn new(config: Config) -> Result<Self> {
        let chain = Arc::new(ProviderChain::from_config(&config)?);
        let position = source_from_config(&config.geolocation);
        Ok(Self::with_parts(config, chain, position))
    }

    /// Create application state from prebuilt parts
    pub fn with_parts(
        config: Config,
        chain: Arc<ProviderChain>,
        position: Arc<dyn PositionSource>,
    ) -> Self {
        Self {
            config,
            chain,
            position,
            started_at: Utc::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}
