//! Device geolocation ("use my current location")
//!
//! A `PositionSource` answers with a one-shot coordinate or a typed failure.
//! Callers bound the request with `locate_with_timeout`; positions are never
//! cached between requests.

pub mod ip;

use crate::config::GeolocationConfig;
use crate::location::Coordinates;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub use ip::IpPositionSource;

/// Why a position request failed
///
/// `Display` carries technical detail for logs; `user_message` is what a
/// person sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("geolocation permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("position request timed out after {0:?}")]
    Timeout(Duration),

    #[error("geolocation is not supported here")]
    Unsupported,

    #[error("unknown geolocation failure: {0}")]
    Unknown(String),
}

impl GeolocationError {
    /// Short, cause-specific message for a notification
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location access was denied. Allow location access or search for an address instead."
            }
            Self::PositionUnavailable(_) => {
                "Your location could not be determined right now. Try searching for an address."
            }
            Self::Timeout(_) => "Finding your location took too long. Please try again.",
            Self::Unsupported => "Location detection is not available on this device.",
            Self::Unknown(_) => "Something went wrong while getting your location.",
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::PositionUnavailable(_) => "POSITION_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::Unsupported => "UNSUPPORTED",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}

/// A source of the current device position
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Request the current position once
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// A source that always refuses; used when geolocation is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedPositionSource;

#[async_trait]
impl PositionSource for DeniedPositionSource {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::PermissionDenied)
    }
}

/// The position source configured for this process
pub fn source_from_config(config: &GeolocationConfig) -> Arc<dyn PositionSource> {
    if config.enabled {
        Arc::new(IpPositionSource::with_url(config.ip_api_url.clone()))
    } else {
        Arc::new(DeniedPositionSource)
    }
}

/// Request a position, giving up after `timeout`
pub async fn locate_with_timeout(
    source: &dyn PositionSource,
    timeout: Duration,
) -> Result<Coordinates, GeolocationError> {
    let result = match tokio::time::timeout(timeout, source.current_position()).await {
        Ok(result) => result,
        Err(_) => Err(GeolocationError::Timeout(timeout)),
    };

    if let Err(e) = &result {
        warn!(error = %e, "geolocation failed");
    }
    result
}
