//! IP-based geolocation
//!
//! Uses ip-api.com to approximate the device position. Each request goes to
//! the network; a stale position is never reused.

use crate::constants::api::IP_API_URL;
use crate::geolocation::{GeolocationError, PositionSource};
use crate::location::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// IP position source
#[derive(Debug, Clone)]
pub struct IpPositionSource {
    client: reqwest::Client,
    url: String,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    country: Option<String>,
}

impl IpPositionSource {
    /// Create a source against the public ip-api.com endpoint
    pub fn new() -> Self {
        Self::with_url(IP_API_URL)
    }

    /// Create a source against a specific endpoint
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    fn unavailable(detail: impl Into<String>) -> GeolocationError {
        GeolocationError::PositionUnavailable(detail.into())
    }
}

impl Default for IpPositionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IpApiResponse {
    fn into_coords(self) -> Result<Coordinates, GeolocationError> {
        if self.status != "success" {
            return Err(IpPositionSource::unavailable(format!(
                "IP location lookup failed: {}",
                self.message.unwrap_or_else(|| self.status.clone())
            )));
        }

        let (Some(lat), Some(lng)) = (self.lat, self.lon) else {
            return Err(IpPositionSource::unavailable("no coordinates in response"));
        };

        let coords = Coordinates::new(lat, lng);
        coords
            .validate()
            .map_err(|e| IpPositionSource::unavailable(e.to_string()))?;

        debug!(
            %coords,
            city = self.city.as_deref().unwrap_or("-"),
            country = self.country.as_deref().unwrap_or("-"),
            "IP position"
        );
        Ok(coords)
    }
}

#[async_trait]
impl PositionSource for IpPositionSource {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Self::unavailable(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::unavailable(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Self::unavailable(format!("Failed to parse IP location response: {}", e)))?;

        data.into_coords()
    }
}
