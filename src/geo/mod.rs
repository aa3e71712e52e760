//! Geocoding providers
//!
//! Every provider implements `GeoProvider` and normalizes its own response
//! shape into `SuggestionRecord` / `LocationData`. `ProviderChain` walks an
//! ordered list of them, falling through on failure.

pub mod chain;
pub mod google;
pub mod nominatim;
pub mod photon;

#[cfg(test)]
pub(crate) mod testing;

pub use chain::ProviderChain;

use crate::constants::api::USER_AGENT;
use crate::error::{Error, Result};
use crate::location::{Coordinates, LocationData, ProviderKind, SuggestionRecord};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Trait for geocoding backends
///
/// `place_details` and `reverse_geocode` are optional capabilities; the
/// default implementations report `Error::Unsupported`.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Which provider this is
    fn kind(&self) -> ProviderKind;

    /// Provider name for logs and errors
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Ranked place candidates for a partial query, at most `limit`
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<SuggestionRecord>>;

    /// Forward geocode free text to the best match
    async fn geocode(&self, query: &str) -> Result<Option<LocationData>>;

    /// Look up a place by provider identifier
    async fn place_details(&self, _place_id: &str) -> Result<Option<LocationData>> {
        Err(Error::Unsupported {
            provider: self.name(),
            operation: "place details",
        })
    }

    /// Reverse geocode a coordinate to an address
    async fn reverse_geocode(&self, _coords: Coordinates) -> Result<Option<LocationData>> {
        Err(Error::Unsupported {
            provider: self.name(),
            operation: "reverse geocoding",
        })
    }
}

/// Build the HTTP client shared by a provider
pub(crate) fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}

/// GET a URL and decode its JSON body, tagging failures with the provider
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    provider: &'static str,
    url: &str,
) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::provider(provider, format!("request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::provider(
            provider,
            format!("returned status: {}", response.status()),
        ));
    }

    response
        .json()
        .await
        .map_err(|e| Error::provider(provider, format!("failed to parse response: {}", e)))
}

/// Join non-empty parts with ", ", skipping repeats
pub(crate) fn join_parts<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for part in parts.into_iter().flatten() {
        let part = part.trim();
        if !part.is_empty() && !seen.contains(&part) {
            seen.push(part);
        }
    }
    seen.join(", ")
}

/// Strip a trailing slash so paths can be appended uniformly
pub(crate) fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
