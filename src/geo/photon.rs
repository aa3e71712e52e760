//! Photon search-as-you-type backend (komoot)
//!
//! Free, key-less, and built for autocomplete: every feature already carries
//! its coordinate, so suggestions from here never need a follow-up lookup.

use crate::constants::api::PHOTON_URL;
use crate::error::Result;
use crate::geo::{get_json, http_client, join_parts, trim_base, GeoProvider};
use crate::location::{Coordinates, LocationData, ProviderKind, SuggestionAddress, SuggestionRecord};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const NAME: &str = "photon";

/// Photon backend
#[derive(Debug, Clone)]
pub struct Photon {
    client: reqwest::Client,
    base_url: String,
    language: Option<String>,
}

/// GeoJSON FeatureCollection
#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    geometry: PhotonGeometry,
    #[serde(default)]
    properties: PhotonProperties,
}

#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    /// GeoJSON order: [lon, lat]
    coordinates: [f64; 2],
}

#[derive(Debug, Default, Deserialize)]
struct PhotonProperties {
    name: Option<String>,
    street: Option<String>,
    housenumber: Option<String>,
    city: Option<String>,
    district: Option<String>,
    county: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
}

impl PhotonProperties {
    fn street(&self) -> Option<String> {
        match (&self.street, &self.housenumber) {
            (Some(street), Some(number)) => Some(format!("{} {}", street, number)),
            (Some(street), None) => Some(street.clone()),
            _ => None,
        }
    }

    fn city(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.district.as_deref())
            .or(self.county.as_deref())
    }

    fn display_name(&self) -> String {
        let street = self.street();
        join_parts([
            self.name.as_deref(),
            street.as_deref(),
            self.city(),
            self.country.as_deref(),
        ])
    }
}

impl PhotonFeature {
    fn coords(&self) -> Coordinates {
        let [lon, lat] = self.geometry.coordinates;
        Coordinates::new(lat, lon)
    }

    fn into_suggestion(self) -> Option<SuggestionRecord> {
        let coords = self.coords();
        if coords.validate().is_err() {
            debug!(%coords, "photon feature with out-of-range coordinate skipped");
            return None;
        }

        let display_name = self.properties.display_name();
        if display_name.is_empty() {
            return None;
        }

        let props = self.properties;
        let address = SuggestionAddress {
            name: props.name.clone(),
            street: props.street(),
            city: props.city().map(str::to_string),
            state: props.state.clone(),
            postcode: props.postcode.clone(),
            country: props.country.clone(),
        };

        Some(SuggestionRecord::with_coords(
            display_name,
            coords,
            Some(address),
            ProviderKind::Photon,
        ))
    }
}

impl Photon {
    /// Create a Photon backend against the public instance
    pub fn new() -> Result<Self> {
        Self::with_base_url(PHOTON_URL)
    }

    /// Create a Photon backend against a specific instance
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: trim_base(base_url),
            language: None,
        })
    }

    /// Prefer results in this language (`lang`)
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.language = (!language.is_empty()).then_some(language);
        self
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<PhotonFeature>> {
        let mut url = format!(
            "{}/api/?q={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );
        if let Some(lang) = &self.language {
            url.push_str(&format!("&lang={}", urlencoding::encode(lang)));
        }

        let response: PhotonResponse = get_json(&self.client, NAME, &url).await?;
        Ok(response.features)
    }
}

#[async_trait]
impl GeoProvider for Photon {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Photon
    }

    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<SuggestionRecord>> {
        let features = self.search(query, limit).await?;
        Ok(features
            .into_iter()
            .filter_map(PhotonFeature::into_suggestion)
            .take(limit)
            .collect())
    }

    async fn geocode(&self, query: &str) -> Result<Option<LocationData>> {
        let features = self.search(query, 1).await?;
        Ok(features
            .into_iter()
            .filter_map(PhotonFeature::into_suggestion)
            .find_map(|record| record.to_location()))
    }
}
