//! Google Maps Platform backend (Places Autocomplete, Place Details, Geocoding)
//!
//! Requires an API key. Autocomplete predictions carry only a `place_id`, so
//! selecting one costs a Place Details request. There is no reverse path.
//!
//! Every response has a `status` field: `OK` and `ZERO_RESULTS` are normal,
//! anything else (`REQUEST_DENIED`, `OVER_QUERY_LIMIT`, `INVALID_REQUEST`,
//! ...) is a provider failure.

use crate::constants::api::GOOGLE_MAPS_URL;
use crate::error::{Error, Result};
use crate::geo::{get_json, http_client, trim_base, GeoProvider};
use crate::location::{Coordinates, LocationData, ProviderKind, SuggestionRecord};
use async_trait::async_trait;
use serde::Deserialize;

const NAME: &str = "google";
const DETAIL_FIELDS: &str = "geometry,formatted_address,name,address_components";

/// Google Places backend
#[derive(Debug, Clone)]
pub struct GooglePlaces {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    description: String,
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Shared by Place Details and Geocoding results
#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    name: Option<String>,
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl PlaceResult {
    fn component(&self, kind: &str) -> Option<&str> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
            .map(|c| c.long_name.as_str())
    }

    fn into_location(self) -> Result<LocationData> {
        let coords = Coordinates::new(self.geometry.location.lat, self.geometry.location.lng);
        coords.validate()?;

        let city = self
            .component("locality")
            .or_else(|| self.component("administrative_area_level_2"))
            .unwrap_or_default()
            .to_string();
        let country = self.component("country").unwrap_or_default().to_string();

        let address = self
            .formatted_address
            .or(self.name)
            .ok_or_else(|| Error::provider(NAME, "result without an address"))?;

        Ok(LocationData::resolved(address, coords, city, country))
    }
}

/// Map a non-OK status to an error; `ZERO_RESULTS` / `NOT_FOUND` mean empty
fn check_status(status: &str, error_message: Option<String>) -> Result<bool> {
    match status {
        "OK" => Ok(true),
        "ZERO_RESULTS" | "NOT_FOUND" => Ok(false),
        other => Err(Error::provider(
            NAME,
            match error_message {
                Some(message) => format!("{}: {}", other, message),
                None => other.to_string(),
            },
        )),
    }
}

impl GooglePlaces {
    /// Create a backend against the public Maps web services
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, GOOGLE_MAPS_URL)
    }

    /// Create a backend against a specific base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config("Google Places requires an API key".to_string()));
        }

        Ok(Self {
            client: http_client()?,
            base_url: trim_base(base_url),
            api_key,
            language: None,
        })
    }

    /// Prefer results in this language (`language`)
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.language = (!language.is_empty()).then_some(language);
        self
    }

    fn url(&self, path: &str, params: &str) -> String {
        let mut url = format!(
            "{}/{}?{}&key={}",
            self.base_url,
            path,
            params,
            urlencoding::encode(&self.api_key)
        );
        if let Some(language) = &self.language {
            url.push_str(&format!("&language={}", urlencoding::encode(language)));
        }
        url
    }
}

#[async_trait]
impl GeoProvider for GooglePlaces {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<SuggestionRecord>> {
        let url = self.url(
            "place/autocomplete/json",
            &format!("input={}", urlencoding::encode(query)),
        );
        let response: AutocompleteResponse = get_json(&self.client, NAME, &url).await?;

        if !check_status(&response.status, response.error_message)? {
            return Ok(Vec::new());
        }

        Ok(response
            .predictions
            .into_iter()
            .take(limit)
            .map(|p| SuggestionRecord::with_place_id(p.description, p.place_id, ProviderKind::Google))
            .collect())
    }

    async fn geocode(&self, query: &str) -> Result<Option<LocationData>> {
        let url = self.url(
            "geocode/json",
            &format!("address={}", urlencoding::encode(query)),
        );
        let response: GeocodeResponse = get_json(&self.client, NAME, &url).await?;

        if !check_status(&response.status, response.error_message)? {
            return Ok(None);
        }

        match response.results.into_iter().next() {
            Some(result) => Ok(Some(result.into_location()?)),
            None => Ok(None),
        }
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<LocationData>> {
        let url = self.url(
            "place/details/json",
            &format!(
                "place_id={}&fields={}",
                urlencoding::encode(place_id),
                DETAIL_FIELDS
            ),
        );
        let response: DetailsResponse = get_json(&self.client, NAME, &url).await?;

        if !check_status(&response.status, response.error_message)? {
            return Ok(None);
        }

        match response.result {
            Some(result) => Ok(Some(result.into_location()?)),
            None => Ok(None),
        }
    }
}
