//! Nominatim geocoding backend (OpenStreetMap)
//!
//! The minimal open geocoder at the end of the chain, and the only provider
//! used for reverse geocoding.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::constants::api::NOMINATIM_URL;
use crate::error::{Error, Result};
use crate::geo::{get_json, http_client, trim_base, GeoProvider};
use crate::location::{Coordinates, LocationData, ProviderKind, SuggestionAddress, SuggestionRecord};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const NAME: &str = "nominatim";

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct Nominatim {
    client: reqwest::Client,
    base_url: String,
    language: Option<String>,
}

/// Nominatim search/reverse response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

/// `addressdetails=1` block; which keys appear depends on the place
#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    house_number: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
}

/// Reverse responses either carry a result or `{"error": "..."}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseResponse {
    Found(NominatimResult),
    Failed { error: String },
}

impl NominatimAddress {
    fn city(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
            .or(self.municipality.as_deref())
            .or(self.county.as_deref())
    }

    fn street(&self) -> Option<String> {
        match (&self.road, &self.house_number) {
            (Some(road), Some(number)) => Some(format!("{} {}", road, number)),
            (Some(road), None) => Some(road.clone()),
            _ => None,
        }
    }

    fn to_suggestion_address(&self) -> SuggestionAddress {
        SuggestionAddress {
            name: None,
            street: self.street(),
            city: self.city().map(str::to_string),
            state: self.state.clone(),
            postcode: self.postcode.clone(),
            country: self.country.clone(),
        }
    }
}

impl NominatimResult {
    fn into_location(self) -> Result<LocationData> {
        let coords = Coordinates::parse(&self.lat, &self.lon)?;
        let address = self.address.unwrap_or_default();
        Ok(LocationData::resolved(
            self.display_name,
            coords,
            address.city().unwrap_or_default(),
            address.country.clone().unwrap_or_default(),
        ))
    }

    fn into_suggestion(self) -> SuggestionRecord {
        SuggestionRecord {
            display_name: self.display_name,
            lat: Some(self.lat),
            lon: Some(self.lon),
            address: self.address.as_ref().map(NominatimAddress::to_suggestion_address),
            place_id: None,
            source: ProviderKind::Nominatim,
        }
    }
}

impl Nominatim {
    /// Create a Nominatim backend against the public instance
    pub fn new() -> Result<Self> {
        Self::with_base_url(NOMINATIM_URL)
    }

    /// Create a Nominatim backend against a specific instance
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: trim_base(base_url),
            language: None,
        })
    }

    /// Prefer results in this language (`accept-language`)
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.language = (!language.is_empty()).then_some(language);
        self
    }

    fn language_param(&self) -> String {
        self.language
            .as_deref()
            .map(|l| format!("&accept-language={}", urlencoding::encode(l)))
            .unwrap_or_default()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NominatimResult>> {
        let url = format!(
            "{}/search?q={}&format=json&limit={}&addressdetails=1{}",
            self.base_url,
            urlencoding::encode(query),
            limit,
            self.language_param()
        );
        get_json(&self.client, NAME, &url).await
    }
}

#[async_trait]
impl GeoProvider for Nominatim {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Nominatim
    }

    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<SuggestionRecord>> {
        let results = self.search(query, limit).await?;
        Ok(results
            .into_iter()
            .take(limit)
            .map(NominatimResult::into_suggestion)
            .collect())
    }

    async fn geocode(&self, query: &str) -> Result<Option<LocationData>> {
        match self.search(query, 1).await?.into_iter().next() {
            Some(result) => Ok(Some(result.into_location()?)),
            None => Ok(None),
        }
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Option<LocationData>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1{}",
            self.base_url,
            coords.lat,
            coords.lng,
            self.language_param()
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::provider(NAME, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            return Err(Error::provider(
                NAME,
                format!("returned status: {}", response.status()),
            ));
        }

        let result: ReverseResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(NAME, format!("failed to parse response: {}", e)))?;

        match result {
            ReverseResponse::Found(result) => Ok(Some(result.into_location()?)),
            ReverseResponse::Failed { error } => {
                debug!(%coords, %error, "nominatim found nothing at coordinate");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monas() -> NominatimResult {
        serde_json::from_value(serde_json::json!({
            "place_id": 1234,
            "lat": "-6.1753924",
            "lon": "106.8271528",
            "display_name": "Monumen Nasional, Gambir, Jakarta, Indonesia",
            "address": {
                "tourism": "Monumen Nasional",
                "road": "Jalan Medan Merdeka",
                "city": "Jakarta",
                "state": "Daerah Khusus Ibukota Jakarta",
                "postcode": "10110",
                "country": "Indonesia",
                "country_code": "id"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_result_into_location() {
        let location = monas().into_location().unwrap();
        assert_eq!(location.city, "Jakarta");
        assert_eq!(location.country, "Indonesia");
        assert!((location.lat().unwrap() - (-6.1753924)).abs() < 1e-9);
    }

    #[test]
    fn test_result_into_suggestion() {
        let record = monas().into_suggestion();
        assert_eq!(record.source, ProviderKind::Nominatim);
        assert!(record.validate().is_ok());
        let address = record.address.unwrap();
        assert_eq!(address.street.as_deref(), Some("Jalan Medan Merdeka"));
        assert_eq!(address.postcode.as_deref(), Some("10110"));
    }

    #[test]
    fn test_city_falls_back_to_town() {
        let address = NominatimAddress {
            town: Some("Bogor".to_string()),
            county: Some("Jawa Barat".to_string()),
            ..Default::default()
        };
        assert_eq!(address.city(), Some("Bogor"));
    }

    #[test]
    fn test_suggestion_address_city_falls_back_to_village() {
        let result: NominatimResult = serde_json::from_value(serde_json::json!({
            "lat": "-6.7833",
            "lon": "107.65",
            "display_name": "Cikole, Lembang, Indonesia",
            "address": { "village": "Cikole", "county": "Bandung Barat", "country": "Indonesia" }
        }))
        .unwrap();
        let address = result.into_suggestion().address.unwrap();
        assert_eq!(address.city.as_deref(), Some("Cikole"));
    }

    #[test]
    fn test_cityless_result_agrees_across_paths() {
        let raw = serde_json::json!({
            "lat": "-6.7833",
            "lon": "107.65",
            "display_name": "Jalan Raya, Cikole, 40391, Indonesia",
            "address": { "road": "Jalan Raya", "postcode": "40391", "country": "Indonesia" }
        });
        let selected = serde_json::from_value::<NominatimResult>(raw.clone())
            .unwrap()
            .into_suggestion()
            .to_location()
            .unwrap();
        let geocoded = serde_json::from_value::<NominatimResult>(raw)
            .unwrap()
            .into_location()
            .unwrap();

        assert_eq!(selected.city, "");
        assert_eq!(selected, geocoded);
    }

    #[test]
    fn test_reverse_error_shape() {
        let parsed: ReverseResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(matches!(parsed, ReverseResponse::Failed { .. }));
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let mut result = monas();
        result.lat = "invalid".to_string();
        assert!(result.into_location().is_err());
    }

    #[test]
    fn test_language_param() {
        let backend = Nominatim::new().unwrap().with_language("id");
        assert_eq!(backend.language_param(), "&accept-language=id");
        let backend = Nominatim::new().unwrap().with_language("");
        assert_eq!(backend.language_param(), "");
    }
}
