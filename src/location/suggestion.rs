//! Suggestion records returned while the user is typing

use super::{split_city_country, Coordinates, LocationData};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which provider produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Google Places (commercial, key-gated)
    Google,
    /// Komoot Photon (free search-as-you-type)
    Photon,
    /// OpenStreetMap Nominatim (minimal geocoder)
    Nominatim,
}

impl ProviderKind {
    /// Whether the provider is the commercial, key-gated one
    pub fn is_commercial(self) -> bool {
        matches!(self, Self::Google)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Photon => "photon",
            Self::Nominatim => "nominatim",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "google_places" => Ok(Self::Google),
            "photon" => Ok(Self::Photon),
            "nominatim" | "osm" => Ok(Self::Nominatim),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// Structured address parts, all optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// A single candidate place
///
/// Coordinates stay strings as the open geocoders send them. A record
/// carries either parseable coordinates or a `place_id` for a follow-up
/// details lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<SuggestionAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub source: ProviderKind,
}

impl SuggestionRecord {
    /// A record with direct coordinates
    pub fn with_coords(
        display_name: impl Into<String>,
        coords: Coordinates,
        address: Option<SuggestionAddress>,
        source: ProviderKind,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            lat: Some(coords.lat.to_string()),
            lon: Some(coords.lng.to_string()),
            address,
            place_id: None,
            source,
        }
    }

    /// A record that must be resolved through a details lookup
    pub fn with_place_id(
        display_name: impl Into<String>,
        place_id: impl Into<String>,
        source: ProviderKind,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            lat: None,
            lon: None,
            address: None,
            place_id: Some(place_id.into()),
            source,
        }
    }

    /// Direct coordinates, if present and parseable
    pub fn coords(&self) -> Option<Coordinates> {
        match (&self.lat, &self.lon) {
            (Some(lat), Some(lon)) => Coordinates::parse(lat, lon).ok(),
            _ => None,
        }
    }

    /// Check the coordinates-or-identifier invariant
    pub fn validate(&self) -> Result<()> {
        if self.display_name.trim().is_empty() {
            return Err(Error::InvalidSuggestion("empty display name".to_string()));
        }
        let has_place_id = self.place_id.as_deref().is_some_and(|id| !id.is_empty());
        if self.coords().is_none() && !has_place_id {
            return Err(Error::InvalidSuggestion(format!(
                "'{}' has neither coordinates nor a place id",
                self.display_name
            )));
        }
        Ok(())
    }

    /// Build a location directly from the record, without a network call
    ///
    /// Returns `None` when the record has no usable coordinates.
    pub fn to_location(&self) -> Option<LocationData> {
        let coords = self.coords()?;
        // Display-name splitting only when the provider sent no address block
        let (city, country) = match &self.address {
            Some(address) => (
                address.city.clone().unwrap_or_default(),
                address.country.clone().unwrap_or_default(),
            ),
            None => split_city_country(&self.display_name),
        };

        Some(LocationData::resolved(
            self.display_name.clone(),
            coords,
            city,
            country,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_with_coords_resolves_locally() {
        let record = SuggestionRecord::with_coords(
            "Eiffel Tower, Paris, France",
            Coordinates::new(48.8584, 2.2945),
            Some(SuggestionAddress {
                city: Some("Paris".to_string()),
                country: Some("France".to_string()),
                ..Default::default()
            }),
            ProviderKind::Photon,
        );

        assert!(record.validate().is_ok());
        let location = record.to_location().unwrap();
        assert_eq!(location.address, "Eiffel Tower, Paris, France");
        assert_eq!(location.lat(), Some(48.8584));
        assert_eq!(location.lng(), Some(2.2945));
        assert_eq!(location.city, "Paris");
        assert_eq!(location.country, "France");
    }

    #[test]
    fn test_record_without_address_uses_display_name() {
        let record = SuggestionRecord::with_coords(
            "Monas, Jakarta, Indonesia",
            Coordinates::new(-6.1754, 106.8272),
            None,
            ProviderKind::Nominatim,
        );
        let location = record.to_location().unwrap();
        assert_eq!(location.city, "Jakarta");
        assert_eq!(location.country, "Indonesia");
    }

    #[test]
    fn test_address_without_city_does_not_split_display_name() {
        let record = SuggestionRecord::with_coords(
            "Jalan Raya, Cikole, 40391, Indonesia",
            Coordinates::new(-6.7833, 107.65),
            Some(SuggestionAddress {
                street: Some("Jalan Raya".to_string()),
                postcode: Some("40391".to_string()),
                country: Some("Indonesia".to_string()),
                ..Default::default()
            }),
            ProviderKind::Nominatim,
        );
        let location = record.to_location().unwrap();
        assert_eq!(location.city, "");
        assert_eq!(location.country, "Indonesia");
    }

    #[test]
    fn test_place_id_record_needs_lookup() {
        let record = SuggestionRecord::with_place_id("Monas", "ChIJabc", ProviderKind::Google);
        assert!(record.validate().is_ok());
        assert!(record.coords().is_none());
        assert!(record.to_location().is_none());
    }

    #[test]
    fn test_record_with_neither_is_invalid() {
        let record: SuggestionRecord = serde_json::from_value(serde_json::json!({
            "displayName": "Somewhere",
            "source": "photon"
        }))
        .unwrap();
        assert!(record.validate().is_err());

        let record: SuggestionRecord = serde_json::from_value(serde_json::json!({
            "displayName": "Somewhere",
            "lat": "not a number",
            "lon": "1.0",
            "source": "nominatim"
        }))
        .unwrap();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_record_wire_shape() {
        let record = SuggestionRecord::with_place_id("Monas", "ChIJabc", ProviderKind::Google);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["displayName"], "Monas");
        assert_eq!(json["placeId"], "ChIJabc");
        assert_eq!(json["source"], "google");
        assert!(json.get("lat").is_none());
    }

    #[test]
    fn test_provider_kind_parse() {
        use std::str::FromStr;
        assert_eq!(ProviderKind::from_str("Photon").unwrap(), ProviderKind::Photon);
        assert_eq!(ProviderKind::from_str("osm").unwrap(), ProviderKind::Nominatim);
        assert!(ProviderKind::from_str("bing").is_err());
        assert!(ProviderKind::Google.is_commercial());
        assert!(!ProviderKind::Photon.is_commercial());
    }
}
