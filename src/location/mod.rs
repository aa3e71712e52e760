//! Location data model
//!
//! This module holds the value types shared by every layer:
//! - `Coordinates` with range validation
//! - `LocationType` (physical, online, hybrid)
//! - `LocationData`, the value owned by the parent form
//! - `SuggestionRecord`, the query-scoped candidate returned while typing

pub mod suggestion;

pub use suggestion::{ProviderKind, SuggestionAddress, SuggestionRecord};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !self.lng.is_finite() || self.lng < -180.0 || self.lng > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Parse a lat/lng pair given as strings (the shape most geocoders return)
    pub fn parse(lat: &str, lng: &str) -> Result<Self> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCoordinates(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCoordinates(format!("Invalid longitude: {}", lng)))?;
        let coords = Self::new(lat, lng);
        coords.validate()?;
        Ok(coords)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// How an event or community meets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// A place on the map
    Physical,
    /// A meeting link or platform name; no map
    Online,
    /// Both a place and a meeting link
    Hybrid,
}

impl LocationType {
    /// Whether the search box and map are shown for this type
    pub fn uses_map(self) -> bool {
        !matches!(self, Self::Online)
    }
}

impl Default for LocationType {
    fn default() -> Self {
        Self::Physical
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Physical => write!(f, "physical"),
            Self::Online => write!(f, "online"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl std::str::FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "physical" | "offline" => Ok(Self::Physical),
            "online" | "virtual" => Ok(Self::Online),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(format!("Unknown location type: {}", s)),
        }
    }
}

/// The committed location value owned by the parent form
///
/// Serializes as `{address, lat, lng, city, country}` with nullable
/// `lat`/`lng`. Coordinates are stored as a single `Option`, so a value
/// with only one of the two can never be built; deserialization rejects it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "LocationDataWire", into = "LocationDataWire")]
pub struct LocationData {
    /// Human-readable address, or a meeting link for online locations
    pub address: String,
    /// Resolved coordinate, if any
    pub coords: Option<Coordinates>,
    /// Best-effort city, may be empty
    pub city: String,
    /// Best-effort country, may be empty
    pub country: String,
}

#[derive(Serialize, Deserialize)]
struct LocationDataWire {
    #[serde(default)]
    address: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
}

impl TryFrom<LocationDataWire> for LocationData {
    type Error = Error;

    fn try_from(wire: LocationDataWire) -> Result<Self> {
        let coords = match (wire.lat, wire.lng) {
            (Some(lat), Some(lng)) => {
                let coords = Coordinates::new(lat, lng);
                coords.validate()?;
                Some(coords)
            }
            (None, None) => None,
            _ => {
                return Err(Error::InvalidLocation(
                    "lat and lng must both be set or both be null".to_string(),
                ))
            }
        };

        Ok(Self {
            address: wire.address,
            coords,
            city: wire.city,
            country: wire.country,
        })
    }
}

impl From<LocationData> for LocationDataWire {
    fn from(data: LocationData) -> Self {
        Self {
            address: data.address,
            lat: data.coords.map(|c| c.lat),
            lng: data.coords.map(|c| c.lng),
            city: data.city,
            country: data.country,
        }
    }
}

impl LocationData {
    /// A fully resolved location
    pub fn resolved(
        address: impl Into<String>,
        coords: Coordinates,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            coords: Some(coords),
            city: city.into(),
            country: country.into(),
        }
    }

    /// An online location: free text, never coordinates
    pub fn online(text: impl Into<String>) -> Self {
        Self {
            address: text.into(),
            ..Self::default()
        }
    }

    /// Replace the address with typed text, clearing everything derived from
    /// the previous resolution
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            address: text.into(),
            coords: None,
            city: String::new(),
            country: String::new(),
        }
    }

    /// Set coordinates, keeping the current address until it is backfilled
    pub fn with_coords(&self, coords: Coordinates) -> Self {
        Self {
            coords: Some(coords),
            ..self.clone()
        }
    }

    pub fn lat(&self) -> Option<f64> {
        self.coords.map(|c| c.lat)
    }

    pub fn lng(&self) -> Option<f64> {
        self.coords.map(|c| c.lng)
    }

    /// True when the address has been resolved to a coordinate
    pub fn is_resolved(&self) -> bool {
        self.coords.is_some()
    }
}

/// Split a comma-separated display name into (city, country)
///
/// Uses the last part as the country and the one before it as the city.
/// Returns empty strings when there are not enough parts.
pub fn split_city_country(display_name: &str) -> (String, String) {
    let parts: Vec<&str> = display_name
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [.., city, country] => (city.to_string(), country.to_string()),
        _ => (String::new(), String::new()),
    }
}
