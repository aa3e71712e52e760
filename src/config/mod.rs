//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/wayfind/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::location::{Coordinates, LocationType, ProviderKind};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding provider settings
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Interactive session settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Device geolocation settings
    #[serde(default)]
    pub geolocation: GeolocationConfig,

    /// Map view settings
    #[serde(default)]
    pub map: MapConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// "Open in maps" URL settings
    #[serde(default)]
    pub url: UrlConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Provider priority; google is skipped without an API key
    #[serde(default = "default_provider_order")]
    pub order: Vec<String>,

    /// Google Maps web services base URL
    #[serde(default = "default_google_url")]
    pub google_url: String,

    /// Photon base URL
    #[serde(default = "default_photon_url")]
    pub photon_url: String,

    /// Nominatim base URL
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// Preferred result language (e.g. "en", "id"); empty for provider default
    #[serde(default = "default_language")]
    pub language: String,

    /// Maximum suggestions per query
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

/// Interactive session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Quiet period before a suggestion fetch, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries shorter than this are never sent
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Location type for new sessions
    #[serde(default = "default_location_type")]
    pub default_type: String,
}

/// Device geolocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// If false, position requests are denied
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Position request timeout in seconds
    #[serde(default = "default_geolocation_timeout")]
    pub timeout_secs: u64,

    /// IP geolocation endpoint
    #[serde(default = "default_ip_api_url")]
    pub ip_api_url: String,
}

/// Map view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// If false, sessions run text-only
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Center latitude when nothing is pinned
    #[serde(default = "default_map_lat")]
    pub default_lat: f64,

    /// Center longitude when nothing is pinned
    #[serde(default = "default_map_lng")]
    pub default_lng: f64,

    /// Zoom when nothing is pinned
    #[serde(default = "default_overview_zoom")]
    pub overview_zoom: u8,

    /// Zoom when a coordinate is pinned
    #[serde(default = "default_pinned_zoom")]
    pub pinned_zoom: u8,

    /// Tile URL template with {z}, {x}, {y}
    #[serde(default = "default_tile_url")]
    pub tile_url: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Google Maps Platform key (Places + Geocoding)
    #[serde(default)]
    pub google: String,
}

// Default value functions for serde
fn default_provider_order() -> Vec<String> {
    DEFAULT_PROVIDER_ORDER.iter().map(|s| s.to_string()).collect()
}
fn default_google_url() -> String {
    DEFAULT_GOOGLE_URL.to_string()
}
fn default_photon_url() -> String {
    DEFAULT_PHOTON_URL.to_string()
}
fn default_nominatim_url() -> String {
    DEFAULT_NOMINATIM_URL.to_string()
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_min_query_chars() -> usize {
    DEFAULT_MIN_QUERY_CHARS
}
fn default_location_type() -> String {
    DEFAULT_LOCATION_TYPE.to_string()
}
fn default_true() -> bool {
    true
}
fn default_geolocation_timeout() -> u64 {
    DEFAULT_GEOLOCATION_TIMEOUT_SECS
}
fn default_ip_api_url() -> String {
    DEFAULT_IP_API_URL.to_string()
}
fn default_map_lat() -> f64 {
    DEFAULT_MAP_LAT
}
fn default_map_lng() -> f64 {
    DEFAULT_MAP_LNG
}
fn default_overview_zoom() -> u8 {
    DEFAULT_OVERVIEW_ZOOM
}
fn default_pinned_zoom() -> u8 {
    DEFAULT_PINNED_ZOOM
}
fn default_tile_url() -> String {
    DEFAULT_TILE_URL.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/search/?api=1&query={lat},{lng}".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=17/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            order: default_provider_order(),
            google_url: default_google_url(),
            photon_url: default_photon_url(),
            nominatim_url: default_nominatim_url(),
            language: default_language(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            default_type: default_location_type(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_geolocation_timeout(),
            ip_api_url: default_ip_api_url(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_lat: default_map_lat(),
            default_lng: default_map_lng(),
            overview_zoom: default_overview_zoom(),
            pinned_zoom: default_pinned_zoom(),
            tile_url: default_tile_url(),
        }
    }
}

impl MapConfig {
    /// Center used when nothing is pinned
    pub fn default_center(&self) -> Coordinates {
        Coordinates::new(self.default_lat, self.default_lng)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["providers", "order"] => Some(self.providers.order.join(",")),
            ["providers", "google_url"] => Some(self.providers.google_url.clone()),
            ["providers", "photon_url"] => Some(self.providers.photon_url.clone()),
            ["providers", "nominatim_url"] => Some(self.providers.nominatim_url.clone()),
            ["providers", "language"] => Some(self.providers.language.clone()),
            ["providers", "max_suggestions"] => Some(self.providers.max_suggestions.to_string()),

            ["session", "debounce_ms"] => Some(self.session.debounce_ms.to_string()),
            ["session", "min_query_chars"] => Some(self.session.min_query_chars.to_string()),
            ["session", "default_type"] => Some(self.session.default_type.clone()),

            ["geolocation", "enabled"] => Some(self.geolocation.enabled.to_string()),
            ["geolocation", "timeout_secs"] => Some(self.geolocation.timeout_secs.to_string()),
            ["geolocation", "ip_api_url"] => Some(self.geolocation.ip_api_url.clone()),

            ["map", "enabled"] => Some(self.map.enabled.to_string()),
            ["map", "default_lat"] => Some(self.map.default_lat.to_string()),
            ["map", "default_lng"] => Some(self.map.default_lng.to_string()),
            ["map", "overview_zoom"] => Some(self.map.overview_zoom.to_string()),
            ["map", "pinned_zoom"] => Some(self.map.pinned_zoom.to_string()),
            ["map", "tile_url"] => Some(self.map.tile_url.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            ["api_keys", "google"] => Some(self.api_keys.google.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["providers", "order"] => {
                let order: Vec<String> = value
                    .split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                for name in &order {
                    ProviderKind::from_str(name).map_err(Error::Config)?;
                }
                self.providers.order = order;
            }
            ["providers", "google_url"] => {
                self.providers.google_url = value.to_string();
            }
            ["providers", "photon_url"] => {
                self.providers.photon_url = value.to_string();
            }
            ["providers", "nominatim_url"] => {
                self.providers.nominatim_url = value.to_string();
            }
            ["providers", "language"] => {
                self.providers.language = value.to_string();
            }
            ["providers", "max_suggestions"] => {
                self.providers.max_suggestions = parse_positive(value, "max_suggestions")?;
            }

            ["session", "debounce_ms"] => {
                self.session.debounce_ms = parse_value(value, "debounce_ms")?;
            }
            ["session", "min_query_chars"] => {
                self.session.min_query_chars = parse_positive(value, "min_query_chars")?;
            }
            ["session", "default_type"] => {
                LocationType::from_str(value).map_err(Error::Config)?;
                self.session.default_type = value.to_lowercase();
            }

            ["geolocation", "enabled"] => {
                self.geolocation.enabled = parse_value(value, "boolean")?;
            }
            ["geolocation", "timeout_secs"] => {
                self.geolocation.timeout_secs = parse_positive(value, "timeout")?;
            }
            ["geolocation", "ip_api_url"] => {
                self.geolocation.ip_api_url = value.to_string();
            }

            ["map", "enabled"] => {
                self.map.enabled = parse_value(value, "boolean")?;
            }
            ["map", "default_lat"] => {
                self.map.default_lat = parse_within(value, "latitude", 90.0)?;
            }
            ["map", "default_lng"] => {
                self.map.default_lng = parse_within(value, "longitude", 180.0)?;
            }
            ["map", "overview_zoom"] => {
                self.map.overview_zoom = parse_value(value, "zoom")?;
            }
            ["map", "pinned_zoom"] => {
                self.map.pinned_zoom = parse_value(value, "zoom")?;
            }
            ["map", "tile_url"] => {
                self.map.tile_url = value.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(value, "port")?;
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            ["api_keys", "google"] => {
                self.api_keys.google = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "providers.order",
            "providers.google_url",
            "providers.photon_url",
            "providers.nominatim_url",
            "providers.language",
            "providers.max_suggestions",
            "session.debounce_ms",
            "session.min_query_chars",
            "session.default_type",
            "geolocation.enabled",
            "geolocation.timeout_secs",
            "geolocation.ip_api_url",
            "map.enabled",
            "map.default_lat",
            "map.default_lng",
            "map.overview_zoom",
            "map.pinned_zoom",
            "map.tile_url",
            "server.host",
            "server.port",
            "url.default",
            "api_keys.google",
        ]
    }

    /// Configured provider priority, parsed
    pub fn provider_order(&self) -> Result<Vec<ProviderKind>> {
        self.providers
            .order
            .iter()
            .map(|name| ProviderKind::from_str(name).map_err(Error::Config))
            .collect()
    }

    /// Location type for new sessions
    pub fn default_location_type(&self) -> Result<LocationType> {
        LocationType::from_str(&self.session.default_type).map_err(Error::Config)
    }

    /// Debounce interval
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.session.debounce_ms)
    }

    /// Geolocation request bound
    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation.timeout_secs)
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}

fn parse_positive<T: FromStr + Default + PartialOrd>(value: &str, what: &str) -> Result<T> {
    let parsed: T = parse_value(value, what)?;
    if parsed <= T::default() {
        return Err(Error::Config(format!("{} must be greater than zero", what)));
    }
    Ok(parsed)
}

fn parse_within(value: &str, what: &str, limit: f64) -> Result<f64> {
    let parsed: f64 = parse_value(value, what)?;
    if !(-limit..=limit).contains(&parsed) {
        return Err(Error::Config(format!(
            "{} must be between -{} and {}: {}",
            what, limit, limit, value
        )));
    }
    Ok(parsed)
}
