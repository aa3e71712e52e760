//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{api, geolocation, map, search};

/// Default provider priority
pub const DEFAULT_PROVIDER_ORDER: [&str; 3] = ["google", "photon", "nominatim"];

/// Default Google Maps web services base URL
pub const DEFAULT_GOOGLE_URL: &str = api::GOOGLE_MAPS_URL;

/// Default Photon base URL
pub const DEFAULT_PHOTON_URL: &str = api::PHOTON_URL;

/// Default Nominatim base URL
pub const DEFAULT_NOMINATIM_URL: &str = api::NOMINATIM_URL;

/// Default IP geolocation URL
pub const DEFAULT_IP_API_URL: &str = api::IP_API_URL;

/// Default preferred result language (empty = provider default)
pub const DEFAULT_LANGUAGE: &str = "";

/// Default maximum suggestions per query
pub const DEFAULT_MAX_SUGGESTIONS: usize = search::MAX_SUGGESTIONS;

/// Default debounce in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = search::DEBOUNCE_MS;

/// Default minimum query length
pub const DEFAULT_MIN_QUERY_CHARS: usize = search::MIN_QUERY_CHARS;

/// Default location type for new sessions
pub const DEFAULT_LOCATION_TYPE: &str = "physical";

/// Default geolocation timeout in seconds
pub const DEFAULT_GEOLOCATION_TIMEOUT_SECS: u64 = geolocation::TIMEOUT_SECS;

/// Default map center latitude
pub const DEFAULT_MAP_LAT: f64 = map::DEFAULT_CENTER.0;

/// Default map center longitude
pub const DEFAULT_MAP_LNG: f64 = map::DEFAULT_CENTER.1;

/// Default overview zoom
pub const DEFAULT_OVERVIEW_ZOOM: u8 = map::OVERVIEW_ZOOM;

/// Default pinned zoom
pub const DEFAULT_PINNED_ZOOM: u8 = map::PINNED_ZOOM;

/// Default tile template
pub const DEFAULT_TILE_URL: &str = api::OSM_TILE_URL;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "wayfind";
