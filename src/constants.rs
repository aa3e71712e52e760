//! Centralized constants for the wayfind crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// External API endpoints
pub mod api {
    /// Google Maps web services (Places + Geocoding), key required
    pub const GOOGLE_MAPS_URL: &str = "https://maps.googleapis.com/maps/api";

    /// Komoot Photon search-as-you-type geocoder
    pub const PHOTON_URL: &str = "https://photon.komoot.io";

    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// OpenStreetMap standard tile layer
    pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

    /// User-Agent sent to the open geocoders (Nominatim usage policy requires one)
    pub const USER_AGENT: &str = concat!("wayfind/", env!("CARGO_PKG_VERSION"));
}

/// Search behaviour
pub mod search {
    /// Queries shorter than this never reach a provider
    pub const MIN_QUERY_CHARS: usize = 2;

    /// Maximum suggestions shown in the dropdown
    pub const MAX_SUGGESTIONS: usize = 5;

    /// Quiet period after the last keystroke before a suggestion fetch
    pub const DEBOUNCE_MS: u64 = 300;
}

/// Geolocation settings
pub mod geolocation {
    /// Upper bound on a single position request, in seconds
    pub const TIMEOUT_SECS: u64 = 10;
}

/// Map view settings
pub mod map {
    /// Fallback map center when no coordinate is known (Jakarta, Monas)
    pub const DEFAULT_CENTER: (f64, f64) = (-6.2088, 106.8456);

    /// Zoom used when there is no precise pin yet
    pub const OVERVIEW_ZOOM: u8 = 12;

    /// Zoom used when the marker reflects a committed coordinate
    pub const PINNED_ZOOM: u8 = 15;

    /// Highest zoom served by the OSM tile layer
    pub const MAX_ZOOM: u8 = 19;
}
