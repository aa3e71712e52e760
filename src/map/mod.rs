//! Map view model
//!
//! A headless stand-in for the draggable-pin map: one view, one marker.
//! The view is created once per session and updated in place, so a zoom or
//! pan the user made survives later coordinate changes.

use crate::config::{Config, MapConfig};
use crate::constants::map::MAX_ZOOM;
use crate::error::Result;
use crate::location::Coordinates;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator latitude limit
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// What a map interaction asks the session to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// The marker now sits here; the address needs reverse geocoding
    PinMoved(Coordinates),
}

/// A slippy-map tile index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl Tile {
    /// Tile containing a coordinate at a zoom level
    pub fn containing(coords: Coordinates, zoom: u8) -> Self {
        let z = zoom.min(MAX_ZOOM);
        let n = f64::from(1u32 << z);
        let lat = coords.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();

        let x = ((coords.lng + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();

        let max = n - 1.0;
        Self {
            x: x.clamp(0.0, max) as u32,
            y: y.clamp(0.0, max) as u32,
            z,
        }
    }

    /// Coordinate of the tile's top-left corner
    pub fn north_west(&self) -> Coordinates {
        let n = f64::from(1u32 << self.z);
        let lng = f64::from(self.x) / n * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * f64::from(self.y) / n)).sinh().atan().to_degrees();
        Coordinates::new(lat, lng)
    }

    /// North-west and south-east corners
    pub fn bounds(&self) -> (Coordinates, Coordinates) {
        let south_east = Tile {
            x: self.x + 1,
            y: self.y + 1,
            z: self.z,
        };
        (self.north_west(), south_east.north_west())
    }

    /// Fill a `{z}/{x}/{y}` URL template
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

/// Everything a client needs to draw the view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub center: Coordinates,
    pub zoom: u8,
    pub marker: Coordinates,
    pub pinned: bool,
    pub tile: Tile,
    /// Corners of `tile`, north-west first
    pub tile_bounds: (Coordinates, Coordinates),
    pub tile_url: String,
    /// "Open in maps" link for the marker
    pub open_url: String,
}

/// Map view state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    center: Coordinates,
    zoom: u8,
    marker: Coordinates,
    pinned: bool,
    pinned_zoom: u8,
}

impl MapView {
    /// Create the view for a session
    ///
    /// With a coordinate the view centers on it at the pinned zoom; without
    /// one it shows the configured default center at the overview zoom.
    pub fn mount(current: Option<Coordinates>, config: &MapConfig) -> Self {
        let pinned_zoom = config.pinned_zoom.min(MAX_ZOOM);
        match current {
            Some(coords) => Self {
                center: coords,
                zoom: pinned_zoom,
                marker: coords,
                pinned: true,
                pinned_zoom,
            },
            None => {
                let center = config.default_center();
                Self {
                    center,
                    zoom: config.overview_zoom.min(MAX_ZOOM),
                    marker: center,
                    pinned: false,
                    pinned_zoom,
                }
            }
        }
    }

    pub fn center(&self) -> Coordinates {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The single marker's position
    pub fn marker(&self) -> Coordinates {
        self.marker
    }

    /// Whether the marker reflects a committed coordinate
    pub fn has_precise_pin(&self) -> bool {
        self.pinned
    }

    /// Follow a coordinate committed elsewhere (search, geolocation)
    ///
    /// Zooms in only when leaving the overview state.
    pub fn sync_to(&mut self, coords: Coordinates) {
        self.marker = coords;
        self.center = coords;
        if !self.pinned {
            self.zoom = self.zoom.max(self.pinned_zoom);
            self.pinned = true;
        }
    }

    /// Forget the pin (typed text cleared the coordinate); the view stays put
    pub fn unpin(&mut self) {
        self.pinned = false;
    }

    /// User pan
    pub fn pan_to(&mut self, center: Coordinates) -> Result<()> {
        center.validate()?;
        self.center = center;
        Ok(())
    }

    /// User zoom, clamped to the tile layer's range
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.min(MAX_ZOOM);
    }

    /// Marker dragged to a new position
    pub fn drag_marker(&mut self, to: Coordinates) -> Result<MapEvent> {
        to.validate()?;
        self.marker = to;
        self.pinned = true;
        Ok(MapEvent::PinMoved(to))
    }

    /// Map clicked; the marker jumps to the clicked point
    pub fn click(&mut self, at: Coordinates) -> Result<MapEvent> {
        self.drag_marker(at)
    }

    /// Tile under the current center
    pub fn center_tile(&self) -> Tile {
        Tile::containing(self.center, self.zoom)
    }

    /// "Open in maps" link for the marker
    pub fn external_url(&self, config: &Config, provider: Option<&str>) -> Result<String> {
        config.format_url(provider, self.marker.lat, self.marker.lng)
    }

    /// Render the view with the configured tile server and link provider
    pub fn snapshot(&self, config: &Config) -> Result<MapSnapshot> {
        let tile = self.center_tile();
        Ok(MapSnapshot {
            center: self.center,
            zoom: self.zoom,
            marker: self.marker,
            pinned: self.pinned,
            tile,
            tile_bounds: tile.bounds(),
            tile_url: tile.url(&config.map.tile_url),
            open_url: self.external_url(config, None)?,
        })
    }
}
