//! Location search session
//!
//! `LocationSession` keeps the search text, the suggestion dropdown, the map
//! pin, and the parent's location value consistent while the user types,
//! picks suggestions, drags the pin, or asks for their current position.
//!
//! The session never stores the location anywhere: each committed change is
//! sent to the owner as `SessionEvent::Changed` over the channel returned by
//! `LocationSession::new`.
//!
//! Keystrokes are debounced. Each one bumps a generation counter and aborts
//! the pending fetch; a fetch result is only applied if its generation is
//! still current, so a slow response can never overwrite a newer one.

mod dropdown;
pub mod events;

pub use events::{Key, Notice, NoticeLevel, SessionEvent};

use crate::config::{Config, MapConfig};
use crate::error::{Error, Result};
use crate::geo::chain::is_searchable;
use crate::geo::ProviderChain;
use crate::geolocation::{locate_with_timeout, PositionSource};
use crate::location::{Coordinates, LocationData, LocationType, SuggestionRecord};
use crate::map::{MapEvent, MapView};
use dropdown::Dropdown;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Session tunables
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Location type the session starts in
    pub location_type: LocationType,
    /// Quiet period before a suggestion fetch
    pub debounce: Duration,
    /// Bound on a position request
    pub geolocation_timeout: Duration,
    /// Map settings; `enabled = false` runs text-only
    pub map: MapConfig,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            location_type: config.default_location_type().unwrap_or_default(),
            debounce: config.debounce(),
            geolocation_timeout: config.geolocation_timeout(),
            map: config.map.clone(),
        }
    }

    pub fn with_location_type(mut self, location_type: LocationType) -> Self {
        self.location_type = location_type;
        self
    }
}

/// One mounted location picker
pub struct LocationSession {
    chain: Arc<ProviderChain>,
    position: Arc<dyn PositionSource>,
    options: SessionOptions,
    location_type: LocationType,
    text: String,
    location: LocationData,
    map: Option<MapView>,
    dropdown: Arc<Mutex<Dropdown>>,
    pending: Option<JoinHandle<()>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl LocationSession {
    /// Mount a session; the receiver gets every event it emits
    pub fn new(
        chain: Arc<ProviderChain>,
        position: Arc<dyn PositionSource>,
        options: SessionOptions,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let mut session = Self {
            chain,
            position,
            location_type: options.location_type,
            options,
            text: String::new(),
            location: LocationData::default(),
            map: None,
            dropdown: Arc::new(Mutex::new(Dropdown::default())),
            pending: None,
            events,
        };
        session.mount_map();
        (session, rx)
    }

    /// Pre-populate from the parent's existing value
    pub fn with_value(mut self, value: LocationData) -> Self {
        self.set_value(value);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn location(&self) -> &LocationData {
        &self.location
    }

    pub fn location_type(&self) -> LocationType {
        self.location_type
    }

    /// The map, if this session shows one
    pub fn map(&self) -> Option<&MapView> {
        self.map.as_ref()
    }

    pub async fn suggestions(&self) -> Vec<SuggestionRecord> {
        self.dropdown.lock().await.items.clone()
    }

    pub async fn dropdown_visible(&self) -> bool {
        self.dropdown.lock().await.visible
    }

    pub async fn highlighted(&self) -> Option<usize> {
        self.dropdown.lock().await.highlighted
    }

    /// Controlled update from the parent; emits nothing
    pub fn set_value(&mut self, value: LocationData) {
        self.text = value.address.clone();
        if let Some(map) = &mut self.map {
            match value.coords {
                Some(coords) => map.sync_to(coords),
                None => map.unpin(),
            }
        }
        self.location = value;
    }

    /// Switch between physical, online and hybrid
    pub async fn set_location_type(&mut self, location_type: LocationType) {
        if location_type == self.location_type {
            return;
        }
        self.location_type = location_type;

        if location_type.uses_map() {
            self.mount_map();
        } else {
            self.cancel_pending().await;
            self.hide_dropdown(true).await;
            self.map = None;
            self.commit(LocationData::online(self.text.clone()));
        }
    }

    /// A keystroke changed the search text
    pub async fn input(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.text = text.clone();

        if !self.location_type.uses_map() {
            self.commit(LocationData::online(text));
            return;
        }

        let typed = self.location.with_text(text.clone());
        self.commit(typed);
        if let Some(map) = &mut self.map {
            map.unpin();
        }

        let generation = self.cancel_pending().await;
        if !is_searchable(&text, self.chain.min_query_chars()) {
            self.hide_dropdown(true).await;
            return;
        }

        self.schedule_fetch(text.trim().to_string(), generation);
    }

    /// Pick the suggestion at `index` in the dropdown
    pub async fn select(&mut self, index: usize) -> Result<bool> {
        let record = self
            .dropdown
            .lock()
            .await
            .items
            .get(index)
            .cloned()
            .ok_or_else(|| Error::InvalidSuggestion(format!("no suggestion at position {}", index)))?;
        self.select_record(record).await
    }

    /// Pick a specific suggestion; returns whether a location was committed
    pub async fn select_record(&mut self, record: SuggestionRecord) -> Result<bool> {
        self.cancel_pending().await;
        self.hide_dropdown(true).await;

        match self.chain.resolve(&record).await? {
            Some(location) => {
                self.commit_resolved(location);
                Ok(true)
            }
            None => {
                self.notify(Notice::NotFound {
                    query: record.display_name,
                });
                Ok(false)
            }
        }
    }

    /// Keyboard handling for the search box
    pub async fn key(&mut self, key: Key) -> Result<bool> {
        match key {
            Key::Enter => {
                let highlighted = self.dropdown.lock().await.highlighted_record().cloned();
                match highlighted {
                    Some(record) => self.select_record(record).await,
                    None => Ok(self.submit_text().await),
                }
            }
            Key::Escape => {
                self.hide_dropdown(false).await;
                Ok(false)
            }
            Key::ArrowDown => {
                self.dropdown.lock().await.highlight_next();
                Ok(false)
            }
            Key::ArrowUp => {
                self.dropdown.lock().await.highlight_prev();
                Ok(false)
            }
        }
    }

    /// Geocode the raw text without a selected suggestion
    async fn submit_text(&mut self) -> bool {
        if !self.location_type.uses_map() {
            return false;
        }

        self.cancel_pending().await;
        self.hide_dropdown(true).await;

        let query = self.text.trim().to_string();
        if query.is_empty() {
            return false;
        }

        match self.chain.geocode(&query).await {
            Some(location) => {
                self.commit_resolved(location);
                true
            }
            None => {
                self.notify(Notice::NotFound { query });
                false
            }
        }
    }

    /// "Use current location"
    pub async fn use_current_location(&mut self) -> bool {
        if !self.location_type.uses_map() {
            return false;
        }

        self.cancel_pending().await;
        self.hide_dropdown(true).await;

        match locate_with_timeout(self.position.as_ref(), self.options.geolocation_timeout).await {
            Ok(coords) => {
                if let Some(map) = &mut self.map {
                    map.sync_to(coords);
                }
                self.apply_pin(coords).await;
                true
            }
            Err(e) => {
                self.notify(Notice::Geolocation(e));
                false
            }
        }
    }

    /// The user dragged the marker
    pub async fn drag_marker(&mut self, to: Coordinates) -> Result<()> {
        let event = self.map_mut()?.drag_marker(to)?;
        self.handle_map_event(event).await;
        Ok(())
    }

    /// The user clicked the map
    pub async fn click_map(&mut self, at: Coordinates) -> Result<()> {
        let event = self.map_mut()?.click(at)?;
        self.handle_map_event(event).await;
        Ok(())
    }

    /// The user panned the map; the marker stays where it is
    pub fn pan_map(&mut self, center: Coordinates) -> Result<()> {
        self.map_mut()?.pan_to(center)
    }

    /// The user zoomed the map
    pub fn zoom_map(&mut self, zoom: u8) -> Result<()> {
        self.map_mut()?.set_zoom(zoom);
        Ok(())
    }

    /// React to an interaction reported by the map
    pub async fn handle_map_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::PinMoved(coords) => self.apply_pin(coords).await,
        }
    }

    fn map_mut(&mut self) -> Result<&mut MapView> {
        self.map
            .as_mut()
            .ok_or_else(|| Error::InvalidLocation("this session has no map".to_string()))
    }

    /// Commit a coordinate right away, then backfill its address
    async fn apply_pin(&mut self, coords: Coordinates) {
        self.cancel_pending().await;

        // city and country belonged to the old point
        let mut pinned = self.location.with_coords(coords);
        pinned.city.clear();
        pinned.country.clear();
        if pinned.address.trim().is_empty() {
            pinned.address = coords.to_string();
            self.text = pinned.address.clone();
        }
        self.commit(pinned);

        match self.chain.reverse(coords).await {
            Ok(Some(found)) => {
                self.text = found.address.clone();
                self.commit(found);
            }
            Ok(None) => debug!(%coords, "no address for pin"),
            Err(e) => warn!(%coords, error = %e, "reverse geocoding failed"),
        }
    }

    fn mount_map(&mut self) {
        if !self.location_type.uses_map() || self.map.is_some() {
            return;
        }
        if !self.options.map.enabled {
            self.notify(Notice::MapUnavailable);
            return;
        }
        self.map = Some(MapView::mount(self.location.coords, &self.options.map));
    }

    fn schedule_fetch(&mut self, query: String, generation: u64) {
        let chain = Arc::clone(&self.chain);
        let dropdown = Arc::clone(&self.dropdown);
        let events = self.events.clone();
        let delay = self.options.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let records = chain.suggest(&query).await;

            let mut dropdown = dropdown.lock().await;
            if !dropdown.apply(generation, records.clone()) {
                debug!(query = %query, "discarding stale suggestions");
                return;
            }
            let event = if records.is_empty() {
                SessionEvent::DropdownHidden
            } else {
                SessionEvent::Suggestions(records)
            };
            let _ = events.send(event);
        }));
    }

    /// Abort the pending fetch and start a new generation
    async fn cancel_pending(&mut self) -> u64 {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.dropdown.lock().await.bump()
    }

    async fn hide_dropdown(&mut self, clear: bool) {
        if self.dropdown.lock().await.hide(clear) {
            let _ = self.events.send(SessionEvent::DropdownHidden);
        }
    }

    fn commit_resolved(&mut self, location: LocationData) {
        if let (Some(map), Some(coords)) = (&mut self.map, location.coords) {
            map.sync_to(coords);
        }
        self.text = location.address.clone();
        let address = location.address.clone();
        self.commit(location);
        self.notify(Notice::Resolved { address });
    }

    fn commit(&mut self, location: LocationData) {
        self.location = location.clone();
        let _ = self.events.send(SessionEvent::Changed(location));
    }

    fn notify(&self, notice: Notice) {
        debug!(message = %notice.message(), "notice");
        let _ = self.events.send(SessionEvent::Notice(notice));
    }
}

impl Drop for LocationSession {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
