//! Scriptable in-memory provider for unit tests

use crate::error::{Error, Result};
use crate::geo::GeoProvider;
use crate::location::{Coordinates, LocationData, ProviderKind, SuggestionRecord};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared log of calls made to one or more fakes
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub(crate) fn push(&self, call: String) {
        self.0.lock().unwrap().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

/// A provider whose answers are fixed up front; unset answers fail
pub(crate) struct FakeProvider {
    kind: ProviderKind,
    suggestions: Option<Vec<SuggestionRecord>>,
    geocode: Option<Option<LocationData>>,
    details: Option<Option<LocationData>>,
    reverse: Option<Option<LocationData>>,
    delay: Option<Duration>,
    log: CallLog,
}

impl FakeProvider {
    pub(crate) fn new(kind: ProviderKind, log: &CallLog) -> Self {
        Self {
            kind,
            suggestions: None,
            geocode: None,
            details: None,
            reverse: None,
            delay: None,
            log: log.clone(),
        }
    }

    pub(crate) fn suggesting(mut self, records: Vec<SuggestionRecord>) -> Self {
        self.suggestions = Some(records);
        self
    }

    pub(crate) fn geocoding(mut self, location: Option<LocationData>) -> Self {
        self.geocode = Some(location);
        self
    }

    pub(crate) fn detailing(mut self, location: Option<LocationData>) -> Self {
        self.details = Some(location);
        self
    }

    pub(crate) fn reversing(mut self, location: Option<LocationData>) -> Self {
        self.reverse = Some(location);
        self
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn boxed(self) -> Box<dyn GeoProvider> {
        Box::new(self)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn failure(&self) -> Error {
        Error::provider(self.kind.as_str(), "scripted failure")
    }
}

#[async_trait]
impl GeoProvider for FakeProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<SuggestionRecord>> {
        self.log.push(format!("suggest:{}:{}", self.kind, query));
        self.pause().await;
        match &self.suggestions {
            Some(records) => Ok(records.iter().take(limit).cloned().collect()),
            None => Err(self.failure()),
        }
    }

    async fn geocode(&self, query: &str) -> Result<Option<LocationData>> {
        self.log.push(format!("geocode:{}:{}", self.kind, query));
        self.pause().await;
        self.geocode.clone().ok_or_else(|| self.failure())
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<LocationData>> {
        self.log.push(format!("details:{}:{}", self.kind, place_id));
        self.pause().await;
        self.details.clone().ok_or_else(|| self.failure())
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Option<LocationData>> {
        match &self.reverse {
            Some(location) => {
                self.log.push(format!("reverse:{}:{},{}", self.kind, coords.lat, coords.lng));
                self.pause().await;
                Ok(location.clone())
            }
            None => Err(Error::Unsupported {
                provider: self.name(),
                operation: "reverse geocoding",
            }),
        }
    }
}

/// A Photon-style record with coordinates
pub(crate) fn record_at(name: &str, lat: f64, lng: f64, source: ProviderKind) -> SuggestionRecord {
    SuggestionRecord::with_coords(name, Coordinates::new(lat, lng), None, source)
}

pub(crate) fn jakarta() -> LocationData {
    LocationData::resolved(
        "Monas, Gambir, Jakarta, Indonesia",
        Coordinates::new(-6.1754, 106.8272),
        "Jakarta",
        "Indonesia",
    )
}
