//! Provider fallback chain
//!
//! Providers are tried in priority order. A failing provider is logged and
//! skipped; the caller only sees "nothing found" once every provider has
//! been tried.

use crate::config::Config;
use crate::constants::search::{MAX_SUGGESTIONS, MIN_QUERY_CHARS};
use crate::error::{Error, Result};
use crate::geo::google::GooglePlaces;
use crate::geo::nominatim::Nominatim;
use crate::geo::photon::Photon;
use crate::geo::GeoProvider;
use crate::location::{Coordinates, LocationData, ProviderKind, SuggestionRecord};
use tracing::{debug, warn};

/// Ordered set of capability-equivalent providers
pub struct ProviderChain {
    providers: Vec<Box<dyn GeoProvider>>,
    max_suggestions: usize,
    min_query_chars: usize,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.kinds())
            .field("max_suggestions", &self.max_suggestions)
            .field("min_query_chars", &self.min_query_chars)
            .finish()
    }
}

/// Whether a query is long enough to send to a provider
pub fn is_searchable(query: &str, min_chars: usize) -> bool {
    query.trim().chars().count() >= min_chars
}

impl ProviderChain {
    /// Create a chain from providers in priority order
    pub fn new(providers: Vec<Box<dyn GeoProvider>>) -> Self {
        Self {
            providers,
            max_suggestions: MAX_SUGGESTIONS,
            min_query_chars: MIN_QUERY_CHARS,
        }
    }

    /// Override the suggestion count and minimum query length
    pub fn with_limits(mut self, max_suggestions: usize, min_query_chars: usize) -> Self {
        self.max_suggestions = max_suggestions.max(1);
        self.min_query_chars = min_query_chars;
        self
    }

    /// Build the chain once at startup from configuration
    ///
    /// Google is only included when an API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let language = config.providers.language.clone();
        let mut providers: Vec<Box<dyn GeoProvider>> = Vec::new();

        for kind in config.provider_order()? {
            if providers.iter().any(|p| p.kind() == kind) {
                continue;
            }
            match kind {
                ProviderKind::Google => {
                    if config.api_keys.google.trim().is_empty() {
                        debug!("google places not configured, skipping");
                        continue;
                    }
                    providers.push(Box::new(
                        GooglePlaces::with_base_url(&config.api_keys.google, &config.providers.google_url)?
                            .with_language(language.clone()),
                    ));
                }
                ProviderKind::Photon => {
                    providers.push(Box::new(
                        Photon::with_base_url(&config.providers.photon_url)?
                            .with_language(language.clone()),
                    ));
                }
                ProviderKind::Nominatim => {
                    providers.push(Box::new(
                        Nominatim::with_base_url(&config.providers.nominatim_url)?
                            .with_language(language.clone()),
                    ));
                }
            }
        }

        if providers.is_empty() {
            return Err(Error::Config("No geocoding providers configured".to_string()));
        }

        Ok(Self::new(providers).with_limits(
            config.providers.max_suggestions,
            config.session.min_query_chars,
        ))
    }

    /// Active providers in priority order
    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    pub fn min_query_chars(&self) -> usize {
        self.min_query_chars
    }

    /// Suggestions for a partial query
    ///
    /// Never fails: short queries and total provider failure both yield an
    /// empty list.
    pub async fn suggest(&self, query: &str) -> Vec<SuggestionRecord> {
        let query = query.trim();
        if !is_searchable(query, self.min_query_chars) {
            return Vec::new();
        }

        for provider in &self.providers {
            debug!(provider = provider.name(), query, "requesting suggestions");
            match provider.suggest(query, self.max_suggestions).await {
                Ok(records) => {
                    let records: Vec<SuggestionRecord> = records
                        .into_iter()
                        .filter(|r| r.validate().is_ok())
                        .take(self.max_suggestions)
                        .collect();
                    if !records.is_empty() {
                        return records;
                    }
                    debug!(provider = provider.name(), query, "no suggestions, trying next provider");
                }
                Err(e) => {
                    warn!(provider = provider.name(), query, error = %e, "suggestion request failed");
                }
            }
        }

        Vec::new()
    }

    /// Forward geocode free text with the full chain
    pub async fn geocode(&self, text: &str) -> Option<LocationData> {
        self.geocode_where(text, |_| true).await
    }

    async fn geocode_where(
        &self,
        text: &str,
        allow: impl Fn(ProviderKind) -> bool,
    ) -> Option<LocationData> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        for provider in self.providers.iter().filter(|p| allow(p.kind())) {
            debug!(provider = provider.name(), text, "geocoding");
            match provider.geocode(text).await {
                Ok(Some(location)) => return Some(location),
                Ok(None) => debug!(provider = provider.name(), text, "no geocoding match"),
                Err(e) => warn!(provider = provider.name(), text, error = %e, "geocoding failed"),
            }
        }

        None
    }

    /// Resolve a selected suggestion to a full location
    ///
    /// Records with coordinates resolve without any request. Records with
    /// only a place id get one details lookup at their source provider, then
    /// fall back to geocoding the display text with the open providers.
    pub async fn resolve(&self, suggestion: &SuggestionRecord) -> Result<Option<LocationData>> {
        suggestion.validate()?;

        if let Some(location) = suggestion.to_location() {
            return Ok(Some(location));
        }

        if let Some(place_id) = suggestion.place_id.as_deref() {
            let source = self.providers.iter().find(|p| p.kind() == suggestion.source);
            match source {
                Some(provider) => match provider.place_details(place_id).await {
                    Ok(Some(location)) => return Ok(Some(location)),
                    Ok(None) => debug!(provider = provider.name(), place_id, "place not found"),
                    Err(e) => warn!(provider = provider.name(), place_id, error = %e, "place details failed"),
                },
                None => debug!(source = %suggestion.source, "source provider not active"),
            }
        }

        Ok(self
            .geocode_where(&suggestion.display_name, |kind| !kind.is_commercial())
            .await)
    }

    /// Reverse geocode a coordinate with every provider that supports it
    ///
    /// The result keeps the requested coordinate so a dropped pin stays put.
    pub async fn reverse(&self, coords: Coordinates) -> Result<Option<LocationData>> {
        coords.validate()?;

        for provider in &self.providers {
            match provider.reverse_geocode(coords).await {
                Ok(Some(location)) => {
                    return Ok(Some(LocationData {
                        coords: Some(coords),
                        ..location
                    }))
                }
                Ok(None) => debug!(provider = provider.name(), %coords, "no reverse match"),
                Err(Error::Unsupported { .. }) => {}
                Err(e) => warn!(provider = provider.name(), %coords, error = %e, "reverse geocoding failed"),
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::testing::{jakarta, record_at, CallLog, FakeProvider};

    #[tokio::test]
    async fn test_short_query_issues_no_request() {
        let log = CallLog::default();
        let chain = ProviderChain::new(vec![FakeProvider::new(ProviderKind::Photon, &log)
            .suggesting(vec![record_at("A", 1.0, 1.0, ProviderKind::Photon)])
            .boxed()]);

        assert!(chain.suggest("").await.is_empty());
        assert!(chain.suggest("J").await.is_empty());
        assert!(chain.suggest("  J  ").await.is_empty());
        assert!(log.calls().is_empty());

        assert_eq!(chain.suggest("Ja").await.len(), 1);
        assert_eq!(log.calls(), vec!["suggest:photon:Ja"]);
    }

    #[tokio::test]
    async fn test_falls_through_failing_provider() {
        let log = CallLog::default();
        let chain = ProviderChain::new(vec![
            FakeProvider::new(ProviderKind::Google, &log).boxed(),
            FakeProvider::new(ProviderKind::Photon, &log)
                .suggesting(vec![record_at("Eiffel Tower, Paris, France", 48.8584, 2.2945, ProviderKind::Photon)])
                .boxed(),
            FakeProvider::new(ProviderKind::Nominatim, &log).boxed(),
        ]);

        let records = chain.suggest("Eiffel Tower").await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, ProviderKind::Photon);
        assert_eq!(
            log.calls(),
            vec!["suggest:google:Eiffel Tower", "suggest:photon:Eiffel Tower"]
        );
    }

    #[tokio::test]
    async fn test_empty_result_falls_through() {
        let log = CallLog::default();
        let chain = ProviderChain::new(vec![
            FakeProvider::new(ProviderKind::Photon, &log).suggesting(vec![]).boxed(),
            FakeProvider::new(ProviderKind::Nominatim, &log)
                .suggesting(vec![record_at("Bogor, Indonesia", -6.59, 106.8, ProviderKind::Nominatim)])
                .boxed(),
        ]);

        let records = chain.suggest("Bogor").await;
        assert_eq!(records[0].source, ProviderKind::Nominatim);
    }

    #[tokio::test]
    async fn test_all_providers_fail_gives_empty_list() {
        let log = CallLog::default();
        let chain = ProviderChain::new(vec![
            FakeProvider::new(ProviderKind::Google, &log).boxed(),
            FakeProvider::new(ProviderKind::Photon, &log).boxed(),
            FakeProvider::new(ProviderKind::Nominatim, &log).boxed(),
        ]);

        assert!(chain.suggest("Qxzzz123").await.is_empty());
        assert_eq!(log.count("suggest:"), 3);
        assert!(chain.geocode("Qxzzz123").await.is_none());
    }

    #[tokio::test]
    async fn test_suggestions_capped() {
        let log = CallLog::default();
        let records = (0..8)
            .map(|i| record_at(&format!("Place {}", i), 1.0, i as f64, ProviderKind::Photon))
            .collect();
        let chain = ProviderChain::new(vec![FakeProvider::new(ProviderKind::Photon, &log)
            .suggesting(records)
            .boxed()]);

        assert_eq!(chain.suggest("Place").await.len(), 5);
    }

    #[tokio::test]
    async fn test_invalid_records_filtered() {
        let log = CallLog::default();
        let mut broken = record_at("Broken", 1.0, 1.0, ProviderKind::Photon);
        broken.lat = None;
        let chain = ProviderChain::new(vec![FakeProvider::new(ProviderKind::Photon, &log)
            .suggesting(vec![broken, record_at("Fine", 1.0, 1.0, ProviderKind::Photon)])
            .boxed()]);

        let records = chain.suggest("Fi").await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name, "Fine");
    }

    #[tokio::test]
    async fn test_resolve_with_coordinates_makes_no_request() {
        let log = CallLog::default();
        let chain = ProviderChain::new(vec![
            FakeProvider::new(ProviderKind::Google, &log).boxed(),
            FakeProvider::new(ProviderKind::Nominatim, &log).geocoding(Some(jakarta())).boxed(),
        ]);

        let record = record_at("Eiffel Tower, Paris, France", 48.8584, 2.2945, ProviderKind::Photon);
        let location = chain.resolve(&record).await.unwrap().unwrap();

        assert_eq!(location.lat(), Some(48.8584));
        assert_eq!(location.city, "Paris");
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_place_id_uses_one_details_request() {
        let log = CallLog::default();
        let chain = ProviderChain::new(vec![
            FakeProvider::new(ProviderKind::Google, &log).detailing(Some(jakarta())).boxed(),
            FakeProvider::new(ProviderKind::Photon, &log).geocoding(None).boxed(),
        ]);

        let record = SuggestionRecord::with_place_id("Monas", "ChIJ123", ProviderKind::Google);
        let location = chain.resolve(&record).await.unwrap().unwrap();

        assert_eq!(location.city, "Jakarta");
        assert_eq!(log.calls(), vec!["details:google:ChIJ123"]);
    }

    #[tokio::test]
    async fn test_resolve_details_failure_falls_back_to_open_geocoders() {
        let log = CallLog::default();
        let chain = ProviderChain::new(vec![
            FakeProvider::new(ProviderKind::Google, &log).geocoding(Some(jakarta())).boxed(),
            FakeProvider::new(ProviderKind::Photon, &log).boxed(),
            FakeProvider::new(ProviderKind::Nominatim, &log).geocoding(Some(jakarta())).boxed(),
        ]);

        let record = SuggestionRecord::with_place_id("Monas, Jakarta", "ChIJ123", ProviderKind::Google);
        let location = chain.resolve(&record).await.unwrap();

        assert!(location.is_some());
        assert_eq!(
            log.calls(),
            vec![
                "details:google:ChIJ123",
                "geocode:photon:Monas, Jakarta",
                "geocode:nominatim:Monas, Jakarta",
            ]
        );
    }

    #[tokio::test]
    async fn test_resolve_rejects_invalid_record() {
        let chain = ProviderChain::new(vec![]);
        let mut record = record_at("Nowhere", 1.0, 1.0, ProviderKind::Photon);
        record.lat = None;
        assert!(chain.resolve(&record).await.is_err());
    }

    #[tokio::test]
    async fn test_reverse_skips_unsupported_and_keeps_coordinates() {
        let log = CallLog::default();
        let chain = ProviderChain::new(vec![
            FakeProvider::new(ProviderKind::Photon, &log).boxed(),
            FakeProvider::new(ProviderKind::Nominatim, &log).reversing(Some(jakarta())).boxed(),
        ]);

        let pin = Coordinates::new(-6.1760, 106.8280);
        let location = chain.reverse(pin).await.unwrap().unwrap();

        assert_eq!(location.coords, Some(pin));
        assert_eq!(location.city, "Jakarta");
        assert_eq!(log.calls(), vec!["reverse:nominatim:-6.176,106.828"]);
    }

    #[tokio::test]
    async fn test_reverse_rejects_invalid_coordinates() {
        let chain = ProviderChain::new(vec![]);
        assert!(chain.reverse(Coordinates::new(100.0, 0.0)).await.is_err());
    }

    #[test]
    fn test_from_config_skips_google_without_key() {
        let config = Config::default();
        let chain = ProviderChain::from_config(&config).unwrap();
        assert_eq!(chain.kinds(), vec![ProviderKind::Photon, ProviderKind::Nominatim]);

        let mut config = Config::default();
        config.api_keys.google = "key".to_string();
        let chain = ProviderChain::from_config(&config).unwrap();
        assert_eq!(
            chain.kinds(),
            vec![ProviderKind::Google, ProviderKind::Photon, ProviderKind::Nominatim]
        );
    }

    #[test]
    fn test_from_config_respects_order() {
        let mut config = Config::default();
        config.providers.order = vec!["nominatim".to_string(), "photon".to_string(), "nominatim".to_string()];
        let chain = ProviderChain::from_config(&config).unwrap();
        assert_eq!(chain.kinds(), vec![ProviderKind::Nominatim, ProviderKind::Photon]);

        config.providers.order = vec!["google".to_string()];
        assert!(ProviderChain::from_config(&config).is_err());
    }

    #[test]
    fn test_is_searchable_counts_characters() {
        assert!(!is_searchable("é", 2));
        assert!(is_searchable("éé", 2));
        assert!(!is_searchable("  a ", 2));
    }
}
