//! End-to-end fallback scenarios against mocked providers.

use std::sync::Arc;
use std::time::Duration;
use wayfind::geo::google::GooglePlaces;
use wayfind::geo::nominatim::Nominatim;
use wayfind::geo::photon::Photon;
use wayfind::geolocation::DeniedPositionSource;
use wayfind::session::{LocationSession, SessionEvent, SessionOptions};
use wayfind::{Coordinates, GeoProvider, LocationData, ProviderChain, ProviderKind};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Providers {
    google: MockServer,
    photon: MockServer,
    nominatim: MockServer,
}

impl Providers {
    async fn start() -> Self {
        Self {
            google: MockServer::start().await,
            photon: MockServer::start().await,
            nominatim: MockServer::start().await,
        }
    }

    fn chain(&self) -> ProviderChain {
        let providers: Vec<Box<dyn GeoProvider>> = vec![
            Box::new(GooglePlaces::with_base_url("test-key", &self.google.uri()).unwrap()),
            Box::new(Photon::with_base_url(&self.photon.uri()).unwrap()),
            Box::new(Nominatim::with_base_url(&self.nominatim.uri()).unwrap()),
        ];
        ProviderChain::new(providers)
    }
}

fn monas_result() -> serde_json::Value {
    serde_json::json!({
        "lat": "-6.1754",
        "lon": "106.8272",
        "display_name": "Monas, Gambir, Jakarta, Indonesia",
        "address": { "city": "Jakarta", "country": "Indonesia" }
    })
}

#[tokio::test]
async fn eiffel_tower_falls_through_failing_google() {
    let mocks = Providers::start().await;

    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mocks.google)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mocks.google)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("q", "Eiffel Tower"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "features": [{
                "geometry": { "coordinates": [2.2945, 48.8584] },
                "properties": { "name": "Eiffel Tower", "city": "Paris", "country": "France" }
            }]
        })))
        .expect(1)
        .mount(&mocks.photon)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mocks.nominatim)
        .await;

    let chain = mocks.chain();
    let suggestions = chain.suggest("Eiffel Tower").await;

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].source, ProviderKind::Photon);
    assert_eq!(suggestions[0].display_name, "Eiffel Tower, Paris, France");

    let location = chain.resolve(&suggestions[0]).await.unwrap();
    assert_eq!(
        location,
        Some(LocationData::resolved(
            "Eiffel Tower, Paris, France",
            Coordinates::new(48.8584, 2.2945),
            "Paris",
            "France",
        ))
    );
}

#[tokio::test]
async fn every_provider_failing_yields_nothing() {
    let mocks = Providers::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OVER_QUERY_LIMIT"
        })))
        .mount(&mocks.google)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mocks.photon)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mocks.nominatim)
        .await;

    let chain = mocks.chain();

    assert!(chain.suggest("Qxzzz123").await.is_empty());
    assert!(chain.geocode("Qxzzz123").await.is_none());

    assert_eq!(mocks.google.received_requests().await.unwrap().len(), 2);
    assert_eq!(mocks.photon.received_requests().await.unwrap().len(), 2);
    assert_eq!(mocks.nominatim.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn place_id_selection_issues_one_details_request() {
    let mocks = Providers::start().await;

    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "predictions": [{ "description": "Monas, Jakarta, Indonesia", "place_id": "ChIJmonas" }]
        })))
        .mount(&mocks.google)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .and(query_param("place_id", "ChIJmonas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": {
                "formatted_address": "Monas, Gambir, Jakarta, Indonesia",
                "geometry": { "location": { "lat": -6.1754, "lng": 106.8272 } },
                "address_components": [
                    { "long_name": "Jakarta", "types": ["locality"] },
                    { "long_name": "Indonesia", "types": ["country"] }
                ]
            }
        })))
        .expect(1)
        .mount(&mocks.google)
        .await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mocks.google)
        .await;

    let chain = mocks.chain();
    let suggestions = chain.suggest("Monas").await;
    assert_eq!(suggestions[0].source, ProviderKind::Google);

    let location = chain.resolve(&suggestions[0]).await.unwrap().unwrap();
    assert_eq!(location.city, "Jakarta");
    assert_eq!(location.coords, Some(Coordinates::new(-6.1754, 106.8272)));
}

#[tokio::test]
async fn monas_round_trip_keeps_city() {
    let mocks = Providers::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mocks.google)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "features": [] })))
        .mount(&mocks.photon)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([monas_result()])))
        .mount(&mocks.nominatim)
        .await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(monas_result()))
        .expect(1)
        .mount(&mocks.nominatim)
        .await;

    let chain = mocks.chain();
    let forward = chain.geocode("Monas, Jakarta").await.expect("should geocode");
    let coords = forward.coords.expect("forward result has coordinates");

    let backward = chain.reverse(coords).await.unwrap().expect("should reverse geocode");

    assert_eq!(forward.city, "Jakarta");
    assert_eq!(backward.city, forward.city);
    assert_eq!(backward.country, forward.country);
    assert_eq!(backward.coords, Some(coords));
}

#[tokio::test]
async fn session_debounces_to_one_request_and_reverse_geocodes_pin_once() {
    let mocks = Providers::start().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "features": [{
            "geometry": { "coordinates": [106.8272, -6.1754] },
            "properties": { "name": "Monas", "city": "Jakarta", "country": "Indonesia" }
        }] })))
        .expect(1)
        .mount(&mocks.photon)
        .await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(monas_result()))
        .expect(1)
        .mount(&mocks.nominatim)
        .await;

    let providers: Vec<Box<dyn GeoProvider>> = vec![
        Box::new(Photon::with_base_url(&mocks.photon.uri()).unwrap()),
        Box::new(Nominatim::with_base_url(&mocks.nominatim.uri()).unwrap()),
    ];
    let options = SessionOptions {
        debounce: Duration::from_millis(50),
        ..SessionOptions::default()
    };
    let (mut session, mut events) = LocationSession::new(
        Arc::new(ProviderChain::new(providers)),
        Arc::new(DeniedPositionSource),
        options,
    );

    for text in ["Mo", "Mon", "Mona", "Monas"] {
        session.input(text).await;
    }

    let suggestions = loop {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("suggestions should arrive")
            .expect("channel open");
        if let SessionEvent::Suggestions(records) = event {
            break records;
        }
    };
    assert_eq!(suggestions.len(), 1);
    let requests = mocks.photon.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().unwrap_or_default().contains("q=Monas"));

    let pin = Coordinates::new(-6.1760, 106.8280);
    session.drag_marker(pin).await.unwrap();

    assert_eq!(session.location().coords, Some(pin));
    assert_eq!(session.location().city, "Jakarta");
}
