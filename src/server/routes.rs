//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::error::Error;
use crate::geolocation::{locate_with_timeout, GeolocationError};
use crate::location::{Coordinates, LocationData, ProviderKind, SuggestionRecord};
use crate::map::{MapSnapshot, MapView};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/suggest", get(suggest_handler))
        .route("/api/geocode", get(geocode_handler))
        .route("/api/resolve", post(resolve_handler))
        .route("/api/reverse", get(reverse_handler))
        .route("/api/location", get(location_handler))
        .route("/api/map", get(map_handler))
        .route("/api/providers", get(providers_handler))
        .route("/api/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new("NOT_FOUND", format!("No location found for '{}'", what))
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "PERMISSION_DENIED" => StatusCode::FORBIDDEN,
            "TIMEOUT" => StatusCode::GATEWAY_TIMEOUT,
            "POSITION_UNAVAILABLE" | "UNSUPPORTED" => StatusCode::SERVICE_UNAVAILABLE,
            "INTERNAL_ERROR" | "UNKNOWN" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidSuggestion(_) => "INVALID_SUGGESTION",
            Error::InvalidLocation(_) => "INVALID_LOCATION",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Geolocation(e) => e.code(),
            _ => "INTERNAL_ERROR",
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<GeolocationError> for ApiError {
    fn from(err: GeolocationError) -> Self {
        ApiError::new(err.code(), err.user_message())
    }
}

/// Free-text query parameters
#[derive(Debug, Deserialize)]
pub struct TextQuery {
    /// Query text
    #[serde(default)]
    pub q: String,
}

/// Coordinate query parameters
///
/// Kept as strings so a missing or malformed value becomes an
/// `INVALID_COORDINATES` error rather than a bare extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CoordsQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl CoordsQuery {
    fn is_empty(&self) -> bool {
        self.lat.is_none() && self.lng.is_none()
    }

    fn coords(&self) -> Result<Coordinates, ApiError> {
        match (&self.lat, &self.lng) {
            (Some(lat), Some(lng)) => Ok(Coordinates::parse(lat, lng)?),
            _ => Err(ApiError::new(
                "INVALID_COORDINATES",
                "Both lat and lng are required",
            )),
        }
    }
}

/// Map view query parameters
#[derive(Debug, Deserialize)]
pub struct MapQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub zoom: Option<String>,
}

/// Suggestions response
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<SuggestionRecord>,
}

/// Suggestions for a partial query
///
/// GET /api/suggest?q=
async fn suggest_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TextQuery>,
) -> Json<SuggestResponse> {
    Json(SuggestResponse {
        suggestions: state.chain.suggest(&query.q).await,
    })
}

/// Forward geocode free text
///
/// GET /api/geocode?q=
async fn geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TextQuery>,
) -> Result<Json<LocationData>, ApiError> {
    if query.q.trim().is_empty() {
        return Err(ApiError::new("EMPTY_QUERY", "Query must not be empty"));
    }

    state
        .chain
        .geocode(&query.q)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(&query.q))
}

/// Resolve a selected suggestion
///
/// POST /api/resolve
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Json(record): Json<SuggestionRecord>,
) -> Result<Json<LocationData>, ApiError> {
    state
        .chain
        .resolve(&record)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(&record.display_name))
}

/// Reverse geocode a coordinate
///
/// GET /api/reverse?lat=&lng=
async fn reverse_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CoordsQuery>,
) -> Result<Json<LocationData>, ApiError> {
    let coords = query.coords()?;
    state
        .chain
        .reverse(coords)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(&coords.to_string()))
}

/// Current device position, reverse geocoded when possible
///
/// GET /api/location
async fn location_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LocationData>, ApiError> {
    let timeout = state.config.geolocation_timeout();
    let coords = locate_with_timeout(state.position.as_ref(), timeout).await?;

    let location = match state.chain.reverse(coords).await {
        Ok(Some(location)) => location,
        _ => LocationData::resolved(coords.to_string(), coords, "", ""),
    };
    Ok(Json(location))
}

/// Map view for a coordinate, or the default overview
///
/// GET /api/map?lat=&lng=&zoom=
async fn map_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MapQuery>,
) -> Result<Json<MapSnapshot>, ApiError> {
    let coords = CoordsQuery {
        lat: query.lat,
        lng: query.lng,
    };
    let pin = if coords.is_empty() {
        None
    } else {
        Some(coords.coords()?)
    };

    let mut view = MapView::mount(pin, &state.config.map);
    if let Some(zoom) = &query.zoom {
        let zoom: u8 = zoom
            .parse()
            .map_err(|_| ApiError::new("INVALID_ZOOM", format!("Invalid zoom: {}", zoom)))?;
        view.set_zoom(zoom);
    }

    Ok(Json(view.snapshot(&state.config)?))
}

/// Providers response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderKind>,
}

/// Active providers in priority order
///
/// GET /api/providers
async fn providers_handler(State(state): State<Arc<AppState>>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state.chain.kinds(),
    })
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Active providers
    pub providers: Vec<ProviderKind>,
    /// Whether position requests are served
    pub geolocation: bool,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: state.chain.kinds(),
        geolocation: state.config.geolocation.enabled,
        uptime_secs: state.uptime_secs(),
    })
}
