use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::climate_data::{
    self, DashboardSummary, EventKind, ExtremeEvent, Indicator, NearbyEvent, SeriesReport,
};
use crate::models::{Coordinate, LocationMatch, MarkerView, WeatherSnapshot};
use crate::weather_map::{SearchOutcome, SelectionOutcome, WeatherMap};
use crate::{ClimateWatchError, VERSION};

const DEFAULT_NEARBY_RADIUS_KM: f64 = 1000.0;

/// Shared state handed to every handler
pub struct AppState {
    pub map: WeatherMap,
}

impl AppState {
    #[must_use]
    pub fn new(map: WeatherMap) -> Self {
        Self { map }
    }
}

type ApiResult<T> = Result<Json<T>, ClimateWatchError>;

impl IntoResponse for ClimateWatchError {
    fn into_response(self) -> Response {
        let status = if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            error!("Request failed: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

impl From<JsonRejection> for ClimateWatchError {
    fn from(rejection: JsonRejection) -> Self {
        ClimateWatchError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ClimateWatchError {
    fn from(rejection: QueryRejection) -> Self {
        ClimateWatchError::validation(rejection.body_text())
    }
}

type QueryResult<T> = Result<Query<T>, QueryRejection>;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
}

#[derive(Deserialize)]
pub struct KindQuery {
    pub kind: Option<String>,
}

#[derive(Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: Option<f64>,
}

#[derive(Deserialize)]
pub struct TextQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct ClickRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize)]
pub struct ExtremesResponse {
    pub events: Vec<&'static ExtremeEvent>,
    pub counts: std::collections::BTreeMap<EventKind, usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub name: &'static str,
    pub provides: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub data_sources: Vec<DataSource>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/temperature", get(get_temperature))
        .route("/emissions", get(get_emissions))
        .route("/sea-level", get(get_sea_level))
        .route("/extremes", get(get_extremes))
        .route("/extremes/nearby", get(get_nearby_extremes))
        .route("/global-temperature/markers", get(get_markers))
        .route("/global-temperature/selected", get(get_selected))
        .route("/global-temperature/click", post(click_map))
        .route("/global-temperature/search", get(search))
        .route("/global-temperature/suggest", get(suggest))
        .route("/global-temperature/select", post(select_match))
        .route("/about", get(get_about))
        .with_state(state)
}

async fn get_dashboard() -> Json<DashboardSummary> {
    Json(climate_data::dashboard_summary())
}

fn series_report(indicator: Indicator, query: &RangeQuery) -> ApiResult<SeriesReport> {
    Ok(Json(indicator.report(query.range.as_deref().unwrap_or("all"))?))
}

async fn get_temperature(query: QueryResult<RangeQuery>) -> ApiResult<SeriesReport> {
    let Query(query) = query?;
    series_report(Indicator::Temperature, &query)
}

async fn get_emissions(query: QueryResult<RangeQuery>) -> ApiResult<SeriesReport> {
    let Query(query) = query?;
    series_report(Indicator::Co2, &query)
}

async fn get_sea_level(query: QueryResult<RangeQuery>) -> ApiResult<SeriesReport> {
    let Query(query) = query?;
    series_report(Indicator::SeaLevel, &query)
}

async fn get_extremes(query: QueryResult<KindQuery>) -> ApiResult<ExtremesResponse> {
    let Query(query) = query?;
    let kind = climate_data::parse_kind_filter(query.kind.as_deref())?;
    Ok(Json(ExtremesResponse {
        events: climate_data::events_of_kind(kind),
        counts: climate_data::event_counts(),
    }))
}

async fn get_nearby_extremes(query: QueryResult<NearbyQuery>) -> ApiResult<Vec<NearbyEvent>> {
    let Query(query) = query?;
    let center = Coordinate::new(query.lat, query.lon)?;
    let radius = query.radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    Ok(Json(climate_data::events_near(center, radius)?))
}

async fn get_markers(State(state): State<Arc<AppState>>) -> Json<Vec<MarkerView>> {
    Json(state.map.markers())
}

async fn get_selected(State(state): State<Arc<AppState>>) -> Json<Option<WeatherSnapshot>> {
    Json(state.map.selected())
}

async fn click_map(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClickRequest>, JsonRejection>,
) -> ApiResult<SelectionOutcome> {
    let Json(click) = payload?;
    Ok(Json(state.map.click_map(click.latitude, click.longitude).await?))
}

async fn search(
    State(state): State<Arc<AppState>>,
    query: QueryResult<TextQuery>,
) -> ApiResult<SearchOutcome> {
    let Query(query) = query?;
    Ok(Json(state.map.search(query.q.as_deref().unwrap_or_default()).await))
}

async fn suggest(
    State(state): State<Arc<AppState>>,
    query: QueryResult<TextQuery>,
) -> ApiResult<Vec<LocationMatch>> {
    let Query(query) = query?;
    Ok(Json(state.map.suggest(query.q.as_deref().unwrap_or_default())))
}

async fn select_match(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LocationMatch>, JsonRejection>,
) -> ApiResult<SelectionOutcome> {
    let Json(location) = payload?;
    Ok(Json(state.map.select_match(&location).await?))
}

async fn get_about() -> Json<AboutResponse> {
    Json(AboutResponse {
        name: "ClimateWatch",
        version: VERSION,
        description: "Climate indicators, extreme weather events and live temperatures around the globe",
        data_sources: vec![
            DataSource {
                name: "NASA Goddard Institute for Space Studies (GISS)",
                provides: "Global temperature data",
            },
            DataSource {
                name: "National Oceanic and Atmospheric Administration (NOAA)",
                provides: "Climate monitoring and research",
            },
            DataSource {
                name: "Mauna Loa Observatory",
                provides: "Atmospheric CO2 concentration measurements",
            },
            DataSource {
                name: "Commonwealth Scientific and Industrial Research Organisation (CSIRO)",
                provides: "Sea level data",
            },
            DataSource {
                name: "World Meteorological Organization (WMO)",
                provides: "Extreme weather event tracking",
            },
            DataSource {
                name: "OpenWeatherMap",
                provides: "Current weather and geocoding",
            },
            DataSource {
                name: "OpenStreetMap Nominatim",
                provides: "Geocoding fallback",
            },
        ],
    })
}
