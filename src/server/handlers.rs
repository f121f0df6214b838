use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::address::{
    Complaint, Coordinates, MapType, StaticMap, ValidationVerdict, DEFAULT_RADIUS_KM,
};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /health ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ─── GET /api/validate ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct ValidateQuery {
    pub address: Option<String>,
}

pub async fn validate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ValidateQuery>,
) -> Result<Json<ValidationVerdict>, ApiError> {
    let start = Instant::now();

    let address = params.address.as_deref().unwrap_or("").trim().to_string();
    if address.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Please enter an address"));
    }

    let resolver = state.resolver.clone();
    let input = address.clone();
    let verdict = tokio::task::spawn_blocking(move || resolver.validate(&input))
        .await
        .map_err(|e| {
            error!(error = %e, "validation task panicked");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Validation task failed")
        })?;

    info!(
        address = %address,
        nyc = verdict.is_nyc,
        confidence = %verdict.confidence,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/validate"
    );

    Ok(Json(verdict))
}

// ─── GET /api/map ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MapQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub zoom: Option<u8>,
    pub maptype: Option<String>,
}

#[derive(Serialize)]
pub struct MapResponse {
    pub url: String,
    pub zoom: u8,
    pub maptype: MapType,
}

/// Highest zoom level the static map service accepts.
const MAX_ZOOM: u8 = 21;

pub async fn map_url(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MapQuery>,
) -> Result<Json<MapResponse>, ApiError> {
    let (Some(lat), Some(lng)) = (params.lat, params.lng) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Provide 'lat' and 'lng' parameters"));
    };
    let center = Coordinates::new(lat, lng);
    if !center.is_valid() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid coordinates. Lat: -90..90, Lng: -180..180",
        ));
    }

    let mut map = StaticMap::new(center);
    if let Some(zoom) = params.zoom {
        if zoom > MAX_ZOOM {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                format!("Zoom must be 0-{}", MAX_ZOOM),
            ));
        }
        map = map.with_zoom(zoom);
    }
    if let Some(raw) = params.maptype.as_deref() {
        let map_type = raw
            .parse::<MapType>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
        map = map.with_map_type(map_type);
    }

    let url = map
        .url(&state.static_map_endpoint, &state.key)
        .map_err(|e| {
            error!(error = %e, endpoint = %state.static_map_endpoint, "bad static map endpoint");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Static map endpoint misconfigured")
        })?;

    Ok(Json(MapResponse {
        url: url.to_string(),
        zoom: map.zoom,
        maptype: map.map_type,
    }))
}

// ─── GET /api/complaints ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct ComplaintsQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintsResponse {
    pub radius_km: f64,
    pub count: usize,
    pub complaints: Vec<Complaint>,
}

/// Largest radius passed through to the complaints service.
const MAX_RADIUS_KM: f64 = 5.0;

pub async fn complaints(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ComplaintsQuery>,
) -> Result<Json<ComplaintsResponse>, ApiError> {
    let Some(client) = state.complaints.clone() else {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Complaints lookup is not configured",
        ));
    };
    let (Some(lat), Some(lng)) = (params.lat, params.lng) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Provide 'lat' and 'lng' parameters"));
    };
    let center = Coordinates::new(lat, lng);
    if !center.is_valid() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid coordinates. Lat: -90..90, Lng: -180..180",
        ));
    }
    let radius_km = params.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    if !(radius_km > 0.0 && radius_km <= MAX_RADIUS_KM) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("radius_km must be in (0, {}]", MAX_RADIUS_KM),
        ));
    }

    let complaints = tokio::task::spawn_blocking(move || client.nearby(center, radius_km))
        .await
        .map_err(|e| {
            error!(error = %e, "complaints task panicked");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Complaints task failed")
        })?;

    info!(lat, lng, radius_km, count = complaints.len(), "GET /api/complaints");

    Ok(Json(ComplaintsResponse {
        radius_km,
        count: complaints.len(),
        complaints,
    }))
}
