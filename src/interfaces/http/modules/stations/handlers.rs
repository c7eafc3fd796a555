//! Station HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::StationService;
use crate::domain::{DomainError, StationState};
use crate::interfaces::http::common::{
    parse_timestamp, reject, ApiResponse, ApiResult, EmptyData,
};

use super::dto::*;

/// Application state for station handlers.
#[derive(Clone)]
pub struct StationAppState {
    pub stations: Arc<StationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/stations",
    tag = "Stations",
    request_body = CreateStationRequest,
    responses(
        (status = 200, description = "Request processed; unknown site or negative rate is logged and ignored", body = ApiResponse<EmptyData>)
    )
)]
pub async fn create_station(
    State(state): State<StationAppState>,
    Json(request): Json<CreateStationRequest>,
) -> ApiResult<EmptyData> {
    state
        .stations
        .add_station(request.site_id, request.hourly_rate)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    put,
    path = "/api/v1/stations/{station_id}",
    tag = "Stations",
    params(("station_id" = i64, Path, description = "Station ID")),
    request_body = UpdateStationRequest,
    responses(
        (status = 200, description = "Update applied (no-op for unknown id)", body = ApiResponse<EmptyData>),
        (status = 400, description = "Unknown state name")
    )
)]
pub async fn update_station(
    State(state): State<StationAppState>,
    Path(station_id): Path<i64>,
    Json(request): Json<UpdateStationRequest>,
) -> ApiResult<EmptyData> {
    let new_state = match request.state.as_deref() {
        Some(s) => Some(StationState::parse(s).ok_or_else(|| {
            reject(DomainError::Validation(format!("unknown station state '{s}'")))
        })?),
        None => None,
    };

    state
        .stations
        .update_station(station_id, new_state, request.hourly_rate)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    delete,
    path = "/api/v1/stations/{station_id}",
    tag = "Stations",
    params(("station_id" = i64, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station removed", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Station has future reservations")
    )
)]
pub async fn delete_station(
    State(state): State<StationAppState>,
    Path(station_id): Path<i64>,
) -> ApiResult<EmptyData> {
    state
        .stations
        .remove_station(station_id)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{station_id}",
    tag = "Stations",
    params(("station_id" = i64, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station details", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_station(
    State(state): State<StationAppState>,
    Path(station_id): Path<i64>,
) -> ApiResult<StationDto> {
    let station = state.stations.get_station(station_id).await.map_err(reject)?;
    let Some(station) = station else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "Station {} not found",
                station_id
            ))),
        ));
    };
    Ok(Json(ApiResponse::success(station.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/available",
    tag = "Stations",
    params(AvailabilityParams),
    responses(
        (status = 200, description = "Stations free for the whole slot", body = ApiResponse<Vec<StationDto>>),
        (status = 400, description = "Malformed or inverted interval")
    )
)]
pub async fn find_available(
    State(state): State<StationAppState>,
    Query(params): Query<AvailabilityParams>,
) -> ApiResult<Vec<StationDto>> {
    let start = parse_timestamp(&params.start, "start").map_err(reject)?;
    let end = parse_timestamp(&params.end, "end").map_err(reject)?;

    let stations = state
        .stations
        .find_available(start, end)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(
        stations.into_iter().map(StationDto::from).collect(),
    )))
}
