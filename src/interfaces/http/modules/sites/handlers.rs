//! Site HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::StationService;
use crate::interfaces::http::common::{reject, ApiResponse, ApiResult, EmptyData};
use crate::interfaces::http::modules::stations::StationDto;

use super::dto::*;

/// Application state for site handlers.
#[derive(Clone)]
pub struct SiteAppState {
    pub stations: Arc<StationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/sites",
    tag = "Sites",
    request_body = CreateSiteRequest,
    responses(
        (status = 200, description = "Site created", body = ApiResponse<SiteDto>)
    )
)]
pub async fn create_site(
    State(state): State<SiteAppState>,
    Json(request): Json<CreateSiteRequest>,
) -> ApiResult<SiteDto> {
    let site = state
        .stations
        .add_site(&request.name, &request.address)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(site.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/sites/{site_id}",
    tag = "Sites",
    params(("site_id" = i64, Path, description = "Site ID")),
    request_body = UpdateSiteRequest,
    responses(
        (status = 200, description = "Update applied (no-op for unknown id)", body = ApiResponse<EmptyData>)
    )
)]
pub async fn update_site(
    State(state): State<SiteAppState>,
    Path(site_id): Path<i64>,
    Json(request): Json<UpdateSiteRequest>,
) -> ApiResult<EmptyData> {
    state
        .stations
        .update_site(site_id, request.name.as_deref(), request.address.as_deref())
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/sites",
    tag = "Sites",
    responses(
        (status = 200, description = "All sites", body = ApiResponse<Vec<SiteDto>>)
    )
)]
pub async fn list_sites(State(state): State<SiteAppState>) -> ApiResult<Vec<SiteDto>> {
    let sites = state.stations.list_sites().await.map_err(reject)?;
    Ok(Json(ApiResponse::success(
        sites.into_iter().map(SiteDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/sites/{site_id}",
    tag = "Sites",
    params(("site_id" = i64, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Site details", body = ApiResponse<SiteDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_site(
    State(state): State<SiteAppState>,
    Path(site_id): Path<i64>,
) -> ApiResult<SiteDto> {
    let site = state.stations.get_site(site_id).await.map_err(reject)?;
    let Some(site) = site else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Site {} not found", site_id))),
        ));
    };
    Ok(Json(ApiResponse::success(site.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/sites/{site_id}/stations",
    tag = "Sites",
    params(("site_id" = i64, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Stations attached to the site", body = ApiResponse<Vec<StationDto>>)
    )
)]
pub async fn list_site_stations(
    State(state): State<SiteAppState>,
    Path(site_id): Path<i64>,
) -> ApiResult<Vec<StationDto>> {
    let stations = state
        .stations
        .list_stations_for_site(site_id)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(
        stations.into_iter().map(StationDto::from).collect(),
    )))
}
