//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::ReservationService;
use crate::interfaces::http::common::{parse_timestamp, reject, ApiResponse, ApiResult};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation created in Pending state", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid interval, unknown user/station, or unvalidated user"),
        (status = 409, description = "Slot already taken")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    Json(request): Json<CreateReservationRequest>,
) -> ApiResult<ReservationDto> {
    let start = parse_timestamp(&request.start_time, "start_time").map_err(reject)?;
    let end = parse_timestamp(&request.end_time, "end_time").map_err(reject)?;

    let reservation = state
        .reservations
        .create(request.user_id, request.station_id, start, end)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{reservation_id}/accept",
    tag = "Reservations",
    params(("reservation_id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation accepted; receipt_warning set if the receipt failed", body = ApiResponse<AcceptReservationResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Reservation is no longer pending")
    )
)]
pub async fn accept_reservation(
    State(state): State<ReservationAppState>,
    Path(reservation_id): Path<i64>,
) -> ApiResult<AcceptReservationResponse> {
    let outcome = state
        .reservations
        .accept(reservation_id)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(AcceptReservationResponse {
        reservation: outcome.reservation.into(),
        receipt_warning: outcome.receipt_warning,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{reservation_id}/reject",
    tag = "Reservations",
    params(("reservation_id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation rejected", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Reservation is no longer pending")
    )
)]
pub async fn reject_reservation(
    State(state): State<ReservationAppState>,
    Path(reservation_id): Path<i64>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .reservations
        .reject(reservation_id)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(ListReservationsParams),
    responses(
        (status = 200, description = "Reservations, sorted by start time", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationAppState>,
    Query(params): Query<ListReservationsParams>,
) -> ApiResult<Vec<ReservationDto>> {
    let mut reservations = match params.user_id {
        Some(user_id) => state.reservations.list_for_user(user_id).await,
        None => state.reservations.list_all().await,
    }
    .map_err(reject)?;

    // The ledger gives no ordering guarantee; sort for display
    reservations.sort_by_key(|r| r.start_time);
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Path(reservation_id): Path<i64>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .reservations
        .get(reservation_id)
        .await
        .map_err(reject)?;
    let Some(reservation) = reservation else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "Reservation {} not found",
                reservation_id
            ))),
        ));
    };
    Ok(Json(ApiResponse::success(reservation.into())))
}
