//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AuthService, ReservationService, StationService};
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::modules::{auth, health, reservations, sites, stations};

/// Unified state for all routes. Axum extracts the specific handler
/// state via `FromRef`.
#[derive(Clone)]
pub struct ApiUnifiedState {
    pub auth: Arc<AuthService>,
    pub stations: Arc<StationService>,
    pub reservations: Arc<ReservationService>,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<ApiUnifiedState> for auth::AuthAppState {
    fn from_ref(s: &ApiUnifiedState) -> Self {
        auth::AuthAppState {
            auth: Arc::clone(&s.auth),
        }
    }
}

impl FromRef<ApiUnifiedState> for sites::SiteAppState {
    fn from_ref(s: &ApiUnifiedState) -> Self {
        sites::SiteAppState {
            stations: Arc::clone(&s.stations),
        }
    }
}

impl FromRef<ApiUnifiedState> for stations::StationAppState {
    fn from_ref(s: &ApiUnifiedState) -> Self {
        stations::StationAppState {
            stations: Arc::clone(&s.stations),
        }
    }
}

impl FromRef<ApiUnifiedState> for reservations::ReservationAppState {
    fn from_ref(s: &ApiUnifiedState) -> Self {
        reservations::ReservationAppState {
            reservations: Arc::clone(&s.reservations),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::handlers::register,
        auth::handlers::validate_account,
        auth::handlers::login,
        // Sites
        sites::handlers::create_site,
        sites::handlers::update_site,
        sites::handlers::list_sites,
        sites::handlers::get_site,
        sites::handlers::list_site_stations,
        // Stations
        stations::handlers::create_station,
        stations::handlers::update_station,
        stations::handlers::delete_station,
        stations::handlers::get_station,
        stations::handlers::find_available,
        // Reservations
        reservations::handlers::create_reservation,
        reservations::handlers::accept_reservation,
        reservations::handlers::reject_reservation,
        reservations::handlers::list_reservations,
        reservations::handlers::get_reservation,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            // Health
            health::HealthResponse,
            // Auth
            auth::RegisterRequest,
            auth::ValidateAccountRequest,
            auth::LoginRequest,
            auth::UserDto,
            // Sites
            sites::CreateSiteRequest,
            sites::UpdateSiteRequest,
            sites::SiteDto,
            // Stations
            stations::CreateStationRequest,
            stations::UpdateStationRequest,
            stations::StationDto,
            // Reservations
            reservations::CreateReservationRequest,
            reservations::ReservationDto,
            reservations::AcceptReservationResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness probe."),
        (name = "Auth", description = "Account registration, validation codes and login. Only validated accounts can book."),
        (name = "Sites", description = "Sites hosting charging stations. Blank fields in updates are left unchanged."),
        (name = "Stations", description = "Charging stations and the availability search. A station is offered for a slot when its state is `Available` and no Pending/Accepted reservation overlaps the half-open interval `[start, end)`."),
        (name = "Reservations", description = "Booking lifecycle: created `Pending`, then `Accepted` (receipt emitted) or `Rejected`. Both outcomes are terminal."),
    ),
    info(
        title = "EV Reserve API",
        version = "1.0.0",
        description = "REST API for reserving charging stations.

All responses are wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}, \"error\": null}
```

Time slots are half-open `[start, end)`: a reservation ending at 11:00 does
not conflict with one starting at 11:00."
    )
)]
struct ApiDoc;

/// Build the API router with all routes, Swagger UI and middleware.
pub fn create_api_router(
    auth: Arc<AuthService>,
    stations: Arc<StationService>,
    reservations: Arc<ReservationService>,
) -> Router {
    let state = ApiUnifiedState {
        auth,
        stations,
        reservations,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::handlers::register))
        .route("/auth/validate", post(auth::handlers::validate_account))
        .route("/auth/login", post(auth::handlers::login))
        // Sites
        .route("/sites", post(sites::handlers::create_site))
        .route("/sites", get(sites::handlers::list_sites))
        .route("/sites/{site_id}", put(sites::handlers::update_site))
        .route("/sites/{site_id}", get(sites::handlers::get_site))
        .route(
            "/sites/{site_id}/stations",
            get(sites::handlers::list_site_stations),
        )
        // Stations (static segment before the capture)
        .route("/stations/available", get(stations::handlers::find_available))
        .route("/stations", post(stations::handlers::create_station))
        .route("/stations/{station_id}", put(stations::handlers::update_station))
        .route("/stations/{station_id}", delete(stations::handlers::delete_station))
        .route("/stations/{station_id}", get(stations::handlers::get_station))
        // Reservations
        .route("/reservations", post(reservations::handlers::create_reservation))
        .route("/reservations", get(reservations::handlers::list_reservations))
        .route(
            "/reservations/{reservation_id}/accept",
            post(reservations::handlers::accept_reservation),
        )
        .route(
            "/reservations/{reservation_id}/reject",
            post(reservations::handlers::reject_reservation),
        )
        .route(
            "/reservations/{reservation_id}",
            get(reservations::handlers::get_reservation),
        )
        .with_state(state);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1", api_v1)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
