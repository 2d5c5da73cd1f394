pub mod bookings;
pub mod config;
pub mod db;
pub mod error;
pub mod pricing;
pub mod rooms;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bookings::{BookingNotifier, BookingService, TracingNotifier};
use crate::config::AppConfig;
use crate::rooms::RoomService;
use crate::store::DataStore;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        rooms::list_room_types,
        rooms::create_room_type,
        rooms::get_room_type,
        rooms::update_room_type,
        rooms::delete_room_type,
        rooms::list_price_overrides,
        rooms::set_price_override,
        rooms::delete_price_override,
        bookings::check_availability,
        bookings::quote_stay,
        bookings::get_calendar,
        bookings::get_booked_dates,
        bookings::create_booking,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::update_booking_status,
    ),
    components(
        schemas(
            rooms::RoomType,
            rooms::DatePriceOverride,
            rooms::CreateRoomTypeRequest,
            rooms::UpdateRoomTypeRequest,
            rooms::SetDatePriceRequest,
            bookings::Booking,
            bookings::BookingStatus,
            bookings::CreateBookingRequest,
            bookings::UpdateBookingStatusRequest,
            bookings::AvailabilityResult,
            bookings::CalendarDay,
            bookings::SubmissionResponse,
            bookings::BookedDatesResponse,
            pricing::PriceQuote,
            pricing::NightlyPrice,
            pricing::PriceSource,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "room-types", description = "Room type management"),
        (name = "pricing", description = "Per-date price overrides"),
        (name = "availability", description = "Availability, quotes and the booking calendar"),
        (name = "bookings", description = "Booking submission and administration")
    ),
    info(
        title = "Resort Booking API",
        version = "0.1.0",
        description = "Date-scoped room pricing, availability and booking submission"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub room_service: RoomService,
    pub booking_service: BookingService,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, notifier: Arc<dyn BookingNotifier>, config: &AppConfig) -> Self {
        Self {
            room_service: RoomService::new(store.clone()),
            booking_service: BookingService::new(store, notifier).with_store_timeout(config.store_timeout),
        }
    }

    /// State with the log-only notifier
    pub fn with_store(store: Arc<dyn DataStore>, config: &AppConfig) -> Self {
        Self::new(store, Arc::new(TracingNotifier), config)
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS and tracing middleware
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route(
            "/api/room-types",
            get(rooms::list_room_types).post(rooms::create_room_type),
        )
        .route(
            "/api/room-types/:id",
            get(rooms::get_room_type)
                .put(rooms::update_room_type)
                .delete(rooms::delete_room_type),
        )
        .route("/api/room-types/:id/prices", get(rooms::list_price_overrides))
        .route(
            "/api/room-types/:id/prices/:date",
            put(rooms::set_price_override).delete(rooms::delete_price_override),
        )
        .route("/api/room-types/:id/availability", get(bookings::check_availability))
        .route("/api/room-types/:id/quote", get(bookings::quote_stay))
        .route("/api/room-types/:id/calendar", get(bookings::get_calendar))
        .route("/api/room-types/:id/booked-dates", get(bookings::get_booked_dates))
        .route(
            "/api/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/api/bookings/:id", get(bookings::get_booking))
        .route("/api/bookings/:id/status", patch(bookings::update_booking_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
