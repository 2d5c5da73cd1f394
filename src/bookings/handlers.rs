// HTTP handlers for availability, quotes and booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::bookings::{
    AvailabilityResult, Booking, BookingListQuery, CalendarDay, CreateBookingRequest, DateWindowQuery,
    StayQuery, SubmissionState, UpdateBookingStatusRequest,
};
use crate::error::{ApiError, ErrorResponse};
use crate::pricing::PriceQuote;
use crate::AppState;

/// Result of a booking submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    /// `pending` when the booking was saved, `rejected` otherwise
    #[schema(example = "pending")]
    pub state: String,
    pub booking: Option<Booking>,
    pub message: Option<String>,
    pub conflicting_booking_ids: Vec<Uuid>,
}

/// Dates already taken in a window
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookedDatesResponse {
    pub room_type_id: Uuid,
    #[schema(value_type = Vec<String>)]
    pub dates: Vec<NaiveDate>,
}

/// Handler for GET /api/room-types/:id/availability
#[utoipa::path(
    get,
    path = "/api/room-types/{id}/availability",
    params(("id" = Uuid, Path, description = "Room type ID"), StayQuery),
    responses(
        (status = 200, description = "Availability of the stay", body = AvailabilityResult),
        (status = 400, description = "Invalid or oversized stay", body = ErrorResponse),
        (status = 404, description = "Room type not found", body = ErrorResponse),
        (status = 503, description = "Store unavailable, retry", body = ErrorResponse)
    ),
    tag = "availability"
)]
pub async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(stay): Query<StayQuery>,
) -> Result<Json<AvailabilityResult>, ApiError> {
    let result = state
        .booking_service
        .check_availability(id, stay.check_in, stay.check_out)
        .await?;
    Ok(Json(result))
}

/// Handler for GET /api/room-types/:id/quote
#[utoipa::path(
    get,
    path = "/api/room-types/{id}/quote",
    params(("id" = Uuid, Path, description = "Room type ID"), StayQuery),
    responses(
        (status = 200, description = "Total and nightly breakdown", body = PriceQuote),
        (status = 400, description = "Invalid or oversized stay", body = ErrorResponse),
        (status = 404, description = "Room type not found", body = ErrorResponse)
    ),
    tag = "availability"
)]
pub async fn quote_stay(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(stay): Query<StayQuery>,
) -> Result<Json<PriceQuote>, ApiError> {
    let quote = state
        .booking_service
        .quote(id, stay.check_in, stay.check_out)
        .await?;
    Ok(Json(quote))
}

/// Handler for GET /api/room-types/:id/calendar
#[utoipa::path(
    get,
    path = "/api/room-types/{id}/calendar",
    params(("id" = Uuid, Path, description = "Room type ID"), DateWindowQuery),
    responses(
        (status = 200, description = "One entry per night in [from, to)", body = Vec<CalendarDay>),
        (status = 400, description = "Invalid or oversized window", body = ErrorResponse),
        (status = 404, description = "Room type not found", body = ErrorResponse),
        (status = 503, description = "Store unavailable, retry", body = ErrorResponse)
    ),
    tag = "availability"
)]
pub async fn get_calendar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(window): Query<DateWindowQuery>,
) -> Result<Json<Vec<CalendarDay>>, ApiError> {
    let days = state
        .booking_service
        .calendar(id, window.from, window.to)
        .await?;
    Ok(Json(days))
}

/// Handler for GET /api/room-types/:id/booked-dates
#[utoipa::path(
    get,
    path = "/api/room-types/{id}/booked-dates",
    params(("id" = Uuid, Path, description = "Room type ID"), DateWindowQuery),
    responses(
        (status = 200, description = "Occupied nights in [from, to)", body = BookedDatesResponse),
        (status = 400, description = "Invalid or oversized window", body = ErrorResponse),
        (status = 503, description = "Store unavailable, retry", body = ErrorResponse)
    ),
    tag = "availability"
)]
pub async fn get_booked_dates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(window): Query<DateWindowQuery>,
) -> Result<Json<BookedDatesResponse>, ApiError> {
    let dates = state
        .booking_service
        .booked_dates(id, window.from, window.to)
        .await?;
    Ok(Json(BookedDatesResponse {
        room_type_id: id,
        dates,
    }))
}

/// Handler for POST /api/bookings
/// Submits a guest booking request
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking saved as pending", body = SubmissionResponse),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 404, description = "Room type not found", body = ErrorResponse),
        (status = 409, description = "Dates unavailable, nothing saved", body = SubmissionResponse),
        (status = 500, description = "Booking could not be saved, retry", body = ErrorResponse),
        (status = 503, description = "Availability could not be checked, retry", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    tracing::debug!(room_type_id = %payload.room_type_id, "Booking submission received");

    match state.booking_service.submit(payload).await? {
        SubmissionState::Pending(booking) => Ok((
            StatusCode::CREATED,
            Json(SubmissionResponse {
                state: "pending".to_string(),
                booking: Some(*booking),
                message: None,
                conflicting_booking_ids: Vec::new(),
            }),
        )),
        SubmissionState::Rejected(rejection) => Ok((
            StatusCode::CONFLICT,
            Json(SubmissionResponse {
                state: "rejected".to_string(),
                booking: None,
                message: Some(rejection.message),
                conflicting_booking_ids: rejection.conflicting_booking_ids,
            }),
        )),
        other => Err(ApiError::InternalError(format!(
            "Submission ended in non-terminal state {}",
            other.name()
        ))),
    }
}

/// Handler for GET /api/bookings
#[utoipa::path(
    get,
    path = "/api/bookings",
    params(BookingListQuery),
    responses(
        (status = 200, description = "Bookings, newest first", body = Vec<Booking>)
    ),
    tag = "bookings"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state.booking_service.list(query.into()).await?;
    Ok(Json(bookings))
}

/// Handler for GET /api/bookings/:id
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.booking_service.get(id).await?))
}

/// Handler for PATCH /api/bookings/:id/status
/// Administrator status change
#[utoipa::path(
    patch,
    path = "/api/bookings/{id}/status",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Booking),
        (status = 400, description = "Transition not allowed", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Restore would overlap an active booking", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state
        .booking_service
        .update_status(id, payload.status)
        .await?;
    Ok(Json(booking))
}
