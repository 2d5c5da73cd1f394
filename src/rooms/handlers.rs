// HTTP handlers for room type and pricing endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::bookings::DateWindowQuery;
use crate::error::{ApiError, ErrorResponse};
use crate::rooms::{
    CreateRoomTypeRequest, DatePriceOverride, RoomType, SetDatePriceRequest, UpdateRoomTypeRequest,
};
use crate::AppState;

/// Handler for GET /api/room-types
#[utoipa::path(
    get,
    path = "/api/room-types",
    responses(
        (status = 200, description = "All room types ordered by name", body = Vec<RoomType>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "room-types"
)]
pub async fn list_room_types(State(state): State<AppState>) -> Result<Json<Vec<RoomType>>, ApiError> {
    tracing::debug!("Fetching all room types");
    let room_types = state.room_service.list().await?;
    Ok(Json(room_types))
}

/// Handler for POST /api/room-types
#[utoipa::path(
    post,
    path = "/api/room-types",
    request_body = CreateRoomTypeRequest,
    responses(
        (status = 201, description = "Room type created", body = RoomType),
        (status = 400, description = "Invalid input data", body = ErrorResponse)
    ),
    tag = "room-types"
)]
pub async fn create_room_type(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomTypeRequest>,
) -> Result<(StatusCode, Json<RoomType>), ApiError> {
    let room_type = state.room_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(room_type)))
}

/// Handler for GET /api/room-types/:id
#[utoipa::path(
    get,
    path = "/api/room-types/{id}",
    params(("id" = Uuid, Path, description = "Room type ID")),
    responses(
        (status = 200, description = "Room type found", body = RoomType),
        (status = 404, description = "Room type not found", body = ErrorResponse)
    ),
    tag = "room-types"
)]
pub async fn get_room_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomType>, ApiError> {
    Ok(Json(state.room_service.get(id).await?))
}

/// Handler for PUT /api/room-types/:id
/// Only the fields present in the body are changed
#[utoipa::path(
    put,
    path = "/api/room-types/{id}",
    params(("id" = Uuid, Path, description = "Room type ID")),
    request_body = UpdateRoomTypeRequest,
    responses(
        (status = 200, description = "Room type updated", body = RoomType),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 404, description = "Room type not found", body = ErrorResponse)
    ),
    tag = "room-types"
)]
pub async fn update_room_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoomTypeRequest>,
) -> Result<Json<RoomType>, ApiError> {
    Ok(Json(state.room_service.update(id, payload).await?))
}

/// Handler for DELETE /api/room-types/:id
#[utoipa::path(
    delete,
    path = "/api/room-types/{id}",
    params(("id" = Uuid, Path, description = "Room type ID")),
    responses(
        (status = 204, description = "Room type deleted"),
        (status = 404, description = "Room type not found", body = ErrorResponse),
        (status = 409, description = "Room type still has bookings", body = ErrorResponse)
    ),
    tag = "room-types"
)]
pub async fn delete_room_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.room_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/room-types/:id/prices
#[utoipa::path(
    get,
    path = "/api/room-types/{id}/prices",
    params(("id" = Uuid, Path, description = "Room type ID"), DateWindowQuery),
    responses(
        (status = 200, description = "Overrides in [from, to), ordered by date", body = Vec<DatePriceOverride>),
        (status = 400, description = "Invalid date window", body = ErrorResponse),
        (status = 404, description = "Room type not found", body = ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn list_price_overrides(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(window): Query<DateWindowQuery>,
) -> Result<Json<Vec<DatePriceOverride>>, ApiError> {
    let overrides = state
        .room_service
        .list_prices(id, window.from, window.to)
        .await?;
    Ok(Json(overrides))
}

/// Handler for PUT /api/room-types/:id/prices/:date
#[utoipa::path(
    put,
    path = "/api/room-types/{id}/prices/{date}",
    params(
        ("id" = Uuid, Path, description = "Room type ID"),
        ("date" = String, Path, description = "Calendar date, yyyy-MM-dd")
    ),
    request_body = SetDatePriceRequest,
    responses(
        (status = 200, description = "Override stored", body = DatePriceOverride),
        (status = 400, description = "Invalid price", body = ErrorResponse),
        (status = 404, description = "Room type not found", body = ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn set_price_override(
    State(state): State<AppState>,
    Path((id, date)): Path<(Uuid, NaiveDate)>,
    Json(payload): Json<SetDatePriceRequest>,
) -> Result<Json<DatePriceOverride>, ApiError> {
    Ok(Json(state.room_service.set_price(id, date, payload).await?))
}

/// Handler for DELETE /api/room-types/:id/prices/:date
#[utoipa::path(
    delete,
    path = "/api/room-types/{id}/prices/{date}",
    params(
        ("id" = Uuid, Path, description = "Room type ID"),
        ("date" = String, Path, description = "Calendar date, yyyy-MM-dd")
    ),
    responses(
        (status = 204, description = "Override removed"),
        (status = 404, description = "No override on that date", body = ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn delete_price_override(
    State(state): State<AppState>,
    Path((id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<StatusCode, ApiError> {
    state.room_service.clear_price(id, date).await?;
    Ok(StatusCode::NO_CONTENT)
}
