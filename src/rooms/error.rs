use chrono::NaiveDate;
use uuid::Uuid;

use crate::store::StoreError;

/// Error types for room type and pricing management
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("Room type not found: {0}")]
    NotFound(Uuid),

    #[error("No price override for room type {room_type_id} on {date}")]
    OverrideNotFound { room_type_id: Uuid, date: NaiveDate },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid date window: {to} must be after {from}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
