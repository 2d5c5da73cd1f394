use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_price;

/// A category of bookable unit with its own nightly rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoomType {
    pub id: Uuid,
    #[schema(example = "Ocean View Bungalow")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 2)]
    pub capacity: i32,
    /// Weekday nightly rate
    #[schema(example = "1000000")]
    pub base_price: Decimal,
    /// Saturday nightly rate; falls back to `base_price` when absent
    #[schema(example = "1500000")]
    pub weekend_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomType {
    /// Rate charged on a weekend night
    pub fn weekend_rate(&self) -> Decimal {
        self.weekend_price.unwrap_or(self.base_price)
    }
}

/// Admin-set price pinned to one date for one room type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DatePriceOverride {
    pub id: Uuid,
    pub room_type_id: Uuid,
    pub date: NaiveDate,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a room type
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRoomTypeRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 50, message = "Capacity must be between 1 and 50"))]
    pub capacity: i32,
    #[validate(custom = "validate_price")]
    pub base_price: Decimal,
    #[validate(custom = "validate_price")]
    pub weekend_price: Option<Decimal>,
}

/// Request DTO for partially updating a room type
///
/// `description` and `weekend_price` distinguish "leave unchanged" (field
/// omitted) from "clear it" (explicit `null`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomTypeRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(range(min = 1, max = 50, message = "Capacity must be between 1 and 50"))]
    pub capacity: Option<i32>,
    #[validate(custom = "validate_price")]
    pub base_price: Option<Decimal>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub weekend_price: Option<Option<Decimal>>,
}

/// Request DTO for pinning a price to a date
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetDatePriceRequest {
    #[validate(custom = "validate_price")]
    pub price: Decimal,
}

/// Fields for inserting a room type into the store
#[derive(Debug, Clone)]
pub struct NewRoomType {
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub base_price: Decimal,
    pub weekend_price: Option<Decimal>,
}

impl From<CreateRoomTypeRequest> for NewRoomType {
    fn from(request: CreateRoomTypeRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            capacity: request.capacity,
            base_price: request.base_price,
            weekend_price: request.weekend_price,
        }
    }
}

/// Partial update applied to a stored room type; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomTypePatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub capacity: Option<i32>,
    pub base_price: Option<Decimal>,
    pub weekend_price: Option<Option<Decimal>>,
}

impl RoomTypePatch {
    /// Apply the patch to a copy of `room_type`
    pub fn apply_to(&self, room_type: &RoomType) -> RoomType {
        RoomType {
            name: self.name.clone().unwrap_or_else(|| room_type.name.clone()),
            description: self.description.clone().unwrap_or_else(|| room_type.description.clone()),
            capacity: self.capacity.unwrap_or(room_type.capacity),
            base_price: self.base_price.unwrap_or(room_type.base_price),
            weekend_price: self.weekend_price.unwrap_or(room_type.weekend_price),
            ..room_type.clone()
        }
    }
}

impl From<UpdateRoomTypeRequest> for RoomTypePatch {
    fn from(request: UpdateRoomTypeRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            capacity: request.capacity,
            base_price: request.base_price,
            weekend_price: request.weekend_price,
        }
    }
}

/// Serde helper so an explicit `null` is kept apart from a missing field
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
