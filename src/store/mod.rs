// Data store abstraction
//
// Typed access to the three tables the booking engine reads and writes:
// `room_types`, `room_date_prices` and `bookings`.

pub mod error;
pub mod memory;
pub mod postgres;
#[cfg(test)]
pub(crate) mod test_support;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::bookings::{Booking, BookingFilter, BookingStatus, NewBooking};
use crate::rooms::{DatePriceOverride, NewRoomType, RoomType, RoomTypePatch};

/// Outcome of `insert_booking_if_available`
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionalInsert {
    Inserted(Booking),
    /// An active booking already holds the unit; nothing was written
    Conflict { conflicting: Vec<Uuid> },
}

#[async_trait]
pub trait DataStore: Send + Sync {
    async fn find_room_type(&self, id: Uuid) -> StoreResult<Option<RoomType>>;

    async fn list_room_types(&self) -> StoreResult<Vec<RoomType>>;

    async fn insert_room_type(&self, room_type: NewRoomType) -> StoreResult<RoomType>;

    /// Fails with `NotFound` for an unknown id
    async fn update_room_type(&self, id: Uuid, patch: RoomTypePatch) -> StoreResult<RoomType>;

    /// Returns false when nothing was deleted
    async fn delete_room_type(&self, id: Uuid) -> StoreResult<bool>;

    /// Overrides of one room type with `from <= date < to`, ordered by date
    async fn list_price_overrides(
        &self,
        room_type_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<DatePriceOverride>>;

    /// Insert or replace the override for `(room_type_id, date)`
    async fn upsert_price_override(
        &self,
        room_type_id: Uuid,
        date: NaiveDate,
        price: Decimal,
    ) -> StoreResult<DatePriceOverride>;

    async fn delete_price_override(&self, room_type_id: Uuid, date: NaiveDate) -> StoreResult<bool>;

    /// Bookings matching `filter`, newest first
    async fn list_bookings(&self, filter: BookingFilter) -> StoreResult<Vec<Booking>>;

    async fn find_booking(&self, id: Uuid) -> StoreResult<Option<Booking>>;

    /// Insert only if no active booking of the room type overlaps the stay.
    /// The check and the write are atomic with respect to other writers.
    async fn insert_booking_if_available(&self, booking: NewBooking) -> StoreResult<ConditionalInsert>;

    /// Moving a booking back to an active status is guarded like an insert and
    /// fails with `Conflict` when it would overlap another active booking.
    async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> StoreResult<Booking>;
}
