// Store doubles for service and router tests

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

use crate::bookings::{Booking, BookingFilter, BookingStatus, NewBooking};
use crate::rooms::{DatePriceOverride, NewRoomType, RoomType, RoomTypePatch};
use crate::store::{ConditionalInsert, DataStore, InMemoryStore, StoreError, StoreResult};

/// Wraps an `InMemoryStore` and injects failures, delays or stale results
/// into the booking reads and writes
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryStore,
    pub fail_booking_reads: bool,
    pub fail_booking_writes: bool,
    /// `list_bookings` answers with nothing, as a read that lost a race would
    pub stale_booking_reads: bool,
    pub booking_read_delay: Option<Duration>,
    pub inserts_attempted: AtomicUsize,
}

impl FlakyStore {
    pub fn failing_reads() -> Self {
        Self {
            fail_booking_reads: true,
            ..Default::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_booking_writes: true,
            ..Default::default()
        }
    }

    pub fn stale_reads() -> Self {
        Self {
            stale_booking_reads: true,
            ..Default::default()
        }
    }

    pub fn slow_reads(delay: Duration) -> Self {
        Self {
            booking_read_delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn inserts_attempted(&self) -> usize {
        self.inserts_attempted.load(Ordering::SeqCst)
    }

    async fn booking_read_gate(&self) -> StoreResult<()> {
        if let Some(delay) = self.booking_read_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_booking_reads {
            return Err(StoreError::Backend("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore for FlakyStore {
    async fn find_room_type(&self, id: Uuid) -> StoreResult<Option<RoomType>> {
        self.inner.find_room_type(id).await
    }

    async fn list_room_types(&self) -> StoreResult<Vec<RoomType>> {
        self.inner.list_room_types().await
    }

    async fn insert_room_type(&self, room_type: NewRoomType) -> StoreResult<RoomType> {
        self.inner.insert_room_type(room_type).await
    }

    async fn update_room_type(&self, id: Uuid, patch: RoomTypePatch) -> StoreResult<RoomType> {
        self.inner.update_room_type(id, patch).await
    }

    async fn delete_room_type(&self, id: Uuid) -> StoreResult<bool> {
        self.inner.delete_room_type(id).await
    }

    async fn list_price_overrides(
        &self,
        room_type_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<DatePriceOverride>> {
        self.inner.list_price_overrides(room_type_id, from, to).await
    }

    async fn upsert_price_override(
        &self,
        room_type_id: Uuid,
        date: NaiveDate,
        price: Decimal,
    ) -> StoreResult<DatePriceOverride> {
        self.inner.upsert_price_override(room_type_id, date, price).await
    }

    async fn delete_price_override(&self, room_type_id: Uuid, date: NaiveDate) -> StoreResult<bool> {
        self.inner.delete_price_override(room_type_id, date).await
    }

    async fn list_bookings(&self, filter: BookingFilter) -> StoreResult<Vec<Booking>> {
        self.booking_read_gate().await?;
        if self.stale_booking_reads {
            return Ok(Vec::new());
        }
        self.inner.list_bookings(filter).await
    }

    async fn find_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        self.booking_read_gate().await?;
        self.inner.find_booking(id).await
    }

    async fn insert_booking_if_available(&self, booking: NewBooking) -> StoreResult<ConditionalInsert> {
        self.inserts_attempted.fetch_add(1, Ordering::SeqCst);
        if self.fail_booking_writes {
            return Err(StoreError::Backend("write timeout on primary".to_string()));
        }
        self.inner.insert_booking_if_available(booking).await
    }

    async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> StoreResult<Booking> {
        if self.fail_booking_writes {
            return Err(StoreError::Backend("write timeout on primary".to_string()));
        }
        self.inner.update_booking_status(id, status).await
    }
}
