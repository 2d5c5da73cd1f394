use chrono::NaiveDate;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::bookings::{
    AvailabilityChecker, AvailabilityResult, Booking, BookingError, BookingFilter, BookingNotifier,
    BookingStatus, CalendarDay, CreateBookingRequest, NewBooking, Rejection, StatusMachine,
    SubmissionState,
};
use crate::pricing::{OverrideSnapshot, PriceCalculator, PriceQuote, PriceSource, StayRange};
use crate::rooms::RoomType;
use crate::store::{ConditionalInsert, DataStore, StoreError, StoreResult};

/// Upper bound for a single store round trip
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Widest window the calendar and booked-date views will enumerate
pub const MAX_CALENDAR_NIGHTS: i64 = 366;

/// Longest stay that can be checked, quoted or booked
pub const MAX_STAY_NIGHTS: i64 = 90;

fn availability_failure(err: StoreError) -> BookingError {
    warn!("Store read failed during availability check: {}", err);
    BookingError::AvailabilityCheckFailed(err.to_string())
}

/// Service for availability, quoting and the booking submission workflow
///
/// Every store call is bounded by `store_timeout`; an expired call surfaces
/// as `BookingError::Timeout`, never as "available" or "unavailable".
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn DataStore>,
    notifier: Arc<dyn BookingNotifier>,
    store_timeout: Duration,
}

impl BookingService {
    pub fn new(store: Arc<dyn DataStore>, notifier: Arc<dyn BookingNotifier>) -> Self {
        Self {
            store,
            notifier,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Run one store call under the configured timeout
    async fn timed<T, F>(&self, operation: &'static str, call: F) -> Result<StoreResult<T>, BookingError>
    where
        F: Future<Output = StoreResult<T>>,
    {
        timeout(self.store_timeout, call).await.map_err(|_| {
            warn!(
                operation,
                timeout_ms = self.store_timeout.as_millis() as u64,
                "Store call timed out"
            );
            BookingError::Timeout { operation }
        })
    }

    async fn room_type(
        &self,
        room_type_id: Uuid,
        on_store_error: fn(StoreError) -> BookingError,
    ) -> Result<RoomType, BookingError> {
        self.timed("find_room_type", self.store.find_room_type(room_type_id))
            .await?
            .map_err(on_store_error)?
            .ok_or(BookingError::UnknownRoomType(room_type_id))
    }

    /// Pending and confirmed bookings of the room type overlapping `stay`
    async fn active_bookings(&self, room_type_id: Uuid, stay: StayRange) -> Result<Vec<Booking>, BookingError> {
        let filter = BookingFilter::active_overlapping(room_type_id, stay);
        self.timed("list_bookings", self.store.list_bookings(filter))
            .await?
            .map_err(availability_failure)
    }

    /// Read the overrides for `stay` once so every night prices off the same data
    async fn override_snapshot(&self, room_type_id: Uuid, stay: &StayRange) -> Result<OverrideSnapshot, BookingError> {
        let overrides = self
            .timed(
                "list_price_overrides",
                self.store
                    .list_price_overrides(room_type_id, stay.check_in(), stay.check_out()),
            )
            .await??;
        Ok(OverrideSnapshot::from_overrides(&overrides))
    }

    fn bounded_range(from: NaiveDate, to: NaiveDate, max: i64) -> Result<StayRange, BookingError> {
        let range = StayRange::new(from, to)?;
        if range.night_count() > max {
            return Err(BookingError::RangeTooLong {
                nights: range.night_count(),
                max,
            });
        }
        Ok(range)
    }

    fn stay(check_in: NaiveDate, check_out: NaiveDate) -> Result<StayRange, BookingError> {
        Self::bounded_range(check_in, check_out, MAX_STAY_NIGHTS)
    }

    fn window(from: NaiveDate, to: NaiveDate) -> Result<StayRange, BookingError> {
        Self::bounded_range(from, to, MAX_CALENDAR_NIGHTS)
    }

    /// Check whether `[check_in, check_out)` is free for the room type
    ///
    /// A failed or timed-out store read is an error, never a result.
    pub async fn check_availability(
        &self,
        room_type_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<AvailabilityResult, BookingError> {
        let stay = Self::stay(check_in, check_out)?;
        let room = self.room_type(room_type_id, availability_failure).await?;
        let existing = self.active_bookings(room.id, stay).await?;

        let result = AvailabilityChecker::check_stay(room.id, &stay, &existing);
        debug!(
            room_type_id = %room.id,
            %check_in,
            %check_out,
            available = result.available,
            remaining_units = result.remaining_units,
            "Availability checked"
        );
        Ok(result)
    }

    /// Price a stay without booking it
    pub async fn quote(
        &self,
        room_type_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<PriceQuote, BookingError> {
        let stay = Self::stay(check_in, check_out)?;
        let room = self.room_type(room_type_id, BookingError::Store).await?;
        let snapshot = self.override_snapshot(room.id, &stay).await?;
        Ok(PriceCalculator::quote_stay(&room, &stay, &snapshot)?)
    }

    /// Nights in `[from, to)` already held by a pending or confirmed booking
    pub async fn booked_dates(
        &self,
        room_type_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>, BookingError> {
        let window = Self::window(from, to)?;
        let room = self.room_type(room_type_id, availability_failure).await?;
        let existing = self.active_bookings(room.id, window).await?;
        Ok(AvailabilityChecker::booked_dates(room.id, &window, &existing))
    }

    /// Nightly price and occupancy for each night in `[from, to)`
    pub async fn calendar(
        &self,
        room_type_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarDay>, BookingError> {
        let window = Self::window(from, to)?;
        let room = self.room_type(room_type_id, availability_failure).await?;
        let existing = self.active_bookings(room.id, window).await?;
        let snapshot = self.override_snapshot(room.id, &window).await?;

        let booked: HashSet<NaiveDate> = AvailabilityChecker::booked_dates(room.id, &window, &existing)
            .into_iter()
            .collect();
        let quote = PriceCalculator::quote_stay(&room, &window, &snapshot)?;

        Ok(quote
            .breakdown
            .into_iter()
            .map(|night| CalendarDay {
                date: night.date,
                price: night.price,
                is_weekend: night.is_weekend,
                has_override: night.source == PriceSource::Override,
                booked: booked.contains(&night.date),
            })
            .collect())
    }

    /// Run the submission workflow for a guest booking request
    ///
    /// # Returns
    /// A terminal state: `Pending` with the stored booking, or `Rejected`
    /// when the stay is taken. Store failures are errors and leave nothing
    /// behind.
    ///
    /// # Workflow
    /// - Availability is re-checked against current bookings
    /// - The total is quoted from a single override snapshot
    /// - The insert is conditional, so a racing request that won in between
    ///   also ends in `Rejected`
    /// - The notification is best-effort and never fails the booking
    pub async fn submit(&self, request: CreateBookingRequest) -> Result<SubmissionState, BookingError> {
        let stay = Self::stay(request.check_in, request.check_out)?;
        request.validate()?;
        let state = SubmissionState::Draft
            .submit()
            .map_err(BookingError::InvalidTransition)?;

        let room = self.room_type(request.room_type_id, availability_failure).await?;
        let existing = self.active_bookings(room.id, stay).await?;

        let availability = AvailabilityChecker::check_stay(room.id, &stay, &existing);
        if !availability.available {
            info!(
                room_type_id = %room.id,
                check_in = %stay.check_in(),
                check_out = %stay.check_out(),
                "Booking rejected: stay overlaps an active booking"
            );
            return state
                .reject(Rejection::unavailable(availability.conflicting_booking_ids))
                .map_err(BookingError::InvalidTransition);
        }

        let snapshot = self.override_snapshot(room.id, &stay).await?;
        let quote = PriceCalculator::quote_stay(&room, &stay, &snapshot)?;
        let new_booking = NewBooking::pending(&request, stay, &quote);

        let outcome = self
            .timed("insert_booking", self.store.insert_booking_if_available(new_booking))
            .await?
            .map_err(|err| match err {
                StoreError::NotFound { .. } => BookingError::UnknownRoomType(room.id),
                other => {
                    error!("Failed to persist booking: {}", other);
                    BookingError::Persistence(other.to_string())
                }
            })?;

        match outcome {
            ConditionalInsert::Inserted(booking) => {
                info!(
                    booking_id = %booking.id,
                    room_type_id = %booking.room_type_id,
                    total_price = %booking.total_price,
                    "Booking created"
                );
                self.notify_submitted(&booking).await;
                state.accept(booking).map_err(BookingError::InvalidTransition)
            }
            ConditionalInsert::Conflict { conflicting } => {
                info!(
                    room_type_id = %room.id,
                    "Booking rejected: stay was taken before the insert"
                );
                state
                    .reject(Rejection::unavailable(conflicting))
                    .map_err(BookingError::InvalidTransition)
            }
        }
    }

    async fn notify_submitted(&self, booking: &Booking) {
        match timeout(self.store_timeout, self.notifier.booking_submitted(booking)).await {
            Ok(Ok(())) => debug!(booking_id = %booking.id, "Booking notification sent"),
            Ok(Err(err)) => warn!(booking_id = %booking.id, "Booking notification failed: {}", err),
            Err(_) => warn!(booking_id = %booking.id, "Booking notification timed out"),
        }
    }

    /// Administrator status change
    ///
    /// Writing the current status again is a no-op. Restoring a cancelled
    /// booking fails with `Conflict` when its nights were taken meanwhile.
    pub async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<Booking, BookingError> {
        let existing = self.get(id).await?;
        StatusMachine::transition(existing.status, status).map_err(BookingError::InvalidTransition)?;

        if existing.status == status {
            return Ok(existing);
        }

        let updated = self
            .timed("update_booking_status", self.store.update_booking_status(id, status))
            .await?
            .map_err(|err| match err {
                StoreError::NotFound { .. } => BookingError::BookingNotFound(id),
                StoreError::Conflict(message) => BookingError::Conflict(message),
                other => {
                    error!("Failed to update booking {}: {}", id, other);
                    BookingError::Persistence(other.to_string())
                }
            })?;

        info!(booking_id = %id, from = %existing.status, to = %status, "Booking status updated");

        match timeout(
            self.store_timeout,
            self.notifier.booking_status_changed(&updated, existing.status),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(booking_id = %id, "Status change notification failed: {}", err),
            Err(_) => warn!(booking_id = %id, "Status change notification timed out"),
        }

        Ok(updated)
    }

    pub async fn get(&self, id: Uuid) -> Result<Booking, BookingError> {
        self.timed("find_booking", self.store.find_booking(id))
            .await??
            .ok_or(BookingError::BookingNotFound(id))
    }

    /// Bookings matching `filter`, newest first
    pub async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, BookingError> {
        Ok(self.timed("list_bookings", self.store.list_bookings(filter)).await??)
    }
}
