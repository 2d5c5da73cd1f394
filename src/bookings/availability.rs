// Availability Checker
//
// Decides whether a requested stay fits alongside the existing bookings of a
// room type. Each room type is a single bookable unit, so any overlap with a
// pending or confirmed booking makes the request unavailable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::bookings::models::Booking;
use crate::pricing::{ranges_overlap, PricingResult, StayRange};

/// Bookable units per room type
pub const UNITS_PER_ROOM_TYPE: i64 = 1;

/// Remaining-unit count at or below which callers should warn the guest
pub const LOW_AVAILABILITY_THRESHOLD: i64 = 2;

/// Result of an availability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResult {
    pub room_type_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub available: bool,
    pub remaining_units: i64,
    /// Warning signal only; never blocks a booking
    pub low_availability: bool,
    pub conflicting_booking_ids: Vec<Uuid>,
}

/// Availability Checker
pub struct AvailabilityChecker;

impl AvailabilityChecker {
    /// Check a requested stay against existing bookings
    ///
    /// Bookings for other room types and cancelled bookings are ignored.
    /// Fails with `InvalidRange` when check-out is not after check-in.
    pub fn check_availability(
        room_type_id: Uuid,
        requested_check_in: NaiveDate,
        requested_check_out: NaiveDate,
        existing_bookings: &[Booking],
    ) -> PricingResult<AvailabilityResult> {
        let stay = StayRange::new(requested_check_in, requested_check_out)?;
        Ok(Self::check_stay(room_type_id, &stay, existing_bookings))
    }

    /// Same as `check_availability` for an already validated stay
    pub fn check_stay(
        room_type_id: Uuid,
        stay: &StayRange,
        existing_bookings: &[Booking],
    ) -> AvailabilityResult {
        let conflicting_booking_ids = Self::conflicting_bookings(room_type_id, stay, existing_bookings)
            .map(|booking| booking.id)
            .collect::<Vec<_>>();

        let remaining_units = Self::remaining_units(conflicting_booking_ids.len() as i64);
        let available = remaining_units > 0;

        AvailabilityResult {
            room_type_id,
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            available,
            remaining_units,
            low_availability: available && remaining_units <= LOW_AVAILABILITY_THRESHOLD,
            conflicting_booking_ids,
        }
    }

    /// Active bookings of `room_type_id` that overlap `stay`
    pub fn conflicting_bookings<'a>(
        room_type_id: Uuid,
        stay: &'a StayRange,
        existing_bookings: &'a [Booking],
    ) -> impl Iterator<Item = &'a Booking> + 'a {
        existing_bookings.iter().filter(move |booking| {
            booking.room_type_id == room_type_id
                && booking.status.is_active()
                && ranges_overlap(stay.check_in(), stay.check_out(), booking.check_in, booking.check_out)
        })
    }

    /// Units left after `overlap_count` overlapping bookings, clamped at zero
    pub fn remaining_units(overlap_count: i64) -> i64 {
        (UNITS_PER_ROOM_TYPE - overlap_count).max(0)
    }

    /// Nights in `range` occupied by an active booking of `room_type_id`
    pub fn booked_dates(
        room_type_id: Uuid,
        range: &StayRange,
        existing_bookings: &[Booking],
    ) -> Vec<NaiveDate> {
        let occupied: Vec<StayRange> = Self::conflicting_bookings(room_type_id, range, existing_bookings)
            .filter_map(Booking::stay)
            .collect();

        range
            .nights()
            .filter(|night| occupied.iter().any(|stay| stay.contains(*night)))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::bookings::models::BookingStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    pub fn booking(
        room_type_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            room_type_id,
            check_in,
            check_out,
            guest_name: "Existing Guest".to_string(),
            guest_email: "guest@example.com".to_string(),
            guest_phone: None,
            adults: 2,
            children: 0,
            special_requests: None,
            status,
            total_price: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
