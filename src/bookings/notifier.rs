// Booking notifications
//
// Best-effort side effects fired after a booking is written. Delivery is
// outside this crate; `TracingNotifier` records the event in the log so an
// external mailer or webhook relay can pick it up.

use async_trait::async_trait;
use tracing::info;

use crate::bookings::{Booking, BookingStatus};

#[derive(Debug, thiserror::Error)]
#[error("Notification failed: {0}")]
pub struct NotificationError(pub String);

#[async_trait]
pub trait BookingNotifier: Send + Sync {
    /// Called once after a booking has been persisted as pending
    async fn booking_submitted(&self, booking: &Booking) -> Result<(), NotificationError>;

    /// Called after an administrator changed a booking's status
    async fn booking_status_changed(
        &self,
        _booking: &Booking,
        _previous: BookingStatus,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// Notifier that writes booking events to the tracing log
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

#[async_trait]
impl BookingNotifier for TracingNotifier {
    async fn booking_submitted(&self, booking: &Booking) -> Result<(), NotificationError> {
        info!(
            booking_id = %booking.id,
            room_type_id = %booking.room_type_id,
            check_in = %booking.check_in,
            check_out = %booking.check_out,
            guest_email = %booking.guest_email,
            total_price = %booking.total_price,
            "New booking request received"
        );
        Ok(())
    }

    async fn booking_status_changed(
        &self,
        booking: &Booking,
        previous: BookingStatus,
    ) -> Result<(), NotificationError> {
        info!(
            booking_id = %booking.id,
            from = %previous,
            to = %booking.status,
            "Booking status changed"
        );
        Ok(())
    }
}
