use chrono::NaiveDate;
use uuid::Uuid;

use crate::pricing::PricingError;
use crate::store::StoreError;

/// Error types for booking operations
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Check-out {check_out} must be after check-in {check_in}")]
    InvalidRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Date range of {nights} nights exceeds the maximum of {max}")]
    RangeTooLong { nights: i64, max: i64 },

    #[error("Total price for {nights} nights is out of range")]
    PriceOutOfRange { nights: usize },

    #[error("Room type not found: {0}")]
    UnknownRoomType(Uuid),

    /// The store read behind an availability check failed. Never treated as
    /// "available".
    #[error("Availability check failed: {0}")]
    AvailabilityCheckFailed(String),

    #[error("Timed out waiting for the store during {operation}")]
    Timeout { operation: &'static str },

    #[error("Failed to save booking: {0}")]
    Persistence(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Booking conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BookingError::AvailabilityCheckFailed(_) | BookingError::Timeout { .. }
        )
    }
}

impl From<PricingError> for BookingError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidRange { check_in, check_out } => {
                BookingError::InvalidRange { check_in, check_out }
            }
            PricingError::TotalOverflow { nights } => BookingError::PriceOutOfRange { nights },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pricing_error_converts_to_invalid_range() {
        let err: BookingError = PricingError::InvalidRange {
            check_in: date(2025, 6, 12),
            check_out: date(2025, 6, 10),
        }
        .into();

        assert!(matches!(err, BookingError::InvalidRange { .. }));
        assert_eq!(
            err.to_string(),
            "Check-out 2025-06-10 must be after check-in 2025-06-12"
        );
    }

    #[test]
    fn test_pricing_overflow_converts_to_price_out_of_range() {
        let err: BookingError = PricingError::TotalOverflow { nights: 4 }.into();
        assert!(matches!(err, BookingError::PriceOutOfRange { nights: 4 }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(BookingError::AvailabilityCheckFailed("down".to_string()).is_retryable());
        assert!(BookingError::Timeout { operation: "list_bookings" }.is_retryable());
        assert!(!BookingError::UnknownRoomType(Uuid::nil()).is_retryable());
        assert!(!BookingError::Persistence("disk full".to_string()).is_retryable());
    }
}
