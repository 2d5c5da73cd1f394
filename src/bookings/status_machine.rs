use crate::bookings::BookingStatus;

/// Service for managing administrator booking status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Confirmed, Cancelled
    /// - Confirmed → Cancelled
    /// - Cancelled → Pending (restore)
    /// - Any status → Same status (idempotent)
    pub fn is_valid_transition(from: BookingStatus, to: BookingStatus) -> bool {
        if from == to {
            return true;
        }

        matches!(
            (from, to),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
                | (BookingStatus::Cancelled, BookingStatus::Pending)
        )
    }

    /// Attempt to transition from one status to another
    ///
    /// Returns `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(from: BookingStatus, to: BookingStatus) -> Result<BookingStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }

    /// Whether moving to `to` puts the booking back on the inventory
    pub fn reclaims_inventory(from: BookingStatus, to: BookingStatus) -> bool {
        !from.is_active() && to.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_confirmed() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Confirmed
        ));
    }

    #[test]
    fn test_pending_to_cancelled() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Cancelled
        ));
    }

    #[test]
    fn test_confirmed_to_cancelled() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Confirmed,
            BookingStatus::Cancelled
        ));
    }

    #[test]
    fn test_cancelled_to_pending_restores() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Cancelled,
            BookingStatus::Pending
        ));
        assert!(StatusMachine::reclaims_inventory(
            BookingStatus::Cancelled,
            BookingStatus::Pending
        ));
    }

    #[test]
    fn test_confirmed_to_pending_is_invalid() {
        assert!(!StatusMachine::is_valid_transition(
            BookingStatus::Confirmed,
            BookingStatus::Pending
        ));
    }

    #[test]
    fn test_cancelled_to_confirmed_is_invalid() {
        assert!(!StatusMachine::is_valid_transition(
            BookingStatus::Cancelled,
            BookingStatus::Confirmed
        ));
    }

    #[test]
    fn test_transition_invalid_message() {
        let result = StatusMachine::transition(BookingStatus::Cancelled, BookingStatus::Confirmed);
        assert_eq!(
            result.unwrap_err(),
            "Invalid status transition from cancelled to confirmed"
        );
    }

    #[test]
    fn test_confirm_does_not_reclaim() {
        assert!(!StatusMachine::reclaims_inventory(
            BookingStatus::Pending,
            BookingStatus::Confirmed
        ));
    }
}
