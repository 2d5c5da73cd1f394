// Booking submission workflow states
//
// DRAFT -> SUBMITTING -> PENDING (persisted) | REJECTED (nothing written).
// A rejected submission may be retried from DRAFT.

use uuid::Uuid;

use crate::bookings::Booking;

/// Why a submission ended without a booking being written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub message: String,
    pub conflicting_booking_ids: Vec<Uuid>,
}

impl Rejection {
    pub fn unavailable(conflicting_booking_ids: Vec<Uuid>) -> Self {
        Self {
            message: "The selected dates are no longer available for this room".to_string(),
            conflicting_booking_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Draft,
    Submitting,
    /// Persisted, awaiting administrator action
    Pending(Box<Booking>),
    Rejected(Rejection),
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Draft => "draft",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Pending(_) => "pending",
            SubmissionState::Rejected(_) => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Pending(_) | SubmissionState::Rejected(_))
    }

    /// DRAFT -> SUBMITTING, on guest confirmation
    pub fn submit(self) -> Result<Self, String> {
        match self {
            SubmissionState::Draft => Ok(SubmissionState::Submitting),
            other => Err(Self::invalid(&other, "submitting")),
        }
    }

    /// SUBMITTING -> PENDING, once the booking row is written
    pub fn accept(self, booking: Booking) -> Result<Self, String> {
        match self {
            SubmissionState::Submitting => Ok(SubmissionState::Pending(Box::new(booking))),
            other => Err(Self::invalid(&other, "pending")),
        }
    }

    /// SUBMITTING -> REJECTED, when the stay is unavailable
    pub fn reject(self, rejection: Rejection) -> Result<Self, String> {
        match self {
            SubmissionState::Submitting => Ok(SubmissionState::Rejected(rejection)),
            other => Err(Self::invalid(&other, "rejected")),
        }
    }

    /// REJECTED -> DRAFT, so the guest can pick other dates
    pub fn retry(self) -> Result<Self, String> {
        match self {
            SubmissionState::Rejected(_) => Ok(SubmissionState::Draft),
            other => Err(Self::invalid(&other, "draft")),
        }
    }

    fn invalid(from: &SubmissionState, to: &str) -> String {
        format!("Invalid submission transition from {} to {}", from.name(), to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::availability::test_support::booking;
    use crate::bookings::BookingStatus;
    use chrono::NaiveDate;

    fn pending_booking() -> Booking {
        booking(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            BookingStatus::Pending,
        )
    }

    #[test]
    fn test_happy_path_reaches_pending() {
        let booking = pending_booking();
        let state = SubmissionState::Draft
            .submit()
            .and_then(|state| state.accept(booking.clone()))
            .unwrap();

        assert!(state.is_terminal());
        assert_eq!(state, SubmissionState::Pending(Box::new(booking)));
    }

    #[test]
    fn test_rejected_can_retry_from_draft() {
        let state = SubmissionState::Draft
            .submit()
            .and_then(|state| state.reject(Rejection::unavailable(vec![])))
            .unwrap();
        assert_eq!(state.name(), "rejected");

        let state = state.retry().unwrap();
        assert_eq!(state, SubmissionState::Draft);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_cannot_accept_without_submitting() {
        let err = SubmissionState::Draft.accept(pending_booking()).unwrap_err();
        assert_eq!(err, "Invalid submission transition from draft to pending");
    }

    #[test]
    fn test_pending_is_final() {
        let state = SubmissionState::Pending(Box::new(pending_booking()));
        assert!(state.clone().submit().is_err());
        assert!(state.clone().reject(Rejection::unavailable(vec![])).is_err());
        assert!(state.retry().is_err());
    }

    #[test]
    fn test_cannot_submit_twice() {
        assert!(SubmissionState::Submitting.submit().is_err());
    }
}
