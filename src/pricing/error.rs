use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the pure pricing and date-range functions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Check-out is not strictly after check-in
    #[error("Invalid stay range: check-out {check_out} must be after check-in {check_in}")]
    InvalidRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    /// Summing the nightly prices left the representable range
    #[error("Stay total overflows after {nights} nights")]
    TotalOverflow { nights: usize },
}

pub type PricingResult<T> = Result<T, PricingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PricingError::InvalidRange {
            check_in: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid stay range: check-out 2025-06-10 must be after check-in 2025-06-15"
        );

        let error = PricingError::TotalOverflow { nights: 3 };
        assert_eq!(error.to_string(), "Stay total overflows after 3 nights");
    }
}
