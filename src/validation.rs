// Validation utilities module
// Provides custom validation functions for domain-specific rules

use rust_decimal::Decimal;
use validator::ValidationError;

/// Largest amount a `NUMERIC(14,2)` price column can hold
pub fn max_price() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

/// Validates that a price is zero or positive and fits the price columns
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("price_must_not_be_negative"));
    }
    if *price > max_price() {
        let mut error = ValidationError::new("price_too_large");
        error.message = Some(format!("Price must not exceed {}", max_price()).into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_non_negative_price() {
        assert!(validate_price(&dec!(0)).is_ok());
        assert!(validate_price(&dec!(1500000)).is_ok());
        assert!(validate_price(&dec!(-0.01)).is_err());
    }

    #[test]
    fn test_price_upper_bound() {
        assert_eq!(max_price(), dec!(999999999999.99));
        assert!(validate_price(&dec!(999999999999.99)).is_ok());
        assert!(validate_price(&dec!(1000000000000)).is_err());
        assert!(validate_price(&Decimal::MAX).is_err());
    }
}
