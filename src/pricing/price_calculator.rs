use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::pricing::date_range::{is_weekend, StayRange};
use crate::pricing::error::{PricingError, PricingResult};
use crate::pricing::price_resolver::{OverrideSnapshot, PriceResolver, PriceSource};
use crate::rooms::RoomType;

/// Price of a single night of a stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NightlyPrice {
    pub date: NaiveDate,
    pub price: Decimal,
    pub is_weekend: bool,
    pub source: PriceSource,
}

/// Quoted total for a stay with its per-night breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceQuote {
    pub room_type_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub total: Decimal,
    /// Chronological, one entry per night
    pub breakdown: Vec<NightlyPrice>,
}

/// Service for calculating stay totals
pub struct PriceCalculator;

impl PriceCalculator {
    /// Calculate the total for `[check_in, check_out)`
    ///
    /// # Arguments
    /// * `room_type` - Room type being booked
    /// * `check_in` - First night of the stay
    /// * `check_out` - Departure date, not charged
    /// * `overrides` - Snapshot of per-date overrides, read once by the caller
    ///
    /// # Returns
    /// `PriceQuote` with the summed total, `InvalidRange` when check-out is not
    /// after check-in, or `TotalOverflow` when the sum does not fit a `Decimal`
    pub fn calculate_total(
        room_type: &RoomType,
        check_in: NaiveDate,
        check_out: NaiveDate,
        overrides: &OverrideSnapshot,
    ) -> PricingResult<PriceQuote> {
        let stay = StayRange::new(check_in, check_out)?;
        Self::quote_stay(room_type, &stay, overrides)
    }

    /// Same as `calculate_total` for an already validated stay
    pub fn quote_stay(
        room_type: &RoomType,
        stay: &StayRange,
        overrides: &OverrideSnapshot,
    ) -> PricingResult<PriceQuote> {
        let breakdown: Vec<NightlyPrice> = stay
            .nights()
            .map(|date| {
                let (price, source) = PriceResolver::resolve_with_source(room_type, date, overrides);
                NightlyPrice {
                    date,
                    price,
                    is_weekend: is_weekend(date),
                    source,
                }
            })
            .collect();

        let total = Self::sum_nights(&breakdown)?;

        Ok(PriceQuote {
            room_type_id: room_type.id,
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            nights: stay.night_count(),
            total,
            breakdown,
        })
    }

    /// Sum of the nightly prices
    pub fn sum_nights(nights: &[NightlyPrice]) -> PricingResult<Decimal> {
        nights.iter().try_fold(Decimal::ZERO, |total, night| {
            total
                .checked_add(night.price)
                .ok_or(PricingError::TotalOverflow { nights: nights.len() })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::price_resolver::test_support::{date, room_type};
    use rust_decimal_macros::dec;

    #[test]
    fn test_friday_to_sunday_with_weekend_rate() {
        let room = room_type(dec!(1000000), Some(dec!(1500000)));
        let quote = PriceCalculator::calculate_total(
            &room,
            date(2025, 6, 13),
            date(2025, 6, 15),
            &OverrideSnapshot::new(),
        )
        .unwrap();

        assert_eq!(quote.nights, 2);
        assert_eq!(quote.total, dec!(2500000));
        assert_eq!(quote.breakdown.len(), 2);
        assert_eq!(quote.breakdown[0].date, date(2025, 6, 13));
        assert!(!quote.breakdown[0].is_weekend);
        assert_eq!(quote.breakdown[1].date, date(2025, 6, 14));
        assert!(quote.breakdown[1].is_weekend);
    }

    #[test]
    fn test_saturday_override_beats_weekend_rate() {
        let room = room_type(dec!(1000000), Some(dec!(1500000)));
        let mut overrides = OverrideSnapshot::new();
        overrides.insert(room.id, date(2025, 6, 14), dec!(2000000));

        let quote =
            PriceCalculator::calculate_total(&room, date(2025, 6, 13), date(2025, 6, 15), &overrides)
                .unwrap();

        assert_eq!(quote.total, dec!(3000000));
        assert_eq!(quote.breakdown[1].price, dec!(2000000));
        assert_eq!(quote.breakdown[1].source, PriceSource::Override);
    }

    #[test]
    fn test_full_week_mixes_tiers() {
        let room = room_type(dec!(100), Some(dec!(180)));
        let mut overrides = OverrideSnapshot::new();
        overrides.insert(room.id, date(2025, 6, 11), dec!(50));

        // Mon 9th .. Mon 16th: 6 weekday nights (one overridden) + 1 Saturday
        let quote =
            PriceCalculator::calculate_total(&room, date(2025, 6, 9), date(2025, 6, 16), &overrides)
                .unwrap();

        assert_eq!(quote.nights, 7);
        assert_eq!(quote.total, dec!(100) * dec!(5) + dec!(50) + dec!(180));
    }

    #[test]
    fn test_single_night() {
        let room = room_type(dec!(750000), None);
        let quote = PriceCalculator::calculate_total(
            &room,
            date(2025, 6, 14),
            date(2025, 6, 15),
            &OverrideSnapshot::new(),
        )
        .unwrap();
        assert_eq!(quote.total, dec!(750000));
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let room = room_type(dec!(100), None);
        let result = PriceCalculator::calculate_total(
            &room,
            date(2025, 6, 15),
            date(2025, 6, 15),
            &OverrideSnapshot::new(),
        );
        assert!(matches!(result, Err(PricingError::InvalidRange { .. })));
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let room = room_type(dec!(1000000), Some(dec!(1500000)));
        let mut overrides = OverrideSnapshot::new();
        overrides.insert(room.id, date(2025, 6, 20), dec!(1200000));

        let first =
            PriceCalculator::calculate_total(&room, date(2025, 6, 10), date(2025, 6, 25), &overrides)
                .unwrap();
        let second =
            PriceCalculator::calculate_total(&room, date(2025, 6, 10), date(2025, 6, 25), &overrides)
                .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sum_nights_empty() {
        assert_eq!(PriceCalculator::sum_nights(&[]).unwrap(), dec!(0));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let room = room_type(Decimal::MAX, None);
        let result = PriceCalculator::calculate_total(
            &room,
            date(2025, 6, 9),
            date(2025, 6, 11),
            &OverrideSnapshot::new(),
        );
        assert_eq!(result, Err(PricingError::TotalOverflow { nights: 2 }));
    }

    #[test]
    fn test_largest_column_price_sums_without_overflow() {
        let room = room_type(crate::validation::max_price(), None);
        let quote = PriceCalculator::calculate_total(
            &room,
            date(2025, 1, 1),
            date(2026, 1, 2),
            &OverrideSnapshot::new(),
        )
        .unwrap();
        assert_eq!(quote.total, crate::validation::max_price() * Decimal::from(366));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::pricing::price_resolver::test_support::room_type;
    use chrono::Duration;
    use proptest::prelude::*;

    fn start_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..2000).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap() + Duration::days(offset)
        })
    }

    /// Total equals the sum of the breakdown, and the breakdown is chronological
    #[test]
    fn prop_total_is_sum_of_breakdown() {
        proptest!(|(
            start in start_date(),
            nights in 1i64..45,
            base in 0u64..5_000_000,
            weekend in proptest::option::of(0u64..5_000_000)
        )| {
            let room = room_type(Decimal::from(base), weekend.map(Decimal::from));
            let quote = PriceCalculator::calculate_total(
                &room,
                start,
                start + Duration::days(nights),
                &OverrideSnapshot::new(),
            ).unwrap();

            let expected: Decimal = quote.breakdown.iter().map(|n| n.price).sum();
            prop_assert_eq!(quote.total, expected);
            prop_assert_eq!(quote.breakdown.len() as i64, nights);
            prop_assert!(quote.breakdown.windows(2).all(|w| w[0].date < w[1].date));
        });
    }

    /// Totals are never negative for non-negative rates
    #[test]
    fn prop_total_is_non_negative() {
        proptest!(|(
            start in start_date(),
            nights in 1i64..30,
            base in 0u64..5_000_000,
            weekend in proptest::option::of(0u64..5_000_000)
        )| {
            let room = room_type(Decimal::from(base), weekend.map(Decimal::from));
            let quote = PriceCalculator::calculate_total(
                &room,
                start,
                start + Duration::days(nights),
                &OverrideSnapshot::new(),
            ).unwrap();
            prop_assert!(quote.total >= Decimal::ZERO);
        });
    }

    /// Repeated calls with the same snapshot produce identical quotes
    #[test]
    fn prop_quote_is_idempotent() {
        proptest!(|(
            start in start_date(),
            nights in 1i64..30,
            pinned_offset in 0i64..30,
            pinned_price in 0u64..5_000_000
        )| {
            let room = room_type(Decimal::from(900_000u64), Some(Decimal::from(1_300_000u64)));
            let mut overrides = OverrideSnapshot::new();
            overrides.insert(room.id, start + Duration::days(pinned_offset), Decimal::from(pinned_price));
            let end = start + Duration::days(nights);

            let first = PriceCalculator::calculate_total(&room, start, end, &overrides).unwrap();
            let second = PriceCalculator::calculate_total(&room, start, end, &overrides).unwrap();
            prop_assert_eq!(first, second);
        });
    }
}
