// Stay date arithmetic
//
// All stays are half-open intervals: the guest occupies every night from
// check-in up to but excluding check-out.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::pricing::error::{PricingError, PricingResult};

/// Number of nights between two dates
///
/// Fails with `InvalidRange` unless `end` is strictly after `start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> PricingResult<i64> {
    let nights = (end - start).num_days();
    if nights <= 0 {
        return Err(PricingError::InvalidRange {
            check_in: start,
            check_out: end,
        });
    }
    Ok(nights)
}

/// Every night of the stay, `start` inclusive and `end` exclusive
pub fn enumerate_nights(start: NaiveDate, end: NaiveDate) -> PricingResult<Nights> {
    Ok(StayRange::new(start, end)?.nights())
}

/// Weekend rates apply to Saturday nights only; Sunday is a weekday rate.
pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sat
}

/// Half-open overlap test. Back-to-back stays do not overlap.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// A validated `[check_in, check_out)` stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    /// Build a stay, rejecting empty and inverted ranges
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> PricingResult<Self> {
        days_between(check_in, check_out)?;
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights in the stay (always at least 1)
    pub fn night_count(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Iterate the nights of the stay in chronological order
    ///
    /// The iterator borrows nothing, so calling `nights()` again restarts from check-in.
    pub fn nights(&self) -> Nights {
        Nights {
            next: self.check_in,
            end: self.check_out,
        }
    }

    pub fn overlaps(&self, other: &StayRange) -> bool {
        ranges_overlap(self.check_in, self.check_out, other.check_in, other.check_out)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }
}

/// Iterator over the nights of a `StayRange`
#[derive(Debug, Clone)]
pub struct Nights {
    next: NaiveDate,
    end: NaiveDate,
}

impl Iterator for Nights {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let current = self.next;
        self.next = current + Duration::days(1);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next).num_days().max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Nights {}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset)
        })
    }

    /// The night sequence length always equals the night count
    #[test]
    fn prop_enumerate_length_matches_days_between() {
        proptest!(|(start in date_strategy(), length in 1i64..60)| {
            let end = start + Duration::days(length);
            let nights: Vec<NaiveDate> = enumerate_nights(start, end).unwrap().collect();
            prop_assert_eq!(nights.len() as i64, days_between(start, end).unwrap());
            prop_assert_eq!(nights.first().copied(), Some(start));
            prop_assert_eq!(nights.last().copied(), Some(end - Duration::days(1)));
        });
    }

    /// Overlap is symmetric
    #[test]
    fn prop_overlap_is_symmetric() {
        proptest!(|(
            a_start in date_strategy(),
            a_len in 1i64..30,
            b_start in date_strategy(),
            b_len in 1i64..30
        )| {
            let a_end = a_start + Duration::days(a_len);
            let b_end = b_start + Duration::days(b_len);
            prop_assert_eq!(
                ranges_overlap(a_start, a_end, b_start, b_end),
                ranges_overlap(b_start, b_end, a_start, a_end)
            );
        });
    }

    /// Two stays overlap exactly when they share at least one night
    #[test]
    fn prop_overlap_iff_shared_night() {
        proptest!(|(
            a_start in date_strategy(),
            a_len in 1i64..20,
            b_offset in -25i64..25,
            b_len in 1i64..20
        )| {
            let a = StayRange::new(a_start, a_start + Duration::days(a_len)).unwrap();
            let b_start = a_start + Duration::days(b_offset);
            let b = StayRange::new(b_start, b_start + Duration::days(b_len)).unwrap();
            let shared = a.nights().any(|night| b.contains(night));
            prop_assert_eq!(a.overlaps(&b), shared);
        });
    }
}
