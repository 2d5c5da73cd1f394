// Price Resolver
//
// Resolves the nightly rate for one room type on one date.
// Precedence: per-date override > Saturday weekend rate > base rate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::pricing::date_range::is_weekend;
use crate::rooms::{DatePriceOverride, RoomType};

/// Which pricing tier produced a nightly rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Override,
    Weekend,
    Base,
}

/// Immutable set of date overrides, keyed by `(room_type_id, date)`
///
/// Built once per computation so every night of a quote reads the same data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideSnapshot {
    prices: HashMap<(Uuid, NaiveDate), Decimal>,
}

impl OverrideSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later entries for the same `(room_type_id, date)` replace earlier ones.
    pub fn from_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = &'a DatePriceOverride>,
    {
        let prices = overrides
            .into_iter()
            .map(|o| ((o.room_type_id, o.date), o.price))
            .collect();
        Self { prices }
    }

    pub fn insert(&mut self, room_type_id: Uuid, date: NaiveDate, price: Decimal) {
        self.prices.insert((room_type_id, date), price);
    }

    pub fn get(&self, room_type_id: Uuid, date: NaiveDate) -> Option<Decimal> {
        self.prices.get(&(room_type_id, date)).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Service for resolving nightly room prices
pub struct PriceResolver;

impl PriceResolver {
    /// Nightly price for `room_type` on `date`
    pub fn resolve_nightly_price(
        room_type: &RoomType,
        date: NaiveDate,
        overrides: &OverrideSnapshot,
    ) -> Decimal {
        Self::resolve_with_source(room_type, date, overrides).0
    }

    /// Nightly price together with the tier that produced it
    pub fn resolve_with_source(
        room_type: &RoomType,
        date: NaiveDate,
        overrides: &OverrideSnapshot,
    ) -> (Decimal, PriceSource) {
        if let Some(price) = overrides.get(room_type.id, date) {
            return (price, PriceSource::Override);
        }
        if is_weekend(date) {
            return (room_type.weekend_rate(), PriceSource::Weekend);
        }
        (room_type.base_price, PriceSource::Base)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::Utc;

    pub fn room_type(base: Decimal, weekend: Option<Decimal>) -> RoomType {
        RoomType {
            id: Uuid::new_v4(),
            name: "Deluxe Ocean".to_string(),
            description: None,
            capacity: 2,
            base_price: base,
            weekend_price: weekend,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}


#[cfg(test)]
mod property_tests {
    use super::test_support::room_type;
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset)
        })
    }

    /// An override always wins, whatever the day of week
    #[test]
    fn prop_override_always_wins() {
        proptest!(|(
            day in any_date(),
            base in 0u64..10_000_000,
            weekend in proptest::option::of(0u64..10_000_000),
            pinned in 0u64..10_000_000
        )| {
            let room = room_type(Decimal::from(base), weekend.map(Decimal::from));
            let mut overrides = OverrideSnapshot::new();
            overrides.insert(room.id, day, Decimal::from(pinned));
            prop_assert_eq!(
                PriceResolver::resolve_nightly_price(&room, day, &overrides),
                Decimal::from(pinned)
            );
        });
    }

    /// Without a weekend price every night costs the base price
    #[test]
    fn prop_no_weekend_price_means_base_everywhere() {
        proptest!(|(day in any_date(), base in 0u64..10_000_000)| {
            let room = room_type(Decimal::from(base), None);
            prop_assert_eq!(
                PriceResolver::resolve_nightly_price(&room, day, &OverrideSnapshot::new()),
                Decimal::from(base)
            );
        });
    }
}
