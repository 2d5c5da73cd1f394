// Room pricing
//
// Pure date arithmetic and nightly-rate resolution. Nothing in this module
// performs I/O; callers pass in the room type and an override snapshot.

pub mod date_range;
pub mod error;
pub mod price_calculator;
pub mod price_resolver;

pub use date_range::{days_between, enumerate_nights, is_weekend, ranges_overlap, Nights, StayRange};
pub use error::{PricingError, PricingResult};
pub use price_calculator::{NightlyPrice, PriceCalculator, PriceQuote};
pub use price_resolver::{OverrideSnapshot, PriceResolver, PriceSource};
