pub mod availability;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notifier;
pub mod service;
pub mod status_machine;
pub mod submission;

pub use availability::{AvailabilityChecker, AvailabilityResult, LOW_AVAILABILITY_THRESHOLD, UNITS_PER_ROOM_TYPE};
pub use error::*;
pub use handlers::*;
pub use models::*;
pub use notifier::{BookingNotifier, NotificationError, TracingNotifier};
pub use service::*;
pub use status_machine::*;
pub use submission::*;
