use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::pricing::{PriceQuote, StayRange};

/// Booking status enum representing the lifecycle of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Statuses that hold inventory
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and confirmed bookings count against availability
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// Domain model representing a booking in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub room_type_id: Uuid,
    pub check_in: NaiveDate,
    /// Departure date; the night of check-out is not occupied
    pub check_out: NaiveDate,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub adults: i32,
    pub children: i32,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    /// Quote snapshot taken at submission
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn stay(&self) -> Option<StayRange> {
        StayRange::new(self.check_in, self.check_out).ok()
    }
}

/// Request DTO for submitting a booking
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_stay_dates", skip_on_field_errors = false))]
pub struct CreateBookingRequest {
    pub room_type_id: Uuid,
    #[schema(value_type = String, example = "2025-06-13")]
    pub check_in: NaiveDate,
    #[schema(value_type = String, example = "2025-06-15")]
    pub check_out: NaiveDate,
    #[validate(length(min = 1, max = 200, message = "Guest name is required"))]
    pub guest_name: String,
    #[validate(email(message = "Guest email must be a valid email address"))]
    pub guest_email: String,
    #[validate(length(min = 6, max = 32, message = "Phone number must be between 6 and 32 characters"))]
    pub guest_phone: Option<String>,
    #[validate(range(min = 1, max = 20, message = "At least one adult is required"))]
    pub adults: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 20, message = "Children count must be between 0 and 20"))]
    pub children: i32,
    #[validate(length(max = 2000, message = "Special requests are limited to 2000 characters"))]
    pub special_requests: Option<String>,
}

fn validate_stay_dates(request: &CreateBookingRequest) -> Result<(), ValidationError> {
    if request.check_out <= request.check_in {
        let mut error = ValidationError::new("check_out_before_check_in");
        error.message = Some("Check-out must be after check-in".into());
        return Err(error);
    }
    Ok(())
}

/// Request DTO for an administrator status change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// Fields for inserting a booking into the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub room_type_id: Uuid,
    pub stay: StayRange,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub adults: i32,
    pub children: i32,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub total_price: Decimal,
}

impl NewBooking {
    /// Build a pending booking from a validated request and its quote
    pub fn pending(request: &CreateBookingRequest, stay: StayRange, quote: &PriceQuote) -> Self {
        Self {
            room_type_id: request.room_type_id,
            stay,
            guest_name: request.guest_name.trim().to_string(),
            guest_email: request.guest_email.trim().to_lowercase(),
            guest_phone: request.guest_phone.clone(),
            adults: request.adults,
            children: request.children,
            special_requests: request.special_requests.clone(),
            status: BookingStatus::Pending,
            total_price: quote.total,
        }
    }
}

/// Filter for listing bookings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub room_type_id: Option<Uuid>,
    /// Empty means any status
    pub statuses: Vec<BookingStatus>,
    /// Only bookings whose stay overlaps this range
    pub overlapping: Option<StayRange>,
}

impl BookingFilter {
    /// Active bookings of one room type that overlap `stay`
    pub fn active_overlapping(room_type_id: Uuid, stay: StayRange) -> Self {
        Self {
            room_type_id: Some(room_type_id),
            statuses: BookingStatus::ACTIVE.to_vec(),
            overlapping: Some(stay),
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(room_type_id) = self.room_type_id {
            if booking.room_type_id != room_type_id {
                return false;
            }
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&booking.status) {
            return false;
        }
        if let Some(range) = self.overlapping {
            return crate::pricing::ranges_overlap(
                range.check_in(),
                range.check_out(),
                booking.check_in,
                booking.check_out,
            );
        }
        true
    }
}

/// One night of the booking calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalendarDay {
    #[schema(value_type = String, example = "2025-06-14")]
    pub date: NaiveDate,
    pub price: Decimal,
    pub is_weekend: bool,
    pub has_override: bool,
    /// Occupied by a pending or confirmed booking
    pub booked: bool,
}

/// Query parameters naming a stay
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StayQuery {
    /// First night, `yyyy-MM-dd`
    #[param(value_type = String)]
    pub check_in: NaiveDate,
    /// Departure date, `yyyy-MM-dd`
    #[param(value_type = String)]
    pub check_out: NaiveDate,
}

/// Query parameters for a half-open `[from, to)` date window
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateWindowQuery {
    #[param(value_type = String)]
    pub from: NaiveDate,
    #[param(value_type = String)]
    pub to: NaiveDate,
}

/// Query parameters for the admin booking listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub room_type_id: Option<Uuid>,
}

impl From<BookingListQuery> for BookingFilter {
    fn from(query: BookingListQuery) -> Self {
        Self {
            room_type_id: query.room_type_id,
            statuses: query.status.into_iter().collect(),
            overlapping: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request(check_in: NaiveDate, check_out: NaiveDate) -> CreateBookingRequest {
        CreateBookingRequest {
            room_type_id: Uuid::new_v4(),
            check_in,
            check_out,
            guest_name: "Linh Tran".to_string(),
            guest_email: "linh@example.com".to_string(),
            guest_phone: Some("+84 912 345 678".to_string()),
            adults: 2,
            children: 1,
            special_requests: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!(BookingStatus::from_str("CONFIRMED").unwrap(), BookingStatus::Confirmed);
        assert_eq!(BookingStatus::Cancelled.to_string(), "cancelled");
        assert!(BookingStatus::from_str("checked_in").is_err());
    }

    #[test]
    fn test_active_statuses() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&BookingStatus::Pending).unwrap(), "\"pending\"");
        let status: BookingStatus = serde_json::from_str("\"confirmed\"").unwrap();
        assert_eq!(status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request(date(2025, 6, 10), date(2025, 6, 12)).validate().is_ok());
    }

    #[test]
    fn test_check_out_before_check_in_fails() {
        assert!(request(date(2025, 6, 12), date(2025, 6, 10)).validate().is_err());
        assert!(request(date(2025, 6, 12), date(2025, 6, 12)).validate().is_err());
    }

    #[test]
    fn test_invalid_email_fails() {
        let mut req = request(date(2025, 6, 10), date(2025, 6, 12));
        req.guest_email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_adults_fails() {
        let mut req = request(date(2025, 6, 10), date(2025, 6, 12));
        req.adults = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_list_query_into_filter() {
        let room_type_id = Uuid::new_v4();
        let filter: BookingFilter = BookingListQuery {
            status: Some(BookingStatus::Confirmed),
            room_type_id: Some(room_type_id),
        }
        .into();
        assert_eq!(filter.statuses, vec![BookingStatus::Confirmed]);
        assert_eq!(filter.room_type_id, Some(room_type_id));

        let any: BookingFilter = BookingListQuery::default().into();
        assert!(any.statuses.is_empty());
    }

    #[test]
    fn test_children_defaults_to_zero() {
        let json = serde_json::json!({
            "room_type_id": Uuid::new_v4(),
            "check_in": "2025-06-10",
            "check_out": "2025-06-12",
            "guest_name": "Minh",
            "guest_email": "minh@example.com",
            "guest_phone": null,
            "adults": 2,
            "special_requests": null
        });
        let req: CreateBookingRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.children, 0);
    }
}
