//! Bookings, fare quotes and seat availability.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Inclusive bounds on passengers per booking.
pub const MIN_PASSENGERS: u32 = 1;
pub const MAX_PASSENGERS: u32 = 10;

/// `POST /bookings` request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewBooking {
    pub trip_id: u64,
    pub pickup_stop_id: u64,
    pub dropoff_stop_id: u64,
    pub passenger_count: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub seat_numbers: Vec<String>,
}

/// A booking as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(alias = "id")]
    pub booking_id: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(
        default,
        alias = "total_fare",
        alias = "amount",
        deserialize_with = "crate::models::decimal::deserialize_option"
    )]
    pub fare_amount: Option<f64>,
    #[serde(default)]
    pub trip_id: Option<u64>,
    #[serde(default)]
    pub passenger_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// Filters for `GET /bookings`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default, alias = "totalPages")]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// A page of the user's bookings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingList {
    pub bookings: Vec<Booking>,
    pub pagination: Option<Pagination>,
    pub total: u64,
}

/// The backend returns either a bare array or a paged object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum BookingListPayload {
    List(Vec<Booking>),
    Page {
        #[serde(alias = "items")]
        bookings: Vec<Booking>,
        #[serde(default)]
        pagination: Option<Pagination>,
        #[serde(default)]
        total: Option<u64>,
    },
}

impl From<BookingListPayload> for BookingList {
    fn from(payload: BookingListPayload) -> Self {
        match payload {
            BookingListPayload::List(bookings) => Self {
                total: bookings.len() as u64,
                bookings,
                pagination: None,
            },
            BookingListPayload::Page {
                bookings,
                pagination,
                total,
            } => Self {
                total: total.unwrap_or(bookings.len() as u64),
                bookings,
                pagination,
            },
        }
    }
}

/// `PUT /bookings/:id/cancel` request body.
#[derive(Debug, Clone, Serialize)]
pub struct CancelRequest {
    pub reason: String,
    pub request_refund: bool,
}

/// Result of a cancellation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cancellation {
    pub booking_id: u64,
    pub booking: Option<Booking>,
    pub message: Option<String>,
}

/// Inputs of a fare quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FareQuery {
    pub trip_id: u64,
    pub pickup_stop_id: u64,
    pub dropoff_stop_id: u64,
    pub passenger_count: u32,
}

/// Fare quote returned by `POST /bookings/calculate-fare`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareBreakdown {
    #[serde(alias = "total_fare", deserialize_with = "crate::models::decimal::deserialize")]
    pub total_fare: f64,
    #[serde(
        default,
        alias = "base_fare",
        deserialize_with = "crate::models::decimal::deserialize_option"
    )]
    pub base_fare: Option<f64>,
    #[serde(default, deserialize_with = "crate::models::decimal::deserialize_option")]
    pub discount: Option<f64>,
    #[serde(
        default,
        alias = "fare_per_passenger",
        deserialize_with = "crate::models::decimal::deserialize_option"
    )]
    pub fare_per_passenger: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Seats left on a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatAvailability {
    #[serde(default)]
    pub trip_id: Option<u64>,
    #[serde(default)]
    pub total_seats: Option<u32>,
    #[serde(default)]
    pub available_seats: Option<u32>,
    #[serde(default)]
    pub booked_seats: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_booking_list_from_array() {
        let payload: BookingListPayload =
            serde_json::from_value(json!([{"booking_id": 1}, {"booking_id": 2}])).unwrap();
        let list = BookingList::from(payload);
        assert_eq!(list.total, 2);
        assert!(list.pagination.is_none());
    }

    #[test]
    fn test_booking_list_from_page() {
        let payload: BookingListPayload = serde_json::from_value(json!({
            "items": [{"id": 1, "status": "confirmed", "total_fare": 1500}],
            "pagination": {"page": 2, "limit": 1, "totalPages": 9},
            "total": 9
        }))
        .unwrap();
        let list = BookingList::from(payload);
        assert_eq!(list.total, 9);
        assert_eq!(list.bookings[0].fare_amount, Some(1500.0));
        assert_eq!(list.pagination.unwrap().total_pages, Some(9));
    }

    #[test]
    fn test_page_without_total_defaults_to_len() {
        let payload: BookingListPayload =
            serde_json::from_value(json!({"bookings": [{"booking_id": 4}]})).unwrap();
        assert_eq!(BookingList::from(payload).total, 1);
    }

    #[test]
    fn test_fare_breakdown_accepts_both_casings() {
        let camel: FareBreakdown =
            serde_json::from_value(json!({"totalFare": 2000, "baseFare": 2000, "discount": 0})).unwrap();
        let snake: FareBreakdown =
            serde_json::from_value(json!({"total_fare": 2000, "base_fare": 2000, "discount": 0})).unwrap();
        assert_eq!(camel.total_fare, 2000.0);
        assert_eq!(camel.total_fare, snake.total_fare);
        assert_eq!(snake.base_fare, Some(2000.0));
    }

    #[test]
    fn test_string_decimals_in_fares() {
        let quote: FareBreakdown = serde_json::from_value(json!({
            "totalFare": "2000.00",
            "baseFare": "2500.00",
            "discount": "500.00",
            "farePerPassenger": "1000.00"
        }))
        .unwrap();
        assert_eq!(quote.total_fare, 2000.0);
        assert_eq!(quote.base_fare, Some(2500.0));
        assert_eq!(quote.discount, Some(500.0));
        assert_eq!(quote.fare_per_passenger, Some(1000.0));

        let booking: Booking =
            serde_json::from_value(json!({"booking_id": 8, "total_fare": "1500.00"})).unwrap();
        assert_eq!(booking.fare_amount, Some(1500.0));
    }
}
