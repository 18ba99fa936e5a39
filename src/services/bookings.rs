//! Booking operations.

use serde_json::Value;

use crate::client::{ApiClient, ApiRequest, QueryParams};
use crate::config::CacheClass;
use crate::error::{ApiError, ApiResult};
use crate::models::booking::BookingListPayload;
use crate::models::{
    Booking, BookingList, BookingQuery, CancelRequest, Cancellation, FareBreakdown, FareQuery,
    NewBooking, SeatAvailability, MAX_PASSENGERS, MIN_PASSENGERS,
};
use crate::services::validation::require_id;

pub const DEFAULT_CANCEL_REASON: &str = "Cancelled by customer";

const BOOKINGS_PREFIX: &str = "/bookings";

pub struct BookingService<'a> {
    client: &'a ApiClient,
}

impl<'a> BookingService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_booking(&self, booking: &NewBooking) -> ApiResult<Booking> {
        validate_new_booking(booking)?;

        let request = ApiRequest::post(BOOKINGS_PREFIX).json(booking)?;
        let created = self
            .client
            .fetch::<Booking>(request)
            .await
            .map_err(|e| e.with_fallback("Failed to create booking"))?;

        self.client.invalidate(BOOKINGS_PREFIX);
        tracing::info!(booking_id = created.booking_id, "Booking created");
        Ok(created)
    }

    pub async fn get_user_bookings(&self, query: &BookingQuery) -> ApiResult<BookingList> {
        let params = QueryParams::new()
            .with_opt("status", query.status.as_deref())
            .with_opt("page", query.page)
            .with_opt("limit", query.limit)
            .with_opt("sort_by", query.sort_by.as_deref())
            .with_opt("sort_order", query.sort_order)
            .with_opt("date_from", query.date_from.as_deref())
            .with_opt("date_to", query.date_to.as_deref());

        let request = ApiRequest::get(BOOKINGS_PREFIX)
            .query(params)
            .cached(self.client.cache_ttl(CacheClass::UserData));

        self.client
            .fetch::<BookingListPayload>(request)
            .await
            .map(BookingList::from)
            .map_err(|e| e.with_fallback("Failed to fetch bookings"))
    }

    pub async fn get_booking(&self, booking_id: u64) -> ApiResult<Booking> {
        require_id(booking_id, "Booking ID")?;
        self.client
            .fetch(ApiRequest::get(format!("/bookings/{booking_id}")))
            .await
            .map_err(|e| e.with_fallback("Failed to fetch booking details"))
    }

    /// Cancel a booking. `reason` defaults to [`DEFAULT_CANCEL_REASON`].
    pub async fn cancel_booking(
        &self,
        booking_id: u64,
        reason: Option<&str>,
        request_refund: bool,
    ) -> ApiResult<Cancellation> {
        require_id(booking_id, "Booking ID")?;

        let body = CancelRequest {
            reason: reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or(DEFAULT_CANCEL_REASON)
                .to_string(),
            request_refund,
        };
        let request = ApiRequest::put(format!("/bookings/{booking_id}/cancel")).json(&body)?;
        let response = self
            .client
            .send::<Value>(request)
            .await
            .map_err(|e| e.with_fallback("Failed to cancel booking"))?;

        self.client.invalidate(BOOKINGS_PREFIX);
        tracing::info!(booking_id, request_refund, "Booking cancelled");

        Ok(Cancellation {
            booking_id,
            booking: serde_json::from_value(response.data).ok(),
            message: response.message,
        })
    }

    pub async fn calculate_fare(&self, query: &FareQuery) -> ApiResult<FareBreakdown> {
        require_id(query.trip_id, "Trip ID")?;
        require_id(query.pickup_stop_id, "Pickup stop")?;
        require_id(query.dropoff_stop_id, "Dropoff stop")?;
        validate_passenger_count(query.passenger_count)?;

        let request = ApiRequest::post("/bookings/calculate-fare").json(query)?;
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to calculate fare"))
    }

    pub async fn get_seat_availability(&self, trip_id: u64) -> ApiResult<SeatAvailability> {
        require_id(trip_id, "Trip ID")?;
        self.client
            .fetch(ApiRequest::get(format!(
                "/bookings/seat-availability/{trip_id}"
            )))
            .await
            .map_err(|e| e.with_fallback("Failed to fetch seat availability"))
    }
}

fn validate_new_booking(booking: &NewBooking) -> ApiResult<()> {
    require_id(booking.trip_id, "Trip ID")?;
    require_id(booking.pickup_stop_id, "Pickup stop")?;
    require_id(booking.dropoff_stop_id, "Dropoff stop")?;
    validate_passenger_count(booking.passenger_count)?;
    if booking.pickup_stop_id == booking.dropoff_stop_id {
        return Err(ApiError::validation("pickup and dropoff must be different"));
    }
    Ok(())
}

fn validate_passenger_count(count: u32) -> ApiResult<()> {
    if (MIN_PASSENGERS..=MAX_PASSENGERS).contains(&count) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Passenger count must be between {MIN_PASSENGERS} and {MAX_PASSENGERS}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn booking() -> NewBooking {
        NewBooking {
            trip_id: 7,
            pickup_stop_id: 1,
            dropoff_stop_id: 4,
            passenger_count: 2,
            seat_numbers: Vec::new(),
        }
    }

    #[test]
    fn test_valid_booking() {
        assert!(validate_new_booking(&booking()).is_ok());
    }

    #[test]
    fn test_same_stop_rejected() {
        let err = validate_new_booking(&NewBooking {
            dropoff_stop_id: 1,
            ..booking()
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "pickup and dropoff must be different");
    }

    #[test]
    fn test_passenger_bounds() {
        for count in [0, 11] {
            let err = validate_new_booking(&NewBooking {
                passenger_count: count,
                ..booking()
            })
            .unwrap_err();
            assert_eq!(err.message(), "Passenger count must be between 1 and 10");
        }
        assert!(validate_passenger_count(10).is_ok());
    }

    #[test]
    fn test_missing_trip() {
        let err = validate_new_booking(&NewBooking {
            trip_id: 0,
            ..booking()
        })
        .unwrap_err();
        assert_eq!(err.message(), "Trip ID is required");
    }

    #[tokio::test]
    async fn test_validation_precedes_network() {
        // Nothing listens here; a network attempt would yield a Network error.
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client
            .bookings()
            .calculate_fare(&FareQuery {
                trip_id: 1,
                pickup_stop_id: 1,
                dropoff_stop_id: 2,
                passenger_count: 0,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = client.bookings().cancel_booking(0, None, false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
