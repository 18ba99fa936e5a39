//! Wire types for the transit backend.
//!
//! Identifiers accept both the `<resource>_id` and bare `id` spellings, and
//! unmodelled fields are kept in `extra` so nothing the server sends is lost.

pub mod booking;
pub mod payment;
pub mod route;
pub mod trip;
pub mod user;

pub use booking::{
    Booking, BookingList, BookingQuery, CancelRequest, Cancellation, FareBreakdown, FareQuery,
    NewBooking, Pagination, SeatAvailability, SortOrder, MAX_PASSENGERS, MIN_PASSENGERS,
};
pub use payment::{Payment, PaymentMethod, PaymentMethodInfo, PaymentRequest, PaymentStatus};
pub use route::{Fare, Route, RouteWithStops, Stop, StopFareQuery};
pub use trip::Trip;
pub use user::{LoginRequest, LoginResponse, ProfileUpdate, Registration, UserProfile};

/// Decimal fields that arrive either as JSON numbers or as strings such as
/// `"2000.00"`.
pub(crate) mod decimal {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    fn parse<E: Error>(text: &str) -> Result<Option<f64>, E> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<f64>()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid decimal string {text:?}")))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(text) => {
                parse(&text)?.ok_or_else(|| D::Error::custom("empty decimal string"))
            }
        }
    }

    /// Null and blank strings decode to `None`.
    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrString::Number(n)) => Ok(Some(n)),
            Some(NumberOrString::Text(text)) => parse(&text),
        }
    }

}
