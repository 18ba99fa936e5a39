//! Domain service facades.
//!
//! # Responsibilities
//! - Validate inputs before any request is made
//! - Build paths and query strings for each backend operation
//! - Choose the cache class of each read and invalidate after writes
//! - Give every failure a user-facing message
//!
//! Each facade borrows the [`ApiClient`]; obtain them through
//! [`ApiClient::bookings`], [`ApiClient::routes`] and so on.

pub mod auth;
pub mod bookings;
pub mod payments;
pub mod routes;
pub mod trips;
pub mod validation;

pub use auth::AuthService;
pub use bookings::BookingService;
pub use payments::PaymentService;
pub use routes::RouteService;
pub use trips::TripService;

use crate::client::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn bookings(&self) -> BookingService<'_> {
        BookingService::new(self)
    }

    pub fn payments(&self) -> PaymentService<'_> {
        PaymentService::new(self)
    }

    pub fn routes(&self) -> RouteService<'_> {
        RouteService::new(self)
    }

    pub fn trips(&self) -> TripService<'_> {
        TripService::new(self)
    }
}
