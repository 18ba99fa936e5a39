//! Trip schedule lookups.

use crate::client::{ApiClient, ApiRequest, QueryParams};
use crate::config::CacheClass;
use crate::error::ApiResult;
use crate::models::Trip;
use crate::services::validation::require_id;

pub struct TripService<'a> {
    client: &'a ApiClient,
}

impl<'a> TripService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Upcoming departures, optionally on one route.
    pub async fn get_upcoming_trips(&self, route_id: Option<u64>) -> ApiResult<Vec<Trip>> {
        let request = ApiRequest::get("/trips/upcoming")
            .query(QueryParams::new().with_opt("route_id", route_id.filter(|id| *id != 0)));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch upcoming trips"))
    }

    pub async fn get_trip(&self, trip_id: u64) -> ApiResult<Trip> {
        require_id(trip_id, "Trip ID")?;
        self.client
            .fetch(ApiRequest::get(format!("/trips/{trip_id}")))
            .await
            .map_err(|e| e.with_fallback("Failed to fetch trip details"))
    }

    /// The schedule of a route, optionally for one date (`YYYY-MM-DD`).
    pub async fn get_trips_by_route(&self, route_id: u64, date: Option<&str>) -> ApiResult<Vec<Trip>> {
        require_id(route_id, "Route ID")?;
        let request = ApiRequest::get(format!("/trips/route/{route_id}"))
            .query(QueryParams::new().with_opt("date", date.filter(|d| !d.is_empty())))
            .cached(self.client.cache_ttl(CacheClass::Schedules));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch trips by route"))
    }
}
