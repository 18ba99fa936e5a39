//! Route, stop and fare lookups.
//!
//! All reads here are reference data and are cached by class:
//! route lists, stops, fares and statistics each have their own TTL.

use futures_util::future::try_join;

use crate::client::{ApiClient, ApiRequest, QueryParams};
use crate::config::CacheClass;
use crate::error::{ApiError, ApiResult};
use crate::models::{Fare, Route, RouteWithStops, Stop, StopFareQuery};
use crate::services::validation::require_id;

pub const DEFAULT_FARE_TYPE: &str = "standard";
pub const DEFAULT_POPULAR_LIMIT: u32 = 5;

pub struct RouteService<'a> {
    client: &'a ApiClient,
}

impl<'a> RouteService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all_routes(&self) -> ApiResult<Vec<Route>> {
        let request = ApiRequest::get("/routes").cached(self.client.cache_ttl(CacheClass::Routes));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch routes"))
    }

    pub async fn get_route(&self, route_id: u64) -> ApiResult<Route> {
        require_id(route_id, "Route ID")?;
        let request = ApiRequest::get(format!("/routes/{route_id}"))
            .cached(self.client.cache_ttl(CacheClass::Routes));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch route"))
    }

    pub async fn get_route_stops(&self, route_id: u64) -> ApiResult<Vec<Stop>> {
        require_id(route_id, "Route ID")?;
        let request = ApiRequest::get(format!("/routes/{route_id}/stops"))
            .cached(self.client.cache_ttl(CacheClass::Stops));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch route stops"))
    }

    /// Fare table of a route, optionally filtered by fare type.
    pub async fn get_route_fares(&self, route_id: u64, fare_type: Option<&str>) -> ApiResult<Vec<Fare>> {
        require_id(route_id, "Route ID")?;
        let request = ApiRequest::get(format!("/routes/{route_id}/fares"))
            .query(QueryParams::new().with_opt("fare_type", fare_type.filter(|t| !t.is_empty())))
            .cached(self.client.cache_ttl(CacheClass::Fares));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch route fares"))
    }

    /// Routes by endpoint names. At least one of `start` and `end` is required.
    pub async fn search_routes(&self, start: Option<&str>, end: Option<&str>) -> ApiResult<Vec<Route>> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());
        if start.is_none() && end.is_none() {
            return Err(ApiError::validation(
                "Enter a start point or an end point to search",
            ));
        }

        let request = ApiRequest::get("/routes/search").query(
            QueryParams::new()
                .with_opt("start_point", start)
                .with_opt("end_point", end),
        );
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to search routes"))
    }

    pub async fn get_popular_routes(&self, limit: Option<u32>) -> ApiResult<Vec<Route>> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_POPULAR_LIMIT);
        let request = ApiRequest::get("/routes/popular")
            .query(QueryParams::new().with("limit", limit))
            .cached(self.client.cache_ttl(CacheClass::Reference));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch popular routes"))
    }

    /// Fare for a ride between two stops of a route.
    pub async fn get_fare_between_stops(&self, query: &StopFareQuery) -> ApiResult<Fare> {
        require_id(query.route_id, "Route ID")?;
        require_id(query.start_stop_id, "Start stop")?;
        require_id(query.end_stop_id, "End stop")?;

        let fare_type = query
            .fare_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_FARE_TYPE);
        let request = ApiRequest::get("/routes/fare")
            .query(
                QueryParams::new()
                    .with("route_id", query.route_id)
                    .with("start_stop_id", query.start_stop_id)
                    .with("end_stop_id", query.end_stop_id)
                    .with("fare_type", fare_type),
            )
            .cached(self.client.cache_ttl(CacheClass::Fares));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to get fare"))
    }

    /// Route details and its stops, fetched concurrently.
    pub async fn get_route_with_stops(&self, route_id: u64) -> ApiResult<RouteWithStops> {
        let (route, stops) = try_join(self.get_route(route_id), self.get_route_stops(route_id)).await?;
        Ok(RouteWithStops { route, stops })
    }

    pub async fn get_all_stops(&self) -> ApiResult<Vec<Stop>> {
        let request = ApiRequest::get("/stops").cached(self.client.cache_ttl(CacheClass::Stops));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch stops"))
    }

    pub async fn search_stops(&self, query: &str) -> ApiResult<Vec<Stop>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::validation("Enter a stop name to search"));
        }
        let request = ApiRequest::get("/stops/search").query(QueryParams::new().with("query", query));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to search stops"))
    }
}
