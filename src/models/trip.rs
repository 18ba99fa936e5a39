//! Scheduled trips.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A scheduled departure on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(alias = "id")]
    pub trip_id: u64,
    #[serde(default)]
    pub route_id: Option<u64>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub available_seats: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
