//! Routes, stops and fares.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A transit route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(alias = "id")]
    pub route_id: u64,
    #[serde(default)]
    pub route_name: Option<String>,
    #[serde(default)]
    pub start_point: Option<String>,
    #[serde(default)]
    pub end_point: Option<String>,
    #[serde(default, deserialize_with = "crate::models::decimal::deserialize_option")]
    pub distance_km: Option<f64>,
    #[serde(default, alias = "estimated_time_minutes")]
    pub estimated_duration: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stop on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(alias = "id")]
    pub stop_id: u64,
    #[serde(default)]
    pub stop_name: Option<String>,
    #[serde(default)]
    pub stop_order: Option<u32>,
    #[serde(default, deserialize_with = "crate::models::decimal::deserialize_option")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "crate::models::decimal::deserialize_option")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A fare table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    #[serde(default, alias = "id")]
    pub fare_id: Option<u64>,
    #[serde(default)]
    pub fare_type: Option<String>,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub start_stop_id: Option<u64>,
    #[serde(default)]
    pub end_stop_id: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A route together with its ordered stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteWithStops {
    pub route: Route,
    pub stops: Vec<Stop>,
}

/// Parameters of `GET /routes/fare`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopFareQuery {
    pub route_id: u64,
    pub start_stop_id: u64,
    pub end_stop_id: u64,
    /// Defaults to `standard` when unset.
    pub fare_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_keeps_unknown_fields() {
        let route: Route = serde_json::from_value(json!({
            "route_id": 3,
            "route_name": "Kimara - Kivukoni",
            "start_point": "Kimara",
            "end_point": "Kivukoni",
            "color": "#ff0000"
        }))
        .unwrap();
        assert_eq!(route.route_id, 3);
        assert_eq!(route.extra["color"], json!("#ff0000"));
    }

    #[test]
    fn test_stop_coordinates_as_strings() {
        let stop: Stop = serde_json::from_value(json!({
            "stop_id": 1,
            "latitude": "-6.7924",
            "longitude": "39.2083"
        }))
        .unwrap();
        assert_eq!(stop.latitude, Some(-6.7924));
        assert_eq!(stop.longitude, Some(39.2083));
    }

    #[test]
    fn test_route_distance_and_travel_time() {
        let route: Route = serde_json::from_value(json!({
            "id": 5,
            "distance_km": "20.90",
            "estimated_time_minutes": 45
        }))
        .unwrap();
        assert_eq!(route.distance_km, Some(20.9));
        assert_eq!(route.estimated_duration, Some(45));
        assert!(!route.extra.contains_key("estimated_time_minutes"));
    }

    #[test]
    fn test_fare_amount_as_string() {
        let fare: Fare =
            serde_json::from_value(json!({"fare_id": 2, "amount": "750.00", "currency": "TZS"}))
                .unwrap();
        assert_eq!(fare.amount, 750.0);
        assert!(serde_json::from_value::<Fare>(json!({"amount": "free"})).is_err());
    }
}
