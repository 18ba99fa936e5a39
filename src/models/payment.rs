//! Payments.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    MobileMoney,
    Card,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::MobileMoney => "mobile_money",
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile_money" => Ok(PaymentMethod::MobileMoney),
            "card" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(ApiError::validation(format!(
                "Invalid payment method '{other}'. Use mobile_money, card or cash"
            ))),
        }
    }
}

/// `POST /payments` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub booking_id: u64,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Mobile-money operator, e.g. `mpesa`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// A payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(alias = "id")]
    pub payment_id: u64,
    #[serde(default)]
    pub booking_id: Option<u64>,
    #[serde(default, deserialize_with = "crate::models::decimal::deserialize_option")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An available payment method as advertised by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodInfo {
    #[serde(alias = "id", alias = "method")]
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET /payments/:id/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    #[serde(default, alias = "id")]
    pub payment_id: Option<u64>,
    pub status: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
