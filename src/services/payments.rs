//! Payment operations.

use crate::client::{ApiClient, ApiRequest};
use crate::config::CacheClass;
use crate::error::{ApiError, ApiResult};
use crate::models::{Payment, PaymentMethod, PaymentMethodInfo, PaymentRequest, PaymentStatus};
use crate::services::validation::{is_valid_phone_number, require_id};

pub struct PaymentService<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn process_payment(&self, payment: &PaymentRequest) -> ApiResult<Payment> {
        validate_payment(payment)?;

        let request = ApiRequest::post("/payments").json(payment)?;
        let processed = self
            .client
            .fetch::<Payment>(request)
            .await
            .map_err(|e| e.with_fallback("Failed to process payment"))?;

        self.client.invalidate("/payments");
        self.client.invalidate("/bookings");
        tracing::info!(
            payment_id = processed.payment_id,
            booking_id = payment.booking_id,
            method = payment.payment_method.as_str(),
            "Payment processed"
        );
        Ok(processed)
    }

    pub async fn get_payment_history(&self) -> ApiResult<Vec<Payment>> {
        let request = ApiRequest::get("/payments/history")
            .cached(self.client.cache_ttl(CacheClass::UserData));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch payment history"))
    }

    pub async fn get_payment(&self, payment_id: u64) -> ApiResult<Payment> {
        require_id(payment_id, "Payment ID")?;
        self.client
            .fetch(ApiRequest::get(format!("/payments/{payment_id}")))
            .await
            .map_err(|e| e.with_fallback("Failed to fetch payment details"))
    }

    pub async fn get_payment_methods(&self) -> ApiResult<Vec<PaymentMethodInfo>> {
        let request = ApiRequest::get("/payments/methods")
            .cached(self.client.cache_ttl(CacheClass::Reference));
        self.client
            .fetch(request)
            .await
            .map_err(|e| e.with_fallback("Failed to fetch payment methods"))
    }

    pub async fn get_payment_status(&self, payment_id: u64) -> ApiResult<PaymentStatus> {
        require_id(payment_id, "Payment ID")?;
        self.client
            .fetch(ApiRequest::get(format!("/payments/{payment_id}/status")))
            .await
            .map_err(|e| e.with_fallback("Failed to fetch payment status"))
    }
}

fn validate_payment(payment: &PaymentRequest) -> ApiResult<()> {
    require_id(payment.booking_id, "Booking ID")?;
    if !payment.amount.is_finite() || payment.amount <= 0.0 {
        return Err(ApiError::validation("Payment amount must be greater than zero"));
    }
    if payment.payment_method == PaymentMethod::MobileMoney {
        match payment.phone_number.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(ApiError::validation(
                    "Phone number is required for mobile money payments",
                ))
            }
            Some(phone) if !is_valid_phone_number(phone) => {
                return Err(ApiError::validation("Please enter a valid Tanzanian phone number"))
            }
            Some(_) => {}
        }
    }
    Ok(())
}
