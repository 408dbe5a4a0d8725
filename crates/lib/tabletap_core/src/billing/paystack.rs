//! Paystack REST client for checkout initiation.

use rand::Rng;
use rand::rng;
use serde::Deserialize;
use serde_json::json;

use super::BillingError;

const PAYSTACK_BASE_URL: &str = "https://api.paystack.co";

/// Minimal Paystack API client. Only transaction initialization is needed;
/// settlement arrives via webhook.
#[derive(Debug, Clone)]
pub struct PaystackClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

/// Checkout session returned by transaction initialization.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

#[derive(Debug, Deserialize)]
struct InitializeResponse {
    status: bool,
    message: String,
    data: Option<CheckoutSession>,
}

impl PaystackClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            base_url: PAYSTACK_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL. Test hook.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Initialize a transaction. Amount is minor units; the reference must
    /// be ours so the webhook can find the payment row later.
    pub async fn initialize_transaction(
        &self,
        email: &str,
        amount: i64,
        currency: &str,
        reference: &str,
    ) -> Result<CheckoutSession, BillingError> {
        let body = json!({
            "email": email,
            "amount": amount,
            "currency": currency,
            "reference": reference,
        });
        let response = self
            .http
            .post(format!("{}/transaction/initialize", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BillingError::GatewayError(format!("initialize request: {e}")))?;

        let parsed: InitializeResponse = response
            .json()
            .await
            .map_err(|e| BillingError::GatewayError(format!("initialize response: {e}")))?;

        if !parsed.status {
            return Err(BillingError::GatewayError(parsed.message));
        }
        parsed
            .data
            .ok_or_else(|| BillingError::GatewayError("initialize returned no data".to_string()))
    }
}

/// Generate a fresh payment reference: `ttc_` + 12 lowercase hex chars.
pub fn generate_reference() -> String {
    let bytes: [u8; 6] = rng().random();
    format!("ttc_{}", hex::encode(bytes))
}
