//! Paystack webhook endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::warn;

use tabletap_core::billing::signature::verify_signature;
use tabletap_core::billing::webhook::{WebhookEvent, WebhookOutcome, handle_event};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::StatusResponse;

/// `POST /api/webhook/paystack` — gateway event delivery.
///
/// The body stays raw until the HMAC check passes; an unsigned or
/// missigned delivery is rejected before any parsing.
pub async fn paystack_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<StatusResponse>> {
    let signature = headers
        .get("x-paystack-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing webhook signature".into()))?;

    if !verify_signature(
        state.config.paystack_secret_key.as_bytes(),
        body.as_bytes(),
        signature,
    ) {
        warn!("rejected webhook with invalid signature");
        return Err(AppError::Unauthorized("Invalid webhook signature".into()));
    }

    let event: WebhookEvent = serde_json::from_str(&body)
        .map_err(|e| AppError::Validation(format!("Malformed webhook body: {e}")))?;

    match handle_event(&state.pool, &event).await? {
        WebhookOutcome::Processed => Ok(Json(StatusResponse {
            status: "processed".to_string(),
        })),
        WebhookOutcome::PaymentNotFound => Err(AppError::NotFound("Payment not found".into())),
    }
}
