//! Paystack webhook event handling.
//!
//! `charge.success` settles the referenced payment and (re)starts the
//! subscription's billing period. Every other event type is acknowledged
//! without side effects so the gateway stops retrying.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};

use super::{BillingError, queries};

/// Paystack webhook envelope. Fields beyond what we act on are ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub channel: String,
}

/// Outcome of handling a webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Acknowledged. Covers settled payments, duplicate deliveries, and
    /// event types we do not act on.
    Processed,
    /// `charge.success` referenced a payment we never created. The 404
    /// response makes the gateway retry later.
    PaymentNotFound,
}

/// Handle a verified webhook event.
pub async fn handle_event(pool: &PgPool, event: &WebhookEvent) -> Result<WebhookOutcome, BillingError> {
    match event.event.as_str() {
        "charge.success" => handle_charge_success(pool, &event.data).await,
        other => {
            info!(event = other, "ignoring webhook event");
            Ok(WebhookOutcome::Processed)
        }
    }
}

/// Settle a successful charge.
///
/// The payment flip is a conditional update guarded on an unsettled
/// status, so a duplicate delivery affects zero rows and the billing
/// period is extended exactly once per charge. Settle, activation, and
/// the tenant status mirror run in one transaction: a settled payment
/// must never be visible without its period extension, or a gateway
/// redelivery would hit the duplicate guard and the subscription would
/// stay trialing forever.
async fn handle_charge_success(
    pool: &PgPool,
    data: &WebhookData,
) -> Result<WebhookOutcome, BillingError> {
    let Some((payment_id, subscription_id)) =
        queries::find_payment_by_reference(pool, &data.reference).await?
    else {
        warn!(reference = %data.reference, "charge.success for unknown payment");
        return Ok(WebhookOutcome::PaymentNotFound);
    };

    let cycle = queries::subscription_billing_cycle(pool, &subscription_id).await?;

    let mut tx = pool.begin().await?;
    let settled =
        queries::settle_payment_success(&mut *tx, &data.reference, &data.channel).await?;
    if !settled {
        info!(%payment_id, "duplicate charge.success delivery, no-op");
        return Ok(WebhookOutcome::Processed);
    }
    queries::activate_subscription(&mut *tx, &subscription_id, cycle.period_days()).await?;
    queries::mirror_tenant_status(&mut *tx, &subscription_id, "active").await?;
    tx.commit().await?;

    info!(
        %payment_id,
        %subscription_id,
        period_days = cycle.period_days(),
        "payment settled, subscription activated"
    );
    Ok(WebhookOutcome::Processed)
}
