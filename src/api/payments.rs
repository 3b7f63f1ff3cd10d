//! Escrow and payout endpoints

use super::Ack;
use crate::error::GatewayError;
use crate::gateway::{paging_query, Page, ResourceGateway};
use crate::models::{Payment, PaymentStats};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct RefundOutcome {
    pub message: String,
    pub refund_amount: f64,
    pub payment_reference: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseRequest {
    ride_id: u64,
}

pub async fn list(
    gateway: &ResourceGateway,
    token: &str,
    page: u32,
    limit: u32,
    status: Option<&str>,
    user_id: Option<u64>,
    ride_id: Option<u64>,
) -> Result<Page<Payment>, GatewayError> {
    let mut query = paging_query(page, limit);
    if let Some(status) = status {
        query.push(("status", status.to_string()));
    }
    if let Some(user_id) = user_id {
        query.push(("user_id", user_id.to_string()));
    }
    if let Some(ride_id) = ride_id {
        query.push(("ride_id", ride_id.to_string()));
    }
    gateway.get_page("/admin/payments", token, &query).await
}

pub async fn get(
    gateway: &ResourceGateway,
    token: &str,
    payment_id: u64,
) -> Result<Payment, GatewayError> {
    gateway
        .get(&format!("/admin/payments/{}", payment_id), token, &[])
        .await
}

/// Release escrowed funds to the driver for a completed ride
pub async fn release(
    gateway: &ResourceGateway,
    token: &str,
    ride_id: u64,
) -> Result<Ack, GatewayError> {
    gateway
        .post(
            "/admin/payments/release",
            Some(token),
            Some(&ReleaseRequest { ride_id }),
        )
        .await
}

pub async fn refund(
    gateway: &ResourceGateway,
    token: &str,
    payment_id: u64,
) -> Result<RefundOutcome, GatewayError> {
    gateway
        .post(
            &format!("/admin/payments/{}/refund", payment_id),
            Some(token),
            None::<&()>,
        )
        .await
}

/// Expire stale pending payments server-side
pub async fn cleanup(gateway: &ResourceGateway, token: &str) -> Result<Ack, GatewayError> {
    gateway
        .post("/admin/payments/cleanup", Some(token), None::<&()>)
        .await
}

pub async fn statistics(
    gateway: &ResourceGateway,
    token: &str,
    period: &str,
) -> Result<PaymentStats, GatewayError> {
    gateway
        .get(
            "/admin/stats/payments",
            token,
            &[("period", period.to_string())],
        )
        .await
}
