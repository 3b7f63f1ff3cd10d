//! Ride monitoring endpoints

use crate::error::GatewayError;
use crate::gateway::{paging_query, Page, ResourceGateway};
use crate::models::{Ride, RideMessage, RideStatus};
use serde::{Deserialize, Serialize};

/// Cancellation acknowledgement; the backend refunds seat payments as part
/// of the cancel
#[derive(Debug, Clone, Deserialize)]
pub struct CancelOutcome {
    pub message: String,
    pub refunds_processed: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelRequest {
    ride_id: u64,
}

pub async fn list(
    gateway: &ResourceGateway,
    token: &str,
    page: u32,
    limit: u32,
    status: Option<RideStatus>,
) -> Result<Page<Ride>, GatewayError> {
    let mut query = paging_query(page, limit);
    if let Some(status) = status {
        query.push(("status", status.as_str().to_string()));
    }
    gateway.get_page("/admin/rides", token, &query).await
}

pub async fn get(
    gateway: &ResourceGateway,
    token: &str,
    ride_id: u64,
) -> Result<Ride, GatewayError> {
    gateway
        .get(&format!("/admin/rides/{}", ride_id), token, &[])
        .await
}

/// Force-cancel a ride; seat payments are refunded server-side
pub async fn cancel(
    gateway: &ResourceGateway,
    token: &str,
    ride_id: u64,
) -> Result<CancelOutcome, GatewayError> {
    gateway
        .post(
            "/admin/rides/cancel",
            Some(token),
            Some(&CancelRequest { ride_id }),
        )
        .await
}

pub async fn messages(
    gateway: &ResourceGateway,
    token: &str,
    ride_id: u64,
) -> Result<Vec<RideMessage>, GatewayError> {
    gateway
        .get(&format!("/admin/rides/{}/messages", ride_id), token, &[])
        .await
}
