//! Abuse-report triage endpoints

use super::Ack;
use crate::error::GatewayError;
use crate::gateway::{paging_query, Page, ResourceGateway};
use crate::models::Report;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ReportMutation {
    pub message: String,
    pub report: Report,
}

pub async fn list(
    gateway: &ResourceGateway,
    token: &str,
    page: u32,
    limit: u32,
    resolved: Option<bool>,
) -> Result<Page<Report>, GatewayError> {
    let mut query = paging_query(page, limit);
    if let Some(resolved) = resolved {
        query.push(("resolved", resolved.to_string()));
    }
    gateway.get_page("/admin/reports", token, &query).await
}

pub async fn get(
    gateway: &ResourceGateway,
    token: &str,
    report_id: u64,
) -> Result<Report, GatewayError> {
    gateway
        .get(&format!("/admin/reports/{}", report_id), token, &[])
        .await
}

pub async fn resolve(
    gateway: &ResourceGateway,
    token: &str,
    report_id: u64,
) -> Result<ReportMutation, GatewayError> {
    gateway
        .post(
            &format!("/admin/reports/{}/resolve", report_id),
            Some(token),
            None::<&()>,
        )
        .await
}

pub async fn delete(
    gateway: &ResourceGateway,
    token: &str,
    report_id: u64,
) -> Result<Ack, GatewayError> {
    gateway
        .delete(&format!("/admin/reports/{}", report_id), token)
        .await
}
