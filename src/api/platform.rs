//! Platform-wide configuration, statistics, and health endpoints

use super::Ack;
use crate::error::GatewayError;
use crate::gateway::{paging_query, Page, ResourceGateway};
use crate::models::{
    DashboardStats, PlatformConfig, PlatformConfigUpdate, RideStats, SosAlert, SystemHealth,
};

pub async fn config(gateway: &ResourceGateway, token: &str) -> Result<PlatformConfig, GatewayError> {
    gateway.get("/admin/config", token, &[]).await
}

pub async fn update_config(
    gateway: &ResourceGateway,
    token: &str,
    updates: &PlatformConfigUpdate,
) -> Result<Ack, GatewayError> {
    gateway.put("/admin/config", token, updates).await
}

pub async fn dashboard_stats(
    gateway: &ResourceGateway,
    token: &str,
) -> Result<DashboardStats, GatewayError> {
    gateway.get("/admin/stats/dashboard", token, &[]).await
}

pub async fn ride_stats(gateway: &ResourceGateway, token: &str) -> Result<RideStats, GatewayError> {
    gateway.get("/admin/stats/rides", token, &[]).await
}

/// Historic SOS alerts; a legacy bare-array endpoint
pub async fn sos_alerts(
    gateway: &ResourceGateway,
    token: &str,
    page: u32,
    limit: u32,
) -> Result<Page<SosAlert>, GatewayError> {
    gateway
        .get_page("/admin/sos", token, &paging_query(page, limit))
        .await
}

pub async fn system_health(
    gateway: &ResourceGateway,
    token: &str,
) -> Result<SystemHealth, GatewayError> {
    gateway.get("/admin/system-health", token, &[]).await
}
