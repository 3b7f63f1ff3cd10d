//! Partner company endpoints
//!
//! The list endpoint is one of the legacy bare-array responses; it goes
//! through the same page normalizer as everything else.

use super::Ack;
use crate::error::GatewayError;
use crate::gateway::{Page, ResourceGateway};
use crate::models::Company;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CreateCompanyRequest<'a> {
    name: &'a str,
}

pub async fn list(gateway: &ResourceGateway, token: &str) -> Result<Page<Company>, GatewayError> {
    gateway.get_page("/admin/companies", token, &[]).await
}

pub async fn create(
    gateway: &ResourceGateway,
    token: &str,
    name: &str,
) -> Result<Company, GatewayError> {
    gateway
        .post(
            "/admin/companies",
            Some(token),
            Some(&CreateCompanyRequest { name }),
        )
        .await
}

pub async fn delete(
    gateway: &ResourceGateway,
    token: &str,
    company_id: u64,
) -> Result<Ack, GatewayError> {
    gateway
        .delete(&format!("/admin/companies/{}", company_id), token)
        .await
}
