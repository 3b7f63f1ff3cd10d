//! Identity-verification review endpoints

use super::users::UserMutation;
use crate::error::GatewayError;
use crate::gateway::{paging_query, Page, ResourceGateway};
use crate::models::PendingVerification;

pub async fn list_pending(
    gateway: &ResourceGateway,
    token: &str,
    page: u32,
    limit: u32,
) -> Result<Page<PendingVerification>, GatewayError> {
    gateway
        .get_page("/admin/verifications", token, &paging_query(page, limit))
        .await
}

pub async fn approve(
    gateway: &ResourceGateway,
    token: &str,
    user_id: u64,
) -> Result<UserMutation, GatewayError> {
    gateway
        .post(
            &format!("/admin/verifications/{}/verify", user_id),
            Some(token),
            None::<&()>,
        )
        .await
}

pub async fn reject(
    gateway: &ResourceGateway,
    token: &str,
    user_id: u64,
) -> Result<UserMutation, GatewayError> {
    gateway
        .post(
            &format!("/admin/verifications/{}/reject", user_id),
            Some(token),
            None::<&()>,
        )
        .await
}
