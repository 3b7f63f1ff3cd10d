//! User management endpoints

use super::Ack;
use crate::error::GatewayError;
use crate::gateway::{paging_query, Page, ResourceGateway};
use crate::models::User;
use serde::{Deserialize, Serialize};

/// Mutation response carrying the updated user
#[derive(Debug, Clone, Deserialize)]
pub struct UserMutation {
    pub message: String,
    pub user: User,
}

/// Partial update body; only set fields are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize)]
struct ToggleAdminRequest {
    is_admin: bool,
}

pub async fn list(
    gateway: &ResourceGateway,
    token: &str,
    page: u32,
    limit: u32,
    search: Option<&str>,
    banned: Option<bool>,
) -> Result<Page<User>, GatewayError> {
    let mut query = paging_query(page, limit);
    if let Some(search) = search {
        query.push(("search", search.to_string()));
    }
    if let Some(banned) = banned {
        query.push(("banned", banned.to_string()));
    }
    gateway.get_page("/admin/users", token, &query).await
}

pub async fn get(
    gateway: &ResourceGateway,
    token: &str,
    user_id: u64,
) -> Result<User, GatewayError> {
    gateway
        .get(&format!("/admin/users/{}", user_id), token, &[])
        .await
}

pub async fn update(
    gateway: &ResourceGateway,
    token: &str,
    user_id: u64,
    updates: &UserUpdate,
) -> Result<User, GatewayError> {
    gateway
        .put(&format!("/admin/users/{}", user_id), token, updates)
        .await
}

pub async fn ban(
    gateway: &ResourceGateway,
    token: &str,
    user_id: u64,
) -> Result<UserMutation, GatewayError> {
    gateway
        .post(&format!("/admin/users/{}/ban", user_id), Some(token), None::<&()>)
        .await
}

pub async fn unban(
    gateway: &ResourceGateway,
    token: &str,
    user_id: u64,
) -> Result<UserMutation, GatewayError> {
    gateway
        .post(&format!("/admin/users/{}/unban", user_id), Some(token), None::<&()>)
        .await
}

pub async fn toggle_admin(
    gateway: &ResourceGateway,
    token: &str,
    user_id: u64,
    is_admin: bool,
) -> Result<Ack, GatewayError> {
    gateway
        .post(
            &format!("/admin/users/{}/toggle-admin", user_id),
            Some(token),
            Some(&ToggleAdminRequest { is_admin }),
        )
        .await
}
