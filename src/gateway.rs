//! Resource Gateway
//!
//! Uniform request/response layer for the admin REST API. Owns the wire
//! contract: JSON bodies, the `{error}` failure shape, status-code mapping,
//! and normalization of the two pagination envelopes the backend serves.
//!
//! Everything above this layer sees typed values and `GatewayError`, never
//! raw responses.

use crate::error::GatewayError;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Wire shape of a non-2xx response body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Pagination block of the enveloped list shape
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// The two list shapes the backend serves. Most endpoints envelope their
/// results; two legacy endpoints return a bare array. Both are permanently
/// supported and folded into [`Page`] here so callers only ever see one shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageShape<T> {
    Envelope {
        results: Vec<T>,
        pagination: Pagination,
    },
    Bare(Vec<T>),
}

/// Normalized list page
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl<T> From<PageShape<T>> for Page<T> {
    fn from(shape: PageShape<T>) -> Self {
        match shape {
            PageShape::Envelope { results, pagination } => Page {
                items: results,
                page: pagination.page,
                page_size: pagination.limit,
                total: pagination.total,
            },
            // Legacy bare array: the whole result set in one page
            PageShape::Bare(items) => {
                let total = items.len() as u64;
                Page {
                    page: 1,
                    page_size: items.len() as u32,
                    total,
                    items,
                }
            }
        }
    }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Typed request layer over the admin REST API
#[derive(Clone)]
pub struct ResourceGateway {
    http: Client,
    base_url: String,
}

impl ResourceGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, url);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send and decode, mapping non-2xx statuses through the error taxonomy
    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, GatewayError> {
        let response = req.send().await?;
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| GatewayError::Network(format!("malformed response body: {}", e)));
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        debug!("Request rejected: {} {}", status, message);
        Err(GatewayError::from_status(status.as_u16(), message))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        self.execute(self.request(Method::GET, path, Some(token)).query(query))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, GatewayError> {
        let mut req = self.request(Method::POST, path, token);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.execute(req).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        self.execute(self.request(Method::PUT, path, Some(token)).json(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, GatewayError> {
        self.execute(self.request(Method::DELETE, path, Some(token)))
            .await
    }

    /// GET a list endpoint, accepting either pagination shape
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>, GatewayError> {
        let shape: PageShape<T> = self.get(path, token, query).await?;
        Ok(shape.into())
    }
}

/// Standard page/limit query, extended with per-resource filters
pub fn paging_query(page: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("limit", limit.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u64,
    }

    #[test]
    fn test_enveloped_shape_normalizes() {
        let json = r#"{
            "results": [{"id": 1}, {"id": 2}],
            "pagination": {"page": 3, "limit": 2, "total": 41}
        }"#;
        let shape: PageShape<Item> = serde_json::from_str(json).unwrap();
        let page: Page<Item> = shape.into();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, 2);
        assert_eq!(page.total, 41);
    }

    #[test]
    fn test_bare_legacy_shape_normalizes() {
        let json = r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#;
        let shape: PageShape<Item> = serde_json::from_str(json).unwrap();
        let page: Page<Item> = shape.into();
        assert_eq!(page.items, vec![Item { id: 1 }, Item { id: 2 }, Item { id: 3 }]);
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 3); // inferred from array length
    }

    #[test]
    fn test_empty_bare_shape() {
        let shape: PageShape<Item> = serde_json::from_str("[]").unwrap();
        let page: Page<Item> = shape.into();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_paging_query() {
        let q = paging_query(2, 25);
        assert_eq!(q[0], ("page", "2".to_string()));
        assert_eq!(q[1], ("limit", "25".to_string()));
    }
}
