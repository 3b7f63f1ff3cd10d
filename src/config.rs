//! Configuration management

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Console configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the admin REST API (no trailing slash)
    pub api_base_url: String,

    /// Websocket URL for the realtime channel
    pub socket_url: String,

    /// Where the serialized session is persisted across restarts
    pub session_path: PathBuf,

    /// Default page size for list fetches
    pub page_size: u32,

    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_base_url = std::env::var("RIDEOPS_API_URL")
            .unwrap_or_else(|_| "http://localhost:3001/api".to_string());

        let socket_url = std::env::var("RIDEOPS_SOCKET_URL")
            .unwrap_or_else(|_| "ws://localhost:3001/socket".to_string());

        let session_path = std::env::var("RIDEOPS_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("rideops")
                    .join("session.json")
            });

        let page_size = std::env::var("RIDEOPS_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let http_timeout = std::env::var("RIDEOPS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            socket_url,
            session_path,
            page_size,
            http_timeout,
        })
    }
}
