//! Shared mock admin backend
//!
//! A small axum app that speaks the backend's wire contract: bearer-token
//! auth, token rotation on refresh, the `{error}` failure shape, and both
//! pagination envelopes. Tests flip the public knobs to stage failures.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub struct MockBackend {
    pub base_url: String,
    /// Token the protected resource currently accepts
    pub access_token: Arc<Mutex<String>>,
    /// Token the refresh endpoint currently accepts (rotates on use)
    pub refresh_token: Arc<Mutex<String>>,
    serial: Arc<AtomicUsize>,
    pub login_calls: Arc<AtomicUsize>,
    pub refresh_calls: Arc<AtomicUsize>,
    pub resource_calls: Arc<AtomicUsize>,
    pub resource_delay: Arc<Mutex<Duration>>,
    pub refresh_delay: Arc<Mutex<Duration>>,
    /// When set, the refresh endpoint rejects everything with 401
    pub refresh_rejected: Arc<AtomicBool>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let backend = Self {
            base_url: format!("http://{}", addr),
            access_token: Arc::new(Mutex::new("T1".to_string())),
            refresh_token: Arc::new(Mutex::new("R1".to_string())),
            serial: Arc::new(AtomicUsize::new(1)),
            login_calls: Arc::new(AtomicUsize::new(0)),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
            resource_calls: Arc::new(AtomicUsize::new(0)),
            resource_delay: Arc::new(Mutex::new(Duration::ZERO)),
            refresh_delay: Arc::new(Mutex::new(Duration::ZERO)),
            refresh_rejected: Arc::new(AtomicBool::new(false)),
        };

        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/refresh", post(refresh))
            .route("/admin/protected", get(protected))
            .route("/admin/users", get(users_page))
            .route("/admin/users/{id}/ban", post(ban_user))
            .route("/admin/companies", get(companies_bare))
            .route("/admin/config", put(update_config))
            .route("/echo/{status}", get(echo_status))
            .route("/malformed", get(malformed))
            .with_state(backend.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        backend
    }

    /// Invalidate the access token the session currently holds, so the next
    /// protected call comes back 401
    pub fn rotate_access_token(&self, token: &str) {
        *self.access_token.lock().unwrap() = token.to_string();
    }

    pub fn set_resource_delay(&self, delay: Duration) {
        *self.resource_delay.lock().unwrap() = delay;
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self.refresh_delay.lock().unwrap() = delay;
    }

    pub fn reject_refreshes(&self) {
        self.refresh_rejected.store(true, Ordering::SeqCst);
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn resource_count(&self) -> usize {
        self.resource_calls.load(Ordering::SeqCst)
    }
}

fn unauthorized(reason: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": reason }))).into_response()
}

fn user_json(id: u64, banned: bool) -> Value {
    json!({
        "id": id,
        "first_name": "Test",
        "last_name": format!("User{}", id),
        "email": format!("user{}@example.com", id),
        "phone_number": null,
        "created_at": "2025-06-01T10:00:00Z",
        "email_verified": true,
        "phone_verified": false,
        "id_verified": false,
        "banned": banned,
        "is_admin": false
    })
}

async fn login(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    backend.login_calls.fetch_add(1, Ordering::SeqCst);

    let has_identifier = body["email"].is_string() || body["phone_number"].is_string();
    if has_identifier && body["password"] == "s3cret" {
        *backend.access_token.lock().unwrap() = "T1".to_string();
        *backend.refresh_token.lock().unwrap() = "R1".to_string();
        backend.serial.store(1, Ordering::SeqCst);
        Json(json!({
            "access_token": "T1",
            "refresh_token": "R1",
            "user": { "id": 1, "first_name": "Sara", "last_name": "Bekele" }
        }))
        .into_response()
    } else {
        unauthorized("Invalid credentials")
    }
}

async fn refresh(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let delay = *backend.refresh_delay.lock().unwrap();
    tokio::time::sleep(delay).await;
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);

    if backend.refresh_rejected.load(Ordering::SeqCst) {
        return unauthorized("refresh token expired");
    }

    let presented = body["refresh_token"].as_str().unwrap_or("");
    let rotated = {
        let mut current = backend.refresh_token.lock().unwrap();
        if presented == *current {
            let n = backend.serial.fetch_add(1, Ordering::SeqCst) + 1;
            let access = format!("T{}", n);
            let refreshed = format!("R{}", n);
            *backend.access_token.lock().unwrap() = access.clone();
            *current = refreshed.clone();
            Some((access, refreshed))
        } else {
            // single-use token already rotated away
            None
        }
    };

    match rotated {
        Some((access, refreshed)) => Json(json!({
            "access_token": access,
            "refresh_token": refreshed
        }))
        .into_response(),
        None => unauthorized("refresh token reuse"),
    }
}

async fn protected(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    let delay = *backend.resource_delay.lock().unwrap();
    tokio::time::sleep(delay).await;
    backend.resource_calls.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Bearer {}", backend.access_token.lock().unwrap());
    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if presented == expected {
        Json(json!({ "ok": true })).into_response()
    } else {
        unauthorized("jwt expired")
    }
}

async fn users_page(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    let expected = format!("Bearer {}", backend.access_token.lock().unwrap());
    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if presented != expected {
        return unauthorized("jwt expired");
    }
    Json(json!({
        "results": [user_json(1, false), user_json(2, true)],
        "pagination": { "page": 1, "limit": 10, "total": 23 }
    }))
    .into_response()
}

async fn ban_user(State(_backend): State<MockBackend>, Path(id): Path<u64>) -> Response {
    Json(json!({ "message": "User banned", "user": user_json(id, true) })).into_response()
}

async fn companies_bare() -> Response {
    Json(json!([
        { "id": 1, "name": "Sunrise Shuttle" },
        { "id": 2, "name": "Addis Fleet" },
        { "id": 3, "name": "Bole Express" }
    ]))
    .into_response()
}

async fn update_config(Json(_body): Json<Value>) -> Response {
    Json(json!({ "message": "Config updated" })).into_response()
}

async fn echo_status(Path(status): Path<u16>) -> Response {
    let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, Json(json!({ "error": "forced failure" }))).into_response()
}

async fn malformed() -> Response {
    (StatusCode::OK, "this is not json").into_response()
}
