//! In-process mock of the ad-network backend for async tests.
//!
//! Binds an axum router to `127.0.0.1:0` and records every request so tests
//! can assert on what went over the wire (or that nothing did).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Json;
use axum::Router;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use models::{
    Ad, AssignRequest, DashboardStats, Device, DeviceStatus, LoginRequest, MediaType,
    ReportStats, User,
};
use serde_json::json;
use time::macros::datetime;

use crate::config::ClientConfig;
use crate::net::ApiClient;

pub const TOKEN: &str = "tok-1";
pub const PASSWORD: &str = "secret";
pub const CSV_BODY: &str = "date,views\n2025-11-01,45\n";

/// One multipart upload as the backend saw it.
#[derive(Clone, Debug, Default)]
pub struct UploadRecord {
    pub fields: HashMap<String, String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub file_len: usize,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub ads: Vec<Ad>,
    pub devices: Vec<Device>,
    pub dashboard: DashboardStats,
    pub report: ReportStats,
    pub assigned: Vec<(String, AssignRequest)>,
    pub uploads: Vec<UploadRecord>,
    pub last_query: HashMap<String, String>,
    /// `METHOD /path` of every request received, in order.
    pub requests: Vec<String>,
    /// When set, every mutation answers 500.
    pub fail_mutations: bool,
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    pub async fn spawn(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { base_url: format!("http://{addr}"), state }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        lock(&self.state)
    }

    pub fn request_count(&self, route: &str) -> usize {
        self.state().requests.iter().filter(|r| r.as_str() == route).count()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            token_file: std::env::temp_dir().join("dooh-admin-unused-token"),
            request_timeout: Some(std::time::Duration::from_secs(5)),
        }
    }

    /// Client already holding the valid token.
    pub async fn client(&self) -> ApiClient {
        let api = ApiClient::new(&self.config()).unwrap();
        api.set_token(Some(TOKEN.to_owned())).await;
        api
    }
}

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn ad(id: &str, name: &str) -> Ad {
    Ad {
        id: id.to_owned(),
        name: name.to_owned(),
        media_type: MediaType::Video,
        url: format!("https://cdn.test/{id}.mp4"),
        duration: 30,
        client_name: None,
        file_size: Some(2_097_152),
        created_at: datetime!(2025-11-01 10:00:00 UTC),
    }
}

pub fn device(id: &str, status: DeviceStatus) -> Device {
    Device {
        id: id.to_owned(),
        device_id: format!("hw-{id}"),
        name: format!("Device {id}"),
        location_name: "Cafe Central".to_owned(),
        location_address: None,
        gps_latitude: None,
        gps_longitude: None,
        status,
        last_seen: datetime!(2025-11-04 11:59:00 UTC),
        battery_level: Some(80.0),
        android_version: Some("14".to_owned()),
        registered_at: None,
    }
}

pub fn user() -> User {
    User {
        id: "u1".to_owned(),
        email: "ops@example.test".to_owned(),
        role: "admin".to_owned(),
        created_at: None,
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/ads", get(list_ads))
        .route("/api/ads/upload", post(upload))
        .route("/api/ads/{id}", delete(delete_ad))
        .route("/api/devices", get(list_devices))
        .route("/api/devices/{id}/assign", post(assign))
        .route("/api/reports/dashboard", get(dashboard))
        .route("/api/reports/stats", get(report_stats))
        .route("/api/reports/export/csv", get(export_csv))
        .with_state(state)
}

fn record(state: &Shared, route: String) {
    lock(state).requests.push(route);
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "success": false, "error": "unauthorized" })))
        .into_response()
}

fn failed() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<LoginRequest>) -> Response {
    record(&state, "POST /api/auth/login".into());
    if body.password != PASSWORD {
        return unauthorized();
    }
    Json(json!({ "success": true, "token": TOKEN, "user": user() })).into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /api/auth/me".into());
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "success": true, "user": user() })).into_response()
}

async fn list_ads(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /api/ads".into());
    if !authorized(&headers) {
        return unauthorized();
    }
    let ads = lock(&state).ads.clone();
    Json(json!({ "success": true, "ads": ads })).into_response()
}

async fn upload(State(state): State<Shared>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    record(&state, "POST /api/ads/upload".into());
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut upload = UploadRecord::default();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        if name == "file" {
            upload.file_name = field.file_name().map(ToOwned::to_owned);
            upload.content_type = field.content_type().map(ToOwned::to_owned);
            upload.file_len = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        } else {
            let value = field.text().await.unwrap_or_default();
            upload.fields.insert(name, value);
        }
    }
    if lock(&state).fail_mutations {
        return failed();
    }

    let mut created = ad(&format!("a{}", lock(&state).ads.len() + 1), "");
    created.name = upload.fields.get("name").cloned().unwrap_or_default();
    if upload.fields.get("type").map(String::as_str) == Some("image") {
        created.media_type = MediaType::Image;
    }
    let mut guard = lock(&state);
    guard.uploads.push(upload);
    guard.ads.push(created.clone());
    Json(json!({ "success": true, "ad": created })).into_response()
}

async fn delete_ad(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    record(&state, format!("DELETE /api/ads/{id}"));
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut guard = lock(&state);
    if guard.fail_mutations {
        return failed();
    }
    guard.ads.retain(|ad| ad.id != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_devices(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /api/devices".into());
    if !authorized(&headers) {
        return unauthorized();
    }
    let devices = lock(&state).devices.clone();
    Json(json!({ "success": true, "devices": devices })).into_response()
}

async fn assign(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<AssignRequest>,
) -> Response {
    record(&state, format!("POST /api/devices/{id}/assign"));
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut guard = lock(&state);
    if guard.fail_mutations {
        return failed();
    }
    guard.assigned.push((id, body));
    Json(json!({ "success": true, "message": "assigned" })).into_response()
}

async fn dashboard(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /api/reports/dashboard".into());
    if !authorized(&headers) {
        return unauthorized();
    }
    let stats = lock(&state).dashboard.clone();
    Json(json!({ "success": true, "stats": stats })).into_response()
}

async fn report_stats(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "GET /api/reports/stats".into());
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut guard = lock(&state);
    guard.last_query = query;
    Json(json!({ "success": true, "stats": guard.report })).into_response()
}

async fn export_csv(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "GET /api/reports/export/csv".into());
    if !authorized(&headers) {
        return unauthorized();
    }
    lock(&state).last_query = query;
    ([(header::CONTENT_TYPE, "text/csv")], CSV_BODY).into_response()
}
