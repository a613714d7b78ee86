//! REST API client for the ad-network backend.
//!
//! Every request carries `Authorization: Bearer <token>` when a credential is
//! present. Responses are read as text first and decoded with `serde_json`,
//! so schema mismatches surface as [`ApiError::Decode`] with the serde
//! message rather than an opaque transport error.
//!
//! ERROR HANDLING
//! ==============
//! No retry or backoff: one attempt per call, and a failure leaves all
//! caller-side state untouched.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use models::{
    Ad, AdsEnvelope, AssignRequest, Assignment, AuthResponse, CreatedAd, DashboardStats, Device,
    DevicesEnvelope, Envelope, LoginRequest, MessageEnvelope, ReportFilter, ReportStats,
    StatsEnvelope, UploadFile, UploadPayload, User, UserEnvelope,
};
use models::upload::FALLBACK_MIME;
use reqwest::{Method, Url};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use super::error::ApiError;
use crate::config::ClientConfig;

// Paths are kept as segments so ids are percent-encoded when joined.
const ADS_PATH: &[&str] = &["api", "ads"];
const ADS_UPLOAD_PATH: &[&str] = &["api", "ads", "upload"];
const DEVICES_PATH: &[&str] = &["api", "devices"];
const DASHBOARD_PATH: &[&str] = &["api", "reports", "dashboard"];
const REPORT_STATS_PATH: &[&str] = &["api", "reports", "stats"];
const EXPORT_CSV_PATH: &[&str] = &["api", "reports", "export", "csv"];
const LOGIN_PATH: &[&str] = &["api", "auth", "login"];
const ME_PATH: &[&str] = &["api", "auth", "me"];

fn ad_endpoint(ad_id: &str) -> [&str; 3] {
    ["api", "ads", ad_id]
}

fn assign_endpoint(device_id: &str) -> [&str; 4] {
    ["api", "devices", device_id, "assign"]
}

fn rejected_message(message: Option<&str>) -> String {
    message.unwrap_or("server reported failure").to_owned()
}

/// Cloneable handle to the backend. Clones share the credential, so a token
/// set through one handle is visible to every view holding another.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Build a client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: parse_base_url(&config.base_url)?,
            token: Arc::new(RwLock::new(None)),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Replace the bearer credential used by every clone of this client.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let request = self.http.request(method, url);
        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a prepared request, turning any non-2xx status into an error.
    async fn send(
        &self,
        method: &Method,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|error| {
            tracing::warn!(%method, path, %error, "request failed");
            ApiError::Http(error)
        })?;
        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        Ok(response)
    }

    async fn call<T: DeserializeOwned + Envelope>(
        &self,
        method: Method,
        segments: &[&str],
        build: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        let path = url.path().to_owned();
        let request = build(self.request(method.clone(), url).await);
        let text = self.send(&method, &path, request).await?.text().await?;
        // Mutations may answer 204 with no body at all.
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        let body = serde_json::from_str::<T>(text)?;
        if !body.success() {
            return Err(ApiError::Rejected(rejected_message(body.message())));
        }
        Ok(body)
    }

    async fn get<T: DeserializeOwned + Envelope>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.call(Method::GET, segments, |request| request).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned + Envelope>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        self.call(Method::POST, segments, |request| request.json(body)).await
    }

    /// `POST /api/auth/login`. Does not store the returned token; that is the
    /// auth context's job.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status (401 for bad
    /// credentials), or an undecodable body.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        self.post_json(LOGIN_PATH, &body).await
    }

    /// `GET /api/auth/me` with the current credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is missing, expired, or rejected.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        Ok(self.get::<UserEnvelope>(ME_PATH).await?.user)
    }

    /// `GET /api/ads`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or bad body.
    pub async fn list_ads(&self) -> Result<Vec<Ad>, ApiError> {
        Ok(self.get::<AdsEnvelope>(ADS_PATH).await?.ads)
    }

    /// `POST /api/ads/upload` as a single multipart request.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or bad body.
    pub async fn upload_ad(&self, payload: UploadPayload) -> Result<Ad, ApiError> {
        let form = upload_form(payload)?;
        let created: CreatedAd = self
            .call(Method::POST, ADS_UPLOAD_PATH, |request| request.multipart(form))
            .await?;
        let ad = created.into_ad();
        tracing::info!(ad_id = %ad.id, name = %ad.name, "ad uploaded");
        Ok(ad)
    }

    /// `DELETE /api/ads/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or rejection.
    pub async fn delete_ad(&self, ad_id: &str) -> Result<(), ApiError> {
        let _: MessageEnvelope = self
            .call(Method::DELETE, &ad_endpoint(ad_id), |request| request)
            .await?;
        tracing::info!(ad_id, "ad deleted");
        Ok(())
    }

    /// `GET /api/devices`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or bad body.
    pub async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        Ok(self.get::<DevicesEnvelope>(DEVICES_PATH).await?.devices)
    }

    /// `POST /api/devices/{id}/assign` with the whole assignment list.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or rejection.
    pub async fn assign_ads(&self, device_id: &str, ads: Vec<Assignment>) -> Result<(), ApiError> {
        let count = ads.len();
        let body = AssignRequest { ads };
        let _: MessageEnvelope = self.post_json(&assign_endpoint(device_id), &body).await?;
        tracing::info!(device_id, count, "ads assigned");
        Ok(())
    }

    /// `GET /api/reports/dashboard`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or bad body.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        Ok(self.get::<StatsEnvelope<DashboardStats>>(DASHBOARD_PATH).await?.stats)
    }

    /// `GET /api/reports/stats` narrowed by `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, bad body, or a
    /// date bound that cannot be formatted.
    pub async fn report_stats(&self, filter: &ReportFilter) -> Result<ReportStats, ApiError> {
        let query = filter.query_pairs()?;
        let body: StatsEnvelope<ReportStats> = self
            .call(Method::GET, REPORT_STATS_PATH, |request| request.query(&query))
            .await?;
        Ok(body.stats)
    }

    /// `GET /api/reports/export/csv` for the filter's date range. Returns the
    /// raw CSV bytes.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a date bound
    /// that cannot be formatted.
    pub async fn export_csv(&self, filter: &ReportFilter) -> Result<Vec<u8>, ApiError> {
        let query = filter.range_pairs()?;
        let url = self.url(EXPORT_CSV_PATH)?;
        let path = url.path().to_owned();
        let request = self.request(Method::GET, url).await.query(&query);
        let response = self.send(&Method::GET, &path, request).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw).map_err(|_| ApiError::InvalidBaseUrl(raw.to_owned()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(url)
}

fn upload_form(payload: UploadPayload) -> Result<Form, ApiError> {
    let fields = payload.form_fields();
    let UploadFile { file_name, mime_type, bytes } = payload.file;
    let mime = if mime_type.is_empty() { FALLBACK_MIME } else { mime_type.as_str() };
    let part = Part::bytes(bytes).file_name(file_name).mime_str(mime)?;

    let mut form = Form::new().part("file", part);
    for (name, value) in fields {
        form = form.text(name, value);
    }
    Ok(form)
}
