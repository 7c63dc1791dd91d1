// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the networking backend.
//!
//! Handles:
//! - Bearer token attachment from the shared session
//! - Error normalization into `ApiError` (network / auth / validation / server)
//! - One session refresh and replay when an authenticated call gets a 401
//! - Access token refresh, clearing the session when it fails

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    check_form, Ad, ConnectionStatus, Credentials, Decision, DiscoverPage, Favorite,
    JobApplication, JobComment, JobListing, NewAd, NewComment, NewJob, Notification,
    PendingRequest, RefreshResponse, RegisterForm, RegisterResponse, TokenPair, User,
};
use crate::session::SessionStore;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const SESSION_EXPIRED: &str = "Session expired, please log in again.";

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client for `base_url` (including the `/api` prefix).
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Create a client from configuration, applying the request timeout.
    pub fn from_config(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    // ─── Authentication ──────────────────────────────────────────────────────

    /// Create an account.
    pub async fn register(&self, form: &RegisterForm) -> Result<RegisterResponse> {
        check_form(form)?;
        let request = self.http.post(self.url("/register")).json(form);
        self.send_json(request, "Registration failed").await
    }

    /// Exchange credentials for a token pair. Storing the tokens is the
    /// caller's job.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair> {
        check_form(credentials)?;
        let request = self.http.post(self.url("/login")).json(credentials);
        self.send_json(request, "Login failed").await
    }

    /// Trade the stored refresh token for a new access token.
    ///
    /// On success the stored access token is replaced. On any failure the
    /// session tokens are cleared so a stale token is never reused.
    pub async fn refresh_session(&self) -> Result<String> {
        let Some(refresh_token) = self.session.refresh_token() else {
            tracing::info!("No refresh token, clearing session");
            self.clear_session();
            return Err(ApiError::Auth(SESSION_EXPIRED.to_string()));
        };

        let request = self
            .http
            .post(self.url("/refresh"))
            .bearer_auth(refresh_token);

        let refreshed = match self
            .send_json::<RefreshResponse>(request, SESSION_EXPIRED)
            .await
        {
            Ok(refreshed) => refreshed,
            Err(e) => {
                tracing::warn!(error = %e, "Session refresh failed, clearing session");
                self.clear_session();
                return match e {
                    ApiError::Network(_) => Err(e),
                    _ => Err(ApiError::Auth(SESSION_EXPIRED.to_string())),
                };
            }
        };

        if let Err(e) = self.session.set_access_token(&refreshed.access_token) {
            tracing::error!(error = %e, "Failed to store refreshed access token");
            self.clear_session();
            return Err(ApiError::Session(format!("Failed to store session: {}", e)));
        }
        tracing::info!("Access token refreshed");
        Ok(refreshed.access_token)
    }

    /// Get the signed-in member's profile.
    pub async fn fetch_profile(&self) -> Result<User> {
        self.send_authorized(
            || self.http.get(self.url("/profile")),
            "Failed to fetch user profile",
        )
        .await
    }

    // ─── Connections ─────────────────────────────────────────────────────────

    /// List discoverable members (paginated, 1-indexed; page size is the
    /// backend's default).
    pub async fn discover_users(&self, search: &str, page: u32) -> Result<DiscoverPage> {
        if page == 0 {
            return Err(ApiError::invalid_input("Page must be at least 1"));
        }

        let query = [("search", search.to_string()), ("page", page.to_string())];
        self.send_authorized(
            || self.http.get(self.url("/users")).query(&query),
            "Failed to fetch users",
        )
        .await
    }

    /// Ask `user_id` to connect.
    pub async fn send_connection_request(&self, user_id: u64) -> Result<()> {
        let body = serde_json::json!({ "user_id": user_id });
        self.send_authorized_unit(
            || self.http.post(self.url("/connections")).json(&body),
            "Failed to send connection request",
        )
        .await
    }

    /// Incoming requests awaiting an answer.
    pub async fn list_pending_requests(&self) -> Result<Vec<PendingRequest>> {
        self.send_authorized(
            || self.http.get(self.url("/connections/pending")),
            "Failed to fetch pending requests",
        )
        .await
    }

    /// Accept or reject an incoming request.
    pub async fn respond_to_request(&self, request_id: u64, decision: Decision) -> Result<()> {
        let url = self.url(&format!("/connections/{}", request_id));
        let body = serde_json::json!({ "status": ConnectionStatus::from(decision) });
        self.send_authorized_unit(
            || self.http.patch(&url).json(&body),
            "Failed to update connection",
        )
        .await
    }

    // ─── Favorites ───────────────────────────────────────────────────────────

    pub async fn list_favorites(&self) -> Result<Vec<Favorite>> {
        self.send_authorized(
            || self.http.get(self.url("/favorites")),
            "Failed to fetch favorites",
        )
        .await
    }

    /// Mark `favorite_user_id` as a favorite of `owner_id` (the signed-in
    /// member).
    pub async fn add_favorite(&self, owner_id: u64, favorite_user_id: u64) -> Result<()> {
        let url = self.url(&format!("/favorite-connects/{}/add", owner_id));
        let body = serde_json::json!({ "favorite_user_id": favorite_user_id });
        self.send_authorized_unit(
            || self.http.post(&url).json(&body),
            "Failed to add favorite",
        )
        .await
    }

    /// Delete a favorite record by its own id (not the member's).
    pub async fn remove_favorite(&self, favorite_id: u64) -> Result<()> {
        let url = self.url(&format!("/favorite-connects/{}/delete", favorite_id));
        self.send_authorized_unit(|| self.http.delete(&url), "Failed to remove favorite")
            .await
    }

    // ─── Listings ────────────────────────────────────────────────────────────

    pub async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.send_authorized(
            || self.http.get(self.url("/notifications")),
            "Failed to fetch notifications",
        )
        .await
    }

    /// Active advertisements (public).
    pub async fn list_ads(&self) -> Result<Vec<Ad>> {
        let request = self.http.get(self.url("/ads"));
        self.send_json(request, "Failed to fetch ads").await
    }

    /// Submit an advertisement.
    pub async fn create_ad(&self, ad: &NewAd) -> Result<Ad> {
        check_form(ad)?;
        self.send_authorized(
            || self.http.post(self.url("/ads")).json(ad),
            "Failed to submit ad",
        )
        .await
    }

    // ─── Jobs ────────────────────────────────────────────────────────────────

    /// Job postings (public).
    pub async fn list_jobs(&self) -> Result<Vec<JobListing>> {
        let request = self.http.get(self.url("/jobs"));
        self.send_json(request, "Failed to fetch jobs").await
    }

    /// Post a job as the signed-in member.
    pub async fn create_job(&self, job: &NewJob) -> Result<JobListing> {
        check_form(job)?;
        self.send_authorized(
            || self.http.post(self.url("/job")).json(job),
            "Failed to post job",
        )
        .await
    }

    /// Apply to a job with the resume at `resume`, uploaded as the
    /// multipart field `resume`.
    pub async fn apply_to_job(&self, job_id: u64, resume: &Path) -> Result<JobApplication> {
        let file_name = resume
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::invalid_input("Resume file is required"))?;
        let bytes = tokio::fs::read(resume).await.map_err(|e| {
            ApiError::invalid_input(format!("Cannot read resume {}: {}", resume.display(), e))
        })?;

        let url = self.url(&format!("/job/{}/apply", job_id));
        self.send_authorized(
            || {
                let part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                self.http.post(&url).multipart(Form::new().part("resume", part))
            },
            "Failed to submit application",
        )
        .await
    }

    /// Comments on a job posting (public), replies included.
    pub async fn list_job_comments(&self, job_id: u64) -> Result<Vec<JobComment>> {
        let request = self.http.get(self.url(&format!("/job/{}/comments", job_id)));
        self.send_json(request, "Failed to fetch comments").await
    }

    pub async fn add_job_comment(&self, job_id: u64, comment: &NewComment) -> Result<JobComment> {
        check_form(comment)?;
        let url = self.url(&format!("/job/{}/comment", job_id));
        self.send_authorized(
            || self.http.post(&url).json(comment),
            "Failed to add comment",
        )
        .await
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the stored access token, if there is one.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn clear_session(&self) {
        if let Err(e) = self.session.clear_tokens() {
            tracing::error!(error = %e, "Failed to clear session tokens");
        }
    }

    /// Send a request and decode its JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T> {
        let value = self.execute(request, fallback).await?;
        decode(value, fallback)
    }

    async fn send_authorized<T, F>(&self, build: F, fallback: &str) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let value = self.execute_authorized(build, fallback).await?;
        decode(value, fallback)
    }

    async fn send_authorized_unit<F>(&self, build: F, fallback: &str) -> Result<()>
    where
        F: Fn() -> RequestBuilder,
    {
        self.execute_authorized(build, fallback).await.map(|_| ())
    }

    /// Send a request as the signed-in member.
    ///
    /// `build` is called again for the replay so the new token is attached.
    /// A 401 while holding an access token refreshes the session once and
    /// replays once; without a refresh token the session is cleared instead.
    /// Calls made without any token return the 401 unchanged.
    async fn execute_authorized<F>(&self, build: F, fallback: &str) -> Result<Value>
    where
        F: Fn() -> RequestBuilder,
    {
        let had_token = self.session.access_token().is_some();
        match self.execute(self.authorized(build()), fallback).await {
            Err(e) if e.is_auth_failure() && had_token => {
                tracing::info!(error = %e, "Access token rejected, refreshing session");
                self.refresh_session().await?;
                self.execute(self.authorized(build()), fallback).await
            }
            other => other,
        }
    }

    /// Send a request, check the status and return the parsed body.
    ///
    /// Error bodies look like `{"error": "..."}` (or `{"msg": "..."}` from
    /// the JWT layer); when neither is present `fallback` is the message.
    /// A success status whose body still carries `error` is a rejection.
    async fn execute(&self, request: RequestBuilder, fallback: &str) -> Result<Value> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Backend request failed to send");
            ApiError::Network(format!("{} ({})", fallback, e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("{} ({})", fallback, e)))?;

        let parsed: Option<Value> = if body.trim().is_empty() {
            Some(Value::Null)
        } else {
            serde_json::from_str(&body).ok()
        };

        if !status.is_success() {
            let message = parsed
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| fallback.to_string());

            if status.as_u16() == 429 {
                tracing::warn!("Backend rate limit hit (429)");
            }
            tracing::warn!(status = %status, message = %message, "Backend rejected request");
            return Err(ApiError::from_status(status, message));
        }

        let value = parsed.ok_or_else(|| {
            ApiError::Network(format!("{} (response is not valid JSON)", fallback))
        })?;

        if let Some(message) = error_message(&value) {
            return Err(ApiError::Validation {
                status: status.as_u16(),
                message,
            });
        }

        Ok(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value, fallback: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "Unexpected response shape");
        ApiError::Network(format!("{} (unexpected response: {})", fallback, e))
    })
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .or_else(|| body.get("msg"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
