// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access gate: age verification first, then authentication per route.
//!
//! Every page load passes through `AccessGate::admit`. Without a valid age
//! verification only the verification prompt is reachable. Past that,
//! protected routes additionally need a stored access token.

use crate::api::ApiClient;
use crate::error::{ApiError, StorageError};
use crate::models::{Credentials, RegisterForm, RegisterResponse};
use crate::session::SessionStore;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;

/// Client routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    AgeVerification,
    Home,
    Login,
    Register,
    Logout,
    Dashboard,
    Profile,
    FindConnections,
    PendingRequests,
    Favorites,
    Notifications,
    SubmitAd,
    Ads,
    Jobs,
    PostJob,
    ApplyJob,
    JobComments,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::AgeVerification => "/",
            Route::Home => "/home",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Logout => "/logout",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
            Route::FindConnections => "/find-connections",
            Route::PendingRequests => "/pending-requests",
            Route::Favorites => "/favorites",
            Route::Notifications => "/notifications",
            Route::SubmitAd => "/submit-ad",
            Route::Ads => "/ads",
            Route::Jobs => "/jobs",
            Route::PostJob => "/post-job",
            Route::ApplyJob => "/apply-job",
            Route::JobComments => "/job-comments",
        }
    }

    /// Routes that need a signed-in member.
    pub fn requires_auth(self) -> bool {
        matches!(
            self,
            Route::Logout
                | Route::Dashboard
                | Route::Profile
                | Route::FindConnections
                | Route::PendingRequests
                | Route::Favorites
                | Route::Notifications
                | Route::SubmitAd
                | Route::PostJob
                | Route::ApplyJob
                | Route::JobComments
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a page load stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unverified,
    Anonymous,
    Authenticated,
}

/// Outcome of asking for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admit(Route),
    Redirect(Route),
}

impl Admission {
    /// The route that will actually be shown.
    pub fn target(self) -> Route {
        match self {
            Admission::Admit(route) | Admission::Redirect(route) => route,
        }
    }
}

/// Gate errors.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("You must be 21 or older to enter this site.")]
    Underage,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GateError {
    pub fn user_message(&self) -> String {
        match self {
            GateError::Api(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Route admission plus the flows that change the session.
#[derive(Clone)]
pub struct AccessGate {
    api: ApiClient,
    age_ttl: Duration,
}

impl AccessGate {
    pub fn new(api: ApiClient, age_ttl: Duration) -> Self {
        Self { api, age_ttl }
    }

    fn session(&self) -> &Arc<SessionStore> {
        self.api.session()
    }

    pub fn state(&self) -> GateState {
        self.state_at(Utc::now())
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> GateState {
        let session = self.session();
        if !session.is_age_verified_at(now) {
            GateState::Unverified
        } else if session.is_authenticated() {
            GateState::Authenticated
        } else {
            GateState::Anonymous
        }
    }

    pub fn admit(&self, route: Route) -> Result<Admission, GateError> {
        self.admit_at(route, Utc::now())
    }

    /// Decide whether `route` may be shown. A stale age record is cleared on
    /// the way.
    pub fn admit_at(&self, route: Route, now: DateTime<Utc>) -> Result<Admission, GateError> {
        let admission = match self.state_at(now) {
            GateState::Unverified => {
                let session = self.session();
                if session.has_age_record() {
                    tracing::info!("Age verification expired, clearing it");
                    session.clear_age_verification()?;
                }
                if route == Route::AgeVerification {
                    Admission::Admit(route)
                } else {
                    Admission::Redirect(Route::AgeVerification)
                }
            }
            _ if route == Route::AgeVerification => Admission::Redirect(Route::Home),
            GateState::Anonymous if route.requires_auth() => Admission::Redirect(Route::Login),
            _ => Admission::Admit(route),
        };

        tracing::debug!(route = %route, target = %admission.target(), "Route admission");
        Ok(admission)
    }

    /// Answer the age prompt. Nothing is stored for a "no".
    pub fn verify_age(&self, is_over_21: bool) -> Result<Route, GateError> {
        self.verify_age_at(is_over_21, Utc::now())
    }

    pub fn verify_age_at(&self, is_over_21: bool, now: DateTime<Utc>) -> Result<Route, GateError> {
        if !is_over_21 {
            return Err(GateError::Underage);
        }
        let expires = self.session().set_age_verified_at(now, self.age_ttl)?;
        tracing::info!(expires = %expires, "Age verified");
        Ok(Route::Home)
    }

    /// Sign in and store both tokens.
    pub async fn login(&self, credentials: &Credentials) -> Result<Route, GateError> {
        let tokens = self.api.login(credentials).await?;
        self.session()
            .set_tokens(&tokens.access_token, &tokens.refresh_token)?;
        tracing::info!("Login successful");
        Ok(Route::Dashboard)
    }

    /// Create an account. Tokens in the answer are ignored; the member
    /// signs in explicitly afterwards.
    pub async fn register(&self, form: &RegisterForm) -> Result<RegisterResponse, GateError> {
        let response = self.api.register(form).await?;
        tracing::info!("Registration submitted");
        Ok(response)
    }

    pub fn logout(&self) -> Result<Route, GateError> {
        self.session().clear_tokens()?;
        tracing::info!("Logged out");
        Ok(Route::Login)
    }

    pub fn reset_age_verification(&self) -> Result<Route, GateError> {
        self.session().clear_age_verification()?;
        tracing::info!("Age verification reset");
        Ok(Route::AgeVerification)
    }
}
