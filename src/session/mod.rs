// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state: tokens and the age-verification record.
//!
//! The store is shared (`Arc<SessionStore>`) by everything that talks to the
//! backend. Only the access gate and the gateway's refresh call write to it.

pub mod storage;

pub use storage::{FileStore, KeyValueStore, MemoryStore};

use crate::error::StorageError;
use crate::time_utils::parse_epoch_millis;
use chrono::{DateTime, Duration, Utc};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const AGE_VERIFIED_KEY: &str = "ageVerified";
pub const AGE_VERIFICATION_EXPIRES_KEY: &str = "ageVerificationExpires";

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub age_verified: bool,
    pub age_verified_expiry: Option<DateTime<Utc>>,
}

/// Session accessors over a key/value backend.
pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: impl KeyValueStore + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Session kept in memory only.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    // ─── Tokens ──────────────────────────────────────────────────────────────

    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, access_token)?;
        self.storage.set(REFRESH_TOKEN_KEY, refresh_token)?;
        tracing::debug!("Session tokens stored");
        Ok(())
    }

    /// Replace the access token, keeping the refresh token.
    pub fn set_access_token(&self, access_token: &str) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, access_token)
    }

    pub fn clear_tokens(&self) -> Result<(), StorageError> {
        self.storage.remove(ACCESS_TOKEN_KEY)?;
        self.storage.remove(REFRESH_TOKEN_KEY)?;
        tracing::debug!("Session tokens cleared");
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// True iff an access token is stored. Expiry is only discovered when
    /// the backend answers 401.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    // ─── Age verification ────────────────────────────────────────────────────

    /// Record a successful age check valid for `ttl`. Returns the expiry.
    pub fn set_age_verified(&self, ttl: Duration) -> Result<DateTime<Utc>, StorageError> {
        self.set_age_verified_at(Utc::now(), ttl)
    }

    pub fn set_age_verified_at(
        &self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<DateTime<Utc>, StorageError> {
        let expires = now + ttl;
        self.storage.set(AGE_VERIFIED_KEY, "true")?;
        self.storage.set(
            AGE_VERIFICATION_EXPIRES_KEY,
            &expires.timestamp_millis().to_string(),
        )?;
        Ok(expires)
    }

    pub fn is_age_verified(&self) -> bool {
        self.is_age_verified_at(Utc::now())
    }

    /// An expired or unreadable record counts as absent; clearing it is up
    /// to the caller.
    pub fn is_age_verified_at(&self, now: DateTime<Utc>) -> bool {
        self.storage.get(AGE_VERIFIED_KEY).as_deref() == Some("true")
            && self
                .age_verification_expires()
                .is_some_and(|expires| now < expires)
    }

    pub fn age_verification_expires(&self) -> Option<DateTime<Utc>> {
        self.storage
            .get(AGE_VERIFICATION_EXPIRES_KEY)
            .and_then(|raw| parse_epoch_millis(&raw))
    }

    /// True when something is stored for age verification at all.
    pub fn has_age_record(&self) -> bool {
        self.storage.get(AGE_VERIFIED_KEY).is_some()
            || self.storage.get(AGE_VERIFICATION_EXPIRES_KEY).is_some()
    }

    pub fn clear_age_verification(&self) -> Result<(), StorageError> {
        self.storage.remove(AGE_VERIFIED_KEY)?;
        self.storage.remove(AGE_VERIFICATION_EXPIRES_KEY)
    }

    pub fn snapshot_at(&self, now: DateTime<Utc>) -> Session {
        Session {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            age_verified: self.is_age_verified_at(now),
            age_verified_expiry: self.age_verification_expires(),
        }
    }
}
