// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Canna-Connect: client for the cannabis-industry networking backend
//!
//! This crate provides the session handling, API gateway and connection
//! lifecycle used by the `canna-connect` command-line front end.

pub mod api;
pub mod config;
pub mod connections;
pub mod error;
pub mod gate;
pub mod models;
pub mod session;
pub mod time_utils;
pub mod views;

use api::ApiClient;
use config::Config;
use connections::ConnectionManager;
use gate::AccessGate;
use session::SessionStore;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,
    pub gate: AccessGate,
}

impl AppState {
    pub fn new(config: Config, session: SessionStore) -> error::Result<Self> {
        let session = Arc::new(session);
        let api = ApiClient::from_config(&config, session.clone())?;
        let gate = AccessGate::new(api.clone(), config.age_verification_ttl);
        Ok(Self {
            config,
            session,
            api,
            gate,
        })
    }

    /// Fresh lifecycle manager for one view.
    pub fn connections(&self) -> ConnectionManager {
        ConnectionManager::new(self.api.clone())
    }
}
