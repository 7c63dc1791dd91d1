// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Connection request models and the per-pair connection state machine.

use super::User;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a connection request as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Connected,
    Rejected,
}

/// Answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Connected,
    Rejected,
}

impl From<Decision> for ConnectionStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Connected => ConnectionStatus::Connected,
            Decision::Rejected => ConnectionStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Connected => f.write_str("connected"),
            Decision::Rejected => f.write_str("rejected"),
        }
    }
}

/// Where the viewer stands with one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    #[default]
    Unconnected,
    Requested,
    Connected,
    Rejected,
}

impl ConnectionState {
    /// State after the viewer sends a request, if that is allowed.
    pub fn request(self) -> Option<Self> {
        match self {
            ConnectionState::Unconnected => Some(ConnectionState::Requested),
            _ => None,
        }
    }

    /// State after the request is answered, if that is allowed.
    pub fn answer(self, decision: Decision) -> Option<Self> {
        match (self, decision) {
            (ConnectionState::Requested, Decision::Connected) => Some(ConnectionState::Connected),
            (ConnectionState::Requested, Decision::Rejected) => Some(ConnectionState::Rejected),
            _ => None,
        }
    }
}

/// Incoming request as listed by `GET /connections/pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub user_name: String,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub user_city: Option<String>,
    #[serde(default)]
    pub user_state: Option<String>,
}

/// One page of discoverable members.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscoverPage {
    pub users: Vec<User>,
    pub total_pages: u32,
}

impl DiscoverPage {
    pub fn contains(&self, user_id: u64) -> bool {
        self.users.iter().any(|u| u.id == user_id)
    }
}
