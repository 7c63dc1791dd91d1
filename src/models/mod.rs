// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models exchanged with the backend.

pub mod connection;
pub mod listing;
pub mod user;

pub use connection::{ConnectionState, ConnectionStatus, Decision, DiscoverPage, PendingRequest};
pub use listing::{
    Ad, JobApplication, JobComment, JobListing, NewAd, NewComment, NewJob, Notification,
};
pub use user::{
    Credentials, Favorite, RefreshResponse, RegisterForm, RegisterResponse, Role, TokenPair, User,
};

use crate::error::ApiError;
use validator::Validate;

/// Validate a form before it is sent, as a local validation error.
pub fn check_form<T: Validate>(form: &T) -> Result<(), ApiError> {
    form.validate().map_err(|errors| {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let message = fields
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"))
                })
            })
            .collect::<Vec<_>>()
            .join("; ");
        ApiError::invalid_input(message)
    })
}
