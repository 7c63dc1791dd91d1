// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model and the account forms.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Member role as reported by the backend.
///
/// `Other` carries the backend's string verbatim, including roles the
/// client does not know.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    User,
    Guest,
    Grower,
    DispensaryOwner,
    Budtender,
    LegalAdvisor,
    #[default]
    Customer,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
            Role::Guest => "Guest",
            Role::Grower => "Grower",
            Role::DispensaryOwner => "Dispensary Owner",
            Role::Budtender => "Budtender",
            Role::LegalAdvisor => "Legal Advisor",
            Role::Customer => "Customer",
            Role::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Admin" => Role::Admin,
            "User" => Role::User,
            "Guest" => Role::Guest,
            "Grower" => Role::Grower,
            "Dispensary Owner" => Role::DispensaryOwner,
            "Budtender" => Role::Budtender,
            "Legal Advisor" => Role::LegalAdvisor,
            "Customer" => Role::Customer,
            _ => Role::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member profile snapshot served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Profile picture URL
    #[serde(default, alias = "profile_image_url")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Whether the member confirmed their email address
    #[serde(default)]
    pub is_verified: bool,
}

/// Entry of the favorites list: the member plus, when the backend sends
/// it, the id of the favorite record used to remove it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(flatten)]
    pub user: User,
    #[serde(default, alias = "favorite_connect_id")]
    pub favorite_id: Option<u64>,
}

/// Registration form.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub city: String,
    pub state: String,
    pub role: Role,
}

/// Login form.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Tokens issued on login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Registration outcome.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Access token issued by the refresh endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}
