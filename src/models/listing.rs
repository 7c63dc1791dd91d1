// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Listings: advertisements, notifications and the job board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Advertisement shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Advertisement submission.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct NewAd {
    #[validate(length(min = 1, max = 100, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Link must be a valid URL"))]
    pub link: Option<String>,
}

/// Activity notification for the signed-in member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: u64,
    pub title: String,
    /// Budtender, Grower, etc.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub posted_by: Option<u64>,
    #[serde(default)]
    pub company_id: Option<u64>,
    /// Creation time as sent by the backend (naive ISO 8601)
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Job posting submission.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct NewJob {
    #[validate(length(min = 1, max = 100, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 100, message = "Location is required"))]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "Salary must be at most 50 characters"))]
    pub salary: Option<String>,
}

/// Comment on a job posting. Replies point at their parent comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobComment {
    pub id: u64,
    pub job_id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct NewComment {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
}

/// Application to a job posting, as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: u64,
    pub job_id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub applied_at: Option<String>,
    #[serde(default)]
    pub resume_file_path: Option<String>,
    /// Only set once the application left `pending`
    #[serde(default)]
    pub decision_notes: Option<String>,
}
