// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plain-text rendering of lists, profiles and notices.

use crate::gate::Route;
use crate::models::{
    Ad, DiscoverPage, JobApplication, JobComment, JobListing, Notification, PendingRequest, User,
};
use crate::time_utils::format_utc_rfc3339;
use std::fmt;

/// One-line message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
    Redirect(Route),
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(msg) => write!(f, "{}", msg),
            Notice::Error(msg) => write!(f, "Error: {}", msg),
            Notice::Redirect(Route::AgeVerification) => {
                write!(f, "Please verify your age first: canna-connect verify-age yes")
            }
            Notice::Redirect(Route::Login) => {
                write!(f, "Please log in first: canna-connect login")
            }
            Notice::Redirect(route) => write!(f, "Redirecting to {}", route),
        }
    }
}

fn location(city: Option<&str>, state: Option<&str>) -> Option<String> {
    match (city.filter(|c| !c.is_empty()), state.filter(|s| !s.is_empty())) {
        (Some(city), Some(state)) => Some(format!("{}, {}", city, state)),
        (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
        (None, None) => None,
    }
}

/// One line per member: id, name, role and location.
pub fn user_card(user: &User) -> String {
    let mut line = format!("[{}] {}", user.id, user.name);
    if let Some(role) = &user.role {
        line.push_str(&format!(" — {}", role));
    }
    if let Some(place) = location(user.city.as_deref(), user.state.as_deref()) {
        line.push_str(&format!(" — {}", place));
    }
    line
}

pub fn profile(user: &User) -> String {
    let mut lines = vec![user_card(user)];
    if let Some(email) = &user.email {
        let status = if user.is_verified {
            "verified"
        } else {
            "unverified"
        };
        lines.push(format!("Email: {} ({})", email, status));
    }
    if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
        lines.push(format!("Bio: {}", bio));
    }
    if let Some(image) = &user.profile_image {
        lines.push(format!("Photo: {}", image));
    }
    lines.join("\n")
}

pub fn discover_page(page: &DiscoverPage, current: u32) -> String {
    let mut lines: Vec<String> = if page.users.is_empty() {
        vec!["No members found.".to_string()]
    } else {
        page.users.iter().map(user_card).collect()
    };
    lines.push(format!("Page {} of {}", current, page.total_pages.max(1)));
    lines.join("\n")
}

/// `[id] name (role) - city, state`
pub fn pending_requests(requests: &[PendingRequest]) -> String {
    if requests.is_empty() {
        return "No pending requests.".to_string();
    }
    requests
        .iter()
        .map(|r| {
            let mut line = format!("[{}] {}", r.id, r.user_name);
            if let Some(role) = &r.user_role {
                line.push_str(&format!(" ({})", role));
            }
            if let Some(place) = location(r.user_city.as_deref(), r.user_state.as_deref()) {
                line.push_str(&format!(" - {}", place));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn favorites(users: &[User]) -> String {
    if users.is_empty() {
        return "No favorite connections.".to_string();
    }
    users.iter().map(user_card).collect::<Vec<_>>().join("\n")
}

pub fn notifications(items: &[Notification]) -> String {
    if items.is_empty() {
        return "No new notifications.".to_string();
    }
    items
        .iter()
        .map(|n| match n.timestamp {
            Some(ts) => format!("{}  {}", format_utc_rfc3339(ts), n.message),
            None => n.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn ads(items: &[Ad]) -> String {
    if items.is_empty() {
        return "No ads available.".to_string();
    }
    items
        .iter()
        .map(|ad| {
            let mut block = format!("{}\n  {}", ad.title, ad.description);
            if let Some(link) = ad.link.as_deref().filter(|l| !l.is_empty()) {
                block.push_str(&format!("\n  Learn more: {}", link));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn jobs(items: &[JobListing]) -> String {
    if items.is_empty() {
        return "No job listings.".to_string();
    }
    items
        .iter()
        .map(|job| {
            let mut line = format!("[{}] {} — {}", job.id, job.title, job.location);
            if let Some(category) = &job.category {
                line.push_str(&format!(" ({})", category));
            }
            if let Some(salary) = job.salary.as_deref().filter(|s| !s.is_empty()) {
                line.push_str(&format!(" — {}", salary));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comments in backend order; replies are indented under a marker.
pub fn job_comments(items: &[JobComment]) -> String {
    if items.is_empty() {
        return "No comments yet.".to_string();
    }
    items
        .iter()
        .map(|c| {
            let author = c
                .user_id
                .map(|id| format!("member {}", id))
                .unwrap_or_else(|| "anonymous".to_string());
            match c.parent_id {
                Some(parent) => format!("  ↳ [{}] re {} {}: {}", c.id, parent, author, c.content),
                None => format!("[{}] {}: {}", c.id, author, c.content),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn application(app: &JobApplication) -> String {
    format!(
        "Application {} for job {} submitted ({})",
        app.id,
        app.job_id,
        app.status.as_deref().unwrap_or("pending")
    )
}
