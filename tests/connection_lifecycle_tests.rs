// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Connection lifecycle tests.
//!
//! These tests verify that:
//! 1. Requested members never come back in discovery
//! 2. Pending requests resolve exactly once
//! 3. Auth failures refresh the session once, then give up
//! 4. Favorites are added for the viewer and removed by record
//! 5. Closed views drop late responses

use canna_connect::connections::ConnectionError;
use canna_connect::models::{ConnectionState, Decision};
use serde_json::json;

mod common;
use common::{test_state, user_json, MockBackend};

fn pending_json(id: u64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": id + 100,
        "user_name": name,
        "user_role": "Budtender",
        "user_city": "Austin",
        "user_state": "TX"
    })
}

#[tokio::test]
async fn test_send_request_removes_user_from_discover_list() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/users",
        200,
        json!({ "users": [user_json(5, "Ana"), user_json(6, "Bo")], "total_pages": 3 }),
    );
    backend.on("POST", "/connections", 201, json!({ "message": "Connection request sent" }));
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();

    let page = connections.discover("", 1).await.unwrap();
    assert!(page.contains(5));
    assert_eq!(page.total_pages, 3);

    connections.send_request(5).await.unwrap();

    assert!(!connections.discovered().contains(5));
    assert!(connections.discovered().contains(6));
    assert_eq!(connections.connection_state(5), ConnectionState::Requested);
    assert_eq!(
        backend.requests_to("POST", "/connections")[0].body,
        Some(json!({ "user_id": 5 }))
    );
}

#[tokio::test]
async fn test_stale_discover_never_relists_requested_user() {
    let backend = MockBackend::start().await;
    // The backend keeps serving user 5 after the request was sent.
    backend.on(
        "GET",
        "/users",
        200,
        json!({ "users": [user_json(5, "Ana"), user_json(6, "Bo")], "total_pages": 1 }),
    );
    backend.on("POST", "/connections", 201, json!({}));
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();

    connections.send_request(5).await.unwrap();
    let page = connections.discover("", 1).await.unwrap();

    assert!(!page.contains(5));
    assert!(page.contains(6));
    assert!(connections.is_excluded(5));
}

#[tokio::test]
async fn test_failed_send_leaves_state_unchanged() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/users",
        200,
        json!({ "users": [user_json(5, "Ana")], "total_pages": 1 }),
    );
    backend.on("POST", "/connections", 400, json!({ "error": "Cannot connect with yourself" }));
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();
    connections.discover("", 1).await.unwrap();

    let err = connections.send_request(5).await.unwrap_err();

    assert_eq!(err.user_message(), "Cannot connect with yourself");
    assert!(connections.discovered().contains(5));
    assert_eq!(connections.connection_state(5), ConnectionState::Unconnected);
    // No retry on non-auth failures.
    assert_eq!(backend.requests_to("POST", "/connections").len(), 1);
}

#[tokio::test]
async fn test_second_send_to_same_user_fails_locally() {
    let backend = MockBackend::start().await;
    backend.on("POST", "/connections", 201, json!({}));
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();

    connections.send_request(5).await.unwrap();
    let err = connections.send_request(5).await.unwrap_err();

    assert!(matches!(err, ConnectionError::AlreadyRequested(5)));
    assert_eq!(backend.requests_to("POST", "/connections").len(), 1);
}

#[tokio::test]
async fn test_respond_is_applied_once() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/connections/pending",
        200,
        json!([pending_json(9, "Ana"), pending_json(10, "Bo")]),
    );
    backend.on("PATCH", "/connections/9", 200, json!({}));
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();
    connections.load_pending().await.unwrap();

    let next = connections.respond(9, Decision::Connected).await.unwrap();
    assert_eq!(next, ConnectionState::Connected);
    assert!(connections.pending().iter().all(|r| r.id != 9));
    assert_eq!(connections.pending().len(), 1);

    let err = connections
        .respond(9, Decision::Connected)
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectionError::NotPending(9)));

    // A rejection after acceptance is refused the same way.
    let err = connections.respond(9, Decision::Rejected).await.unwrap_err();
    assert!(matches!(err, ConnectionError::NotPending(9)));

    assert_eq!(backend.requests_to("PATCH", "/connections/9").len(), 1);
}

#[tokio::test]
async fn test_answered_request_stays_hidden_on_reload() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/connections/pending",
        200,
        json!([pending_json(9, "Ana"), pending_json(10, "Bo")]),
    );
    backend.on("PATCH", "/connections/9", 200, json!({}));
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();

    connections.load_pending().await.unwrap();
    connections.respond(9, Decision::Rejected).await.unwrap();
    let pending = connections.load_pending().await.unwrap();

    assert_eq!(pending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![10]);
}

#[tokio::test]
async fn test_failed_respond_keeps_request_pending() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/connections/pending",
        200,
        json!([pending_json(9, "Ana")]),
    );
    backend.on("PATCH", "/connections/9", 500, json!({ "error": "Database unavailable" }));
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();
    connections.load_pending().await.unwrap();

    let err = connections.respond(9, Decision::Connected).await.unwrap_err();

    assert_eq!(err.user_message(), "Database unavailable");
    assert_eq!(connections.pending().len(), 1);
}

#[tokio::test]
async fn test_auth_failure_refreshes_and_retries_once() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/connections/pending", 401, json!({ "msg": "Token has expired" }));
    backend.on(
        "GET",
        "/connections/pending",
        200,
        json!([pending_json(9, "Ana")]),
    );
    backend.on("POST", "/refresh", 200, json!({ "access_token": "T2" }));
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();

    let pending = connections.load_pending().await.unwrap();
    assert_eq!(pending.len(), 1);

    let calls = backend.requests_to("GET", "/connections/pending");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer T1"));
    assert_eq!(calls[1].authorization.as_deref(), Some("Bearer T2"));
    assert_eq!(state.session.access_token().as_deref(), Some("T2"));
}

#[tokio::test]
async fn test_failed_refresh_clears_session() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/favorites", 401, json!({ "msg": "Token has expired" }));
    backend.on("POST", "/refresh", 401, json!({ "msg": "Token has been revoked" }));
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();

    let err = connections.load_favorites().await.unwrap_err();

    assert!(matches!(err, ConnectionError::Api(ref e) if e.is_auth_failure()));
    assert!(!state.session.is_authenticated());
    assert_eq!(backend.requests_to("GET", "/favorites").len(), 1);
}

#[tokio::test]
async fn test_closed_view_drops_response() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/users",
        200,
        json!({ "users": [user_json(5, "Ana")], "total_pages": 1 }),
    );
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();

    connections.view_handle().teardown();
    let err = connections.discover("", 1).await.unwrap_err();

    assert!(matches!(err, ConnectionError::Detached));
    assert!(connections.discovered().users.is_empty());
}

fn favorite_json(id: u64, name: &str, favorite_id: u64) -> serde_json::Value {
    let mut user = user_json(id, name);
    user["favorite_id"] = json!(favorite_id);
    user
}

#[tokio::test]
async fn test_favorites_overlay() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/favorites",
        200,
        json!([favorite_json(5, "Ana", 50), favorite_json(6, "Bo", 60)]),
    );
    backend.on("GET", "/profile", 200, user_json(1, "Me"));
    backend.on(
        "POST",
        "/favorite-connects/1/add",
        201,
        json!({ "message": "Favorite connection added successfully" }),
    );
    backend.on(
        "DELETE",
        "/favorite-connects/50/delete",
        200,
        json!({ "message": "Favorite connect removed successfully" }),
    );
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();

    connections.load_favorites().await.unwrap();
    assert!(connections.is_favorite(5));
    assert!(!connections.is_favorite(7));

    connections.add_favorite(7).await.unwrap();
    assert!(connections.is_favorite(7));
    let add = &backend.requests_to("POST", "/favorite-connects/1/add")[0];
    assert_eq!(add.body, Some(json!({ "favorite_user_id": 7 })));
    assert_eq!(add.authorization.as_deref(), Some("Bearer T1"));

    // The viewer id is fetched once and reused.
    connections.add_favorite(8).await.unwrap();
    assert_eq!(backend.requests_to("GET", "/profile").len(), 1);

    // Removal addresses the favorite record, not the member.
    connections.remove_favorite(5).await.unwrap();
    assert!(!connections.is_favorite(5));
    assert_eq!(
        backend.requests_to("DELETE", "/favorite-connects/50/delete").len(),
        1
    );
    assert_eq!(
        connections.favorites().iter().map(|u| u.id).collect::<Vec<_>>(),
        vec![6]
    );

    // Favoriting does not touch the connection state machine.
    assert_eq!(connections.connection_state(7), ConnectionState::Unconnected);
}

#[tokio::test]
async fn test_remove_unknown_favorite_reloads_then_fails() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/favorites", 200, json!([favorite_json(6, "Bo", 60)]));
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let mut connections = state.connections();

    let err = connections.remove_favorite(9).await.unwrap_err();

    assert!(matches!(err, ConnectionError::NotFavorite(9)));
    assert_eq!(backend.requests_to("GET", "/favorites").len(), 1);
    assert!(backend.requests().iter().all(|r| r.method != "DELETE"));
}

#[tokio::test]
async fn test_rejected_token_without_refresh_token_ends_session() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/favorites", 401, json!({ "msg": "Token has expired" }));
    let state = test_state(&backend);
    state.session.set_access_token("T1").unwrap();
    let mut connections = state.connections();

    let err = connections.load_favorites().await.unwrap_err();

    assert!(matches!(err, ConnectionError::Api(ref e) if e.is_auth_failure()));
    assert!(!state.session.is_authenticated());
    assert!(backend.requests_to("POST", "/refresh").is_empty());
}

#[tokio::test]
async fn test_notifications_pass_through() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/notifications",
        200,
        json!([{ "message": "Ana accepted your request", "timestamp": "2026-03-01T10:00:00Z" }]),
    );
    let state = test_state(&backend);
    state.session.set_tokens("T1", "R1").unwrap();
    let connections = state.connections();

    let items = connections.load_notifications().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].message, "Ana accepted your request");
}
