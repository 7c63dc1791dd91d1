// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Connection lifecycle: discover → request → pending → connected/rejected,
//! plus the favorites overlay.
//!
//! The manager owns the lists a view fetched and drops them with the view.
//! Local state changes only after the backend confirms an action. Members the
//! viewer has already asked to connect are remembered in an exclusion set and
//! filtered out of every later discover page, because the backend may keep
//! serving them for a while. Expired sessions are handled by the gateway.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{
    ConnectionState, Decision, DiscoverPage, Favorite, Notification, PendingRequest, User,
};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Request {0} is not pending")]
    NotPending(u64),

    #[error("A connection request to user {0} was already sent")]
    AlreadyRequested(u64),

    #[error("User {0} is not in your favorites")]
    NotFavorite(u64),

    #[error("View closed before the response arrived")]
    Detached,
}

impl ConnectionError {
    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            ConnectionError::Api(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Mount flag shared between a view and its manager.
///
/// Once torn down, responses still in flight are dropped instead of being
/// written into the discarded view's lists.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    mounted: Arc<AtomicBool>,
}

impl ViewHandle {
    fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn teardown(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

/// Drives connection state transitions for one viewer.
pub struct ConnectionManager {
    api: ApiClient,
    handle: ViewHandle,
    search: String,
    page: u32,
    discovered: DiscoverPage,
    /// Outgoing requests by candidate id; every key is excluded from discovery.
    outgoing: HashMap<u64, ConnectionState>,
    pending: Vec<PendingRequest>,
    /// Incoming requests by request id.
    incoming: HashMap<u64, ConnectionState>,
    favorites: Vec<User>,
    favorite_ids: HashSet<u64>,
    /// Favorite record id by member id, needed to remove a favorite.
    favorite_records: HashMap<u64, u64>,
    /// Signed-in member, fetched on first use.
    viewer_id: Option<u64>,
}

impl ConnectionManager {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            handle: ViewHandle::new(),
            search: String::new(),
            page: 1,
            discovered: DiscoverPage::default(),
            outgoing: HashMap::new(),
            pending: Vec::new(),
            incoming: HashMap::new(),
            favorites: Vec::new(),
            favorite_ids: HashSet::new(),
            favorite_records: HashMap::new(),
            viewer_id: None,
        }
    }

    /// Handle the owning view uses to signal teardown.
    pub fn view_handle(&self) -> ViewHandle {
        self.handle.clone()
    }

    // ─── Discovery ───────────────────────────────────────────────────────────

    /// Fetch a page of candidates, minus everyone already requested.
    pub async fn discover(
        &mut self,
        search: &str,
        page: u32,
    ) -> Result<&DiscoverPage, ConnectionError> {
        let query = search.to_string();
        let mut result = self
            .call(|api| {
                let query = query.clone();
                async move { api.discover_users(&query, page).await }
            })
            .await?;

        let served = result.users.len();
        result.users.retain(|u| !self.outgoing.contains_key(&u.id));
        tracing::debug!(
            search = %search,
            page,
            served,
            shown = result.users.len(),
            total_pages = result.total_pages,
            "Discover page loaded"
        );

        self.search = query;
        self.page = page;
        self.discovered = result;
        Ok(&self.discovered)
    }

    /// Ask `user_id` to connect. On success the member leaves the discover
    /// list and stays excluded from later pages.
    pub async fn send_request(&mut self, user_id: u64) -> Result<(), ConnectionError> {
        let next = self
            .connection_state(user_id)
            .request()
            .ok_or(ConnectionError::AlreadyRequested(user_id))?;

        self.call(|api| async move { api.send_connection_request(user_id).await })
            .await?;

        self.outgoing.insert(user_id, next);
        self.discovered.users.retain(|u| u.id != user_id);
        tracing::info!(user_id, "Connection request sent");
        Ok(())
    }

    pub fn connection_state(&self, user_id: u64) -> ConnectionState {
        self.outgoing.get(&user_id).copied().unwrap_or_default()
    }

    pub fn is_excluded(&self, user_id: u64) -> bool {
        self.outgoing.contains_key(&user_id)
    }

    pub fn discovered(&self) -> &DiscoverPage {
        &self.discovered
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    // ─── Incoming requests ───────────────────────────────────────────────────

    /// Fetch incoming requests. Requests already answered here stay hidden
    /// even if the backend still lists them.
    pub async fn load_pending(&mut self) -> Result<&[PendingRequest], ConnectionError> {
        let mut requests = self
            .call(|api| async move { api.list_pending_requests().await })
            .await?;

        requests.retain(|r| {
            self.incoming
                .get(&r.id)
                .map_or(true, |state| *state == ConnectionState::Requested)
        });
        for request in &requests {
            self.incoming.insert(request.id, ConnectionState::Requested);
        }

        tracing::debug!(count = requests.len(), "Pending requests loaded");
        self.pending = requests;
        Ok(&self.pending)
    }

    /// Answer a pending request. Answering the same request twice fails with
    /// `NotPending` without contacting the backend.
    pub async fn respond(
        &mut self,
        request_id: u64,
        decision: Decision,
    ) -> Result<ConnectionState, ConnectionError> {
        let next = self
            .incoming
            .get(&request_id)
            .and_then(|state| state.answer(decision))
            .ok_or(ConnectionError::NotPending(request_id))?;

        self.call(|api| async move { api.respond_to_request(request_id, decision).await })
            .await?;

        self.incoming.insert(request_id, next);
        self.pending.retain(|r| r.id != request_id);
        tracing::info!(request_id, decision = %decision, "Connection request answered");
        Ok(next)
    }

    pub fn pending(&self) -> &[PendingRequest] {
        &self.pending
    }

    // ─── Favorites ───────────────────────────────────────────────────────────

    pub async fn load_favorites(&mut self) -> Result<&[User], ConnectionError> {
        let favorites: Vec<Favorite> = self
            .call(|api| async move { api.list_favorites().await })
            .await?;

        self.favorite_records = favorites
            .iter()
            .filter_map(|f| f.favorite_id.map(|record| (f.user.id, record)))
            .collect();
        self.favorites = favorites.into_iter().map(|f| f.user).collect();
        self.favorite_ids = self.favorites.iter().map(|u| u.id).collect();
        Ok(&self.favorites)
    }

    pub async fn add_favorite(&mut self, user_id: u64) -> Result<(), ConnectionError> {
        let owner_id = self.viewer_id().await?;
        self.call(|api| async move { api.add_favorite(owner_id, user_id).await })
            .await?;
        self.favorite_ids.insert(user_id);
        tracing::info!(user_id, "Favorite added");
        Ok(())
    }

    /// Remove `user_id` from favorites. The backend deletes by favorite
    /// record, so the list is reloaded when the record id is not known yet.
    pub async fn remove_favorite(&mut self, user_id: u64) -> Result<(), ConnectionError> {
        if !self.favorite_records.contains_key(&user_id) {
            self.load_favorites().await?;
        }
        let record = *self
            .favorite_records
            .get(&user_id)
            .ok_or(ConnectionError::NotFavorite(user_id))?;

        self.call(|api| async move { api.remove_favorite(record).await })
            .await?;
        self.favorite_ids.remove(&user_id);
        self.favorite_records.remove(&user_id);
        self.favorites.retain(|u| u.id != user_id);
        tracing::info!(user_id, record, "Favorite removed");
        Ok(())
    }

    pub fn is_favorite(&self, user_id: u64) -> bool {
        self.favorite_ids.contains(&user_id)
    }

    pub fn favorites(&self) -> &[User] {
        &self.favorites
    }

    // ─── Notifications ───────────────────────────────────────────────────────

    pub async fn load_notifications(&self) -> Result<Vec<Notification>, ConnectionError> {
        self.call(|api| async move { api.list_notifications().await })
            .await
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    async fn viewer_id(&mut self) -> Result<u64, ConnectionError> {
        if let Some(id) = self.viewer_id {
            return Ok(id);
        }
        let profile = self
            .call(|api| async move { api.fetch_profile().await })
            .await?;
        self.viewer_id = Some(profile.id);
        Ok(profile.id)
    }

    /// Run a gateway call, dropping the result if the view closed meanwhile.
    async fn call<T, F, Fut>(&self, op: F) -> Result<T, ConnectionError>
    where
        F: FnOnce(ApiClient) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let result = op(self.api.clone()).await;

        if !self.handle.is_mounted() {
            tracing::debug!("Dropping response for a closed view");
            return Err(ConnectionError::Detached);
        }

        Ok(result?)
    }
}
