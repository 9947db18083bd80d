//! Contracts of the collaborators the edit session talks to.
//!
//! Nothing here knows about HTTP or sockets. Implementations live elsewhere:
//! [`memory`] for tests and [`crate::io::store::JsonStore`] for the offline
//! CLI.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::model::list::TodoList;

/// Failure reported by a Transport or RealtimeChannel
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("request rejected: {reason}")]
    Rejected { reason: String },
    #[error("list not found: {0}")]
    NotFound(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// CRUD and persistence calls for lists.
///
/// Every returned `TodoList` is the canonical copy and becomes the session's
/// new baseline.
pub trait Transport {
    fn fetch_list(&self, list_id: &str) -> Result<TodoList, RemoteError>;
    fn persist_list(&self, list: &TodoList) -> Result<TodoList, RemoteError>;
    fn delete_list(&self, list_id: &str) -> Result<(), RemoteError>;
    /// Fails with [`RemoteError::Rejected`] carrying a readable reason when
    /// the recipient cannot be added.
    fn share_list(&self, list_id: &str, email: &str) -> Result<TodoList, RemoteError>;
    fn create_list(&self, owner_id: &str, title: &str) -> Result<TodoList, RemoteError>;
    fn set_frozen(&self, list_id: &str, frozen: bool) -> Result<TodoList, RemoteError>;
    /// Lists owned by or shared with the user
    fn user_lists(&self, user_id: &str) -> Result<Vec<TodoList>, RemoteError>;
}

/// Out-of-band events pushed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ChannelEvent {
    /// Always a full authoritative snapshot, never a diff
    ListUpdated(TodoList),
}

/// Push channel handle, injected into each session.
pub trait RealtimeChannel {
    /// Subscribe to updates for lists visible to `user_id`
    fn join(&mut self, user_id: &str);
    /// Next pending event, if any. Never blocks.
    fn poll(&mut self) -> Option<ChannelEvent>;
}

/// Identity of the signed-in user
pub trait AuthSession {
    fn user_id(&self) -> &str;
    fn access_token(&self) -> &str;
}

/// Fixed credentials, e.g. from config or a completed login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAuth {
    pub user_id: String,
    pub access_token: String,
}

impl StaticAuth {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        StaticAuth {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }
}

impl AuthSession for StaticAuth {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }
}

/// A channel that never delivers anything
#[derive(Debug, Default)]
pub struct NullChannel;

impl RealtimeChannel for NullChannel {
    fn join(&mut self, _user_id: &str) {}

    fn poll(&mut self) -> Option<ChannelEvent> {
        None
    }
}
