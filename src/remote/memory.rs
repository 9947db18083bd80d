//! In-process collaborators sharing state through `Rc<RefCell<_>>`.
//!
//! Cloning a handle shares the underlying state, so a test can keep one
//! handle while the session owns another.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use chrono::Utc;

use super::{ChannelEvent, RealtimeChannel, RemoteError, Transport};
use crate::model::list::TodoList;

#[derive(Debug, Default)]
struct Backend {
    lists: HashMap<String, TodoList>,
    /// Insertion order of list ids
    order: Vec<String>,
    fail_next: Option<RemoteError>,
    calls: Vec<String>,
    next_id: usize,
}

/// Transport backed by a HashMap
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    inner: Rc<RefCell<Backend>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a list as if it already existed on the server
    pub fn insert(&self, list: TodoList) {
        let mut backend = self.inner.borrow_mut();
        if !backend.lists.contains_key(&list.id) {
            backend.order.push(list.id.clone());
        }
        backend.lists.insert(list.id.clone(), list);
    }

    pub fn get(&self, list_id: &str) -> Option<TodoList> {
        self.inner.borrow().lists.get(list_id).cloned()
    }

    /// Make the next call fail with `err`
    pub fn fail_next(&self, err: RemoteError) {
        self.inner.borrow_mut().fail_next = Some(err);
    }

    /// Names of the calls made so far, e.g. `["persist_list", "share_list"]`
    pub fn calls(&self) -> Vec<String> {
        self.inner.borrow().calls.clone()
    }

    fn enter(&self, call: &str) -> Result<std::cell::RefMut<'_, Backend>, RemoteError> {
        let mut backend = self.inner.borrow_mut();
        backend.calls.push(call.to_string());
        let failure = backend.fail_next.take();
        match failure {
            Some(err) => Err(err),
            None => Ok(backend),
        }
    }
}

impl Transport for MemoryTransport {
    fn fetch_list(&self, list_id: &str) -> Result<TodoList, RemoteError> {
        let backend = self.enter("fetch_list")?;
        backend
            .lists
            .get(list_id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(list_id.to_string()))
    }

    fn persist_list(&self, list: &TodoList) -> Result<TodoList, RemoteError> {
        let mut backend = self.enter("persist_list")?;
        let existing = backend
            .lists
            .get(&list.id)
            .ok_or_else(|| RemoteError::NotFound(list.id.clone()))?;
        let mut saved = list.clone();
        saved.created_at = existing.created_at;
        saved.updated_at = Some(Utc::now());
        backend.lists.insert(saved.id.clone(), saved.clone());
        Ok(saved)
    }

    fn delete_list(&self, list_id: &str) -> Result<(), RemoteError> {
        let mut backend = self.enter("delete_list")?;
        if backend.lists.remove(list_id).is_none() {
            return Err(RemoteError::NotFound(list_id.to_string()));
        }
        backend.order.retain(|id| id != list_id);
        Ok(())
    }

    fn share_list(&self, list_id: &str, email: &str) -> Result<TodoList, RemoteError> {
        let mut backend = self.enter("share_list")?;
        let list = backend
            .lists
            .get_mut(list_id)
            .ok_or_else(|| RemoteError::NotFound(list_id.to_string()))?;
        if list.shared_with.contains(email) {
            return Err(RemoteError::Rejected {
                reason: format!("list is already shared with {}", email),
            });
        }
        list.shared_with.insert(email.to_string());
        list.updated_at = Some(Utc::now());
        Ok(list.clone())
    }

    fn create_list(&self, owner_id: &str, title: &str) -> Result<TodoList, RemoteError> {
        let mut backend = self.enter("create_list")?;
        backend.next_id += 1;
        let mut list = TodoList::new(format!("list-{}", backend.next_id), owner_id, title);
        let now = Utc::now();
        list.created_at = Some(now);
        list.updated_at = Some(now);
        backend.order.push(list.id.clone());
        backend.lists.insert(list.id.clone(), list.clone());
        Ok(list)
    }

    fn set_frozen(&self, list_id: &str, frozen: bool) -> Result<TodoList, RemoteError> {
        let mut backend = self.enter("set_frozen")?;
        let list = backend
            .lists
            .get_mut(list_id)
            .ok_or_else(|| RemoteError::NotFound(list_id.to_string()))?;
        list.frozen = frozen;
        list.updated_at = Some(Utc::now());
        Ok(list.clone())
    }

    fn user_lists(&self, user_id: &str) -> Result<Vec<TodoList>, RemoteError> {
        let backend = self.enter("user_lists")?;
        Ok(backend
            .order
            .iter()
            .filter_map(|id| backend.lists.get(id))
            .filter(|l| l.owner_id == user_id || l.shared_with.contains(user_id))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
struct Queue {
    events: VecDeque<ChannelEvent>,
    joined: Vec<String>,
}

/// Push channel fed by hand
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    inner: Rc<RefCell<Queue>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next `poll`
    pub fn push(&self, event: ChannelEvent) {
        self.inner.borrow_mut().events.push_back(event);
    }

    pub fn joined(&self) -> Vec<String> {
        self.inner.borrow().joined.clone()
    }
}

impl RealtimeChannel for MemoryChannel {
    fn join(&mut self, user_id: &str) {
        self.inner.borrow_mut().joined.push(user_id.to_string());
    }

    fn poll(&mut self) -> Option<ChannelEvent> {
        self.inner.borrow_mut().events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_fetch() {
        let transport = MemoryTransport::new();
        let created = transport.create_list("u1", "Groceries").unwrap();
        let fetched = transport.fetch_list(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(transport.calls(), vec!["create_list", "fetch_list"]);
    }

    #[test]
    fn fail_next_applies_once() {
        let transport = MemoryTransport::new();
        transport.fail_next(RemoteError::Network("offline".into()));
        assert!(transport.create_list("u1", "x").is_err());
        assert!(transport.create_list("u1", "x").is_ok());
    }

    #[test]
    fn share_rejects_repeat_recipient() {
        let transport = MemoryTransport::new();
        let list = transport.create_list("u1", "Trip").unwrap();
        transport.share_list(&list.id, "a@b.co").unwrap();
        let err = transport.share_list(&list.id, "a@b.co").unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { .. }));
    }

    #[test]
    fn user_lists_include_shared() {
        let transport = MemoryTransport::new();
        let mine = transport.create_list("u1", "Mine").unwrap();
        let theirs = transport.create_list("u2", "Theirs").unwrap();
        transport.share_list(&theirs.id, "u1").unwrap();
        transport.create_list("u3", "Other").unwrap();

        let lists = transport.user_lists("u1").unwrap();
        let ids: Vec<&str> = lists.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec![mine.id.as_str(), theirs.id.as_str()]);
    }

    #[test]
    fn channel_is_fifo() {
        let handle = MemoryChannel::new();
        let mut channel = handle.clone();
        channel.join("u1");
        handle.push(ChannelEvent::ListUpdated(TodoList::new("a", "u1", "A")));
        handle.push(ChannelEvent::ListUpdated(TodoList::new("b", "u1", "B")));
        assert_eq!(handle.joined(), vec!["u1"]);
        assert!(matches!(channel.poll(), Some(ChannelEvent::ListUpdated(l)) if l.id == "a"));
        assert!(matches!(channel.poll(), Some(ChannelEvent::ListUpdated(l)) if l.id == "b"));
        assert!(channel.poll().is_none());
    }
}
