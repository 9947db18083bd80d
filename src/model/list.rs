use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::item::Item;

/// A shared to-do list as exchanged with the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub owner_id: String,
    /// User identifiers (emails) this list is shared with, in share order
    #[serde(default)]
    pub shared_with: IndexSet<String>,
    /// Blocks all item and title edits, including the owner's
    #[serde(default)]
    pub frozen: bool,
    /// List-level done flag, independent of item completion
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Server-owned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Server-owned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TodoList {
    /// A new, empty, unshared list
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        TodoList {
            id: id.into(),
            title: title.into(),
            owner_id: owner_id.into(),
            shared_with: IndexSet::new(),
            frozen: false,
            completed: false,
            items: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// True when item/title edits must be refused
    pub fn is_locked(&self) -> bool {
        self.frozen || self.completed
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}
