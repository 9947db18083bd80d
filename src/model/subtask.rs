use serde::{Deserialize, Serialize};

/// A node in an item's subtask tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Unique across the whole tree of the owning item
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    /// Advisory only, never enforced
    #[serde(default)]
    pub required: bool,
    /// Children (recursive, unbounded depth)
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Subtask {
    /// A fresh, not-done, optional subtask with a newly generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Subtask::with_id(uuid::Uuid::new_v4().to_string(), title)
    }

    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Subtask {
            id: id.into(),
            title: title.into(),
            done: false,
            required: false,
            subtasks: Vec::new(),
        }
    }

    /// Builder-style helper, mostly for fixtures
    pub fn child(mut self, sub: Subtask) -> Self {
        self.subtasks.push(sub);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_distinct_ids() {
        let a = Subtask::new("a");
        let b = Subtask::new("b");
        assert_ne!(a.id, b.id);
        assert!(!a.done);
        assert!(!a.required);
        assert!(a.subtasks.is_empty());
    }

    #[test]
    fn deserialize_without_optional_fields() {
        // Nested subtasks in stored lists often omit `subtasks` and `done`
        let sub: Subtask = serde_json::from_str(r#"{"id":"1","title":"Buy milk"}"#).unwrap();
        assert_eq!(sub.id, "1");
        assert!(!sub.done);
        assert!(sub.subtasks.is_empty());
    }
}
