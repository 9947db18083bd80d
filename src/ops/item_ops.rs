use std::str::FromStr;

use crate::model::item::Item;
use crate::ops::subtask_tree;

/// Error type for item collection operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("duplicate item id: {0}")]
    DuplicateId(String),
    #[error("index {index} out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown filter: {0} (expected none, completed or in_progress)")]
    UnknownFilter(String),
}

// ---------------------------------------------------------------------------
// Ordered collection
// ---------------------------------------------------------------------------

/// Append to the end. The id must not already be present.
pub fn append(items: &[Item], item: Item) -> Result<Vec<Item>, CollectionError> {
    if items.iter().any(|i| i.id == item.id) {
        return Err(CollectionError::DuplicateId(item.id));
    }
    let mut out = items.to_vec();
    out.push(item);
    Ok(out)
}

/// Replace the item matching `id`; unknown ids leave the items unchanged.
pub fn update_by_id(items: &[Item], id: &str, item: Item) -> Vec<Item> {
    items
        .iter()
        .map(|i| if i.id == id { item.clone() } else { i.clone() })
        .collect()
}

/// Remove the item matching `id`, preserving the order of the rest.
pub fn remove_by_id(items: &[Item], id: &str) -> Vec<Item> {
    items.iter().filter(|i| i.id != id).cloned().collect()
}

/// Relocate the item at `from` to `to`, shifting the items in between by one.
pub fn move_item(items: &[Item], from: usize, to: usize) -> Result<Vec<Item>, CollectionError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(CollectionError::IndexOutOfRange { index, len });
        }
    }
    let mut out = items.to_vec();
    let item = out.remove(from);
    out.insert(to, item);
    Ok(out)
}

pub fn position(items: &[Item], id: &str) -> Option<usize> {
    items.iter().position(|i| i.id == id)
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Status filter applied to the item list in the detail view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemFilter {
    #[default]
    None,
    Completed,
    InProgress,
}

impl ItemFilter {
    pub fn matches(self, item: &Item) -> bool {
        match self {
            ItemFilter::None => true,
            ItemFilter::Completed => item.done,
            ItemFilter::InProgress => !item.done,
        }
    }

    /// Drag-reorder only maps back to canonical order when nothing is hidden.
    pub fn allows_reorder(self) -> bool {
        self == ItemFilter::None
    }
}

impl FromStr for ItemFilter {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(ItemFilter::None),
            "completed" => Ok(ItemFilter::Completed),
            "in_progress" => Ok(ItemFilter::InProgress),
            other => Err(CollectionError::UnknownFilter(other.to_string())),
        }
    }
}

impl std::fmt::Display for ItemFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemFilter::None => write!(f, "none"),
            ItemFilter::Completed => write!(f, "completed"),
            ItemFilter::InProgress => write!(f, "in_progress"),
        }
    }
}

/// Borrowed, read-only view in canonical relative order.
pub fn filtered_view(items: &[Item], filter: ItemFilter) -> Vec<&Item> {
    items.iter().filter(|i| filter.matches(i)).collect()
}

/// Sum of item costs; absent or non-numeric costs count as zero.
pub fn total_cost(items: &[Item]) -> f64 {
    items.iter().map(Item::effective_cost).sum()
}

/// Completion figures for the list header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Completion {
    pub items_done: usize,
    pub items_total: usize,
    pub subtasks_done: usize,
    pub subtasks_total: usize,
}

impl Completion {
    /// Share of done items, 0.0 for an empty list
    pub fn ratio(&self) -> f64 {
        if self.items_total == 0 {
            0.0
        } else {
            self.items_done as f64 / self.items_total as f64
        }
    }
}

pub fn completion(items: &[Item]) -> Completion {
    let mut c = Completion::default();
    for item in items {
        c.items_total += 1;
        if item.done {
            c.items_done += 1;
        }
        let (done, total) = subtask_tree::completion(&item.subtasks);
        c.subtasks_done += done;
        c.subtasks_total += total;
    }
    c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::subtask::Subtask;
    use pretty_assertions::assert_eq;

    fn item(id: &str, done: bool, cost: Option<f64>) -> Item {
        let mut i = Item::new(id, format!("Item {}", id));
        i.done = done;
        i.cost = cost;
        i
    }

    fn sample() -> Vec<Item> {
        vec![
            item("a", false, Some(10.0)),
            item("b", true, Some(20.0)),
            item("c", false, None),
            item("d", true, Some(2.5)),
        ]
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn append_goes_to_end() {
        let out = append(&sample(), item("e", false, None)).unwrap();
        assert_eq!(ids(&out), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn append_rejects_duplicate_id() {
        let err = append(&sample(), item("b", false, None)).unwrap_err();
        assert_eq!(err, CollectionError::DuplicateId("b".into()));
    }

    #[test]
    fn update_by_id_replaces_only_match() {
        let items = sample();
        let mut changed = items[2].clone();
        changed.title = "Renamed".into();
        let out = update_by_id(&items, "c", changed);
        assert_eq!(out[2].title, "Renamed");
        assert_eq!(out[0], items[0]);
        assert_eq!(update_by_id(&items, "zz", item("zz", false, None)), items);
    }

    #[test]
    fn remove_by_id_preserves_order() {
        let out = remove_by_id(&sample(), "b");
        assert_eq!(ids(&out), vec!["a", "c", "d"]);
        assert_eq!(remove_by_id(&sample(), "zz"), sample());
    }

    #[test]
    fn move_forward_and_back() {
        let items = sample();
        let out = move_item(&items, 0, 2).unwrap();
        assert_eq!(ids(&out), vec!["b", "c", "a", "d"]);
        let out = move_item(&items, 3, 1).unwrap();
        assert_eq!(ids(&out), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn move_round_trip_restores_order() {
        let items = sample();
        for i in 0..items.len() {
            for j in 0..items.len() {
                if i == j {
                    continue;
                }
                let there = move_item(&items, i, j).unwrap();
                let back = move_item(&there, j, i).unwrap();
                assert_eq!(back, items, "round trip {} -> {}", i, j);
            }
        }
    }

    #[test]
    fn move_out_of_range_fails_fast() {
        assert_eq!(
            move_item(&sample(), 0, 4),
            Err(CollectionError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert!(move_item(&[], 0, 0).is_err());
    }

    #[test]
    fn filters_partition_items() {
        let items = sample();
        let done = filtered_view(&items, ItemFilter::Completed);
        let open = filtered_view(&items, ItemFilter::InProgress);
        assert_eq!(done.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["b", "d"]);
        assert_eq!(open.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(done.len() + open.len(), items.len());
        for i in &items {
            let in_done = done.iter().any(|d| d.id == i.id);
            let in_open = open.iter().any(|o| o.id == i.id);
            assert!(in_done ^ in_open);
        }
        assert_eq!(filtered_view(&items, ItemFilter::None).len(), 4);
    }

    #[test]
    fn only_unfiltered_view_allows_reorder() {
        assert!(ItemFilter::None.allows_reorder());
        assert!(!ItemFilter::Completed.allows_reorder());
        assert!(!ItemFilter::InProgress.allows_reorder());
    }

    #[test]
    fn filter_parses_tags() {
        assert_eq!("none".parse::<ItemFilter>().unwrap(), ItemFilter::None);
        assert_eq!("completed".parse::<ItemFilter>().unwrap(), ItemFilter::Completed);
        assert_eq!("in_progress".parse::<ItemFilter>().unwrap(), ItemFilter::InProgress);
        assert!("done".parse::<ItemFilter>().is_err());
    }

    #[test]
    fn total_cost_examples() {
        assert_eq!(
            total_cost(&[item("a", false, Some(10.0)), item("b", false, Some(20.0))]),
            30.0
        );
        assert_eq!(total_cost(&[]), 0.0);
        assert_eq!(total_cost(&[item("a", false, None)]), 0.0);
        assert_eq!(total_cost(&[item("a", false, Some(f64::NAN))]), 0.0);
        assert_eq!(total_cost(&sample()), 32.5);
    }

    #[test]
    fn completion_includes_subtasks() {
        let mut items = sample();
        let mut sub = Subtask::with_id("s1", "one");
        sub.done = true;
        items[0].subtasks = vec![sub.child(Subtask::with_id("s2", "two"))];
        let c = completion(&items);
        assert_eq!(c.items_done, 2);
        assert_eq!(c.items_total, 4);
        assert_eq!(c.subtasks_done, 1);
        assert_eq!(c.subtasks_total, 2);
        assert_eq!(c.ratio(), 0.5);
        assert_eq!(completion(&[]).ratio(), 0.0);
    }
}
