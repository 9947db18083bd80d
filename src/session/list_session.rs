use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::config::SessionConfig;
use crate::model::item::{CustomField, Item};
use crate::model::list::TodoList;
use crate::model::subtask::Subtask;
use crate::ops::item_ops::{self, CollectionError, Completion, ItemFilter};
use crate::ops::share::ValidationError;
use crate::ops::subtask_tree::{self, TreeError};
use crate::remote::{AuthSession, RealtimeChannel, RemoteError, Transport};

/// Error type for edit session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("reordering is disabled while the {0} filter is active")]
    ReorderDisabled(ItemFilter),
    #[error("edit session is closed")]
    Closed,
}

/// What a mutating call did to the working copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Applied,
    /// Nothing changed (unknown id, or the value was already set)
    Unchanged,
    /// Refused because the list is frozen or completed
    Locked,
}

/// Owns the working copy of one list while its detail view is open.
///
/// All edits go through here. The session is Clean while the working copy
/// equals the canonical baseline and Dirty otherwise; [`save`] brings it back
/// to Clean and a push replacement overwrites both copies.
///
/// [`save`]: ListEditSession::save
pub struct ListEditSession {
    pub(super) working: TodoList,
    pub(super) baseline: TodoList,
    /// Bumped by push replacements and close; stale save tickets compare against it
    pub(super) epoch: u64,
    pub(super) closed: bool,
    pub(super) transport: Box<dyn Transport>,
    pub(super) channel: Box<dyn RealtimeChannel>,
    filter: ItemFilter,
    config: SessionConfig,
    user_id: String,
}

impl ListEditSession {
    /// Start editing `list`, joining the push channel as the current user.
    pub fn open(
        list: TodoList,
        auth: &dyn AuthSession,
        transport: Box<dyn Transport>,
        mut channel: Box<dyn RealtimeChannel>,
        config: SessionConfig,
    ) -> Self {
        channel.join(auth.user_id());
        report_duplicate_ids(&list);
        debug!(list_id = %list.id, user_id = auth.user_id(), "opened edit session");
        ListEditSession {
            baseline: list.clone(),
            working: list,
            epoch: 0,
            closed: false,
            transport,
            channel,
            filter: ItemFilter::None,
            config,
            user_id: auth.user_id().to_string(),
        }
    }

    /// Fetch the canonical copy of `list_id` and start editing it.
    pub fn fetch(
        list_id: &str,
        auth: &dyn AuthSession,
        transport: Box<dyn Transport>,
        channel: Box<dyn RealtimeChannel>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let list = transport.fetch_list(list_id)?;
        Ok(Self::open(list, auth, transport, channel, config))
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    /// Current working copy
    pub fn list(&self) -> &TodoList {
        &self.working
    }

    /// Last saved or pushed copy
    pub fn baseline(&self) -> &TodoList {
        &self.baseline
    }

    pub fn is_dirty(&self) -> bool {
        self.working != self.baseline
    }

    pub fn is_locked(&self) -> bool {
        self.working.is_locked()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn filter(&self) -> ItemFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: ItemFilter) {
        self.filter = filter;
    }

    pub fn visible_items(&self) -> Vec<&Item> {
        item_ops::filtered_view(&self.working.items, self.filter)
    }

    /// Drag handles should only be live when this is true.
    pub fn can_reorder(&self) -> bool {
        self.filter.allows_reorder() && !self.working.is_locked()
    }

    /// Only the owner gets the freeze toggle. Not an authorization check.
    pub fn can_toggle_freeze(&self) -> bool {
        self.working.owner_id == self.user_id
    }

    pub fn total_cost(&self) -> f64 {
        item_ops::total_cost(&self.working.items)
    }

    pub fn completion(&self) -> Completion {
        item_ops::completion(&self.working.items)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    // -----------------------------------------------------------------------
    // List-level edits
    // -----------------------------------------------------------------------

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<Edit, SessionError> {
        self.check_open()?;
        if self.locked("set_title") {
            return Ok(Edit::Locked);
        }
        let mut next = self.working.clone();
        next.title = title.into();
        Ok(self.commit("set_title", next))
    }

    /// Batched like other edits, but exempt from the lock so a completed list
    /// can be reopened.
    pub fn set_completed(&mut self, completed: bool) -> Result<Edit, SessionError> {
        self.check_open()?;
        let mut next = self.working.clone();
        next.completed = completed;
        Ok(self.commit("set_completed", next))
    }

    // -----------------------------------------------------------------------
    // Item edits
    // -----------------------------------------------------------------------

    /// Append a default item; returns its id, or `None` when locked.
    pub fn add_item(&mut self) -> Result<Option<String>, SessionError> {
        self.check_open()?;
        if self.locked("add_item") {
            return Ok(None);
        }
        let item = Item::new(Uuid::new_v4().to_string(), self.config.new_item_title.clone());
        let id = item.id.clone();
        let items = item_ops::append(&self.working.items, item)?;
        self.commit_items("add_item", items);
        Ok(Some(id))
    }

    /// Replace the item `id` wholesale.
    pub fn update_item(&mut self, id: &str, item: Item) -> Result<Edit, SessionError> {
        self.change_item("update_item", id, |_, _| Ok(item))
    }

    /// Edit a copy of item `id` in place and store it back.
    pub fn edit_item(&mut self, id: &str, f: impl FnOnce(&mut Item)) -> Result<Edit, SessionError> {
        self.change_item("edit_item", id, |item, _| {
            let mut next = item.clone();
            f(&mut next);
            Ok(next)
        })
    }

    pub fn remove_item(&mut self, id: &str) -> Result<Edit, SessionError> {
        self.check_open()?;
        if self.locked("remove_item") {
            return Ok(Edit::Locked);
        }
        if item_ops::position(&self.working.items, id).is_none() {
            return self.missing_item(id);
        }
        let items = item_ops::remove_by_id(&self.working.items, id);
        Ok(self.commit_items("remove_item", items))
    }

    /// Drag-reorder in canonical order; refused while a filter hides items.
    pub fn reorder_items(&mut self, from: usize, to: usize) -> Result<Edit, SessionError> {
        self.check_open()?;
        if !self.filter.allows_reorder() {
            return Err(SessionError::ReorderDisabled(self.filter));
        }
        if self.locked("reorder_items") {
            return Ok(Edit::Locked);
        }
        let items = item_ops::move_item(&self.working.items, from, to)?;
        Ok(self.commit_items("reorder_items", items))
    }

    // -----------------------------------------------------------------------
    // Custom fields
    // -----------------------------------------------------------------------

    /// Append an empty optional field; returns its index.
    pub fn add_custom_field(&mut self, item_id: &str) -> Result<Option<usize>, SessionError> {
        let mut index = None;
        self.change_item("add_custom_field", item_id, |item, _| {
            let mut next = item.clone();
            next.custom_fields.push(CustomField::default());
            index = Some(next.custom_fields.len() - 1);
            Ok(next)
        })?;
        Ok(index)
    }

    pub fn update_custom_field(
        &mut self,
        item_id: &str,
        index: usize,
        field: CustomField,
    ) -> Result<Edit, SessionError> {
        self.change_item("update_custom_field", item_id, |item, _| {
            check_index(index, item.custom_fields.len())?;
            let mut next = item.clone();
            next.custom_fields[index] = field;
            Ok(next)
        })
    }

    pub fn remove_custom_field(
        &mut self,
        item_id: &str,
        index: usize,
    ) -> Result<Edit, SessionError> {
        self.change_item("remove_custom_field", item_id, |item, _| {
            check_index(index, item.custom_fields.len())?;
            let mut next = item.clone();
            next.custom_fields.remove(index);
            Ok(next)
        })
    }

    // -----------------------------------------------------------------------
    // Subtask tree edits
    // -----------------------------------------------------------------------

    /// Append a root subtask to item `item_id`; returns the new subtask id.
    pub fn add_subtask(&mut self, item_id: &str) -> Result<Option<String>, SessionError> {
        let node = Subtask::new(self.config.new_subtask_title.clone());
        let id = node.id.clone();
        let edit = self.change_item("add_subtask", item_id, |item, _| {
            let mut next = item.clone();
            next.subtasks = subtask_tree::push_root(&item.subtasks, node);
            Ok(next)
        })?;
        Ok((edit == Edit::Applied).then_some(id))
    }

    /// Append a child under subtask `parent_id` of item `item_id`.
    pub fn add_nested_subtask(
        &mut self,
        item_id: &str,
        parent_id: &str,
    ) -> Result<Option<String>, SessionError> {
        let node = Subtask::new(self.config.new_nested_subtask_title.clone());
        let id = node.id.clone();
        let edit = self.change_item("add_nested_subtask", item_id, |item, config| {
            let mut next = item.clone();
            next.subtasks = if config.strict {
                subtask_tree::insert_child_strict(&item.subtasks, parent_id, node)?
            } else {
                subtask_tree::insert_child(&item.subtasks, parent_id, node)
            };
            Ok(next)
        })?;
        Ok((edit == Edit::Applied).then_some(id))
    }

    /// Replace the subtask with `node.id`, children included.
    pub fn update_subtask(&mut self, item_id: &str, node: Subtask) -> Result<Edit, SessionError> {
        self.change_item("update_subtask", item_id, |item, config| {
            let subtasks = if config.strict {
                subtask_tree::update_strict(&item.subtasks, &node)?
            } else {
                subtask_tree::update(&item.subtasks, &node)
            };
            // The replacement brings its own children; they must not collide
            subtask_tree::check_replacement(&item.subtasks, &node)?;
            let mut next = item.clone();
            next.subtasks = subtasks;
            Ok(next)
        })
    }

    /// Edit a copy of one subtask. Its id is kept whatever `f` does.
    pub fn edit_subtask(
        &mut self,
        item_id: &str,
        subtask_id: &str,
        f: impl FnOnce(&mut Subtask),
    ) -> Result<Edit, SessionError> {
        self.change_item("edit_subtask", item_id, |item, config| {
            let Some(current) = subtask_tree::find(&item.subtasks, subtask_id) else {
                if config.strict {
                    return Err(TreeError::NotFound(subtask_id.to_string()).into());
                }
                return Ok(item.clone());
            };
            let mut node = current.clone();
            f(&mut node);
            node.id = subtask_id.to_string();
            subtask_tree::check_replacement(&item.subtasks, &node)?;
            let mut next = item.clone();
            next.subtasks = subtask_tree::update(&item.subtasks, &node);
            Ok(next)
        })
    }

    pub fn toggle_subtask_done(
        &mut self,
        item_id: &str,
        subtask_id: &str,
    ) -> Result<Edit, SessionError> {
        self.edit_subtask(item_id, subtask_id, |s| s.done = !s.done)
    }

    /// Remove a subtask and everything below it.
    pub fn remove_subtask(
        &mut self,
        item_id: &str,
        subtask_id: &str,
    ) -> Result<Edit, SessionError> {
        self.change_item("remove_subtask", item_id, |item, config| {
            let mut next = item.clone();
            next.subtasks = if config.strict {
                subtask_tree::remove_strict(&item.subtasks, subtask_id)?
            } else {
                subtask_tree::remove(&item.subtasks, subtask_id)
            };
            Ok(next)
        })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    pub(super) fn check_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    /// Lock check, enforced here whatever the view shows
    pub(super) fn locked(&self, op: &str) -> bool {
        if self.working.is_locked() {
            debug!(
                list_id = %self.working.id,
                op,
                frozen = self.working.frozen,
                completed = self.working.completed,
                "edit refused: list is locked"
            );
            true
        } else {
            false
        }
    }

    /// Unknown item id: a no-op, or NotFound in strict mode
    pub(super) fn missing_item(&self, id: &str) -> Result<Edit, SessionError> {
        if self.config.strict {
            Err(CollectionError::NotFound(id.to_string()).into())
        } else {
            debug!(list_id = %self.working.id, item_id = id, "no such item; ignoring");
            Ok(Edit::Unchanged)
        }
    }

    pub(super) fn commit(&mut self, op: &str, next: TodoList) -> Edit {
        if next == self.working {
            return Edit::Unchanged;
        }
        self.working = next;
        debug!(list_id = %self.working.id, op, "edit applied");
        Edit::Applied
    }

    pub(super) fn commit_items(&mut self, op: &str, items: Vec<Item>) -> Edit {
        let mut next = self.working.clone();
        next.items = items;
        self.commit(op, next)
    }

    /// Guard, look up item `id`, derive its replacement with `f`, store it.
    fn change_item(
        &mut self,
        op: &str,
        id: &str,
        f: impl FnOnce(&Item, &SessionConfig) -> Result<Item, SessionError>,
    ) -> Result<Edit, SessionError> {
        self.check_open()?;
        if self.locked(op) {
            return Ok(Edit::Locked);
        }
        let Some(current) = self.working.item(id) else {
            return self.missing_item(id);
        };
        let next = f(current, &self.config)?;
        if next.id != id && item_ops::position(&self.working.items, &next.id).is_some() {
            return Err(CollectionError::DuplicateId(next.id).into());
        }
        let items = item_ops::update_by_id(&self.working.items, id, next);
        Ok(self.commit_items(op, items))
    }
}

/// Log subtask trees that break id uniqueness. They are left untouched;
/// edits act on the first match.
pub(super) fn report_duplicate_ids(list: &TodoList) {
    for item in &list.items {
        if let Err(e) = subtask_tree::validate_unique_ids(&item.subtasks) {
            warn!(
                list_id = %list.id,
                item_id = %item.id,
                error = %e,
                "subtask ids are not unique"
            );
        }
    }
}

fn check_index(index: usize, len: usize) -> Result<(), CollectionError> {
    if index < len {
        Ok(())
    } else {
        Err(CollectionError::IndexOutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{FieldValue, ItemKind};
    use crate::remote::memory::{MemoryChannel, MemoryTransport};
    use crate::remote::StaticAuth;
    use pretty_assertions::assert_eq;

    fn sample_list() -> TodoList {
        let mut list = TodoList::new("l1", "owner", "Weekend");
        let mut bread = Item::new("i1", "Bread");
        bread.cost = Some(3.0);
        bread.subtasks = vec![
            Subtask::with_id("s1", "Rye").child(Subtask::with_id("s1.1", "Sliced")),
            Subtask::with_id("s2", "Baguette"),
        ];
        let mut milk = Item::new("i2", "Milk");
        milk.done = true;
        milk.cost = Some(1.5);
        list.items = vec![bread, milk, Item::new("i3", "Eggs")];
        list
    }

    fn session_with(list: TodoList, config: SessionConfig) -> ListEditSession {
        let transport = MemoryTransport::new();
        transport.insert(list.clone());
        ListEditSession::open(
            list,
            &StaticAuth::new("owner", "token"),
            Box::new(transport),
            Box::new(MemoryChannel::new()),
            config,
        )
    }

    fn session() -> ListEditSession {
        session_with(sample_list(), SessionConfig::default())
    }

    fn strict() -> ListEditSession {
        session_with(
            sample_list(),
            SessionConfig {
                strict: true,
                ..SessionConfig::default()
            },
        )
    }

    fn item_ids(s: &ListEditSession) -> Vec<&str> {
        s.list().items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn starts_clean_and_goes_dirty_on_edit() {
        let mut s = session();
        assert!(!s.is_dirty());
        assert_eq!(s.set_title("Sunday").unwrap(), Edit::Applied);
        assert!(s.is_dirty());
        assert_eq!(s.baseline().title, "Weekend");
    }

    #[test]
    fn setting_same_value_stays_clean() {
        let mut s = session();
        assert_eq!(s.set_title("Weekend").unwrap(), Edit::Unchanged);
        assert!(!s.is_dirty());
    }

    #[test]
    fn add_item_uses_defaults() {
        let mut s = session();
        let id = s.add_item().unwrap().unwrap();
        let item = s.list().items.last().unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.title, "New Item");
        assert!(!item.done);
        assert_eq!(item.cost, Some(0.0));
        assert!(item.custom_fields.is_empty());
        assert!(item.subtasks.is_empty());
    }

    #[test]
    fn frozen_list_refuses_every_edit() {
        let mut list = sample_list();
        list.frozen = true;
        let mut s = session_with(list.clone(), SessionConfig::default());

        assert_eq!(s.add_item().unwrap(), None);
        assert_eq!(s.set_title("x").unwrap(), Edit::Locked);
        assert_eq!(s.remove_item("i1").unwrap(), Edit::Locked);
        assert_eq!(s.reorder_items(0, 1).unwrap(), Edit::Locked);
        assert_eq!(s.edit_item("i1", |i| i.title = "x".into()).unwrap(), Edit::Locked);
        assert_eq!(s.add_subtask("i1").unwrap(), None);
        assert_eq!(s.remove_subtask("i1", "s1").unwrap(), Edit::Locked);
        assert_eq!(s.add_custom_field("i1").unwrap(), None);
        assert_eq!(s.list(), &list);
        assert!(!s.is_dirty());
    }

    #[test]
    fn completed_list_is_locked_until_reopened() {
        let mut s = session();
        s.set_completed(true).unwrap();
        assert_eq!(s.set_title("x").unwrap(), Edit::Locked);
        s.set_completed(false).unwrap();
        assert_eq!(s.set_title("x").unwrap(), Edit::Applied);
    }

    #[test]
    fn edit_item_fields() {
        let mut s = session();
        s.edit_item("i3", |i| {
            i.title = "Free-range eggs".into();
            i.cost = Some(4.0);
            i.kind = Some(ItemKind::Food);
        })
        .unwrap();
        let eggs = s.list().item("i3").unwrap();
        assert_eq!(eggs.title, "Free-range eggs");
        assert_eq!(eggs.kind, Some(ItemKind::Food));
        assert_eq!(s.total_cost(), 8.5);
    }

    #[test]
    fn edit_item_cannot_steal_another_id() {
        let mut s = session();
        let err = s.edit_item("i3", |i| i.id = "i1".into()).unwrap_err();
        assert!(matches!(err, SessionError::Collection(CollectionError::DuplicateId(_))));
        assert!(!s.is_dirty());
    }

    #[test]
    fn unknown_ids_are_ignored_unless_strict() {
        let mut s = session();
        assert_eq!(s.remove_item("nope").unwrap(), Edit::Unchanged);
        assert_eq!(s.remove_subtask("i1", "nope").unwrap(), Edit::Unchanged);
        assert_eq!(s.add_nested_subtask("i1", "nope").unwrap(), None);
        assert!(!s.is_dirty());

        let mut s = strict();
        assert!(matches!(
            s.remove_item("nope"),
            Err(SessionError::Collection(CollectionError::NotFound(_)))
        ));
        assert!(matches!(
            s.remove_subtask("i1", "nope"),
            Err(SessionError::Tree(TreeError::NotFound(_)))
        ));
        assert!(s.toggle_subtask_done("i1", "nope").is_err());
    }

    #[test]
    fn reorder_moves_in_canonical_order() {
        let mut s = session();
        assert_eq!(s.reorder_items(2, 0).unwrap(), Edit::Applied);
        assert_eq!(item_ids(&s), vec!["i3", "i1", "i2"]);
        assert!(matches!(
            s.reorder_items(0, 3),
            Err(SessionError::Collection(CollectionError::IndexOutOfRange { .. }))
        ));
    }

    #[test]
    fn reorder_disabled_under_filter() {
        let mut s = session();
        s.set_filter(ItemFilter::Completed);
        assert!(!s.can_reorder());
        let visible = s.visible_items();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "i2");
        assert!(matches!(
            s.reorder_items(0, 1),
            Err(SessionError::ReorderDisabled(ItemFilter::Completed))
        ));
        s.set_filter(ItemFilter::None);
        assert!(s.can_reorder());
    }

    #[test]
    fn custom_field_lifecycle() {
        let mut s = session();
        let idx = s.add_custom_field("i1").unwrap().unwrap();
        assert_eq!(idx, 0);
        s.update_custom_field(
            "i1",
            0,
            CustomField {
                title: "Bakery".into(),
                value: FieldValue::Text("Corner".into()),
                required: true,
            },
        )
        .unwrap();
        assert_eq!(s.list().item("i1").unwrap().custom_fields[0].title, "Bakery");

        assert!(matches!(
            s.update_custom_field("i1", 5, CustomField::default()),
            Err(SessionError::Collection(CollectionError::IndexOutOfRange { index: 5, len: 1 }))
        ));
        s.remove_custom_field("i1", 0).unwrap();
        assert!(s.list().item("i1").unwrap().custom_fields.is_empty());
    }

    #[test]
    fn subtask_add_nested_and_remove() {
        let mut s = session();
        let root = s.add_subtask("i1").unwrap().unwrap();
        let nested = s.add_nested_subtask("i1", &root).unwrap().unwrap();

        let bread = s.list().item("i1").unwrap();
        assert_eq!(bread.subtasks.len(), 3);
        assert_eq!(bread.subtasks[2].title, "New Subtask");
        assert_eq!(bread.subtasks[2].subtasks[0].id, nested);
        assert_eq!(bread.subtasks[2].subtasks[0].title, "New Nested Subtask");

        s.remove_subtask("i1", &root).unwrap();
        let bread = s.list().item("i1").unwrap();
        assert_eq!(bread.subtasks.len(), 2);
        assert!(subtask_tree::find(&bread.subtasks, &nested).is_none());
    }

    #[test]
    fn update_subtask_deep() {
        let mut s = session();
        let mut sliced = Subtask::with_id("s1.1", "Thick slices");
        sliced.required = true;
        s.update_subtask("i1", sliced.clone()).unwrap();
        let bread = s.list().item("i1").unwrap();
        assert_eq!(subtask_tree::find(&bread.subtasks, "s1.1"), Some(&sliced));
        assert_eq!(bread.subtasks[0].title, "Rye");
    }

    #[test]
    fn update_subtask_rejects_colliding_children() {
        let mut s = session();
        let clash = Subtask::with_id("s2", "Baguette").child(Subtask::with_id("s1", "dup"));
        assert!(matches!(
            s.update_subtask("i1", clash),
            Err(SessionError::Tree(TreeError::DuplicateId(_)))
        ));
        assert!(!s.is_dirty());
    }

    #[test]
    fn existing_duplicate_ids_do_not_block_other_edits() {
        let mut list = sample_list();
        list.items[0].subtasks = vec![
            Subtask::with_id("a", "First"),
            Subtask::with_id("a", "Second"),
            Subtask::with_id("b", "Other"),
        ];
        let mut s = session_with(list, SessionConfig::default());

        assert_eq!(s.toggle_subtask_done("i1", "b").unwrap(), Edit::Applied);
        let bread = s.list().item("i1").unwrap();
        assert!(subtask_tree::find(&bread.subtasks, "b").unwrap().done);

        assert_eq!(
            s.update_subtask("i1", Subtask::with_id("zzz", "Absent")).unwrap(),
            Edit::Unchanged
        );
        // the duplicates are left as they were
        let bread = s.list().item("i1").unwrap();
        let ids: Vec<&str> = bread.subtasks.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a", "b"]);
    }

    #[test]
    fn toggle_subtask_is_batched() {
        let mut s = session();
        s.toggle_subtask_done("i1", "s1.1").unwrap();
        let bread = s.list().item("i1").unwrap();
        assert!(subtask_tree::find(&bread.subtasks, "s1.1").unwrap().done);
        assert!(s.is_dirty());
        assert_eq!(s.completion().subtasks_done, 1);
    }

    #[test]
    fn edit_subtask_keeps_id() {
        let mut s = session();
        s.edit_subtask("i1", "s2", |sub| {
            sub.id = "hijack".into();
            sub.title = "French".into();
        })
        .unwrap();
        let bread = s.list().item("i1").unwrap();
        assert_eq!(subtask_tree::find(&bread.subtasks, "s2").unwrap().title, "French");
        assert!(subtask_tree::find(&bread.subtasks, "hijack").is_none());
    }

    #[test]
    fn freeze_affordance_is_owner_only() {
        let s = session();
        assert!(s.can_toggle_freeze());

        let mut list = sample_list();
        list.owner_id = "someone-else".into();
        let s = session_with(list, SessionConfig::default());
        assert!(!s.can_toggle_freeze());
    }
}
