use serde::Serialize;

use crate::model::item::Item;
use crate::model::list::TodoList;
use crate::model::subtask::Subtask;
use crate::ops::item_ops::{self, ItemFilter};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionJson {
    pub items_done: usize,
    pub items_total: usize,
    pub subtasks_done: usize,
    pub subtasks_total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJson<'a> {
    #[serde(flatten)]
    pub list: &'a TodoList,
    pub total_cost: f64,
    pub completion: CompletionJson,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummaryJson {
    pub id: String,
    pub title: String,
    pub owner_id: String,
    pub frozen: bool,
    pub completed: bool,
    pub items_done: usize,
    pub items_total: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn list_to_json(list: &TodoList) -> ListJson<'_> {
    let c = item_ops::completion(&list.items);
    ListJson {
        list,
        total_cost: item_ops::total_cost(&list.items),
        completion: CompletionJson {
            items_done: c.items_done,
            items_total: c.items_total,
            subtasks_done: c.subtasks_done,
            subtasks_total: c.subtasks_total,
        },
    }
}

pub fn list_to_summary_json(list: &TodoList) -> ListSummaryJson {
    let c = item_ops::completion(&list.items);
    ListSummaryJson {
        id: list.id.clone(),
        title: list.title.clone(),
        owner_id: list.owner_id.clone(),
        frozen: list.frozen,
        completed: list.completed,
        items_done: c.items_done,
        items_total: c.items_total,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Ids are uuids; eight characters are enough to pick one out.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn checkbox(done: bool) -> &'static str {
    if done { "[x]" } else { "[ ]" }
}

fn lock_flags(list: &TodoList) -> String {
    let mut flags = Vec::new();
    if list.frozen {
        flags.push("frozen");
    }
    if list.completed {
        flags.push("completed");
    }
    flags.join(", ")
}

/// One line per list in `sd lists`
pub fn format_list_summary(list: &TodoList) -> String {
    let c = item_ops::completion(&list.items);
    let flags = lock_flags(list);
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", flags)
    };
    format!(
        "  {}  {}  {}/{} ({:.0}%){}",
        short_id(&list.id),
        list.title,
        c.items_done,
        c.items_total,
        c.ratio() * 100.0,
        flags
    )
}

/// Format a subtask and its children as an indented outline
pub fn format_subtask_tree(sub: &Subtask, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let indent = "    ".repeat(depth);
    let req = if sub.required { " *" } else { "" };
    lines.push(format!(
        "{}{} {} {}{}",
        indent,
        checkbox(sub.done),
        short_id(&sub.id),
        sub.title,
        req
    ));
    for child in &sub.subtasks {
        lines.extend(format_subtask_tree(child, depth + 1));
    }
    lines
}

pub fn format_item(item: &Item) -> Vec<String> {
    let mut head = format!("{} {} {}", checkbox(item.done), short_id(&item.id), item.title);
    if item.effective_cost() != 0.0 {
        head.push_str(&format!("  {}", format_money(item.effective_cost())));
    }
    if let Some(kind) = item.kind {
        head.push_str(&format!("  ({})", kind));
    }
    if item.required {
        head.push_str("  *");
    }

    let mut lines = vec![head];
    for (i, field) in item.custom_fields.iter().enumerate() {
        let req = if field.required { " *" } else { "" };
        lines.push(format!("    #{} {}: {}{}", i, field.title, field.value, req));
    }
    for sub in &item.subtasks {
        lines.extend(format_subtask_tree(sub, 1));
    }
    lines
}

/// Full outline for `sd show`
pub fn format_list_detail(list: &TodoList, filter: ItemFilter) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("== {} ({}) ==", list.title, short_id(&list.id)));
    lines.push(format!("owner: {}", list.owner_id));
    if !list.shared_with.is_empty() {
        let shared: Vec<&str> = list.shared_with.iter().map(|s| s.as_str()).collect();
        lines.push(format!("shared with: {}", shared.join(", ")));
    }
    let flags = lock_flags(list);
    if !flags.is_empty() {
        lines.push(format!("status: {}", flags));
    }

    let c = item_ops::completion(&list.items);
    lines.push(format!(
        "items: {}/{} done  subtasks: {}/{} done  total: {}",
        c.items_done,
        c.items_total,
        c.subtasks_done,
        c.subtasks_total,
        format_money(item_ops::total_cost(&list.items))
    ));
    if filter != ItemFilter::None {
        lines.push(format!("filter: {}", filter));
    }
    lines.push(String::new());

    let visible = item_ops::filtered_view(&list.items, filter);
    if visible.is_empty() {
        lines.push("(no items)".to_string());
    }
    for item in visible {
        lines.extend(format_item(item));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{CustomField, FieldValue, ItemKind};
    use insta::assert_snapshot;

    fn sample() -> TodoList {
        let mut list = TodoList::new("0f3c9a2e-77aa-4b1e-9c55-0123456789ab", "u1", "Weekend");
        let mut bread = Item::new("1a2b3c4d-0000-0000-0000-000000000000", "Bread");
        bread.cost = Some(3.0);
        bread.kind = Some(ItemKind::Food);
        bread.subtasks = vec![
            Subtask::with_id("s1", "Rye").child(Subtask::with_id("s1.1", "Sliced")),
            Subtask::with_id("s2", "Baguette"),
        ];
        let mut milk = Item::new("i2", "Milk");
        milk.done = true;
        milk.cost = Some(1.5);
        milk.required = true;
        milk.custom_fields.push(CustomField {
            title: "Brand".into(),
            value: FieldValue::Text("Oatly".into()),
            required: false,
        });
        list.items = vec![bread, milk];
        list.shared_with.insert("friend@example.com".into());
        list.frozen = true;
        list
    }

    #[test]
    fn short_id_truncates_long_ids_only() {
        assert_eq!(short_id("0f3c9a2e-77aa"), "0f3c9a2e");
        assert_eq!(short_id("i2"), "i2");
    }

    #[test]
    fn list_detail_outline() {
        let text = format_list_detail(&sample(), ItemFilter::None).join("\n");
        assert_snapshot!(text, @r"
== Weekend (0f3c9a2e) ==
owner: u1
shared with: friend@example.com
status: frozen
items: 1/2 done  subtasks: 0/3 done  total: $4.50

[ ] 1a2b3c4d Bread  $3.00  (food)
    [ ] s1 Rye
        [ ] s1.1 Sliced
    [ ] s2 Baguette
[x] i2 Milk  $1.50  *
    #0 Brand: Oatly
");
    }

    #[test]
    fn filtered_detail_shows_filter() {
        let lines = format_list_detail(&sample(), ItemFilter::InProgress);
        assert!(lines.contains(&"filter: in_progress".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Milk")));
    }

    #[test]
    fn empty_list_placeholder() {
        let list = TodoList::new("l1", "u1", "Empty");
        let lines = format_list_detail(&list, ItemFilter::None);
        assert_eq!(lines.last().map(String::as_str), Some("(no items)"));
    }

    #[test]
    fn json_carries_derived_values() {
        let list = sample();
        let json = serde_json::to_value(list_to_json(&list)).unwrap();
        assert_eq!(json["_id"], "0f3c9a2e-77aa-4b1e-9c55-0123456789ab");
        assert_eq!(json["totalCost"], 4.5);
        assert_eq!(json["completion"]["itemsDone"], 1);
        assert_eq!(json["completion"]["subtasksTotal"], 3);
        assert_eq!(json["items"][0]["type"], "food");
    }

    #[test]
    fn summary_line() {
        assert_eq!(
            format_list_summary(&sample()),
            "  0f3c9a2e  Weekend  1/2 (50%)  [frozen]"
        );
    }
}
