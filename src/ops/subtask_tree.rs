//! Find, update, remove and insert over a forest of [`Subtask`]s.
//!
//! Every operation is copy-producing: the input forest is borrowed and a new
//! forest is returned. Traversal is depth-first pre-order and acts on the
//! first node whose id matches. Ids are expected to be unique across the
//! whole forest; duplicates are reported by [`validate_unique_ids`] and never
//! repaired here.

use std::collections::HashSet;

use crate::model::subtask::Subtask;

/// Error type for subtask tree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("subtask not found: {0}")]
    NotFound(String),
    #[error("duplicate subtask id in tree: {0}")]
    DuplicateId(String),
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// First depth-first match for `id`.
pub fn find<'a>(forest: &'a [Subtask], id: &str) -> Option<&'a Subtask> {
    for sub in forest {
        if sub.id == id {
            return Some(sub);
        }
        if let Some(s) = find(&sub.subtasks, id) {
            return Some(s);
        }
    }
    None
}

fn find_mut<'a>(forest: &'a mut [Subtask], id: &str) -> Option<&'a mut Subtask> {
    for sub in forest.iter_mut() {
        if sub.id == id {
            return Some(sub);
        }
        if let Some(s) = find_mut(&mut sub.subtasks, id) {
            return Some(s);
        }
    }
    None
}

pub fn contains(forest: &[Subtask], id: &str) -> bool {
    find(forest, id).is_some()
}

// ---------------------------------------------------------------------------
// Mutation algebra (lenient: unknown ids are a no-op)
// ---------------------------------------------------------------------------

/// Replace the node with `node.id` by `node` (including its children).
pub fn update(forest: &[Subtask], node: &Subtask) -> Vec<Subtask> {
    let mut out = forest.to_vec();
    if let Some(slot) = find_mut(&mut out, &node.id) {
        *slot = node.clone();
    }
    out
}

/// Remove the node with `id` together with its whole subtree.
pub fn remove(forest: &[Subtask], id: &str) -> Vec<Subtask> {
    let mut out = forest.to_vec();
    take_first(&mut out, id);
    out
}

/// Append `node` to the children of `parent_id`.
pub fn insert_child(forest: &[Subtask], parent_id: &str, node: Subtask) -> Vec<Subtask> {
    let mut out = forest.to_vec();
    if let Some(parent) = find_mut(&mut out, parent_id) {
        parent.subtasks.push(node);
    }
    out
}

/// Append `node` as a new root of the forest.
pub fn push_root(forest: &[Subtask], node: Subtask) -> Vec<Subtask> {
    let mut out = forest.to_vec();
    out.push(node);
    out
}

/// Detach the first pre-order match, keeping sibling order.
fn take_first(forest: &mut Vec<Subtask>, id: &str) -> Option<Subtask> {
    for i in 0..forest.len() {
        if forest[i].id == id {
            return Some(forest.remove(i));
        }
        if let Some(taken) = take_first(&mut forest[i].subtasks, id) {
            return Some(taken);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Strict variants
// ---------------------------------------------------------------------------

pub fn update_strict(forest: &[Subtask], node: &Subtask) -> Result<Vec<Subtask>, TreeError> {
    require(forest, &node.id)?;
    Ok(update(forest, node))
}

pub fn remove_strict(forest: &[Subtask], id: &str) -> Result<Vec<Subtask>, TreeError> {
    require(forest, id)?;
    Ok(remove(forest, id))
}

pub fn insert_child_strict(
    forest: &[Subtask],
    parent_id: &str,
    node: Subtask,
) -> Result<Vec<Subtask>, TreeError> {
    require(forest, parent_id)?;
    Ok(insert_child(forest, parent_id, node))
}

fn require(forest: &[Subtask], id: &str) -> Result<(), TreeError> {
    if contains(forest, id) {
        Ok(())
    } else {
        Err(TreeError::NotFound(id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Traversal and derived values
// ---------------------------------------------------------------------------

/// Visit every node in pre-order with its depth (roots are depth 0).
pub fn for_each(forest: &[Subtask], f: &mut dyn FnMut(&Subtask, usize)) {
    walk(forest, 0, f);
}

fn walk(forest: &[Subtask], depth: usize, f: &mut dyn FnMut(&Subtask, usize)) {
    for sub in forest {
        f(sub, depth);
        walk(&sub.subtasks, depth + 1, f);
    }
}

/// Check the tree-wide id uniqueness invariant.
pub fn validate_unique_ids(forest: &[Subtask]) -> Result<(), TreeError> {
    let mut seen = HashSet::new();
    let mut dup = None;
    for_each(forest, &mut |sub, _| {
        if dup.is_none() && !seen.insert(sub.id.clone()) {
            dup = Some(sub.id.clone());
        }
    });
    match dup {
        Some(id) => Err(TreeError::DuplicateId(id)),
        None => Ok(()),
    }
}

/// Check that replacing the first match of `node.id` with `node` brings in no
/// id already used elsewhere in the forest.
///
/// Ids the replaced subtree already carried are exempt, so duplicates that
/// were present before the edit are neither reported nor repaired. An absent
/// `node.id` makes the replacement a no-op, which always passes.
pub fn check_replacement(forest: &[Subtask], node: &Subtask) -> Result<(), TreeError> {
    let Some(old) = find(forest, &node.id) else {
        return Ok(());
    };
    let mut old_ids = HashSet::new();
    for_each(std::slice::from_ref(old), &mut |sub, _| {
        old_ids.insert(sub.id.clone());
    });
    let mut rest_ids = HashSet::new();
    for_each(&remove(forest, &node.id), &mut |sub, _| {
        rest_ids.insert(sub.id.clone());
    });

    let mut added = HashSet::new();
    let mut dup = None;
    for_each(std::slice::from_ref(node), &mut |sub, _| {
        if dup.is_some() || old_ids.contains(&sub.id) {
            return;
        }
        if rest_ids.contains(&sub.id) || !added.insert(sub.id.clone()) {
            dup = Some(sub.id.clone());
        }
    });
    match dup {
        Some(id) => Err(TreeError::DuplicateId(id)),
        None => Ok(()),
    }
}

/// Total number of nodes at every depth.
pub fn count(forest: &[Subtask]) -> usize {
    let mut n = 0;
    for_each(forest, &mut |_, _| n += 1);
    n
}

/// (done, total) over every node at every depth.
pub fn completion(forest: &[Subtask]) -> (usize, usize) {
    let mut done = 0;
    let mut total = 0;
    for_each(forest, &mut |sub, _| {
        total += 1;
        if sub.done {
            done += 1;
        }
    });
    (done, total)
}
