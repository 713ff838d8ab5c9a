//! The tree walks behind toggling, deselecting and deleting.
//!
//! All functions work on resolved arena keys, write through a [`WriteLog`]
//! and return the net change in selected leaves for the caller to push to
//! the strict ancestors. Tombstoned nodes are skipped; they always hold a
//! zero count.

use selectree_core::logging::targets;

use super::node::NodeState;
use super::notify::WriteLog;
use crate::tree::{AddressableTree, NodeKey};

pub(crate) type StateTree = AddressableTree<NodeState>;

/// Turns off every switch on `ancestors` (root first) that reads selected,
/// pushing its ON state one level down to its live children.
///
/// The push reaches the next ancestor on the chain, which is then split in
/// turn, so after the walk no ancestor claims the node below them. Deeper
/// descendants of the split nodes are not rewritten.
pub(crate) fn release_ancestor_switches(
    tree: &mut StateTree,
    ancestors: &[NodeKey],
    log: &mut WriteLog,
) -> usize {
    let mut released = 0;
    for &ancestor in ancestors {
        if !tree.value(ancestor).selected {
            continue;
        }

        let node = tree.value_mut(ancestor);
        node.user_selected = false;
        log.set_selected(node, false);

        let children = tree.children_of(ancestor).to_vec();
        for child in children {
            let node = tree.value_mut(child);
            if node.deleted {
                continue;
            }
            node.user_selected = true;
            log.set_selected(node, true);
        }
        released += 1;
    }

    if released > 0 {
        tracing::debug!(target: targets::SELECTION, released, "split ancestor select-all switches");
    }
    released
}

/// Recomputes `selected = forced || user_selected` below and including
/// `key`, where `forced` is the new state of the parent switch.
///
/// A subtree whose root keeps its state is already consistent and is not
/// descended into.
pub(crate) fn propagate_down(
    tree: &mut StateTree,
    key: NodeKey,
    forced: bool,
    log: &mut WriteLog,
) -> isize {
    let node = tree.value(key);
    if node.deleted {
        return 0;
    }

    let was_selected = node.selected;
    let now_selected = forced || node.user_selected;
    let children = tree.children_of(key).to_vec();

    let mut delta = 0;
    if now_selected != was_selected {
        for &child in &children {
            delta += propagate_down(tree, child, now_selected, log);
        }
    }

    let node = tree.value_mut(key);
    if children.is_empty() {
        delta += isize::from(now_selected) - isize::from(was_selected);
        log.set_count(node, usize::from(now_selected));
    } else {
        let count = offset(node.selected_leaves, delta);
        log.set_count(node, count);
    }
    log.set_selected(node, now_selected);
    delta
}

/// Forces the subtree at `key` off and forgets every `user_selected` in it.
pub(crate) fn clear_subtree(tree: &mut StateTree, key: NodeKey, log: &mut WriteLog) -> isize {
    if tree.value(key).deleted {
        return 0;
    }

    let children = tree.children_of(key).to_vec();
    let mut delta = 0;
    for &child in &children {
        delta += clear_subtree(tree, child, log);
    }

    let node = tree.value_mut(key);
    if children.is_empty() && node.selected {
        delta -= 1;
    }
    log.set_count(node, 0);
    node.user_selected = false;
    log.set_selected(node, false);
    delta
}

/// Clears and tombstones the subtree at `key`, children first, detaching
/// every observer in it. Returns the leaf delta and the number of nodes
/// tombstoned.
pub(crate) fn delete_subtree(
    tree: &mut StateTree,
    key: NodeKey,
    log: &mut WriteLog,
) -> (isize, usize) {
    if tree.value(key).deleted {
        return (0, 0);
    }

    let children = tree.children_of(key).to_vec();
    let mut delta = 0;
    let mut removed = 0;
    for &child in &children {
        let (child_delta, child_removed) = delete_subtree(tree, child, log);
        delta += child_delta;
        removed += child_removed;
    }

    // Children are already tombstoned, so this only touches `key` itself.
    delta += clear_subtree(tree, key, log);

    let node = tree.value_mut(key);
    node.deleted = true;
    node.observers.disconnect_all();
    (delta, removed + 1)
}

/// Adds `delta` to the count of every node in `keys`.
pub(crate) fn apply_delta(tree: &mut StateTree, keys: &[NodeKey], delta: isize, log: &mut WriteLog) {
    for &key in keys {
        let node = tree.value_mut(key);
        let count = offset(node.selected_leaves, delta);
        log.set_count(node, count);
    }
}

fn offset(count: usize, delta: isize) -> usize {
    let updated = count.checked_add_signed(delta);
    debug_assert!(updated.is_some(), "selected leaf count {count} underflows by {delta}");
    updated.unwrap_or(0)
}
