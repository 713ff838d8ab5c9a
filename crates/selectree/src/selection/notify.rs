//! Write recording and deferred observer delivery.
//!
//! Every assignment to a node's `selected` or `selected_leaves` field goes
//! through a [`WriteLog`], which applies the write and queues a
//! notification. Queued notifications are delivered in write order once the
//! operation has finished mutating and the tree lock is released.

use std::sync::Arc;

use parking_lot::Mutex;

use super::node::{NodeObservers, NodeState};
use crate::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Selected,
    Count,
}

/// One queued notification: the node's values right after the write.
struct Notification {
    observers: Arc<NodeObservers>,
    field: Field,
    selected: bool,
    count: usize,
}

impl Notification {
    fn deliver(self) {
        match self.field {
            Field::Selected => self.observers.selected.emit(self.selected),
            Field::Count => self.observers.count.emit(self.count),
        };
        self.observers.combined.emit((self.selected, self.count));
    }
}

/// Applies field writes and records them for later delivery.
#[derive(Default)]
pub(crate) struct WriteLog {
    queue: Vec<Notification>,
}

impl WriteLog {
    pub(crate) fn set_selected(&mut self, node: &mut NodeState, selected: bool) {
        node.selected = selected;
        self.record(node, Field::Selected);
    }

    pub(crate) fn set_count(&mut self, node: &mut NodeState, count: usize) {
        node.selected_leaves = count;
        self.record(node, Field::Count);
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    fn record(&mut self, node: &NodeState, field: Field) {
        // Nodes nobody observes are skipped; a slot connected later has
        // missed this write either way.
        if !node.observers.is_observed() {
            return;
        }
        self.queue.push(Notification {
            observers: Arc::clone(&node.observers),
            field,
            selected: node.selected,
            count: node.selected_leaves,
        });
    }
}

/// Paths whose notifications are currently being delivered, innermost last.
#[derive(Debug, Default)]
pub(crate) struct DispatchStack {
    active: Mutex<Vec<Path>>,
}

impl DispatchStack {
    /// Returns the active path that deleting `path` would cut off, if any.
    pub(crate) fn conflict_with(&self, path: &Path) -> Option<Path> {
        self.active
            .lock()
            .iter()
            .find(|active| active.starts_with(path))
            .cloned()
    }

    /// Delivers `log` with `origin` marked active for the duration.
    pub(crate) fn deliver(&self, origin: &Path, log: WriteLog) {
        if log.queue.is_empty() {
            return;
        }

        self.active.lock().push(origin.clone());
        let _guard = PopOnDrop(self);
        for notification in log.queue {
            notification.deliver();
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.active.lock().len()
    }
}

/// Pops the dispatch stack even if an observer panics.
struct PopOnDrop<'a>(&'a DispatchStack);

impl Drop for PopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.active.lock().pop();
    }
}
