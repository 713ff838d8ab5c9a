//! Per-node selection bookkeeping.

use std::sync::Arc;

use selectree_core::Signal;

/// Observer lists attached to one node.
///
/// Shared behind an `Arc` so notifications can be delivered after the tree
/// lock is released.
#[derive(Debug, Default)]
pub(crate) struct NodeObservers {
    pub(crate) selected: Signal<bool>,
    pub(crate) count: Signal<usize>,
    pub(crate) combined: Signal<(bool, usize)>,
}

impl NodeObservers {
    pub(crate) fn disconnect_all(&self) {
        self.selected.disconnect_all();
        self.count.disconnect_all();
        self.combined.disconnect_all();
    }

    pub(crate) fn is_observed(&self) -> bool {
        self.selected.connection_count() > 0
            || self.count.connection_count() > 0
            || self.combined.connection_count() > 0
    }
}

/// The payload stored at every tree position.
#[derive(Debug, Default)]
pub(crate) struct NodeState {
    /// The node's own remembered toggle.
    pub(crate) user_selected: bool,
    /// Displayed state, forced on by any ancestor whose `user_selected` is set.
    pub(crate) selected: bool,
    /// Selected leaves in the subtree, the node itself included.
    pub(crate) selected_leaves: usize,
    pub(crate) deleted: bool,
    pub(crate) observers: Arc<NodeObservers>,
}

impl NodeState {
    /// A fresh node whose displayed state starts at `selected`.
    pub(crate) fn inheriting(selected: bool) -> Self {
        Self {
            selected,
            selected_leaves: usize::from(selected),
            ..Self::default()
        }
    }
}

/// A copy of one node's bookkeeping, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSnapshot {
    /// The node's own remembered toggle.
    pub user_selected: bool,
    /// The displayed selected state.
    pub selected: bool,
    /// Selected leaves in the subtree.
    pub selected_leaves: usize,
    /// Whether the node has no children.
    pub is_leaf: bool,
}

/// How a select-all switch should be drawn.
///
/// # Example
///
/// ```
/// use selectree::SelectionDisplay;
///
/// assert_eq!(SelectionDisplay::from_parts(true, 4), SelectionDisplay::Selected);
/// assert_eq!(SelectionDisplay::from_parts(false, 2), SelectionDisplay::Partial);
/// assert_eq!(SelectionDisplay::from_parts(false, 0), SelectionDisplay::Unselected);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionDisplay {
    /// Nothing below the switch is selected.
    #[default]
    Unselected,
    /// The switch is off but some leaves below it are selected.
    Partial,
    /// The switch reads on.
    Selected,
}

impl SelectionDisplay {
    /// Derives the display state from a node's `(selected, count)` pair.
    pub fn from_parts(selected: bool, selected_leaves: usize) -> Self {
        if selected {
            Self::Selected
        } else if selected_leaves > 0 {
            Self::Partial
        } else {
            Self::Unselected
        }
    }

    /// Returns `true` for [`SelectionDisplay::Selected`].
    pub fn is_selected(self) -> bool {
        self == Self::Selected
    }
}
