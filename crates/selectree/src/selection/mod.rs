//! Hierarchical select-all state.
//!
//! [`SelectionState`] tracks a tree of selectable items. Leaves are the
//! items; every node, leaf or interior, is also a "select all" switch for
//! its subtree. Each node keeps:
//!
//! - its own remembered toggle (`user_selected`),
//! - its displayed state (`selected`), forced on while any ancestor's
//!   toggle is on,
//! - the number of selected leaves below it.
//!
//! Turning a switch on forces its whole subtree on. Turning it off reverts
//! each descendant to its own remembered toggle, so choices made further
//! down survive an on/off round trip of an enclosing switch.
//!
//! Clicking a node that only reads selected because an ancestor's switch is
//! on first splits that switch: the ancestor goes off and its children are
//! switched on individually, so the clicked branch can be toggled on its own
//! while its siblings stay selected.
//!
//! # Observers
//!
//! Observers are attached per node and field. They run synchronously, after
//! the operation has finished mutating, once per write to the field, even
//! when the written value equals the old one.
//!
//! # Example
//!
//! ```
//! use selectree::{Path, SelectionConfig, SelectionState};
//!
//! let state = SelectionState::with_config(SelectionConfig::default());
//! let nouns = state.add_node(&Path::root())?;
//! let animals = state.add_node(&nouns)?;
//! let colours = state.add_node(&nouns)?;
//!
//! state.subscribe_combined(&nouns, |selected, count| {
//!     println!("nouns: selected={selected} ({count})");
//! })?;
//!
//! state.toggle_select_all(&nouns)?;
//! assert_eq!(state.get(&nouns)?, (true, 2));
//!
//! // Clicking one item splits the category switch.
//! state.toggle_select_all(&animals)?;
//! assert_eq!(state.get(&nouns)?, (false, 1));
//! assert_eq!(state.selected_leaves(&Path::root())?, vec![colours]);
//! # Ok::<(), selectree::Error>(())
//! ```

mod node;
mod notify;
mod propagate;

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use selectree_core::ConnectionId;
use selectree_core::logging::{span_names, targets};

use crate::config::SelectionConfig;
use crate::error::{Error, Result};
use crate::path::Path;
use crate::tree::NodeKey;
use node::{NodeObservers, NodeState};
use notify::{DispatchStack, WriteLog};

pub use node::{NodeSnapshot, SelectionDisplay};
pub(crate) use propagate::StateTree;

/// Observer of a node's selected state.
pub type SelectedObserver = Box<dyn Fn(bool) + Send + Sync>;

/// Observer of a node's selected-leaf count.
pub type CountObserver = Box<dyn Fn(usize) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObservedField {
    Selected,
    Count,
    Combined,
}

/// Handle to the observers registered by one `subscribe*` call.
///
/// Dropping it does not unsubscribe; pass it to
/// [`SelectionState::unsubscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    path: Path,
    connections: Vec<(ObservedField, ConnectionId)>,
}

impl Subscription {
    /// The path the observers are attached to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of observers registered by the call.
    pub fn observer_count(&self) -> usize {
        self.connections.len()
    }
}

/// Selection bookkeeping for a tree of select-all switches.
///
/// All operations take `&self`. The tree is locked only while an operation
/// mutates it; observers run afterwards and may call back into the state.
pub struct SelectionState {
    tree: RwLock<StateTree>,
    dispatch: DispatchStack,
    config: SelectionConfig,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("nodes", &self.tree.read().node_count())
            .field("dispatch_depth", &self.dispatch.depth())
            .field("config", &self.config)
            .finish()
    }
}

impl SelectionState {
    /// Creates a state holding only the root, with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SelectionConfig::default())
    }

    /// Creates a state holding only the root.
    pub fn with_config(config: SelectionConfig) -> Self {
        Self {
            tree: RwLock::new(StateTree::new(NodeState::default())),
            dispatch: DispatchStack::default(),
            config,
        }
    }

    /// The configuration this state was created with.
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Adds a node under `parent` and returns its path.
    ///
    /// The node starts with its own toggle off. It reads selected only if the
    /// parent currently does, since a live enclosing switch covers every
    /// node below it.
    #[tracing::instrument(skip(self), target = "selectree::selection", level = "trace")]
    pub fn add_node(&self, parent: &Path) -> Result<Path> {
        let mut log = WriteLog::default();
        let path = {
            let mut tree = self.tree.write();
            let (parent_key, mut ancestors) = self.lineage(&tree, parent)?;
            let inherited = tree.value(parent_key).selected;
            let parent_was_leaf = tree.children_of(parent_key).is_empty();

            let path = tree.add_child(parent, NodeState::inheriting(inherited))?;

            // A selected leaf that gains its first child hands its count over
            // to that child, so only existing categories grow.
            if inherited && !parent_was_leaf {
                ancestors.push(parent_key);
                propagate::apply_delta(&mut tree, &ancestors, 1, &mut log);
            }
            path
        };

        self.deliver(&path, log);
        Ok(path)
    }

    /// Deletes the node at `path` and everything below it.
    ///
    /// Selected leaves in the subtree are subtracted from every ancestor, the
    /// nodes are tombstoned and their observers detached. The paths stay
    /// reserved: later operations on them fail with [`Error::Deleted`].
    ///
    /// Fails with [`Error::ReentrantMutation`] when called from an observer
    /// while notifications for `path` or a node below it are being delivered.
    pub fn delete_node(&self, path: &Path) -> Result<()> {
        if let Some(active) = self.dispatch.conflict_with(path) {
            tracing::warn!(target: targets::SELECTION, %path, %active, "rejected re-entrant delete");
            return Err(Error::reentrant(path));
        }
        let _span = tracing::debug_span!(target: targets::SELECTION, span_names::DELETE, %path).entered();

        let mut log = WriteLog::default();
        {
            let mut tree = self.tree.write();
            let (key, ancestors) = self.lineage(&tree, path)?;
            let (delta, removed) = propagate::delete_subtree(&mut tree, key, &mut log);
            propagate::apply_delta(&mut tree, &ancestors, delta, &mut log);
            tracing::debug!(target: targets::SELECTION, removed, delta, "deleted subtree");
        }

        self.deliver(path, log);
        Ok(())
    }

    /// The paths of the immediate children of `path`.
    ///
    /// Deleted children keep their index and are included.
    pub fn child_paths(&self, path: &Path) -> Result<Vec<Path>> {
        let tree = self.tree.read();
        self.lineage(&tree, path)?;
        tree.child_paths(path)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The node's `(selected, selected leaf count)`.
    pub fn get(&self, path: &Path) -> Result<(bool, usize)> {
        let tree = self.tree.read();
        let (key, _) = self.lineage(&tree, path)?;
        let node = tree.value(key);
        Ok((node.selected, node.selected_leaves))
    }

    /// A copy of all bookkeeping of the node at `path`.
    pub fn node_snapshot(&self, path: &Path) -> Result<NodeSnapshot> {
        let tree = self.tree.read();
        let (key, _) = self.lineage(&tree, path)?;
        let node = tree.value(key);
        Ok(NodeSnapshot {
            user_selected: node.user_selected,
            selected: node.selected,
            selected_leaves: node.selected_leaves,
            is_leaf: tree.children_of(key).is_empty(),
        })
    }

    /// How the switch at `path` should be drawn.
    pub fn display_state(&self, path: &Path) -> Result<SelectionDisplay> {
        let (selected, count) = self.get(path)?;
        Ok(SelectionDisplay::from_parts(selected, count))
    }

    /// The count label for `path`, rendered with the configured format.
    pub fn count_label(&self, path: &Path) -> Result<String> {
        let (_, count) = self.get(path)?;
        Ok(self.config.count_label.format(count))
    }

    /// Whether any leaf in the whole tree is selected.
    pub fn has_selection(&self) -> Result<bool> {
        Ok(self.get(&Path::root())?.1 > 0)
    }

    /// The paths of the selected leaves below `path`, in tree order.
    pub fn selected_leaves(&self, path: &Path) -> Result<Vec<Path>> {
        let tree = self.tree.read();
        let (key, _) = self.lineage(&tree, path)?;
        let mut out = Vec::new();
        collect_selected_leaves(&tree, key, path.clone(), &mut out);
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Toggles the select-all switch at `path` and returns its new state.
    ///
    /// If the node reads selected while an ancestor's switch is on, the
    /// ancestor switches along the way are split first: each goes off and
    /// its children are switched on individually.
    pub fn toggle_select_all(&self, path: &Path) -> Result<bool> {
        let _span = tracing::trace_span!(target: targets::SELECTION, span_names::TOGGLE, %path).entered();

        let mut log = WriteLog::default();
        let selected = {
            let mut tree = self.tree.write();
            let (key, ancestors) = self.lineage(&tree, path)?;

            let claimed_by_ancestor = ancestors.iter().any(|&a| tree.value(a).selected);
            if tree.value(key).selected && claimed_by_ancestor {
                propagate::release_ancestor_switches(&mut tree, &ancestors, &mut log);
            }

            let selected = !tree.value(key).selected;
            tree.value_mut(key).user_selected = selected;
            let delta = propagate::propagate_down(&mut tree, key, selected, &mut log);
            propagate::apply_delta(&mut tree, &ancestors, delta, &mut log);
            tracing::trace!(target: targets::SELECTION, selected, delta, "toggled");
            selected
        };

        self.deliver(path, log);
        Ok(selected)
    }

    /// Forces the subtree at `path` off and clears every remembered toggle
    /// in it.
    ///
    /// Ancestor switches covering `path` are split first, so the rest of
    /// their subtrees stays selected.
    pub fn deselect_all(&self, path: &Path) -> Result<()> {
        let _span = tracing::trace_span!(target: targets::SELECTION, span_names::DESELECT, %path).entered();

        let mut log = WriteLog::default();
        {
            let mut tree = self.tree.write();
            let (key, ancestors) = self.lineage(&tree, path)?;
            propagate::release_ancestor_switches(&mut tree, &ancestors, &mut log);
            let delta = propagate::clear_subtree(&mut tree, key, &mut log);
            propagate::apply_delta(&mut tree, &ancestors, delta, &mut log);
            tracing::trace!(target: targets::SELECTION, delta, "deselected subtree");
        }

        self.deliver(path, log);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Attaches observers to the selected state and/or the selected-leaf
    /// count of the node at `path`.
    pub fn subscribe(
        &self,
        path: &Path,
        on_selected: Option<SelectedObserver>,
        on_count: Option<CountObserver>,
    ) -> Result<Subscription> {
        let observers = self.observers(path)?;
        let mut connections = Vec::with_capacity(2);
        if let Some(on_selected) = on_selected {
            let id = observers.selected.connect(move |&selected| on_selected(selected));
            connections.push((ObservedField::Selected, id));
        }
        if let Some(on_count) = on_count {
            let id = observers.count.connect(move |&count| on_count(count));
            connections.push((ObservedField::Count, id));
        }
        Ok(Subscription {
            path: path.clone(),
            connections,
        })
    }

    /// Attaches an observer to the selected state of the node at `path`.
    pub fn subscribe_selected<F>(&self, path: &Path, on_selected: F) -> Result<Subscription>
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.subscribe(path, Some(Box::new(on_selected)), None)
    }

    /// Attaches an observer to the selected-leaf count of the node at `path`.
    pub fn subscribe_count<F>(&self, path: &Path, on_count: F) -> Result<Subscription>
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.subscribe(path, None, Some(Box::new(on_count)))
    }

    /// Attaches an observer called with `(selected, count)` after a write to
    /// either field of the node at `path`.
    pub fn subscribe_combined<F>(&self, path: &Path, on_either: F) -> Result<Subscription>
    where
        F: Fn(bool, usize) + Send + Sync + 'static,
    {
        let observers = self.observers(path)?;
        let id = observers
            .combined
            .connect(move |&(selected, count)| on_either(selected, count));
        Ok(Subscription {
            path: path.clone(),
            connections: vec![(ObservedField::Combined, id)],
        })
    }

    /// Attaches a renderer observer receiving the display state and the
    /// formatted count label, and calls it once with the current values.
    pub fn subscribe_label<F>(&self, path: &Path, on_label: F) -> Result<Subscription>
    where
        F: Fn(SelectionDisplay, String) + Send + Sync + 'static,
    {
        let format = self.config.count_label.clone();
        let on_label = Arc::new(move |selected: bool, count: usize| {
            on_label(SelectionDisplay::from_parts(selected, count), format.format(count));
        });

        let (selected, count) = self.get(path)?;
        let observer = Arc::clone(&on_label);
        let subscription = self.subscribe_combined(path, move |s, c| observer(s, c))?;
        on_label(selected, count);
        Ok(subscription)
    }

    /// Detaches the observers registered by `subscription`.
    ///
    /// Returns `false` if none were attached any more, e.g. because the
    /// node has been deleted.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let observers = {
            let tree = self.tree.read();
            match tree.resolve(&subscription.path) {
                Ok(key) if !tree.value(key).deleted => Arc::clone(&tree.value(key).observers),
                _ => return false,
            }
        };

        let mut removed = false;
        for &(field, id) in &subscription.connections {
            removed |= match field {
                ObservedField::Selected => observers.selected.disconnect(id),
                ObservedField::Count => observers.count.disconnect(id),
                ObservedField::Combined => observers.combined.disconnect(id),
            };
        }
        removed
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    pub(crate) fn read_tree(&self) -> RwLockReadGuard<'_, StateTree> {
        self.tree.read()
    }

    /// Resolves `path` to a live node and its strict ancestors.
    fn lineage(&self, tree: &StateTree, path: &Path) -> Result<(NodeKey, Vec<NodeKey>)> {
        let (key, ancestors) = tree
            .resolve_lineage(path)
            .map_err(|err| self.invalid_path(err))?;
        if tree.value(key).deleted || ancestors.iter().any(|&a| tree.value(a).deleted) {
            return Err(Error::deleted(path));
        }
        Ok((key, ancestors))
    }

    fn invalid_path(&self, err: Error) -> Error {
        if self.config.strict_paths {
            panic!("selection tree used with an invalid path: {err}");
        }
        tracing::error!(target: targets::SELECTION, error = %err, "invalid path");
        err
    }

    fn observers(&self, path: &Path) -> Result<Arc<NodeObservers>> {
        let tree = self.tree.read();
        let (key, _) = self.lineage(&tree, path)?;
        Ok(Arc::clone(&tree.value(key).observers))
    }

    fn deliver(&self, origin: &Path, log: WriteLog) {
        if log.len() == 0 {
            return;
        }
        let _span = tracing::trace_span!(
            target: targets::SELECTION,
            span_names::DISPATCH,
            %origin,
            writes = log.len(),
            depth = self.dispatch.depth()
        )
        .entered();
        self.dispatch.deliver(origin, log);
    }
}

fn collect_selected_leaves(tree: &StateTree, key: NodeKey, path: Path, out: &mut Vec<Path>) {
    let node = tree.value(key);
    if node.deleted || node.selected_leaves == 0 {
        return;
    }

    let children = tree.children_of(key);
    if children.is_empty() {
        out.push(path);
        return;
    }
    for (index, &child) in children.iter().enumerate() {
        collect_selected_leaves(tree, child, path.child(index), out);
    }
}
