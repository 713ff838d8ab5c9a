//! Generic N-ary tree addressed by [`Path`].
//!
//! `AddressableTree` stores its nodes in an arena and identifies them to
//! callers by the child indices leading to them. Children are appended in
//! creation order and never removed, so a path handed out once keeps
//! addressing the same node for the lifetime of the tree.

use slotmap::{SlotMap, new_key_type};

use selectree_core::logging::targets;

use crate::error::{Error, Result};
use crate::path::Path;

new_key_type! {
    /// Arena key of a tree node.
    pub(crate) struct NodeKey;
}

/// A node in the tree structure.
struct TreeNode<V> {
    value: V,
    children: Vec<NodeKey>,
}

impl<V> TreeNode<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }
}

/// A tree of values addressed by [`Path`].
///
/// # Example
///
/// ```
/// use selectree::{AddressableTree, Path};
///
/// let mut tree = AddressableTree::new("vocabulary");
/// let nouns = tree.add_child(&Path::root(), "nouns")?;
/// let animals = tree.add_child(&nouns, "animals")?;
///
/// assert_eq!(*tree.get(&animals)?, "animals");
/// assert_eq!(tree.child_paths(&Path::root())?, vec![nouns.clone()]);
/// assert_eq!(tree.ancestor_chain(&animals)?, vec![Path::root(), nouns, animals]);
/// # Ok::<(), selectree::Error>(())
/// ```
pub struct AddressableTree<V> {
    nodes: SlotMap<NodeKey, TreeNode<V>>,
    root: NodeKey,
}

impl<V> AddressableTree<V> {
    /// Creates a tree holding only a root node.
    pub fn new(root_value: V) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(TreeNode::new(root_value));
        Self { nodes, root }
    }

    /// Appends a child under `parent` and returns the child's path.
    pub fn add_child(&mut self, parent: &Path, value: V) -> Result<Path> {
        let parent_key = self.resolve(parent)?;
        let index = self.nodes[parent_key].children.len();
        let key = self.nodes.insert(TreeNode::new(value));
        self.nodes[parent_key].children.push(key);

        let path = parent.child(index);
        tracing::trace!(target: targets::TREE, %path, "node added");
        Ok(path)
    }

    /// Returns the value at `path`.
    pub fn get(&self, path: &Path) -> Result<&V> {
        let key = self.resolve(path)?;
        Ok(&self.nodes[key].value)
    }

    /// Returns the value at `path` mutably.
    pub fn get_mut(&mut self, path: &Path) -> Result<&mut V> {
        let key = self.resolve(path)?;
        Ok(&mut self.nodes[key].value)
    }

    /// Returns `true` if `path` resolves to a node.
    pub fn contains(&self, path: &Path) -> bool {
        self.resolve(path).is_ok()
    }

    /// Number of children of the node at `path`.
    pub fn child_count(&self, path: &Path) -> Result<usize> {
        let key = self.resolve(path)?;
        Ok(self.nodes[key].children.len())
    }

    /// The paths of the immediate children of the node at `path`.
    pub fn child_paths(&self, path: &Path) -> Result<Vec<Path>> {
        let count = self.child_count(path)?;
        Ok((0..count).map(|index| path.child(index)).collect())
    }

    /// The paths from the root to `path`, inclusive, root first.
    pub fn ancestor_chain(&self, path: &Path) -> Result<Vec<Path>> {
        self.resolve(path)?;
        Ok(path.prefixes().collect())
    }

    /// Returns `true` if the node at `path` has no children.
    pub fn is_leaf(&self, path: &Path) -> Result<bool> {
        Ok(self.child_count(path)? == 0)
    }

    /// Total number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The paths of the subtree at `path`, children before their parent.
    pub fn walk_post_order(&self, path: &Path) -> Result<Vec<Path>> {
        let key = self.resolve(path)?;
        let mut out = Vec::new();
        self.post_order_into(key, path.clone(), &mut out);
        Ok(out)
    }

    fn post_order_into(&self, key: NodeKey, path: Path, out: &mut Vec<Path>) {
        for (index, &child) in self.nodes[key].children.iter().enumerate() {
            self.post_order_into(child, path.child(index), out);
        }
        out.push(path);
    }

    // ------------------------------------------------------------------
    // Key-level access for the selection engine. Keys are never removed
    // from the arena, so indexing with a resolved key cannot fail.
    // ------------------------------------------------------------------

    /// Resolves `path` to its arena key.
    pub(crate) fn resolve(&self, path: &Path) -> Result<NodeKey> {
        let mut key = self.root;
        for &index in path.indices() {
            key = *self.nodes[key]
                .children
                .get(index)
                .ok_or_else(|| Error::not_found(path))?;
        }
        Ok(key)
    }

    /// Resolves `path` to its arena key together with the keys of its
    /// strict ancestors, root first.
    pub(crate) fn resolve_lineage(&self, path: &Path) -> Result<(NodeKey, Vec<NodeKey>)> {
        let mut key = self.root;
        let mut ancestors = Vec::with_capacity(path.depth());
        for &index in path.indices() {
            ancestors.push(key);
            key = *self.nodes[key]
                .children
                .get(index)
                .ok_or_else(|| Error::not_found(path))?;
        }
        Ok((key, ancestors))
    }

    pub(crate) fn root_key(&self) -> NodeKey {
        self.root
    }

    pub(crate) fn value(&self, key: NodeKey) -> &V {
        &self.nodes[key].value
    }

    pub(crate) fn value_mut(&mut self, key: NodeKey) -> &mut V {
        &mut self.nodes[key].value
    }

    pub(crate) fn children_of(&self, key: NodeKey) -> &[NodeKey] {
        &self.nodes[key].children
    }
}

impl<V: Default> Default for AddressableTree<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}
