//! Paths for addressing nodes in an [`AddressableTree`](crate::AddressableTree).
//!
//! A [`Path`] is the sequence of child indices leading from the root to a
//! node. The empty path is the root. Paths are plain values: cloning one
//! never aliases another, and a path stays meaningful for as long as the
//! tree lives because child indices are never reassigned.

use std::fmt;

/// The position of a node, as child indices from the root.
///
/// # Example
///
/// ```
/// use selectree::Path;
///
/// let category = Path::root().child(1);
/// let item = category.child(0);
///
/// assert_eq!(item.indices(), &[1, 0]);
/// assert_eq!(item.parent(), Some(category.clone()));
/// assert!(category.is_ancestor_of(&item));
/// assert_eq!(item.to_string(), "/1/0");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<usize>);

impl Path {
    /// The root path.
    #[inline]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Creates a path from child indices.
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    /// Returns `true` if this is the root path.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of indices in the path (0 for the root).
    #[inline]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The child indices, root first.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// The index of this node within its parent, or `None` for the root.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        self.0.split_last().map(|(_, rest)| Path(rest.to_vec()))
    }

    /// The path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Path {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Path(indices)
    }

    /// Appends `tail`'s indices after `head`'s.
    pub fn concat(head: &Path, tail: &Path) -> Path {
        let mut indices = Vec::with_capacity(head.0.len() + tail.0.len());
        indices.extend_from_slice(&head.0);
        indices.extend_from_slice(&tail.0);
        Path(indices)
    }

    /// Returns `true` if `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns `true` if this path is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.starts_with(self)
    }

    /// The paths from the root down to this path, inclusive.
    pub fn prefixes(&self) -> impl Iterator<Item = Path> + '_ {
        (0..=self.0.len()).map(move |len| Path(self.0[..len].to_vec()))
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}
