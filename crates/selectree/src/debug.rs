//! Text dumps of a selection tree.
//!
//! ```
//! use selectree::{Path, SelectionState, SelectionTreeDebug};
//! use selectree_core::{TreeFormatOptions, TreeStyle};
//!
//! let state = SelectionState::new();
//! let nouns = state.add_node(&Path::root())?;
//! state.add_node(&nouns)?;
//! state.toggle_select_all(&nouns)?;
//!
//! let options = TreeFormatOptions { style: TreeStyle::Ascii, ..Default::default() };
//! let dump = SelectionTreeDebug::new(&state).with_options(options).format_tree();
//! assert_eq!(dump, "[-] / (1)\n`-- [x] /0 (1) user\n   `-- [x] /0/0 (1)\n");
//! # Ok::<(), selectree::Error>(())
//! ```

use std::fmt::{self, Write as _};

use selectree_core::{PerfSpan, TreeFormatOptions};

use crate::error::Result;
use crate::path::Path;
use crate::selection::{SelectionDisplay, SelectionState, StateTree};
use crate::tree::NodeKey;

/// Renders a [`SelectionState`] as an indented tree.
///
/// Each line shows the display marker (`[x]` selected, `[-]` partially
/// selected, `[ ]` unselected), the node path, the selected-leaf count and,
/// with `show_flags`, whether the node's own toggle is on.
pub struct SelectionTreeDebug<'a> {
    state: &'a SelectionState,
    options: TreeFormatOptions,
}

impl<'a> SelectionTreeDebug<'a> {
    pub fn new(state: &'a SelectionState) -> Self {
        Self {
            state,
            options: TreeFormatOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TreeFormatOptions) -> Self {
        self.options = options;
        self
    }

    /// Formats the whole tree.
    pub fn format_tree(&self) -> String {
        let _perf = PerfSpan::new("format_tree");
        let tree = self.state.read_tree();
        let mut out = String::new();
        self.write_node(&tree, tree.root_key(), &Path::root(), &mut Vec::new(), &mut out);
        out
    }

    /// Formats the subtree rooted at `path`.
    pub fn format_subtree(&self, path: &Path) -> Result<String> {
        let tree = self.state.read_tree();
        let key = tree.resolve(path)?;
        let mut out = String::new();
        self.write_node(&tree, key, path, &mut Vec::new(), &mut out);
        Ok(out)
    }

    fn write_node(
        &self,
        tree: &StateTree,
        key: NodeKey,
        path: &Path,
        lineage: &mut Vec<bool>,
        out: &mut String,
    ) {
        let node = tree.value(key);
        if node.deleted && !self.options.show_deleted {
            return;
        }

        let marker = match SelectionDisplay::from_parts(node.selected, node.selected_leaves) {
            SelectionDisplay::Selected => "[x]",
            SelectionDisplay::Partial => "[-]",
            SelectionDisplay::Unselected => "[ ]",
        };
        out.push_str(&self.options.prefix(lineage));
        out.push_str(marker);
        if self.options.show_paths {
            let _ = write!(out, " {path}");
        }
        let _ = write!(out, " ({})", node.selected_leaves);
        if self.options.show_flags {
            if node.user_selected {
                out.push_str(" user");
            }
            if node.deleted {
                out.push_str(" deleted");
            }
        }
        out.push('\n');

        if self.options.max_depth.is_some_and(|max| lineage.len() >= max) {
            return;
        }

        let children: Vec<(usize, NodeKey)> = tree
            .children_of(key)
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, child)| self.options.show_deleted || !tree.value(child).deleted)
            .collect();
        let last = children.len().saturating_sub(1);
        for (position, (index, child)) in children.into_iter().enumerate() {
            lineage.push(position == last);
            self.write_node(tree, child, &path.child(index), lineage, out);
            lineage.pop();
        }
    }
}

impl fmt::Display for SelectionTreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_tree())
    }
}
