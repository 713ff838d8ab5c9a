//! Logging and debugging facilities for selectree.
//!
//! This module provides:
//! - Target and span names for the `tracing` instrumentation
//! - Formatting options shared by the tree debug visualizers
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! selectree uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("selectree=debug")
//!         .init();
//! }
//! ```

/// Span names used throughout selectree for tracing.
pub mod span_names {
    /// Toggle of a select-all switch.
    pub const TOGGLE: &str = "selectree::toggle";
    /// Deselect-all of a subtree.
    pub const DESELECT: &str = "selectree::deselect";
    /// Cascading node deletion.
    pub const DELETE: &str = "selectree::delete";
    /// Observer dispatch after a mutation.
    pub const DISPATCH: &str = "selectree::dispatch";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/observer target.
    pub const SIGNAL: &str = "selectree_core::signal";
    /// Addressable tree target.
    pub const TREE: &str = "selectree::tree";
    /// Selection engine target.
    pub const SELECTION: &str = "selectree::selection";
    /// Configuration loading target.
    pub const CONFIG: &str = "selectree::config";
    /// Performance spans.
    pub const PERF: &str = "selectree::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

impl TreeStyle {
    /// The `(continuation, branch, last branch)` glyphs for this style.
    pub fn glyphs(self) -> (&'static str, &'static str, &'static str) {
        match self {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        }
    }
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show the path of each node.
    pub show_paths: bool,
    /// Whether to show the per-node state flags.
    pub show_flags: bool,
    /// Whether to show tombstoned nodes.
    pub show_deleted: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_paths: true,
            show_flags: true,
            show_deleted: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_deleted: true,
            ..Default::default()
        }
    }

    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_paths: false,
            show_flags: false,
            show_deleted: false,
            ..Default::default()
        }
    }

    /// Build the prefix string for a node.
    ///
    /// `lineage` holds one flag per level below the root, ending with the
    /// node itself: whether the node at that level is the last of its
    /// siblings. The root has an empty lineage and no prefix. Levels whose
    /// branch is already closed are padded with blanks instead of a
    /// continuation line.
    pub fn prefix(&self, lineage: &[bool]) -> String {
        let Some((&is_last, ancestors)) = lineage.split_last() else {
            return String::new();
        };

        let (continuation, branch, last) = self.style.glyphs();
        let mut prefix = String::new();

        for &closed in ancestors {
            if closed {
                prefix.extend(std::iter::repeat_n(' ', continuation.chars().count()));
            } else {
                prefix.push_str(continuation);
            }
            prefix.extend(std::iter::repeat_n(' ', self.indent_size));
        }

        prefix.push_str(if is_last { last } else { branch });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
