//! selectree - hierarchical select-all state for checkbox trees.
//!
//! Every node of a [`SelectionState`] is a "select all" switch for its
//! subtree and carries the number of selected leaves below it. Switch
//! states propagate down, counts propagate up, and observers attached to
//! individual nodes are told about every write.
//!
//! Nodes are addressed by [`Path`], the child indices leading from the
//! root. Nodes are appended, never reordered, and deletion leaves a
//! tombstone, so a path stays valid for the node it was issued for.
//!
//! # Example
//!
//! ```
//! use selectree::{Path, SelectionDisplay, SelectionState};
//!
//! let state = SelectionState::new();
//! let fruit = state.add_node(&Path::root())?;
//! let apple = state.add_node(&fruit)?;
//! let pear = state.add_node(&fruit)?;
//!
//! state.toggle_select_all(&apple)?;
//! assert_eq!(state.display_state(&fruit)?, SelectionDisplay::Partial);
//! assert_eq!(state.count_label(&fruit)?, "(1)");
//!
//! state.toggle_select_all(&fruit)?;
//! assert_eq!(state.selected_leaves(&Path::root())?, vec![apple, pear]);
//! # Ok::<(), selectree::Error>(())
//! ```

mod config;
mod debug;
mod error;
mod path;
pub mod selection;
mod tree;

pub use config::{COUNT_PLACEHOLDER, CountLabelFormat, SelectionConfig};
pub use debug::SelectionTreeDebug;
pub use error::{Error, Result};
pub use path::Path;
pub use selection::{
    CountObserver, NodeSnapshot, SelectedObserver, SelectionDisplay, SelectionState, Subscription,
};
pub use tree::AddressableTree;
