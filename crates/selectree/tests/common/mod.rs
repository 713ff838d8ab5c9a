//! Shared helpers for the selectree integration tests.

#![allow(dead_code)]

use selectree::{Path, SelectionConfig, SelectionState};

/// Routes `selectree` logs to the test output. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("selectree=debug")
        .with_test_writer()
        .try_init();
}

/// A state that reports invalid paths as errors instead of panicking.
pub fn lenient_state() -> SelectionState {
    init_tracing();
    SelectionState::with_config(SelectionConfig::default().with_strict_paths(false))
}

/// Adds `leaves[i]` leaves under each of `leaves.len()` new categories
/// below the root. Returns the category paths and their leaf paths.
pub fn categories(state: &SelectionState, leaves: &[usize]) -> Vec<(Path, Vec<Path>)> {
    leaves
        .iter()
        .map(|&count| {
            let category = state.add_node(&Path::root()).unwrap();
            let children = (0..count).map(|_| state.add_node(&category).unwrap()).collect();
            (category, children)
        })
        .collect()
}

/// Every node that is neither deleted nor below a deleted node, pre-order.
pub fn live_paths(state: &SelectionState) -> Vec<Path> {
    let mut out = Vec::new();
    let mut stack = vec![Path::root()];
    while let Some(path) = stack.pop() {
        let children = match state.child_paths(&path) {
            Ok(children) => children,
            Err(err) if err.is_deleted() => continue,
            Err(err) => panic!("unexpected error at {path}: {err}"),
        };
        stack.extend(children.into_iter().rev());
        out.push(path);
    }
    out
}

/// Checks the count and selected-flag invariants over the whole tree.
pub fn assert_invariants(state: &SelectionState) {
    check_node(state, &Path::root(), false);
}

fn check_node(state: &SelectionState, path: &Path, parent_selected: bool) -> Option<usize> {
    let node = match state.node_snapshot(path) {
        Ok(node) => node,
        Err(err) if err.is_deleted() => return None,
        Err(err) => panic!("unexpected error at {path}: {err}"),
    };

    assert_eq!(
        node.selected,
        node.user_selected || parent_selected,
        "selected flag at {path}"
    );

    let mut sum = 0;
    for child in state.child_paths(path).unwrap() {
        sum += check_node(state, &child, node.selected).unwrap_or(0);
    }
    let expected = if node.is_leaf {
        usize::from(node.selected)
    } else {
        sum
    };
    assert_eq!(node.selected_leaves, expected, "selected leaf count at {path}");
    assert_eq!(state.get(path).unwrap(), (node.selected, node.selected_leaves));
    Some(node.selected_leaves)
}
