//! Tests for observer delivery and re-entrant calls from observers.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use common::{assert_invariants, categories, lenient_state};
use selectree::{Error, Path, SelectionDisplay};

#[test]
fn test_count_observers_on_ancestors() {
    let state = lenient_state();
    let tree = categories(&state, &[3, 2]);
    let counts = Arc::new(Mutex::new(Vec::new()));

    let counts_clone = counts.clone();
    state
        .subscribe_count(&Path::root(), move |count| counts_clone.lock().push(count))
        .unwrap();

    state.toggle_select_all(&tree[0].0).unwrap();
    state.toggle_select_all(&tree[1].1[0]).unwrap();
    state.deselect_all(&tree[0].0).unwrap();

    assert_eq!(*counts.lock(), vec![3, 4, 1]);
}

#[test]
fn test_selected_observers_fire_on_every_write() {
    let state = lenient_state();
    let tree = categories(&state, &[2]);
    let (cat, leaves) = &tree[0];
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_clone = seen.clone();
    state
        .subscribe_selected(&leaves[0], move |selected| seen_clone.lock().push(selected))
        .unwrap();

    state.toggle_select_all(&leaves[0]).unwrap();
    // The leaf is already on; the enclosing switch still writes it.
    state.toggle_select_all(cat).unwrap();

    assert_eq!(*seen.lock(), vec![true, true]);
}

#[test]
fn test_combined_observer_sees_both_fields() {
    let state = lenient_state();
    let tree = categories(&state, &[2]);
    let (cat, _) = &tree[0];
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_clone = seen.clone();
    state
        .subscribe_combined(cat, move |selected, count| seen_clone.lock().push((selected, count)))
        .unwrap();

    state.toggle_select_all(cat).unwrap();

    let seen = seen.lock();
    assert_eq!(seen.last(), Some(&(true, 2)));
    assert!(seen.len() >= 2);
}

#[test]
fn test_observers_run_after_the_operation_finishes() {
    let state = Arc::new(lenient_state());
    let tree = categories(&state, &[3, 2]);
    let observed_root = Arc::new(Mutex::new(Vec::new()));

    // The first leaf is written long before the root during the walk.
    let state_clone = state.clone();
    let observed_clone = observed_root.clone();
    state
        .subscribe_count(&tree[0].1[0], move |_| {
            observed_clone.lock().push(state_clone.get(&Path::root()).unwrap());
        })
        .unwrap();

    state.toggle_select_all(&Path::root()).unwrap();

    assert!(!observed_root.lock().is_empty());
    assert!(observed_root.lock().iter().all(|&root| root == (true, 5)));
}

#[test]
fn test_observer_may_toggle_other_nodes() {
    let state = Arc::new(lenient_state());
    let tree = categories(&state, &[2, 2]);
    let (cat1, cat2) = (tree[0].0.clone(), tree[1].0.clone());
    let fired = Arc::new(AtomicBool::new(false));

    let state_clone = state.clone();
    let fired_clone = fired.clone();
    let cat2_clone = cat2.clone();
    state
        .subscribe_selected(&cat1, move |selected| {
            if selected && !fired_clone.swap(true, Ordering::SeqCst) {
                state_clone.toggle_select_all(&cat2_clone).unwrap();
            }
        })
        .unwrap();

    state.toggle_select_all(&cat1).unwrap();

    assert!(fired.load(Ordering::SeqCst));
    assert_eq!(state.get(&cat2).unwrap(), (true, 2));
    assert_eq!(state.get(&Path::root()).unwrap(), (false, 4));
    assert_invariants(&state);
}

#[test]
fn test_deleting_the_dispatching_branch_is_rejected() {
    let state = Arc::new(lenient_state());
    let tree = categories(&state, &[2, 2]);
    let (cat1, cat2) = (tree[0].0.clone(), tree[1].0.clone());
    let results = Arc::new(Mutex::new(Vec::new()));

    let state_clone = state.clone();
    let results_clone = results.clone();
    let leaf = tree[0].1[0].clone();
    state
        .subscribe_selected(&leaf, move |_| {
            let own = state_clone.delete_node(&cat1);
            let root = state_clone.delete_node(&Path::root());
            let unrelated = state_clone.delete_node(&cat2);
            results_clone.lock().push((own, root, unrelated));
        })
        .unwrap();

    state.toggle_select_all(&leaf).unwrap();

    let results = results.lock();
    assert_eq!(results.len(), 1);
    let (own, root, unrelated) = &results[0];
    assert!(matches!(own, Err(Error::ReentrantMutation { path }) if *path == tree[0].0));
    assert!(matches!(root, Err(Error::ReentrantMutation { .. })));
    assert!(unrelated.is_ok());

    assert!(state.get(&tree[1].0).unwrap_err().is_deleted());
    assert_eq!(state.get(&tree[0].0).unwrap(), (false, 1));
    assert_invariants(&state);

    // Outside of delivery the same delete goes through.
    state.delete_node(&tree[0].0).unwrap();
    assert_eq!(state.get(&Path::root()).unwrap(), (false, 0));
}

#[test]
fn test_delete_detaches_observers() {
    let state = lenient_state();
    let tree = categories(&state, &[2, 1]);
    let (cat, leaves) = &tree[0];
    state.toggle_select_all(&leaves[0]).unwrap();

    let leaf_calls = Arc::new(AtomicUsize::new(0));
    let root_counts = Arc::new(Mutex::new(Vec::new()));

    let leaf_clone = leaf_calls.clone();
    let subscription = state
        .subscribe_count(&leaves[0], move |_| {
            leaf_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    let root_clone = root_counts.clone();
    state
        .subscribe_count(&Path::root(), move |count| root_clone.lock().push(count))
        .unwrap();

    state.delete_node(cat).unwrap();

    assert_eq!(leaf_calls.load(Ordering::SeqCst), 0);
    assert_eq!(*root_counts.lock(), vec![0]);
    assert!(!state.unsubscribe(&subscription));
    assert!(state.subscribe_count(&leaves[0], |_| {}).unwrap_err().is_deleted());
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let state = lenient_state();
    let tree = categories(&state, &[2]);
    let calls = Arc::new(AtomicUsize::new(0));

    let calls_clone = calls.clone();
    let subscription = state
        .subscribe(
            &tree[0].0,
            Some(Box::new(move |_| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            })),
            None,
        )
        .unwrap();

    state.toggle_select_all(&tree[0].0).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(state.unsubscribe(&subscription));
    state.toggle_select_all(&tree[0].0).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_label_observer_tracks_display() {
    let state = lenient_state();
    let tree = categories(&state, &[2]);
    let (cat, leaves) = &tree[0];
    let labels = Arc::new(Mutex::new(Vec::new()));

    let labels_clone = labels.clone();
    state
        .subscribe_label(cat, move |display, label| labels_clone.lock().push((display, label)))
        .unwrap();

    state.toggle_select_all(&leaves[1]).unwrap();
    state.toggle_select_all(cat).unwrap();

    let labels = labels.lock();
    assert_eq!(labels.first(), Some(&(SelectionDisplay::Unselected, String::new())));
    assert!(labels.contains(&(SelectionDisplay::Partial, "(1)".to_string())));
    assert_eq!(labels.last(), Some(&(SelectionDisplay::Selected, "(2)".to_string())));
}

#[test]
fn test_resubscribing_keeps_subscription_order() {
    let state = lenient_state();
    let tree = categories(&state, &[2]);
    let (cat, _) = &tree[0];
    let calls = Arc::new(Mutex::new(Vec::new()));

    let subscribe = |name: &'static str| {
        let calls = calls.clone();
        state
            .subscribe_selected(cat, move |_| calls.lock().push(name))
            .unwrap()
    };
    let first = subscribe("first");
    subscribe("second");
    assert!(state.unsubscribe(&first));
    subscribe("third");

    state.toggle_select_all(cat).unwrap();

    assert_eq!(*calls.lock(), vec!["second", "third"]);
}
