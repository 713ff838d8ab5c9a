//! Randomized checks of the count and selected-flag invariants.

mod common;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use common::{assert_invariants, lenient_state, live_paths};
use selectree::{Path, SelectionState};

fn random_tree(state: &SelectionState, rng: &mut StdRng, nodes: usize) {
    for _ in 0..nodes {
        let paths = live_paths(state);
        let parent = paths.choose(rng).unwrap();
        state.add_node(parent).unwrap();
    }
}

fn random_operation(state: &SelectionState, rng: &mut StdRng) {
    let paths = live_paths(state);
    let path = paths.choose(rng).unwrap().clone();
    match rng.gen_range(0..100) {
        0..=54 => {
            state.toggle_select_all(&path).unwrap();
        }
        55..=69 => state.deselect_all(&path).unwrap(),
        70..=91 => {
            state.add_node(&path).unwrap();
        }
        _ if !path.is_root() => state.delete_node(&path).unwrap(),
        _ => {}
    }
}

#[test]
fn test_invariants_hold_under_random_operations() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = lenient_state();
        random_tree(&state, &mut rng, 12);

        for _ in 0..150 {
            random_operation(&state, &mut rng);
            assert_invariants(&state);
        }
    }
}

#[test]
fn test_double_toggle_without_live_ancestor_is_identity() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(1000 + seed);
        let state = lenient_state();
        random_tree(&state, &mut rng, 15);
        for _ in 0..20 {
            random_operation(&state, &mut rng);
        }

        for path in live_paths(&state) {
            let claimed = path
                .prefixes()
                .filter(|prefix| *prefix != path)
                .any(|prefix| state.get(&prefix).unwrap().0);
            if claimed {
                continue;
            }

            let before: Vec<_> = live_paths(&state)
                .iter()
                .map(|p| state.node_snapshot(p).unwrap())
                .collect();
            state.toggle_select_all(&path).unwrap();
            state.toggle_select_all(&path).unwrap();
            let after: Vec<_> = live_paths(&state)
                .iter()
                .map(|p| state.node_snapshot(p).unwrap())
                .collect();

            assert_eq!(before, after, "seed {seed}, path {path}");
        }
    }
}

#[test]
fn test_toggle_under_live_ancestor_frees_the_branch() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(2000 + seed);
        let state = lenient_state();
        random_tree(&state, &mut rng, 15);
        state.toggle_select_all(&Path::root()).unwrap();

        let paths = live_paths(&state);
        let path = paths.choose(&mut rng).unwrap();
        if path.is_root() {
            continue;
        }
        let (_, total) = state.get(&Path::root()).unwrap();
        let (_, own) = state.get(path).unwrap();

        assert!(!state.toggle_select_all(path).unwrap());

        assert_eq!(state.get(path).unwrap(), (false, 0));
        assert_eq!(state.get(&Path::root()).unwrap(), (false, total - own));
        for ancestor in path.prefixes().filter(|prefix| prefix != path) {
            assert!(!state.get(&ancestor).unwrap().0, "seed {seed}, ancestor {ancestor}");
        }
        assert_invariants(&state);
    }
}
