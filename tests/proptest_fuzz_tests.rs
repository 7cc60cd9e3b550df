//! Property-based fuzzing tests for the pietc pipeline
//!
//! These tests use proptest to generate random grids and stacks and verify
//! that:
//! 1. The region partition is total and its counts agree with the grid
//! 2. Region resolution is deterministic under concurrency
//! 3. The stack machine's roll matches a reference rotation
//! 4. Compilation never panics on arbitrary grids

use pietc::runtime::Stack;
use pietc::{compile, CodelGrid, RegionGraph, RegionMap, ResolveConfig};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Characters of the ASCII grid notation, weighted toward structure
fn codel_char() -> impl Strategy<Value = char> {
    prop_oneof![
        4 => prop::sample::select(vec!['R', 'Y', 'G', 'C', 'B', 'M']),
        2 => prop::sample::select(vec!['r', 'y', 'g', '1', '4', '6']),
        2 => Just('.'),
        1 => Just('#'),
        1 => Just('?'),
    ]
}

/// Random rectangular grids up to 12x12
fn arbitrary_grid() -> impl Strategy<Value = CodelGrid> {
    (1usize..12, 1usize..12)
        .prop_flat_map(|(w, h)| prop::collection::vec(codel_char(), w * h).prop_map(move |cells| {
            let art: String = cells
                .chunks(w)
                .map(|row| row.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join("\n");
            CodelGrid::from_ascii(&art).expect("generated grid is rectangular")
        }))
}

// =============================================================================
// REGION MAP PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn every_colored_cell_joins_exactly_one_region(grid in arbitrary_grid()) {
        let map = RegionMap::build(&grid);
        let mut counted = vec![0usize; map.region_count()];
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                match map.id_at(x, y) {
                    Some(id) => {
                        prop_assert!(grid.get(x, y).is_colored());
                        prop_assert!(id < map.region_count());
                        prop_assert_eq!(map.color(id), grid.get(x, y));
                        counted[id] += 1;
                    }
                    None => prop_assert!(!grid.get(x, y).is_colored()),
                }
            }
        }
        for (id, &count) in counted.iter().enumerate() {
            prop_assert_eq!(count, map.size(id), "region {} count mismatch", id);
            prop_assert!(count > 0, "region {} has no cells", id);
        }
    }

    #[test]
    fn region_resolution_is_deterministic_under_concurrency(grid in arbitrary_grid()) {
        let sequential =
            RegionGraph::build_with(&grid, &ResolveConfig { threads: 1 }).unwrap();
        let parallel =
            RegionGraph::build_with(&grid, &ResolveConfig { threads: 4 }).unwrap();
        prop_assert_eq!(sequential, parallel);
    }

    #[test]
    fn compilation_never_panics(grid in arbitrary_grid()) {
        let blocks = compile(&grid).unwrap();
        prop_assert!(blocks.len() >= 1);
    }
}

// =============================================================================
// STACK MACHINE PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn roll_matches_reference_rotation(
        values in prop::collection::vec(-100i32..100, 0..12),
        depth in 0i32..14,
        iter in -20i32..20,
    ) {
        let mut stack = Stack::new();
        stack.push_run(&values);
        stack.push(depth);
        stack.push(iter);
        stack.roll();

        let mut expected = values.clone();
        if depth as usize <= values.len() {
            if depth > 0 {
                let window = expected.len() - depth as usize;
                expected[window..].rotate_right(iter.rem_euclid(depth) as usize);
            }
        } else {
            expected.push(depth);
            expected.push(iter);
        }
        prop_assert_eq!(stack.values(), expected.as_slice());
    }

    #[test]
    fn binary_ops_never_lose_or_invent_values(
        values in prop::collection::vec(-50i32..50, 0..6),
    ) {
        for op in 0..6 {
            let mut stack = Stack::new();
            stack.push_run(&values);
            match op {
                0 => stack.add(),
                1 => stack.sub(),
                2 => stack.mul(),
                3 => stack.div(),
                4 => stack.modulo(),
                _ => stack.greater(),
            }
            let expected = match values.len() {
                n if n >= 2 => n - 1, // merged, or restored to n on failure
                n => n,               // untouched on underflow
            };
            prop_assert!(stack.len() == expected || stack.len() == expected + 1);
        }
    }
}
