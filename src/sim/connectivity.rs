//! Ship part connectivity
//!
//! Parts form an implicit proximity graph: two parts are joined when their
//! local offsets are within the proximity threshold. A part is live when it can
//! reach any core part through that graph. The result is recomputed from the
//! current part list every time; no adjacency is cached across ticks.

use std::collections::VecDeque;

use glam::Vec2;

use super::state::{Part, Ship};

/// Which parts are reachable from a core part.
///
/// Breadth-first search seeded from every core at once. A part list with no
/// core yields all `false`.
pub fn connected_mask(parts: &[Part], proximity: f32) -> Vec<bool> {
    let mut connected = vec![false; parts.len()];
    let mut queue = VecDeque::with_capacity(parts.len());

    for (i, part) in parts.iter().enumerate() {
        if part.is_core() {
            connected[i] = true;
            queue.push_back(i);
        }
    }

    let max_dist_sq = proximity * proximity;
    while let Some(i) = queue.pop_front() {
        let from = parts[i].offset;
        for (j, other) in parts.iter().enumerate() {
            if connected[j] {
                continue;
            }
            if from.distance_squared(other.offset) <= max_dist_sq {
                connected[j] = true;
                queue.push_back(j);
            }
        }
    }

    connected
}

/// Whether the part at `index` has a proximity path to a core part.
///
/// An index past the end of the list is treated as disconnected.
pub fn is_connected(parts: &[Part], index: usize, proximity: f32) -> bool {
    if index >= parts.len() {
        return false;
    }
    connected_mask(parts, proximity)[index]
}

/// World position of a part (rotated by the ship heading, then translated)
#[inline]
pub fn world_position(ship: &Ship, part: &Part) -> Vec2 {
    ship.world_position(part)
}

/// Remove every non-core part that lost its path to a core.
///
/// Returns how many parts were pruned.
pub fn prune_disconnected(ship: &mut Ship, proximity: f32) -> usize {
    let mask = connected_mask(&ship.parts, proximity);
    let before = ship.parts.len();
    let mut idx = 0;
    ship.parts.retain(|part| {
        let keep = part.is_core() || mask[idx];
        idx += 1;
        keep
    });
    before - ship.parts.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PartKind;
    use proptest::prelude::*;

    const PROXIMITY: f32 = 45.0;

    fn part(x: f32, y: f32, kind: PartKind) -> Part {
        Part {
            offset: Vec2::new(x, y),
            kind,
            hp: 2,
            max_hp: 2,
            mass: 5.0,
            last_hit: None,
        }
    }

    fn default_layout() -> Vec<Part> {
        vec![
            part(0.0, 0.0, PartKind::Core),
            part(-30.0, 30.0, PartKind::Engine),
            part(30.0, 30.0, PartKind::Engine),
            part(0.0, -30.0, PartKind::Gun),
        ]
    }

    #[test]
    fn test_default_layout_fully_connected() {
        let parts = default_layout();
        for i in 0..parts.len() {
            assert!(is_connected(&parts, i, PROXIMITY), "part {} should be connected", i);
        }
    }

    #[test]
    fn test_removing_core_disconnects_everything() {
        let mut parts = default_layout();
        parts.remove(0);
        for i in 0..parts.len() {
            assert!(!is_connected(&parts, i, PROXIMITY));
        }
    }

    #[test]
    fn test_chain_through_intermediate_part() {
        // gun two hops away from the core through an engine
        let parts = vec![
            part(0.0, 0.0, PartKind::Core),
            part(40.0, 0.0, PartKind::Engine),
            part(80.0, 0.0, PartKind::Gun),
            part(200.0, 0.0, PartKind::Gun),
        ];
        assert!(is_connected(&parts, 2, PROXIMITY));
        assert!(!is_connected(&parts, 3, PROXIMITY));
    }

    #[test]
    fn test_any_core_counts() {
        let parts = vec![
            part(0.0, 0.0, PartKind::Core),
            part(500.0, 0.0, PartKind::Core),
            part(530.0, 0.0, PartKind::Engine),
        ];
        assert!(is_connected(&parts, 2, PROXIMITY));
    }

    #[test]
    fn test_out_of_range_index() {
        assert!(!is_connected(&default_layout(), 10, PROXIMITY));
        assert!(!is_connected(&[], 0, PROXIMITY));
    }

    #[test]
    fn test_prune_removes_dead_weight() {
        let mut ship = Ship::new(Vec2::ZERO, default_layout(), 100.0);
        ship.parts.push(part(300.0, 300.0, PartKind::Gun));
        assert_eq!(prune_disconnected(&mut ship, PROXIMITY), 1);
        assert_eq!(ship.parts.len(), 4);

        ship.parts.remove(0);
        assert_eq!(prune_disconnected(&mut ship, PROXIMITY), 3);
        assert!(ship.parts.is_empty());
    }

    fn arb_parts() -> impl Strategy<Value = Vec<Part>> {
        prop::collection::vec(
            (-150.0f32..150.0, -150.0f32..150.0, 0u8..3).prop_map(|(x, y, k)| {
                let kind = match k {
                    0 => PartKind::Core,
                    1 => PartKind::Engine,
                    _ => PartKind::Gun,
                };
                part(x, y, kind)
            }),
            0..12,
        )
    }

    proptest! {
        #[test]
        fn prop_cores_always_connected(parts in arb_parts()) {
            let mask = connected_mask(&parts, PROXIMITY);
            for (i, p) in parts.iter().enumerate() {
                if p.is_core() {
                    prop_assert!(mask[i]);
                }
            }
        }

        #[test]
        fn prop_connected_parts_have_connected_neighbor_or_are_core(parts in arb_parts()) {
            let mask = connected_mask(&parts, PROXIMITY);
            for (i, p) in parts.iter().enumerate() {
                if mask[i] && !p.is_core() {
                    let has_link = parts.iter().enumerate().any(|(j, q)| {
                        j != i && mask[j] && p.offset.distance(q.offset) <= PROXIMITY
                    });
                    prop_assert!(has_link);
                }
            }
        }

        #[test]
        fn prop_no_core_means_nothing_connected(parts in arb_parts()) {
            let coreless: Vec<Part> = parts.into_iter().filter(|p| !p.is_core()).collect();
            prop_assert!(connected_mask(&coreless, PROXIMITY).iter().all(|c| !c));
        }

        #[test]
        fn prop_pruning_is_idempotent(parts in arb_parts()) {
            let mut ship = Ship::new(Vec2::ZERO, parts, 100.0);
            prune_disconnected(&mut ship, PROXIMITY);
            prop_assert_eq!(prune_disconnected(&mut ship, PROXIMITY), 0);
        }
    }
}
