use eframe::egui::Vec2;

use super::{AttractionPolicy, RenderGraph, SimulationParameters};

/// Keeps the inverse-square repulsion finite when two notes land on the same
/// point.
const REPULSION_EPSILON: f32 = 1e-5;

const MOTION_THRESHOLD_SQ: f32 = 1e-6;

/// One crowding contribution on the node at `position` from a neighbor at
/// `other`. Points toward the neighbor; the negative repulsion strength turns
/// it into a push away. Antisymmetric between any pair of positions.
fn repulsion_term(position: Vec2, other: Vec2) -> Vec2 {
    let delta = other - position;
    delta / (delta.length_sq() + REPULSION_EPSILON)
}

/// Advances every node's velocity and position by one fixed time step.
///
/// Forces are accumulated into the scratch buffer first so the whole pass
/// reads a single position snapshot, then applied:
/// `velocity = (velocity + forces) * damping`, `position += velocity`.
/// Damping after the force sum is what lets the layout settle instead of
/// oscillating. Returns whether any node is still visibly moving.
pub(super) fn step_simulation(
    cache: &mut RenderGraph,
    params: SimulationParameters,
    policy: AttractionPolicy,
    center: Vec2,
) -> bool {
    let RenderGraph {
        nodes,
        index_by_id,
        forces,
    } = cache;

    let node_count = nodes.len();
    if node_count == 0 {
        return false;
    }

    forces.resize(node_count, Vec2::ZERO);
    forces.fill(Vec2::ZERO);

    for (index, force) in forces.iter_mut().enumerate() {
        let position = nodes[index].position;

        let mut repulsion = Vec2::ZERO;
        for (other_index, other) in nodes.iter().enumerate() {
            if other_index != index {
                repulsion += repulsion_term(position, other.position);
            }
        }

        // Link targets are resolved by id on every step; a dangling target
        // simply contributes nothing this frame.
        let mut attraction = Vec2::ZERO;
        for target in &nodes[index].links {
            let Some(&target_index) = index_by_id.get(target.as_str()) else {
                continue;
            };
            let delta = nodes[target_index].position - position;
            match policy {
                AttractionPolicy::SumAll => attraction += delta,
                AttractionPolicy::LastLinkWins => attraction = delta,
            }
        }

        let gravity = (center - position) * params.center_gravity;

        *force = repulsion * params.repulsion_strength
            + attraction * params.reference_attraction
            + gravity;
    }

    let mut any_motion = false;
    for (node, force) in nodes.iter_mut().zip(forces.iter()) {
        let mut velocity = (node.velocity + *force) * params.velocity_damping;
        if !velocity.x.is_finite() || !velocity.y.is_finite() {
            velocity = Vec2::ZERO;
        }

        node.velocity = velocity;
        node.position += velocity;
        if velocity.length_sq() > MOTION_THRESHOLD_SQ {
            any_motion = true;
        }
    }

    any_motion
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use eframe::egui::vec2;

    use super::*;
    use crate::app::RenderNode;
    use crate::util::seeded_unit_pair;

    fn make_node(id: &str, position: Vec2, links: &[&str]) -> RenderNode {
        RenderNode {
            id: id.to_owned(),
            position,
            velocity: Vec2::ZERO,
            size_bytes: 100,
            base_radius: 4.0,
            links: links.iter().map(|link| (*link).to_owned()).collect(),
        }
    }

    fn make_cache(nodes: Vec<RenderNode>) -> RenderGraph {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();
        RenderGraph {
            nodes,
            index_by_id,
            forces: Vec::new(),
        }
    }

    #[test]
    fn empty_graph_steps_without_error() {
        let mut cache = make_cache(Vec::new());
        let moving = step_simulation(
            &mut cache,
            SimulationParameters::initial(),
            AttractionPolicy::SumAll,
            Vec2::ZERO,
        );
        assert!(!moving);
    }

    #[test]
    fn pairwise_repulsion_is_antisymmetric() {
        let a = vec2(12.0, -3.5);
        let b = vec2(-40.0, 25.0);
        let push_on_a = repulsion_term(a, b);
        let push_on_b = repulsion_term(b, a);
        assert!((push_on_a + push_on_b).length() < 1e-6);
    }

    #[test]
    fn coincident_nodes_stay_finite() {
        let mut cache = make_cache(vec![
            make_node("a", vec2(10.0, 10.0), &[]),
            make_node("b", vec2(10.0, 10.0), &[]),
        ]);
        step_simulation(
            &mut cache,
            SimulationParameters::initial(),
            AttractionPolicy::SumAll,
            Vec2::ZERO,
        );
        for node in &cache.nodes {
            assert!(node.position.x.is_finite());
            assert!(node.position.y.is_finite());
            assert!(node.velocity.x.is_finite());
            assert!(node.velocity.y.is_finite());
        }
    }

    #[test]
    fn single_node_feels_only_center_gravity() {
        let params = SimulationParameters {
            repulsion_strength: -50.0,
            reference_attraction: 0.05,
            center_gravity: 0.02,
            velocity_damping: 0.9,
            edge_falloff: 0.7,
        };
        let mut cache = make_cache(vec![make_node("only", vec2(100.0, 0.0), &[])]);

        step_simulation(&mut cache, params, AttractionPolicy::SumAll, Vec2::ZERO);

        // gravity = (0 - 100) * 0.02 = -2; velocity = -2 * 0.9 = -1.8
        let node = &cache.nodes[0];
        assert!((node.velocity.x - (-1.8)).abs() < 1e-4);
        assert!(node.velocity.y.abs() < 1e-6);
        assert!((node.position.x - 98.2).abs() < 1e-3);
    }

    #[test]
    fn dangling_reference_contributes_nothing() {
        let params = SimulationParameters {
            repulsion_strength: 0.0,
            reference_attraction: 0.1,
            center_gravity: 0.0,
            velocity_damping: 1.0,
            edge_falloff: 0.7,
        };
        let mut cache = make_cache(vec![make_node("a", vec2(30.0, 40.0), &["d"])]);

        let moving = step_simulation(&mut cache, params, AttractionPolicy::SumAll, Vec2::ZERO);

        assert!(!moving);
        assert_eq!(cache.nodes[0].velocity, Vec2::ZERO);
        assert_eq!(cache.nodes[0].position, vec2(30.0, 40.0));
    }

    #[test]
    fn self_reference_is_a_zero_effect_pull() {
        let params = SimulationParameters {
            repulsion_strength: 0.0,
            reference_attraction: 0.1,
            center_gravity: 0.0,
            velocity_damping: 1.0,
            edge_falloff: 0.7,
        };
        let mut cache = make_cache(vec![make_node("a", vec2(5.0, 5.0), &["a"])]);

        step_simulation(&mut cache, params, AttractionPolicy::SumAll, Vec2::ZERO);
        assert_eq!(cache.nodes[0].position, vec2(5.0, 5.0));
    }

    #[test]
    fn attraction_policy_sum_vs_last_link() {
        // Raw parameter values outside the UI track, to make the policy
        // arithmetic visible without damping or repulsion in the way.
        let params = SimulationParameters {
            repulsion_strength: 0.0,
            reference_attraction: 1.0,
            center_gravity: 0.0,
            velocity_damping: 1.0,
            edge_falloff: 0.7,
        };
        let make_nodes = || {
            vec![
                make_node("a", Vec2::ZERO, &["b", "c"]),
                make_node("b", vec2(10.0, 0.0), &[]),
                make_node("c", vec2(0.0, 20.0), &[]),
            ]
        };

        let mut summed = make_cache(make_nodes());
        step_simulation(&mut summed, params, AttractionPolicy::SumAll, Vec2::ZERO);
        let summed_velocity = summed.nodes[0].velocity;
        assert!((summed_velocity - vec2(10.0, 20.0)).length() < 1.0);

        let mut last_wins = make_cache(make_nodes());
        step_simulation(&mut last_wins, params, AttractionPolicy::LastLinkWins, Vec2::ZERO);
        let last_velocity = last_wins.nodes[0].velocity;
        assert!((last_velocity - vec2(0.0, 20.0)).length() < 1.0);
    }

    #[test]
    fn linked_chain_pulls_closer_than_initial_scatter() {
        let params = SimulationParameters::initial();
        let mut successes = 0usize;
        let seeds = 0..6u64;
        let seed_count = seeds.clone().count();

        for seed in seeds {
            let spread = 900.0;
            let place = |id: &str| {
                let (x, y) = seeded_unit_pair(id, seed);
                vec2((x - 0.5) * spread, (y - 0.5) * spread)
            };
            let mut cache = make_cache(vec![
                make_node("a", place("a"), &["b"]),
                make_node("b", place("b"), &["c"]),
                make_node("c", place("c"), &[]),
            ]);

            let initial_average = {
                let positions = cache
                    .nodes
                    .iter()
                    .map(|node| node.position)
                    .collect::<Vec<_>>();
                let mut total = 0.0;
                let mut pairs = 0.0;
                for i in 0..positions.len() {
                    for j in (i + 1)..positions.len() {
                        total += (positions[i] - positions[j]).length();
                        pairs += 1.0;
                    }
                }
                total / pairs
            };

            for _ in 0..600 {
                step_simulation(&mut cache, params, AttractionPolicy::SumAll, Vec2::ZERO);
            }

            let final_ab = (cache.nodes[0].position - cache.nodes[1].position).length();
            if final_ab < initial_average {
                successes += 1;
            }
            for node in &cache.nodes {
                assert!(node.position.x.is_finite() && node.position.y.is_finite());
            }
        }

        // Statistical, not exact: attraction should dominate for the linked
        // pair in nearly every random placement.
        assert!(
            successes + 1 >= seed_count,
            "a-b contracted in only {successes} of {seed_count} seeded placements"
        );
    }
}
