use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::util::seeded_unit_pair;
use crate::vault::VaultGraph;

use super::super::render_utils::node_radius;
use super::super::{RenderGraph, RenderNode, ViewModel};

/// Side length of the square the initial scatter covers, in canvas units
/// centered on the gravity origin.
const INITIAL_SPREAD: f32 = 900.0;

impl ViewModel {
    /// Swaps in a freshly scanned graph wholesale. The render cache is
    /// dropped with the old graph, so no node position, velocity, or resolved
    /// edge survives a reload; simulation parameters deliberately do.
    pub(in crate::app) fn replace_graph(&mut self, graph: VaultGraph) {
        self.graph = graph;
        self.graph_cache = None;
        self.layout_seed = self.layout_seed.wrapping_add(1);
        self.graph_dirty = true;
        self.last_error = None;
    }

    pub(in crate::app) fn rebuild_render_graph(&mut self) {
        let mut ids = self.graph.nodes.keys().cloned().collect::<Vec<_>>();
        // Sorted ids fix the iteration order for rendering and hit-testing
        // within and across frames of one graph.
        ids.sort_unstable();

        let mut min_weight = u64::MAX;
        let mut max_weight = 1u64;
        for id in &ids {
            if let Some(record) = self.graph.nodes.get(id) {
                let weight = record.size_bytes.max(1);
                min_weight = min_weight.min(weight);
                max_weight = max_weight.max(weight);
            }
        }
        if min_weight == u64::MAX {
            min_weight = 1;
        }

        let mut nodes = Vec::with_capacity(ids.len());
        let mut index_by_id = HashMap::with_capacity(ids.len());
        for id in ids {
            let Some(record) = self.graph.nodes.get(&id) else {
                continue;
            };

            let (x, y) = seeded_unit_pair(&id, self.layout_seed);
            let position = vec2((x - 0.5) * INITIAL_SPREAD, (y - 0.5) * INITIAL_SPREAD);
            let weight = record.size_bytes.max(1);

            index_by_id.insert(id.clone(), nodes.len());
            nodes.push(RenderNode {
                id,
                position,
                velocity: Vec2::ZERO,
                size_bytes: record.size_bytes,
                base_radius: node_radius(weight, min_weight, max_weight),
                links: record.links.clone(),
            });
        }

        self.graph_cache = Some(RenderGraph {
            nodes,
            index_by_id,
            forces: Vec::new(),
        });
        self.graph_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::vault::NoteRecord;

    fn graph_of(ids_and_links: &[(&str, &[&str])]) -> VaultGraph {
        let mut graph = VaultGraph::empty(PathBuf::from("/vault"));
        for (id, links) in ids_and_links {
            graph.nodes.insert(
                (*id).to_owned(),
                NoteRecord {
                    id: (*id).to_owned(),
                    path: PathBuf::from(format!("/vault/{id}.md")),
                    size_bytes: 100,
                    links: links.iter().map(|link| (*link).to_owned()).collect(),
                },
            );
        }
        graph.link_count = graph.resolved_link_count();
        graph
    }

    #[test]
    fn rebuild_orders_nodes_by_id() {
        let mut model = ViewModel::new(graph_of(&[("c", &[]), ("a", &[]), ("b", &[])]));
        model.rebuild_render_graph();

        let cache = model.graph_cache.as_ref().expect("cache built");
        let ids = cache.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(cache.index_by_id["b"], 1);
    }

    #[test]
    fn empty_graph_builds_an_empty_cache() {
        let mut model = ViewModel::new(graph_of(&[]));
        model.rebuild_render_graph();

        let cache = model.graph_cache.as_ref().expect("cache built");
        assert!(cache.nodes.is_empty());
        assert!(cache.index_by_id.is_empty());
    }

    #[test]
    fn initial_scatter_stays_within_spread() {
        let ids = (0..40).map(|index| format!("note-{index}")).collect::<Vec<_>>();
        let notes: Vec<(&str, &[&str])> = ids.iter().map(|id| (id.as_str(), &[] as &[&str])).collect();
        let mut model = ViewModel::new(graph_of(&notes));
        model.rebuild_render_graph();

        let half = INITIAL_SPREAD / 2.0;
        for node in &model.graph_cache.as_ref().expect("cache built").nodes {
            assert!(node.position.x.abs() <= half);
            assert!(node.position.y.abs() <= half);
            assert_eq!(node.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn replace_graph_resolves_only_into_the_new_set() {
        let mut model = ViewModel::new(graph_of(&[("old-a", &["old-b"]), ("old-b", &[])]));
        model.rebuild_render_graph();
        model.params.velocity_damping = 0.42;

        model.replace_graph(graph_of(&[("new-a", &["old-b"])]));

        // Old ids are gone; the surviving link string now dangles.
        assert!(model.graph.lookup("old-a").is_none());
        assert!(model.graph.lookup("old-b").is_none());
        assert!(model.graph.lookup("new-a").is_some());

        assert!(model.graph_cache.is_none());
        assert!(model.graph_dirty);
        model.rebuild_render_graph();
        let cache = model.graph_cache.as_ref().expect("cache rebuilt");
        assert_eq!(cache.nodes.len(), 1);
        assert!(cache.index_by_id.get("old-b").is_none());

        // Parameters survive the reload untouched.
        assert_eq!(model.params.velocity_damping, 0.42);
    }

    #[test]
    fn reload_reseeds_the_scatter() {
        let mut model = ViewModel::new(graph_of(&[("a", &[]), ("b", &[])]));
        model.rebuild_render_graph();
        let before = model.graph_cache.as_ref().expect("cache").nodes[0].position;

        model.replace_graph(graph_of(&[("a", &[]), ("b", &[])]));
        model.rebuild_render_graph();
        let after = model.graph_cache.as_ref().expect("cache").nodes[0].position;

        assert_ne!(before, after);
    }
}
