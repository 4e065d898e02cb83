use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::format_bytes;
use crate::vault::open_note;

use super::super::ViewModel;
use super::super::physics::step_simulation;
use super::super::render_utils::{blend_color, edge_alpha};
use super::interaction::{HIT_RADIUS, HOVER_RADIUS, first_hit, hovered_mask};

const BACKGROUND: Color32 = Color32::from_rgb(13, 15, 18);
const MARKER: Color32 = Color32::from_gray(235);
const MARKER_DIMMED: Color32 = Color32::from_gray(110);
const SEARCH_TINT: Color32 = Color32::from_rgb(103, 196, 255);

impl ViewModel {
    /// Produces one frame: edges under markers under labels, plus the
    /// click-to-open side effect. Everything drawn is a function of the
    /// stepped graph snapshot, the live parameters, and the pointer.
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui, frozen: bool) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        let params = self.params.clamped();
        let policy = self.attraction_policy;

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let Some(cache) = self.graph_cache.as_mut() else {
            return;
        };

        // While a folder pick is outstanding the layout is frozen in place;
        // the frame is still drawn from the last stepped state.
        if !frozen && step_simulation(cache, params, policy, Vec2::ZERO) {
            ui.ctx().request_repaint();
        }

        let cache = &*cache;
        let screen_positions = cache
            .nodes
            .iter()
            .map(|node| rect.center() + node.position)
            .collect::<Vec<Pos2>>();

        let pointer = response.hover_pos();
        let hovered = hovered_mask(&screen_positions, pointer, HOVER_RADIUS);

        let search_query = self.search.trim();
        let search_matches = if search_query.is_empty() {
            HashSet::new()
        } else {
            let matcher = SkimMatcherV2::default();
            cache
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    matcher.fuzzy_match(&node.id, search_query).map(|_| index)
                })
                .collect::<HashSet<_>>()
        };
        let search_active = !search_query.is_empty();

        for (source_index, node) in cache.nodes.iter().enumerate() {
            for target in &node.links {
                let Some(&target_index) = cache.index_by_id.get(target.as_str()) else {
                    continue;
                };
                if target_index == source_index {
                    continue;
                }

                let start = screen_positions[source_index];
                let end = screen_positions[target_index];
                let alpha = edge_alpha(
                    (end - start).length(),
                    params.edge_falloff,
                    hovered[source_index] || hovered[target_index],
                );
                if alpha == 0 {
                    continue;
                }

                painter.line_segment(
                    [start, end],
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, alpha)),
                );
            }
        }

        for (index, node) in cache.nodes.iter().enumerate() {
            let position = screen_positions[index];
            let color = if search_matches.contains(&index) {
                blend_color(MARKER, SEARCH_TINT, 0.7)
            } else if search_active {
                MARKER_DIMMED
            } else {
                MARKER
            };

            painter.circle_filled(position, node.base_radius, color);

            if hovered[index] {
                painter.text(
                    position - vec2(0.0, node.base_radius + 6.0),
                    Align2::CENTER_BOTTOM,
                    &node.id,
                    FontId::proportional(13.0),
                    Color32::from_gray(240),
                );
            }
        }

        if let Some(index) = hovered.iter().position(|flag| *flag) {
            let node = &cache.nodes[index];
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  {} links",
                    node.id,
                    format_bytes(node.size_bytes),
                    node.links.len()
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if pointer.is_some_and(|pointer| first_hit(&screen_positions, pointer, HIT_RADIUS).is_some())
        {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(click) = response.interact_pointer_pos()
            && let Some(hit) = first_hit(&screen_positions, click, HIT_RADIUS)
        {
            let id = &cache.nodes[hit].id;
            match self.graph.lookup(id) {
                Some(record) => {
                    if let Err(error) = open_note(&record.path) {
                        log::warn!("could not open {}: {error:#}", record.path.display());
                    }
                }
                None => log::warn!("note {id} is no longer present in the vault"),
            }
        }
    }
}
