use std::path::Path;

use eframe::egui::{self, Align, Color32, Context, Layout};

use crate::vault::VaultGraph;

use super::super::{AttractionPolicy, SimulationParameters, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(graph: VaultGraph) -> Self {
        Self {
            graph,
            params: SimulationParameters::initial(),
            attraction_policy: AttractionPolicy::SumAll,
            search: String::new(),
            layout_seed: 0,
            graph_dirty: true,
            graph_cache: None,
            last_error: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        vault_root: &Path,
        reload_requested: &mut bool,
        pick_requested: &mut bool,
        is_busy: bool,
        simulation_frozen: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("vault-graph");
                    ui.separator();
                    ui.label(format!("vault: {}", vault_root.display()));
                    ui.label(format!("notes: {}", self.graph.node_count()));
                    ui.label(format!("links: {}", self.graph.link_count));

                    let rescan_button =
                        ui.add_enabled(!is_busy, egui::Button::new("Rescan vault"));
                    if rescan_button.clicked() {
                        *reload_requested = true;
                    }

                    let pick_button =
                        ui.add_enabled(!is_busy, egui::Button::new("Change vault..."));
                    if pick_button.clicked() {
                        *pick_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if simulation_frozen {
                            ui.label("waiting for folder pick, layout paused");
                        } else if is_busy {
                            ui.spinner();
                            ui.label("rescanning");
                        }
                        if let Some(error) = &self.last_error {
                            ui.colored_label(
                                Color32::from_rgb(240, 120, 110),
                                format!("rescan failed: {error}"),
                            );
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_graph(ui, simulation_frozen);
        });
    }
}
