use eframe::egui::{self, Ui};

use super::super::{AttractionPolicy, SimulationParameters, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Simulation Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search notes")
            .on_hover_text("Fuzzy-highlight matching notes without touching the layout.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Type part of a note name to tint its marker.");

        ui.separator();

        let repulsion_slider = ui
            .add(
                egui::Slider::new(
                    &mut self.params.repulsion_strength,
                    SimulationParameters::REPULSION_MIN..=SimulationParameters::REPULSION_MAX,
                )
                .text("Repulsion")
                .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How strongly notes push away from each other; more negative is harder.");
        if repulsion_slider.hovered() {
            repulsion_slider.request_focus();
        }

        let attraction_slider = ui
            .add(
                egui::Slider::new(
                    &mut self.params.reference_attraction,
                    SimulationParameters::ATTRACTION_MIN..=SimulationParameters::ATTRACTION_MAX,
                )
                .text("Reference attraction")
                .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Pull of a note toward the notes it links to.");
        if attraction_slider.hovered() {
            attraction_slider.request_focus();
        }

        let gravity_slider = ui
            .add(
                egui::Slider::new(
                    &mut self.params.center_gravity,
                    SimulationParameters::GRAVITY_MIN..=SimulationParameters::GRAVITY_MAX,
                )
                .text("Gravity")
                .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Pull of every note toward the canvas center.");
        if gravity_slider.hovered() {
            gravity_slider.request_focus();
        }

        let damping_slider = ui
            .add(
                egui::Slider::new(
                    &mut self.params.velocity_damping,
                    SimulationParameters::DAMPING_MIN..=SimulationParameters::DAMPING_MAX,
                )
                .text("Damping")
                .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Fraction of velocity a note keeps each step; below 1 lets the layout settle.");
        if damping_slider.hovered() {
            damping_slider.request_focus();
        }

        let falloff_slider = ui
            .add(
                egui::Slider::new(
                    &mut self.params.edge_falloff,
                    SimulationParameters::EDGE_FALLOFF_MIN..=SimulationParameters::EDGE_FALLOFF_MAX,
                )
                .text("Edge falloff")
                .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How quickly long reference edges fade out.");
        if falloff_slider.hovered() {
            falloff_slider.request_focus();
        }

        self.params = self.params.clamped();

        ui.separator();

        ui.label("Attraction policy").on_hover_text(
            "How multiple links on one note combine into its pull. \
             Last-link-wins reproduces the historical layout exactly.",
        );
        ui.horizontal(|ui| {
            ui.selectable_value(
                &mut self.attraction_policy,
                AttractionPolicy::SumAll,
                "Sum all links",
            )
            .on_hover_text("Every resolvable link contributes; the stabler layout.");
            ui.selectable_value(
                &mut self.attraction_policy,
                AttractionPolicy::LastLinkWins,
                "Last link wins",
            )
            .on_hover_text("Only the last resolvable link in a note pulls.");
        });

        ui.separator();

        ui.label(format!("notes: {}", self.graph.node_count()));
        ui.label(format!("resolved links: {}", self.graph.link_count));
    }
}
