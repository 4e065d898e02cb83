use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::vault::{VaultGraph, load_vault_graph};

mod graph;
mod physics;
mod render_utils;
mod ui;

pub struct VaultGraphApp {
    vault_root: PathBuf,
    state: AppState,
    reload_rx: Option<Receiver<Result<VaultGraph, String>>>,
    picker_rx: Option<Receiver<Option<PathBuf>>>,
    /// Folder chosen in the picker but not yet scanned. `vault_root` only
    /// takes this value once the scan succeeds; until then the top bar keeps
    /// describing the graph actually on screen.
    pending_vault_root: Option<PathBuf>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<VaultGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: VaultGraph,
    params: SimulationParameters,
    attraction_policy: AttractionPolicy,
    search: String,
    layout_seed: u64,
    graph_dirty: bool,
    graph_cache: Option<RenderGraph>,
    last_error: Option<String>,
}

/// The five live simulation inputs. Owned by the view model and passed by
/// value into the simulator and renderer each frame; reloads never reset
/// them.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SimulationParameters {
    repulsion_strength: f32,
    reference_attraction: f32,
    center_gravity: f32,
    velocity_damping: f32,
    edge_falloff: f32,
}

impl SimulationParameters {
    const REPULSION_MIN: f32 = -100.0;
    const REPULSION_MAX: f32 = 0.0;
    const ATTRACTION_MIN: f32 = 0.0;
    const ATTRACTION_MAX: f32 = 0.1;
    const GRAVITY_MIN: f32 = 0.0;
    const GRAVITY_MAX: f32 = 0.05;
    const DAMPING_MIN: f32 = 0.0;
    const DAMPING_MAX: f32 = 1.0;
    const EDGE_FALLOFF_MIN: f32 = -1.0;
    const EDGE_FALLOFF_MAX: f32 = 2.0;

    fn initial() -> Self {
        Self {
            repulsion_strength: -50.0,
            reference_attraction: 0.02,
            center_gravity: 0.02,
            velocity_damping: 0.9,
            edge_falloff: 0.7,
        }
    }

    fn clamped(self) -> Self {
        Self {
            repulsion_strength: self
                .repulsion_strength
                .clamp(Self::REPULSION_MIN, Self::REPULSION_MAX),
            reference_attraction: self
                .reference_attraction
                .clamp(Self::ATTRACTION_MIN, Self::ATTRACTION_MAX),
            center_gravity: self.center_gravity.clamp(Self::GRAVITY_MIN, Self::GRAVITY_MAX),
            velocity_damping: self
                .velocity_damping
                .clamp(Self::DAMPING_MIN, Self::DAMPING_MAX),
            edge_falloff: self
                .edge_falloff
                .clamp(Self::EDGE_FALLOFF_MIN, Self::EDGE_FALLOFF_MAX),
        }
    }
}

/// How multiple resolvable links on one note combine into its attraction
/// vector. `SumAll` pulls toward every linked note; `LastLinkWins` keeps only
/// the last resolvable link's pull, matching the historical layout exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttractionPolicy {
    SumAll,
    LastLinkWins,
}

/// Positional state for the live layout, rebuilt from scratch whenever a new
/// [`VaultGraph`] is swapped in. Link targets stay as id strings and are
/// resolved through `index_by_id` every step and every frame.
struct RenderGraph {
    nodes: Vec<RenderNode>,
    index_by_id: HashMap<String, usize>,
    forces: Vec<Vec2>,
}

struct RenderNode {
    id: String,
    position: Vec2,
    velocity: Vec2,
    size_bytes: u64,
    base_radius: f32,
    links: Vec<String>,
}

impl VaultGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, vault_root: PathBuf) -> Self {
        let state = Self::start_load(vault_root.clone());
        Self {
            vault_root,
            state,
            reload_rx: None,
            picker_rx: None,
            pending_vault_root: None,
        }
    }

    fn spawn_load(vault_root: PathBuf) -> Receiver<Result<VaultGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_vault_graph(&vault_root).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn spawn_picker() -> Receiver<Option<PathBuf>> {
        let (tx, rx) = mpsc::channel();

        // The native dialog blocks until dismissed; it must never run inside
        // the frame loop.
        thread::spawn(move || {
            let picked = rfd::FileDialog::new().pick_folder();
            let _ = tx.send(picked);
        });

        rx
    }

    fn start_load(vault_root: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(vault_root),
        }
    }

    fn poll_initial_load(rx: &Receiver<Result<VaultGraph, String>>) -> Option<AppState> {
        match rx.try_recv() {
            Ok(Ok(graph)) => Some(AppState::Ready(Box::new(ViewModel::new(graph)))),
            Ok(Err(error)) => Some(AppState::Error(error)),
            Err(_) => None,
        }
    }

    fn resolve_transition(&mut self, ctx: &Context, transition: Option<AppState>) {
        if let Some(next_state) = transition {
            self.state = next_state;
            // Paint the swapped-in view now; waiting for the next input
            // event would leave the old frame on screen.
            ctx.request_repaint();
        }
    }

    fn poll_picker(&mut self) {
        let Some(rx) = self.picker_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(Some(path)) => {
                self.reload_rx = Some(Self::spawn_load(path.clone()));
                self.pending_vault_root = Some(path);
            }
            Ok(None) => {
                // Cancelled; the current graph stays untouched.
            }
            Err(TryRecvError::Empty) => {
                self.picker_rx = Some(rx);
            }
            Err(TryRecvError::Disconnected) => {
                log::warn!("folder picker worker disconnected");
            }
        }
    }

    fn poll_reload(&mut self) {
        let Some(rx) = self.reload_rx.take() else {
            return;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => {
                self.reload_rx = Some(rx);
                return;
            }
            Err(TryRecvError::Disconnected) => Err("background scan worker disconnected".to_owned()),
        };

        let pending_root = self.pending_vault_root.take();
        match result {
            Ok(graph) => {
                if let Some(root) = pending_root {
                    self.vault_root = root;
                }
                if let AppState::Ready(model) = &mut self.state {
                    model.replace_graph(graph);
                } else {
                    self.state = AppState::Ready(Box::new(ViewModel::new(graph)));
                }
            }
            Err(error) => {
                if let AppState::Ready(model) = &mut self.state {
                    // A failed rescan keeps the last good graph on screen,
                    // and the root label with it; the picked folder is
                    // forgotten.
                    log::warn!("vault rescan failed: {error}");
                    model.last_error = Some(error);
                } else {
                    // No graph to fall back on. Adopt the picked folder so
                    // the retry button targets what the user last chose.
                    if let Some(root) = pending_root {
                        self.vault_root = root;
                    }
                    self.state = AppState::Error(error);
                }
            }
        }
    }
}

impl eframe::App for VaultGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_picker();
        self.poll_reload();

        let mut transition = None;
        let mut retry_requested = false;
        let mut pick_requested = false;
        let mut reload_requested = false;
        let is_busy = self.reload_rx.is_some() || self.picker_rx.is_some();
        let simulation_frozen = self.picker_rx.is_some();

        match &mut self.state {
            AppState::Loading { rx } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Scanning note vault...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });

                // Poll after drawing so the delivery frame still paints.
                transition = Self::poll_initial_load(rx);
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to scan note vault");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.add_enabled(!is_busy, egui::Button::new("Retry")).clicked() {
                            retry_requested = true;
                        }
                        if ui
                            .add_enabled(!is_busy, egui::Button::new("Choose vault..."))
                            .clicked()
                        {
                            pick_requested = true;
                        }
                    });
                });
            }
            AppState::Ready(model) => {
                model.show(
                    ctx,
                    &self.vault_root,
                    &mut reload_requested,
                    &mut pick_requested,
                    is_busy,
                    simulation_frozen,
                );
            }
        }

        self.resolve_transition(ctx, transition);
        if retry_requested {
            self.state = Self::start_load(self.vault_root.clone());
        }
        if pick_requested && !is_busy {
            self.picker_rx = Some(Self::spawn_picker());
        }
        if reload_requested && !is_busy {
            self.reload_rx = Some(Self::spawn_load(self.vault_root.clone()));
        }

        // Pending worker results are polled per frame; keep frames coming
        // even without input so they are picked up promptly.
        if self.reload_rx.is_some() || self.picker_rx.is_some() {
            ctx.request_repaint();
        }
    }
}
