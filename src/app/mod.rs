use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Color32, Context, Vec2};
use tracing::{error, info};

use crate::config::{Config, LayoutSettings};
use crate::mindmap::{MindmapNode, StoreError, TreeStore};

mod camera;
mod graph;
mod persist;
mod physics;
mod render_utils;
mod session;
mod ui;

use camera::Camera;
use graph::HoverState;
use persist::SaveWorker;
use physics::LayoutEngine;
use session::Session;

pub struct MindmapApp {
    config: Config,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<MindmapNode, StoreError>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    session: Session,
    saver: SaveWorker,
    data_file: PathBuf,
    export_dir: PathBuf,
    export_name: String,
    layout: LayoutSettings,
    engine: LayoutEngine,
    camera: Camera,
    graph: Option<LayoutGraph>,
    built_revision: Option<u64>,
    hover: HoverState,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    draft: Option<EditDraft>,
    status: Option<String>,
}

struct SearchMatchCache {
    query: String,
    generation: u64,
    matches: Arc<HashSet<usize>>,
}

/// Visible set of one layout generation, styled for drawing.
struct LayoutGraph {
    generation: u64,
    /// Simulation energy at the last applied tick.
    alpha: f32,
    nodes: Vec<GraphNode>,
    edges: Vec<(usize, usize)>,
}

struct GraphNode {
    node: Arc<MindmapNode>,
    position: Vec2,
    half_size: Vec2,
    fill: Color32,
    font_size: f32,
}

/// Field edits in progress for the selected node.
#[derive(Clone, Debug, Default, PartialEq)]
struct EditDraft {
    node_id: String,
    title: String,
    summary: String,
    description: String,
}

impl MindmapApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let state = Self::start_load(&config);
        Self { config, state }
    }

    fn start_load(config: &Config) -> AppState {
        let store = TreeStore::new(config.data_file.clone());
        let (tx, rx) = mpsc::channel();

        info!(path = %store.data_file().display(), "loading mindmap");
        thread::spawn(move || {
            let _ = tx.send(store.load());
        });

        AppState::Loading { rx }
    }
}

impl eframe::App for MindmapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(tree)) => {
                        info!(nodes = tree.node_count(), "mindmap loaded");
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            Arc::new(tree),
                            &self.config,
                        ))));
                    }
                    Ok(Err(load_error)) => {
                        error!(error = %load_error, "failed to load mindmap");
                        transition = Some(AppState::Error(format!(
                            "Failed to load mindmap data: {load_error}"
                        )));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.spinner();
                        ui.add_space(8.0);
                        ui.heading("Loading mindmap...");
                    });
                });
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(message.as_str());
                    });
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
