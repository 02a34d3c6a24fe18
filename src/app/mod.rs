use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::analysis::{AnalysisSnapshot, load_snapshot};

mod engine;
mod graph;
mod highlight;
mod render_utils;
mod ui;
mod viewport;

pub(crate) use engine::EngineConfig;
pub(crate) use viewport::ZoomLimits;

use engine::{GraphEngine, SelectionRecord};

type LoadResult = Result<(PathBuf, AnalysisSnapshot), String>;

pub struct RingLensApp {
    input_path: String,
    config: EngineConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    snapshot: AnalysisSnapshot,
    source: Option<PathBuf>,
    engine: GraphEngine,
    config: EngineConfig,
    selected: Option<SelectionRecord>,
    search: String,
    report_path: String,
    status: Option<String>,
    pointer_inside: bool,
    visible_node_count: usize,
    visible_edge_count: usize,
    visible_label_count: usize,
}

impl RingLensApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        input_path: Option<PathBuf>,
        config: EngineConfig,
    ) -> Self {
        let config = config.normalized();
        let state = match &input_path {
            Some(path) => Self::start_load(path.clone()),
            None => AppState::Ready(Box::new(ViewModel::new(
                AnalysisSnapshot::default(),
                None,
                config,
            ))),
        };

        Self {
            input_path: input_path
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_snapshot(&path)
                .map(|snapshot| (path, snapshot))
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(path: PathBuf) -> AppState {
        tracing::info!(path = %path.display(), "loading analysis snapshot");
        AppState::Loading {
            rx: Self::spawn_load(path),
        }
    }

    fn loaded_state(&self, result: LoadResult) -> AppState {
        match result {
            Ok((path, snapshot)) => {
                AppState::Ready(Box::new(ViewModel::new(snapshot, Some(path), self.config)))
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load analysis snapshot");
                AppState::Error(error)
            }
        }
    }
}

impl eframe::App for RingLensApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading analysis result...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load analysis result");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        ui.label("Input:");
                        ui.text_edit_singleline(&mut self.input_path);
                    });
                    if ui.button("Retry").clicked() && !self.input_path.trim().is_empty() {
                        retry = Some(PathBuf::from(self.input_path.trim()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut self.input_path, &mut reload_requested, is_reloading);

                if reload_requested
                    && self.reload_rx.is_none()
                    && !self.input_path.trim().is_empty()
                {
                    let path = PathBuf::from(self.input_path.trim());
                    tracing::info!(path = %path.display(), "reloading analysis snapshot");
                    self.reload_rx = Some(Self::spawn_load(path));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(path) = retry {
            self.state = Self::start_load(path);
        } else if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.loaded_state(result);
        }
    }
}
