use std::path::{Path, PathBuf};

use eframe::egui::{self, Align, Context, Layout, vec2};

use crate::analysis::{AnalysisSnapshot, default_report_path, write_report};

use super::super::engine::{EngineConfig, GraphEngine, SelectionRecord};
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(
        snapshot: AnalysisSnapshot,
        source: Option<PathBuf>,
        config: EngineConfig,
    ) -> Self {
        let mut engine = GraphEngine::new(config, vec2(960.0, 720.0));
        engine.load_snapshot(&snapshot);

        let report_path = source
            .as_deref()
            .map(|path| default_report_path(path).display().to_string())
            .unwrap_or_default();

        Self {
            snapshot,
            source,
            engine,
            config: config.normalized(),
            selected: None,
            search: String::new(),
            report_path,
            status: None,
            pointer_inside: false,
            visible_node_count: 0,
            visible_edge_count: 0,
            visible_label_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        input_path: &mut String,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("ring-lens");
                    ui.separator();
                    ui.label("Input:");
                    ui.add(egui::TextEdit::singleline(input_path).desired_width(280.0));
                    let load_button = ui.add_enabled(
                        !is_loading && !input_path.trim().is_empty(),
                        egui::Button::new("Load"),
                    );
                    if load_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.separator();
                    ui.label("Report:");
                    ui.add(egui::TextEdit::singleline(&mut self.report_path).desired_width(220.0));
                    let export_button = ui.add_enabled(
                        !self.report_path.trim().is_empty(),
                        egui::Button::new("Export report"),
                    );
                    if export_button.clicked() {
                        self.export_report();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                        if let Some(status) = &self.status {
                            ui.label(status.as_str());
                        }
                    });
                });
            });

        egui::TopBottomPanel::bottom("rings")
            .resizable(true)
            .default_height(180.0)
            .show(ctx, |ui| self.draw_rings(ui));

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if is_loading {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading analysis result...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                } else {
                    self.draw_graph(ui);
                }
            });
    }

    pub(in crate::app) fn on_node_select(&mut self, record: SelectionRecord) {
        tracing::debug!(account = %record.account_id, legit = record.is_legit, "account selected");
        self.selected = Some(record);
    }

    pub(in crate::app) fn apply_config(&mut self) {
        self.config = self.config.normalized();
        tracing::info!(
            cap = self.config.cap,
            sample_fraction = self.config.sample_fraction,
            seed = self.config.seed,
            "rebuilding graph with new settings"
        );

        let size = self.engine.viewport().size();
        self.engine = GraphEngine::new(self.config, size);
        self.engine.load_snapshot(&self.snapshot);
        self.selected = None;
    }

    fn export_report(&mut self) {
        let path = PathBuf::from(self.report_path.trim());
        self.status = Some(match write_report(&path, &self.snapshot) {
            Ok(()) => format!("Saved {}", display_name(&path)),
            Err(error) => {
                tracing::warn!("report export failed: {error:#}");
                format!("Export failed: {error:#}")
            }
        });
    }

    fn visible_graph_text(&self) -> String {
        let source = self
            .source
            .as_deref()
            .map(display_name)
            .unwrap_or_else(|| "no input".to_owned());
        format!(
            "{source} | drawn: {} nodes, {} edges, {} labels",
            self.visible_node_count, self.visible_edge_count, self.visible_label_count
        )
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
