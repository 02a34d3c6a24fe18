use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::{format_count, format_seconds};

use super::super::graph::RenderNode;
use super::super::render_utils::{
    EDGE_COLOR, HIGHLIGHT_STROKE, NEUTRAL_STROKE, NORMAL_FILL, SUSPICIOUS_FILL,
};
use super::super::ViewModel;

const SEARCH_RESULT_LIMIT: usize = 12;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Reduced-node indices matching `query`, best score first. Equal scores put
/// flagged accounts first, then shorter ids.
pub(in crate::app) fn search_accounts(nodes: &[RenderNode], query: &str, limit: usize) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut hits = nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            fuzzy_match_score(&matcher, &node.id, query).map(|score| (index, score, node))
        })
        .collect::<Vec<_>>();
    hits.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then(b.2.is_suspicious.cmp(&a.2.is_suspicious))
            .then(a.2.id.len().cmp(&b.2.id.len()))
            .then(a.0.cmp(&b.0))
    });
    hits.into_iter().take(limit).map(|(index, ..)| index).collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .id_salt("controls_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.draw_summary(ui);
                ui.separator();
                self.draw_view_actions(ui);
                ui.separator();
                self.draw_search(ui);
                ui.separator();
                self.draw_settings(ui);
                ui.separator();
                draw_legend(ui);
            });
    }

    fn draw_summary(&self, ui: &mut Ui) {
        ui.heading("Analysis Summary");
        ui.add_space(4.0);

        let summary = self.snapshot.summary.clone().unwrap_or_default();
        let rings_detected = summary.fraud_rings_detected.or_else(|| {
            (!self.snapshot.fraud_rings.is_empty()).then_some(self.snapshot.fraud_rings.len() as u64)
        });
        let flagged = summary.suspicious_accounts_flagged.or_else(|| {
            (!self.snapshot.suspicious_accounts.is_empty())
                .then_some(self.snapshot.suspicious_accounts.len() as u64)
        });

        egui::Grid::new("summary_tiles")
            .num_columns(2)
            .spacing(vec2(12.0, 6.0))
            .show(ui, |ui| {
                summary_tile(ui, "Accounts analyzed", format_count(summary.total_accounts_analyzed));
                summary_tile(ui, "Suspicious accounts", format_count(flagged));
                ui.end_row();
                summary_tile(ui, "Fraud rings", format_count(rings_detected));
                summary_tile(ui, "Processing time", format_seconds(summary.processing_time_seconds));
                ui.end_row();
            });
    }

    fn draw_view_actions(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("View").strong());
        ui.horizontal_wrapped(|ui| {
            if ui
                .button("Reset view")
                .on_hover_text("Restore 100% zoom and remove panning.")
                .clicked()
            {
                self.engine.reset_view();
            }
            let clear = ui.add_enabled(
                self.engine.highlight().is_active(),
                egui::Button::new("Clear highlight"),
            );
            if clear.clicked() {
                self.engine.clear_highlight();
            }
        });

        let viewport = self.engine.viewport();
        let pan = viewport.pan_offset();
        ui.small(format!(
            "Zoom {}% | pan {:.0}, {:.0}",
            viewport.zoom_percent(),
            pan.x,
            pan.y
        ));
        if let Some(ring) = self.engine.highlight().active_ring() {
            ui.small(format!("Highlighting ring {ring}"));
        }
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Find account").strong());
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Fuzzy search over the accounts drawn on the canvas.");

        let Some(graph) = self.engine.graph() else {
            return;
        };
        let matches = search_accounts(&graph.nodes, &self.search, SEARCH_RESULT_LIMIT);
        if matches.is_empty() {
            if !self.search.trim().is_empty() {
                ui.small("No matching accounts on the canvas.");
            }
            return;
        }

        let mut picked = None;
        for index in matches {
            let node = &graph.nodes[index];
            let is_selected = self
                .selected
                .as_ref()
                .is_some_and(|record| record.account_id == node.id);
            let text = if node.is_suspicious {
                RichText::new(node.id.as_str()).color(SUSPICIOUS_FILL)
            } else {
                RichText::new(node.id.as_str())
            };
            if ui.selectable_label(is_selected, text).clicked() {
                picked = Some(node.id.clone());
            }
        }

        if let Some(account_id) = picked
            && let Some(record) = self.engine.select_by_id(&account_id)
        {
            self.on_node_select(record);
        }
    }

    fn draw_settings(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Graph settings").strong());

        // Values set on the command line may lie outside the slider ranges;
        // they must survive until the user edits them.
        ui.add(
            egui::Slider::new(&mut self.config.cap, 1..=5000)
                .logarithmic(true)
                .clamping(egui::SliderClamping::Never)
                .text("node cap"),
        )
        .on_hover_text("Upper bound on accounts drawn; flagged accounts are always kept.");
        ui.add(
            egui::Slider::new(&mut self.config.sample_fraction, 0.0..=1.0)
                .text("sample fraction"),
        )
        .on_hover_text("Share of the remaining accounts sampled once boundary accounts are in.");
        ui.add(
            egui::Slider::new(&mut self.config.label_threshold, 0..=1000)
                .clamping(egui::SliderClamping::Never)
                .text("label threshold"),
        )
        .on_hover_text("Account labels are drawn only when at most this many nodes are shown.");
        ui.horizontal(|ui| {
            ui.label("seed");
            ui.add(egui::DragValue::new(&mut self.config.seed).speed(1.0));
        });

        let dirty = self.config != self.engine.config();
        ui.horizontal(|ui| {
            if ui.add_enabled(dirty, egui::Button::new("Apply")).clicked() {
                self.apply_config();
            }
            if ui.add_enabled(dirty, egui::Button::new("Revert")).clicked() {
                self.config = self.engine.config();
            }
        });

        if let Some(graph) = self.engine.graph() {
            let mut line = format!(
                "{} of {} accounts, {} flagged",
                graph.nodes.len(),
                graph.total_nodes,
                graph.suspicious_count()
            );
            if graph.sampled {
                line.push_str(" (sampled)");
            }
            ui.small(line);
        }
    }
}

fn summary_tile(ui: &mut Ui, title: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(110.0);
        ui.vertical(|ui| {
            ui.small(title);
            ui.label(RichText::new(value).strong().size(18.0));
        });
    });
}

fn draw_legend(ui: &mut Ui) {
    ui.label(RichText::new("Legend").strong());
    legend_row(ui, SUSPICIOUS_FILL, NEUTRAL_STROKE, "Suspicious account");
    legend_row(ui, NORMAL_FILL, NEUTRAL_STROKE, "Normal account");
    legend_row(ui, SUSPICIOUS_FILL, HIGHLIGHT_STROKE, "Highlighted ring member");

    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
        ui.painter().line_segment(
            [rect.left_center(), rect.right_center()],
            Stroke::new(2.0, EDGE_COLOR),
        );
        ui.label("Transaction");
    });
}

fn legend_row(ui: &mut Ui, fill: Color32, stroke: Color32, label: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
        ui.painter()
            .circle(rect.center(), 5.0, fill, Stroke::new(1.5, stroke));
        ui.label(label);
    });
}
