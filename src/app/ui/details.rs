use eframe::egui::{self, RichText, Ui};

use crate::util::{format_score, humanize};

use super::super::render_utils::risk_color;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Investigation");
        ui.add_space(6.0);

        let Some(record) = self.selected.clone() else {
            ui.label("Click an account on the graph to inspect it.");
            return;
        };

        ui.label(RichText::new(record.account_id.as_str()).strong().size(16.0));
        if record.is_legit {
            ui.label(RichText::new("Not flagged by the analysis").color(risk_color(Some(0.0))));
        }
        ui.add_space(6.0);

        egui::Grid::new("selection_details")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Risk score");
                ui.label(
                    RichText::new(format_score(record.suspicion_score))
                        .strong()
                        .color(risk_color(record.suspicion_score)),
                );
                ui.end_row();

                ui.label("Ring");
                ui.label(record.ring_id.as_deref().unwrap_or("-"));
                ui.end_row();
            });

        if let Some(ring_id) = &record.ring_id
            && let Some(ring) = self
                .snapshot
                .fraud_rings
                .iter()
                .find(|ring| &ring.ring_id == ring_id)
        {
            ui.small(format!(
                "{} members, {}",
                ring.member_accounts.len(),
                ring.pattern_type
                    .as_deref()
                    .map(humanize)
                    .unwrap_or_else(|| "unknown pattern".to_owned())
            ));
        }

        ui.separator();
        ui.label(RichText::new("Detected patterns").strong());
        if record.detected_patterns.is_empty() {
            ui.label("None");
        } else {
            for pattern in &record.detected_patterns {
                ui.label(format!("- {}", humanize(pattern)));
            }
        }

        ui.add_space(8.0);
        if ui.button("Close").clicked() {
            self.selected = None;
        }
    }
}
