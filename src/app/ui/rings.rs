use eframe::egui::{self, RichText, Ui};

use crate::util::humanize;

use super::super::render_utils::risk_color;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_rings(&self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Fraud Rings");
            if let Some(ring) = self.engine.highlight().active_ring() {
                ui.label(format!("(highlighting {ring})"));
            }
        });

        let rings = &self.snapshot.fraud_rings;
        if rings.is_empty() {
            ui.label("No rings detected");
            return;
        }

        let active = self.engine.highlight().active_ring();
        egui::ScrollArea::vertical()
            .id_salt("rings_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("rings_table")
                    .num_columns(5)
                    .striped(true)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Ring").strong());
                        ui.label(RichText::new("Pattern").strong());
                        ui.label(RichText::new("Members").strong());
                        ui.label(RichText::new("Risk").strong());
                        ui.label(RichText::new("Accounts").strong());
                        ui.end_row();

                        for ring in rings {
                            let mut id = RichText::new(ring.ring_id.as_str()).monospace();
                            if active == Some(ring.ring_id.as_str()) {
                                id = id.strong().underline();
                            }
                            ui.label(id);
                            ui.label(
                                ring.pattern_type
                                    .as_deref()
                                    .map(humanize)
                                    .unwrap_or_else(|| "-".to_owned()),
                            );
                            ui.label(ring.member_accounts.len().to_string());
                            ui.label(
                                RichText::new(
                                    ring.risk_score
                                        .map(|score| format!("{score:.1}"))
                                        .unwrap_or_else(|| "-".to_owned()),
                                )
                                .color(risk_color(ring.risk_score)),
                            );
                            ui.label(ring.member_accounts.join(", "));
                            ui.end_row();
                        }
                    });
            });
    }
}
