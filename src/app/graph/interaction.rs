use eframe::egui::{Pos2, vec2};

use crate::util::{format_patterns, format_score};

use super::super::engine::{GraphEngine, SelectionRecord, Tooltip};
use super::super::highlight::RingHighlight;
use super::super::viewport::ZoomDirection;
use super::view::node_radius;

const HIT_MARGIN: f32 = 4.0;
const TOOLTIP_OFFSET: f32 = 14.0;

/// Canvas input, in canvas-local screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up,
    Leave,
    Wheel { delta_y: f32 },
    Click(Pos2),
}

impl GraphEngine {
    /// Applies one input event. Returns the selection record when a click
    /// lands on a node.
    pub(in crate::app) fn dispatch(&mut self, event: PointerEvent) -> Option<SelectionRecord> {
        match event {
            PointerEvent::Down(position) => {
                self.pan_anchor = Some(position);
                None
            }
            PointerEvent::Move(position) => {
                match self.pan_anchor {
                    Some(anchor) => {
                        self.viewport.pan(position - anchor);
                        self.pan_anchor = Some(position);
                        self.request_redraw();
                    }
                    None => self.update_hover(position),
                }
                None
            }
            PointerEvent::Up => {
                self.pan_anchor = None;
                None
            }
            PointerEvent::Leave => {
                self.pan_anchor = None;
                if self.hovered.is_some() || self.tooltip.show {
                    self.hovered = None;
                    self.tooltip = Tooltip::default();
                    self.request_redraw();
                }
                None
            }
            PointerEvent::Wheel { delta_y } => {
                if let Some(direction) = ZoomDirection::from_wheel(delta_y) {
                    self.viewport.zoom(direction);
                    self.request_redraw();
                }
                None
            }
            PointerEvent::Click(position) => {
                let index = self.hit_test(position)?;
                self.select_node(index)
            }
        }
    }

    /// Nearest reduced node within its radius plus a margin, compared in
    /// world space. The first node wins on equal distance.
    pub(in crate::app) fn hit_test(&self, screen: Pos2) -> Option<usize> {
        let graph = self.graph.as_ref()?;
        let world = self.viewport.screen_to_world(screen);

        let mut best: Option<(usize, f32)> = None;
        for (index, position) in self.positions.iter().enumerate().take(graph.nodes.len()) {
            let reach = node_radius(self.hovered == Some(index)) + HIT_MARGIN;
            let distance = position.distance(world);
            if distance > reach {
                continue;
            }
            if best.is_none_or(|(_, nearest)| distance < nearest) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    fn update_hover(&mut self, position: Pos2) {
        let hovered = self.hit_test(position);
        let tooltip = match hovered {
            Some(index) => Tooltip {
                show: true,
                position: position + vec2(TOOLTIP_OFFSET, TOOLTIP_OFFSET),
                lines: self.tooltip_lines(index),
            },
            None => Tooltip::default(),
        };

        if hovered != self.hovered || tooltip != self.tooltip {
            self.hovered = hovered;
            self.tooltip = tooltip;
            self.request_redraw();
        }
    }

    fn tooltip_lines(&self, index: usize) -> Vec<String> {
        let Some(node) = self.graph.as_ref().and_then(|graph| graph.nodes.get(index)) else {
            return Vec::new();
        };

        let mut lines = vec![format!("Account: {}", node.id)];
        if let Some(account) = self.account_for(node) {
            lines.push(format!("Risk score: {}", format_score(account.suspicion_score)));
            lines.push(format!("Patterns: {}", format_patterns(&account.detected_patterns)));
        }
        lines
    }

    pub(in crate::app) fn select_node(&mut self, index: usize) -> Option<SelectionRecord> {
        let node = self.graph.as_ref()?.nodes.get(index)?;
        let record = match self.account_for(node) {
            Some(account) => account.clone(),
            None => SelectionRecord::legit(node.id.clone()),
        };

        let next = RingHighlight::for_selection(record.ring_id.as_deref());
        if next != self.highlight {
            tracing::debug!(account = %record.account_id, ring = ?next.active_ring(), "ring highlight changed");
            self.highlight = next;
        }
        self.request_redraw();
        Some(record)
    }

    /// Same effect as clicking the node with this id. `None` when the account
    /// is not part of the reduced graph.
    pub(in crate::app) fn select_by_id(&mut self, account_id: &str) -> Option<SelectionRecord> {
        let index = *self.graph.as_ref()?.index_by_id.get(account_id)?;
        self.select_node(index)
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.viewport.reset();
        self.request_redraw();
    }

    pub(in crate::app) fn clear_highlight(&mut self) {
        if self.highlight.is_active() {
            tracing::debug!("ring highlight cleared");
        }
        self.highlight = RingHighlight::Idle;
        self.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, pos2};

    use super::super::super::engine::EngineConfig;
    use super::super::super::engine::fixtures::snapshot;
    use super::*;

    fn engine(node_count: usize, flagged: &[(&str, Option<&str>)]) -> GraphEngine {
        let mut engine = GraphEngine::new(EngineConfig::default(), vec2(1000.0, 800.0));
        engine.load_snapshot(&snapshot(node_count, flagged));
        engine
    }

    fn screen_of(engine: &GraphEngine, id: &str) -> Pos2 {
        let index = engine.graph().expect("graph").index_by_id[id];
        engine.viewport().world_to_screen(engine.positions()[index])
    }

    #[test]
    fn clicking_a_ring_member_activates_its_ring() {
        let mut engine = engine(8, &[("N2", Some("R7")), ("N3", Some("R7"))]);
        let record = engine
            .dispatch(PointerEvent::Click(screen_of(&engine, "N2")))
            .expect("node hit");

        assert_eq!(record.account_id, "N2");
        assert_eq!(record.suspicion_score, Some(94.0));
        assert_eq!(record.detected_patterns, vec!["cycle_length_4".to_owned()]);
        assert_eq!(engine.highlight(), &RingHighlight::RingActive("R7".into()));
    }

    #[test]
    fn clicking_an_unflagged_node_synthesizes_a_legit_record() {
        let mut engine = engine(8, &[("N2", Some("R7"))]);
        engine.dispatch(PointerEvent::Click(screen_of(&engine, "N2")));

        let record = engine
            .dispatch(PointerEvent::Click(screen_of(&engine, "N5")))
            .expect("node hit");

        assert_eq!(record.account_id, "N5");
        assert_eq!(record.suspicion_score, None);
        assert!(record.detected_patterns.is_empty());
        assert_eq!(record.ring_id, None);
        assert!(record.is_legit);
        assert_eq!(engine.highlight(), &RingHighlight::Idle);
    }

    #[test]
    fn flagged_account_without_ring_goes_idle() {
        let mut engine = engine(4, &[("N0", Some("R1")), ("N1", None)]);
        engine.dispatch(PointerEvent::Click(screen_of(&engine, "N0")));
        let record = engine
            .dispatch(PointerEvent::Click(screen_of(&engine, "N1")))
            .expect("node hit");

        assert!(!record.is_legit);
        assert_eq!(engine.highlight(), &RingHighlight::Idle);
    }

    #[test]
    fn clicking_empty_space_changes_nothing() {
        let mut engine = engine(6, &[("N1", Some("R1"))]);
        engine.dispatch(PointerEvent::Click(screen_of(&engine, "N1")));

        assert_eq!(engine.dispatch(PointerEvent::Click(pos2(-500.0, -500.0))), None);
        assert_eq!(engine.highlight(), &RingHighlight::RingActive("R1".into()));
    }

    #[test]
    fn twenty_wheel_outs_clamp_scale() {
        let mut engine = engine(3, &[]);
        for _ in 0..20 {
            engine.dispatch(PointerEvent::Wheel { delta_y: 100.0 });
        }
        assert_eq!(engine.viewport().scale(), 0.2);
    }

    #[test]
    fn dragging_pans_and_suppresses_hover() {
        let mut engine = engine(3, &[]);
        engine.dispatch(PointerEvent::Down(pos2(100.0, 100.0)));
        engine.dispatch(PointerEvent::Move(pos2(130.0, 90.0)));
        engine.dispatch(PointerEvent::Move(pos2(140.0, 95.0)));

        assert_eq!(engine.viewport().pan_offset(), vec2(40.0, -5.0));
        assert_eq!(engine.hovered(), None);

        engine.dispatch(PointerEvent::Up);
        engine.dispatch(PointerEvent::Move(pos2(500.0, 500.0)));
        assert_eq!(engine.viewport().pan_offset(), vec2(40.0, -5.0));
    }

    #[test]
    fn hover_fills_tooltip_and_leave_clears_it() {
        let mut engine = engine(5, &[("N3", Some("R2"))]);
        let target = screen_of(&engine, "N3");
        engine.dispatch(PointerEvent::Move(target));

        assert_eq!(engine.hovered(), engine.graph().map(|graph| graph.index_by_id["N3"]));
        let tooltip = engine.tooltip();
        assert!(tooltip.show);
        assert_eq!(tooltip.position, target + Vec2::splat(TOOLTIP_OFFSET));
        assert_eq!(
            tooltip.lines,
            vec![
                "Account: N3".to_owned(),
                "Risk score: 94.0".to_owned(),
                "Patterns: cycle length 4".to_owned(),
            ]
        );

        engine.dispatch(PointerEvent::Leave);
        assert_eq!(engine.hovered(), None);
        assert!(!engine.tooltip().show);
    }

    #[test]
    fn unflagged_tooltip_only_names_the_account() {
        let mut engine = engine(5, &[]);
        engine.dispatch(PointerEvent::Move(screen_of(&engine, "N4")));
        assert_eq!(engine.tooltip().lines, vec!["Account: N4".to_owned()]);
    }

    #[test]
    fn hit_test_tracks_the_viewport() {
        let mut engine = engine(5, &[]);
        let index = engine.graph().expect("graph").index_by_id["N1"];
        engine.dispatch(PointerEvent::Wheel { delta_y: -1.0 });
        engine.dispatch(PointerEvent::Down(pos2(0.0, 0.0)));
        engine.dispatch(PointerEvent::Move(pos2(25.0, 25.0)));
        engine.dispatch(PointerEvent::Up);

        assert_eq!(engine.hit_test(screen_of(&engine, "N1")), Some(index));
    }

    #[test]
    fn external_actions_reset_view_and_highlight() {
        let mut engine = engine(5, &[("N1", Some("R1"))]);
        engine.dispatch(PointerEvent::Click(screen_of(&engine, "N1")));
        engine.dispatch(PointerEvent::Wheel { delta_y: -1.0 });

        engine.reset_view();
        assert_eq!(engine.viewport().scale(), 1.0);
        assert!(engine.highlight().is_active());

        engine.clear_highlight();
        assert_eq!(engine.highlight(), &RingHighlight::Idle);
    }

    #[test]
    fn select_by_id_behaves_like_a_click() {
        let mut engine = engine(5, &[("N4", Some("R9"))]);
        let record = engine.select_by_id("N4").expect("present");
        assert_eq!(record.ring_id.as_deref(), Some("R9"));
        assert_eq!(engine.highlight().active_ring(), Some("R9"));
        assert_eq!(engine.select_by_id("missing"), None);
    }
}
