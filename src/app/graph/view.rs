use eframe::egui::{self, Align2, Pos2, Sense, Stroke, Ui, Vec2, vec2};

use super::super::highlight::RingHighlight;
use super::super::render_utils::{
    BACKGROUND, EDGE_COLOR, HIGHLIGHT_STROKE, LABEL_COLOR, NEUTRAL_STROKE, NORMAL_FILL,
    OVERLAY_COLOR, PLACEHOLDER_COLOR, PainterSurface, SUSPICIOUS_FILL, Surface, fade,
};
use super::super::viewport::ViewportController;
use super::super::ViewModel;
use super::interaction::PointerEvent;
use super::reduce::ReducedGraph;

pub(in crate::app) const NODE_RADIUS: f32 = 6.0;
pub(in crate::app) const HOVER_RADIUS_BONUS: f32 = 2.0;

const NODE_STROKE_WIDTH: f32 = 1.5;
const EDGE_WIDTH: f32 = 1.0;
const EDGE_IDLE_OPACITY: f32 = 0.6;
const EDGE_DIMMED_OPACITY: f32 = 0.1;
const NODE_DIMMED_OPACITY: f32 = 0.15;
const LABEL_SIZE: f32 = 10.0;
const OVERLAY_SIZE: f32 = 12.0;

pub(in crate::app) const EMPTY_GRAPH_TEXT: &str =
    "Fraud network graph will appear here after analysis.";

pub(in crate::app) struct Scene<'a> {
    pub(in crate::app) graph: &'a ReducedGraph,
    pub(in crate::app) positions: &'a [Pos2],
    pub(in crate::app) viewport: &'a ViewportController,
    pub(in crate::app) highlight: &'a RingHighlight,
    pub(in crate::app) hovered: Option<usize>,
    pub(in crate::app) label_threshold: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct RenderStats {
    pub(in crate::app) edges_drawn: usize,
    pub(in crate::app) nodes_drawn: usize,
    pub(in crate::app) labels_drawn: usize,
}

pub(in crate::app) fn node_radius(hovered: bool) -> f32 {
    if hovered {
        NODE_RADIUS + HOVER_RADIUS_BONUS
    } else {
        NODE_RADIUS
    }
}

/// Full redraw of the reduced graph: background, edges, nodes, labels, then
/// the screen-space stats overlay.
pub(in crate::app) fn render_scene<S: Surface + ?Sized>(surface: &mut S, scene: &Scene<'_>) -> RenderStats {
    let graph = scene.graph;
    let viewport = scene.viewport;
    let scale = viewport.scale();
    let ring_active = scene.highlight.is_active();
    let mut stats = RenderStats::default();

    surface.clear(BACKGROUND);

    for edge in &graph.edges {
        let (Some(source), Some(target)) = (
            scene.positions.get(edge.source),
            scene.positions.get(edge.target),
        ) else {
            continue;
        };

        let (opacity, width) = if ring_active {
            let in_ring = scene
                .highlight
                .contains_edge(&graph.nodes[edge.source], &graph.nodes[edge.target]);
            if in_ring {
                (1.0, EDGE_WIDTH * 2.0)
            } else {
                (EDGE_DIMMED_OPACITY, EDGE_WIDTH)
            }
        } else {
            (EDGE_IDLE_OPACITY, EDGE_WIDTH)
        };

        surface.line(
            viewport.world_to_screen(*source),
            viewport.world_to_screen(*target),
            Stroke::new(width * scale, fade(EDGE_COLOR, opacity)),
        );
        stats.edges_drawn += 1;
    }

    let mut placed = Vec::with_capacity(graph.nodes.len());
    for (index, node) in graph.nodes.iter().enumerate() {
        let Some(position) = scene.positions.get(index) else {
            tracing::warn!(node = %node.id, "reduced node has no layout position; skipping");
            continue;
        };

        let hovered = scene.hovered == Some(index);
        let in_ring = scene.highlight.contains(node);
        let opacity = if ring_active && !in_ring {
            NODE_DIMMED_OPACITY
        } else {
            1.0
        };
        let fill = if node.is_suspicious {
            SUSPICIOUS_FILL
        } else {
            NORMAL_FILL
        };
        let stroke_color = if in_ring || hovered {
            HIGHLIGHT_STROKE
        } else {
            NEUTRAL_STROKE
        };
        let radius = node_radius(hovered) * scale;
        let center = viewport.world_to_screen(*position);

        surface.circle(
            center,
            radius,
            fade(fill, opacity),
            Stroke::new(NODE_STROKE_WIDTH * scale, fade(stroke_color, opacity)),
        );
        placed.push((index, center, radius, opacity));
        stats.nodes_drawn += 1;
    }

    if graph.nodes.len() <= scene.label_threshold {
        let label_size = (LABEL_SIZE * scale).clamp(6.0, 28.0);
        for (index, center, radius, opacity) in placed {
            surface.text(
                center + vec2(radius + 4.0 * scale, 0.0),
                Align2::LEFT_CENTER,
                &graph.nodes[index].id,
                label_size,
                fade(LABEL_COLOR, opacity),
            );
            stats.labels_drawn += 1;
        }
    }

    draw_overlay(surface, scene);
    stats
}

fn draw_overlay<S: Surface + ?Sized>(surface: &mut S, scene: &Scene<'_>) {
    let graph = scene.graph;
    let mut origin = Pos2::new(10.0, 10.0);
    let summary = format!(
        "{} nodes | {} edges | zoom {}%",
        graph.nodes.len(),
        graph.edges.len(),
        scene.viewport.zoom_percent()
    );
    surface.text(origin, Align2::LEFT_TOP, &summary, OVERLAY_SIZE, OVERLAY_COLOR);

    if graph.sampled {
        origin.y += OVERLAY_SIZE + 6.0;
        surface.text(
            origin,
            Align2::LEFT_TOP,
            &format!("sampled from {} total", graph.total_nodes),
            OVERLAY_SIZE,
            OVERLAY_COLOR,
        );
    }
}

pub(in crate::app) fn render_empty<S: Surface + ?Sized>(surface: &mut S) {
    let size = surface.size();
    surface.clear(BACKGROUND);
    surface.text(
        Pos2::new(size.x * 0.5, size.y * 0.5),
        Align2::CENTER_CENTER,
        EMPTY_GRAPH_TEXT,
        14.0,
        PLACEHOLDER_COLOR,
    );
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.engine.on_viewport_resized(rect.width(), rect.height());

        let origin = rect.min.to_vec2();
        let local = |position: Pos2| position - origin;
        let mut events = Vec::new();

        let pointer = ui.input(|input| input.pointer.latest_pos());
        let inside = pointer.is_some_and(|position| rect.contains(position));

        // Anchor at the press position so the movement egui needs before it
        // recognises a drag still pans the graph.
        if response.drag_started()
            && let Some(position) = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos())
        {
            events.push(PointerEvent::Down(local(position)));
        }

        if let Some(position) = pointer
            && (inside || response.dragged())
        {
            events.push(PointerEvent::Move(local(position)));
        }

        if response.drag_stopped() {
            events.push(PointerEvent::Up);
            if !inside {
                events.push(PointerEvent::Leave);
            }
        } else if self.pointer_inside && !inside && !response.dragged() {
            events.push(PointerEvent::Leave);
        }
        self.pointer_inside = inside;

        if response.hovered() {
            let scroll = ui.input_mut(|input| {
                let delta = input.raw_scroll_delta.y;
                input.raw_scroll_delta = Vec2::ZERO;
                input.smooth_scroll_delta = Vec2::ZERO;
                delta
            });
            if scroll.abs() > f32::EPSILON {
                // egui reports scroll-up as positive; the dispatcher expects
                // wheel deltas where positive means zoom out.
                events.push(PointerEvent::Wheel { delta_y: -scroll });
            }
        }

        if response.clicked()
            && let Some(position) = response.interact_pointer_pos()
        {
            events.push(PointerEvent::Click(local(position)));
        }

        for event in events {
            if let Some(record) = self.engine.dispatch(event) {
                self.on_node_select(record);
            }
        }

        if self.engine.hovered().is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let painter = ui.painter_at(rect);
        let mut surface = PainterSurface::new(&painter, rect);
        let stats = self.engine.render(&mut surface);
        self.visible_node_count = stats.nodes_drawn;
        self.visible_edge_count = stats.edges_drawn;
        self.visible_label_count = stats.labels_drawn;

        let tooltip = self.engine.tooltip();
        if tooltip.show {
            egui::Area::new(egui::Id::new("graph_tooltip"))
                .order(egui::Order::Tooltip)
                .fixed_pos(tooltip.position + origin)
                .interactable(false)
                .show(ui.ctx(), |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        for line in &tooltip.lines {
                            ui.label(line.as_str());
                        }
                    });
                });
        }

        if self.engine.take_redraw_request() {
            ui.ctx().request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::super::super::engine::fixtures::snapshot;
    use super::super::super::engine::{EngineConfig, GraphEngine};
    use super::super::super::render_utils::testing::{DrawOp, RecordingSurface};
    use super::*;

    const SIZE: Vec2 = vec2(1000.0, 800.0);

    fn engine(node_count: usize, flagged: &[(&str, Option<&str>)]) -> GraphEngine {
        let mut engine = GraphEngine::new(EngineConfig::default(), SIZE);
        engine.load_snapshot(&snapshot(node_count, flagged));
        engine
    }

    #[test]
    fn draws_edges_then_nodes_then_labels_then_overlay() {
        let engine = engine(4, &[("N1", Some("R1"))]);
        let mut surface = RecordingSurface::new(SIZE);
        engine.render(&mut surface);

        let kinds = surface
            .ops
            .iter()
            .map(|op| match op {
                DrawOp::Clear(_) => 'c',
                DrawOp::Line { .. } => 'l',
                DrawOp::Circle { .. } => 'n',
                DrawOp::Text { .. } => 't',
            })
            .collect::<String>();
        assert_eq!(kinds, "clllnnnnttttt");
        assert_eq!(surface.texts()[4], "4 nodes | 3 edges | zoom 100%");
    }

    #[test]
    fn labels_are_suppressed_above_threshold() {
        let crowded = engine(150, &[]);
        let mut surface = RecordingSurface::new(SIZE);
        let stats = crowded.render(&mut surface);
        assert_eq!(stats.labels_drawn, 0);
        assert_eq!(stats.nodes_drawn, 150);

        let sparse = engine(80, &[]);
        let mut surface = RecordingSurface::new(SIZE);
        let stats = sparse.render(&mut surface);
        assert_eq!(stats.labels_drawn, 80);
    }

    #[test]
    fn sampling_notice_only_when_sampled() {
        let small = engine(10, &[]);
        let mut surface = RecordingSurface::new(SIZE);
        small.render(&mut surface);
        assert!(!surface.texts().iter().any(|text| text.starts_with("sampled from")));

        let large = engine(1000, &[("N10", Some("R1"))]);
        let mut surface = RecordingSurface::new(SIZE);
        large.render(&mut surface);
        assert!(surface.texts().iter().any(|text| text == "sampled from 1000 total"));
    }

    #[test]
    fn active_ring_dims_everything_outside_it() {
        let mut engine = engine(6, &[("N1", Some("R7")), ("N2", Some("R7")), ("N4", Some("R8"))]);
        engine.highlight = RingHighlight::RingActive("R7".into());
        let mut surface = RecordingSurface::new(SIZE);
        engine.render(&mut surface);

        let graph = engine.graph().expect("graph");
        let full = surface
            .lines()
            .into_iter()
            .filter(|(_, _, stroke)| stroke.color.a() == 255)
            .collect::<Vec<_>>();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].2.width, EDGE_WIDTH * 2.0);

        let viewport = engine.viewport();
        let n1 = viewport.world_to_screen(engine.positions()[graph.index_by_id["N1"]]);
        let n2 = viewport.world_to_screen(engine.positions()[graph.index_by_id["N2"]]);
        assert_eq!((full[0].0, full[0].1), (n1, n2));

        for (_, _, fill, stroke) in surface.circles() {
            if stroke.color == HIGHLIGHT_STROKE {
                assert_eq!(fill, SUSPICIOUS_FILL);
            } else {
                assert!(fill.a() < 255);
            }
        }
    }

    #[test]
    fn idle_edges_share_one_opacity() {
        let engine = engine(5, &[("N0", Some("R1"))]);
        let mut surface = RecordingSurface::new(SIZE);
        engine.render(&mut surface);

        let alphas = surface
            .lines()
            .iter()
            .map(|(_, _, stroke)| stroke.color.a())
            .collect::<Vec<_>>();
        assert_eq!(alphas.len(), 4);
        assert!(alphas.iter().all(|alpha| *alpha == alphas[0] && *alpha < 255));
    }

    #[test]
    fn hovered_node_grows_and_gets_a_white_stroke() {
        let mut engine = engine(3, &[]);
        engine.hovered = Some(2);
        let mut surface = RecordingSurface::new(SIZE);
        engine.render(&mut surface);

        let circles = surface.circles();
        assert_eq!(circles[2].1, NODE_RADIUS + HOVER_RADIUS_BONUS);
        assert_eq!(circles[2].3.color, HIGHLIGHT_STROKE);
        assert_eq!(circles[0].1, NODE_RADIUS);
        assert_eq!(circles[0].3.color, NEUTRAL_STROKE);
        assert_eq!(circles[0].2, NORMAL_FILL);
    }

    #[test]
    fn missing_positions_are_skipped() {
        let mut engine = engine(3, &[]);
        engine.positions.truncate(1);
        let mut surface = RecordingSurface::new(SIZE);
        let stats = engine.render(&mut surface);

        assert_eq!(stats.nodes_drawn, 1);
        assert_eq!(stats.edges_drawn, 0);
    }

    #[test]
    fn no_graph_renders_placeholder() {
        let mut engine = GraphEngine::new(EngineConfig::default(), SIZE);
        engine.load_snapshot(&Default::default());
        let mut surface = RecordingSurface::new(SIZE);
        let stats = engine.render(&mut surface);

        assert_eq!(stats, RenderStats::default());
        assert_eq!(surface.texts(), vec![EMPTY_GRAPH_TEXT.to_owned()]);
    }
}
