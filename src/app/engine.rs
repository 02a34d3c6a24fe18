use eframe::egui::{Pos2, Vec2, vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::analysis::{AnalysisSnapshot, FlaggedAccount};
use crate::layout::{layout_extent, radial_layout};

use super::graph::{
    ReducedGraph, RenderNode, RenderStats, Scene, reduce_graph, render_empty, render_scene,
};
use super::highlight::RingHighlight;
use super::render_utils::Surface;
use super::viewport::{ViewportController, ZoomLimits};

pub(in crate::app) type SelectionRecord = FlaggedAccount;

const LAYOUT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;
const RELAYOUT_THRESHOLD: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EngineConfig {
    pub(crate) cap: usize,
    pub(crate) sample_fraction: f64,
    pub(crate) label_threshold: usize,
    pub(crate) zoom: ZoomLimits,
    pub(crate) seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cap: 500,
            sample_fraction: 0.05,
            label_threshold: 100,
            zoom: ZoomLimits::default(),
            seed: 0x5eed,
        }
    }
}

impl EngineConfig {
    pub(in crate::app) fn normalized(mut self) -> Self {
        self.cap = self.cap.max(1);
        self.sample_fraction = if self.sample_fraction.is_finite() {
            self.sample_fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let defaults = ZoomLimits::default();
        let mut min_scale = self.zoom.min_scale;
        let mut max_scale = self.zoom.max_scale;
        if !(min_scale.is_finite() && min_scale > 0.0) {
            min_scale = defaults.min_scale;
        }
        if !(max_scale.is_finite() && max_scale > 0.0) {
            max_scale = defaults.max_scale;
        }
        if min_scale > max_scale {
            std::mem::swap(&mut min_scale, &mut max_scale);
        }
        self.zoom.min_scale = min_scale.min(1.0);
        self.zoom.max_scale = max_scale.max(1.0);
        self.zoom.step = if self.zoom.step.is_finite() {
            self.zoom.step.clamp(0.01, 0.9)
        } else {
            defaults.step
        };
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(in crate::app) struct Tooltip {
    pub(in crate::app) show: bool,
    pub(in crate::app) position: Pos2,
    pub(in crate::app) lines: Vec<String>,
}

/// Everything the canvas needs for one analysis snapshot. The reduced graph
/// and positions only change when a snapshot is loaded (or the surface is
/// resized far enough to change the layout radii); viewport, hover, tooltip
/// and highlight are session state mutated by the interaction handlers.
pub(in crate::app) struct GraphEngine {
    pub(super) config: EngineConfig,
    pub(super) accounts: Vec<FlaggedAccount>,
    pub(super) graph: Option<ReducedGraph>,
    pub(super) positions: Vec<Pos2>,
    pub(super) layout_extent: f32,
    pub(super) layout_center: Pos2,
    pub(super) viewport: ViewportController,
    pub(super) highlight: RingHighlight,
    pub(super) hovered: Option<usize>,
    pub(super) tooltip: Tooltip,
    pub(super) pan_anchor: Option<Pos2>,
    pub(super) redraw_requested: bool,
}

impl GraphEngine {
    pub(in crate::app) fn new(config: EngineConfig, size: Vec2) -> Self {
        let config = config.normalized();
        Self {
            viewport: ViewportController::new(size, config.zoom),
            config,
            accounts: Vec::new(),
            graph: None,
            positions: Vec::new(),
            layout_extent: layout_extent(size),
            layout_center: Pos2::new(size.x * 0.5, size.y * 0.5),
            highlight: RingHighlight::Idle,
            hovered: None,
            tooltip: Tooltip::default(),
            pan_anchor: None,
            redraw_requested: true,
        }
    }

    pub(in crate::app) fn config(&self) -> EngineConfig {
        self.config
    }

    pub(in crate::app) fn graph(&self) -> Option<&ReducedGraph> {
        self.graph.as_ref()
    }

    pub(in crate::app) fn positions(&self) -> &[Pos2] {
        &self.positions
    }

    pub(in crate::app) fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub(in crate::app) fn highlight(&self) -> &RingHighlight {
        &self.highlight
    }

    pub(in crate::app) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub(in crate::app) fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub(in crate::app) fn account_for(&self, node: &RenderNode) -> Option<&FlaggedAccount> {
        node.account.and_then(|position| self.accounts.get(position))
    }

    pub(in crate::app) fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    pub(in crate::app) fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub(in crate::app) fn load_snapshot(&mut self, snapshot: &AnalysisSnapshot) {
        self.accounts = snapshot.flagged_accounts();
        self.graph = snapshot.display_graph().map(|graph| {
            let mut rng = StdRng::seed_from_u64(self.config.seed);
            reduce_graph(
                &graph,
                &self.accounts,
                self.config.cap,
                self.config.sample_fraction,
                &mut rng,
            )
        });
        if self.graph.is_none() {
            tracing::info!("analysis result has no graph; showing empty state");
        }

        self.relayout();
        self.viewport.reset();
        self.highlight = RingHighlight::Idle;
        self.hovered = None;
        self.tooltip = Tooltip::default();
        self.pan_anchor = None;
        self.request_redraw();
    }

    /// Resizing never re-reduces the graph. Small changes shift the existing
    /// layout to the new center; a change of more than 10% in the layout
    /// extent re-runs the layout with the same seed.
    pub(in crate::app) fn on_viewport_resized(&mut self, width: f32, height: f32) {
        let size = vec2(width.max(0.0), height.max(0.0));
        if size == self.viewport.size() {
            return;
        }

        self.viewport.set_size(size);
        let extent = layout_extent(size);
        let change = (extent / self.layout_extent - 1.0).abs();
        if change > RELAYOUT_THRESHOLD {
            self.relayout();
        } else {
            let center = self.viewport.center();
            let shift = center - self.layout_center;
            for position in &mut self.positions {
                *position += shift;
            }
            self.layout_center = center;
        }
        self.request_redraw();
    }

    fn relayout(&mut self) {
        let size = self.viewport.size();
        self.positions = match &self.graph {
            Some(graph) => {
                let flags = graph
                    .nodes
                    .iter()
                    .map(|node| node.is_suspicious)
                    .collect::<Vec<_>>();
                let mut rng = StdRng::seed_from_u64(self.config.seed ^ LAYOUT_SEED_SALT);
                radial_layout(&flags, size, &mut rng)
            }
            None => Vec::new(),
        };
        self.layout_extent = layout_extent(size);
        self.layout_center = self.viewport.center();
    }

    pub(in crate::app) fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> RenderStats {
        match &self.graph {
            Some(graph) => render_scene(
                surface,
                &Scene {
                    graph,
                    positions: &self.positions,
                    viewport: &self.viewport,
                    highlight: &self.highlight,
                    hovered: self.hovered,
                    label_threshold: self.config.label_threshold,
                },
            ),
            None => {
                render_empty(surface);
                RenderStats::default()
            }
        }
    }
}

#[cfg(test)]
pub(in crate::app) mod fixtures {
    use crate::analysis::{
        AccountNode, AnalysisSnapshot, FlaggedAccount, TransactionGraph, TransferEdge,
    };

    /// A chain N0 -> N1 -> ... with the given accounts flagged.
    pub(in crate::app) fn snapshot(
        node_count: usize,
        flagged: &[(&str, Option<&str>)],
    ) -> AnalysisSnapshot {
        let nodes = (0..node_count)
            .map(|index| AccountNode {
                id: format!("N{index}"),
            })
            .collect::<Vec<_>>();
        let edges = (1..node_count)
            .map(|index| TransferEdge::new(format!("N{}", index - 1), format!("N{index}")))
            .collect();
        AnalysisSnapshot {
            graph: Some(TransactionGraph { nodes, edges }),
            suspicious_accounts: flagged
                .iter()
                .map(|(id, ring)| FlaggedAccount {
                    account_id: (*id).to_owned(),
                    suspicion_score: Some(94.0),
                    detected_patterns: vec!["cycle_length_4".to_owned()],
                    ring_id: ring.map(str::to_owned),
                    is_legit: false,
                })
                .collect(),
            ..Default::default()
        }
    }
}
