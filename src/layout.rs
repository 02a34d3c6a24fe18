use std::f32::consts::TAU;

use eframe::egui::{Pos2, Vec2, pos2, vec2};
use rand::Rng;

pub const LAYOUT_PADDING: f32 = 20.0;

const CLUSTER_RADIUS_FACTOR: f32 = 0.3;
const CLUSTER_INNER_FRACTION: f32 = 0.3;
const OUTER_RADIUS_FACTOR: f32 = 0.45;
const OUTER_JITTER: f32 = 30.0;

pub fn layout_extent(size: Vec2) -> f32 {
    let available = size - vec2(LAYOUT_PADDING, LAYOUT_PADDING) * 2.0;
    available.x.min(available.y).max(1.0)
}

/// Places flagged accounts on an inner disc and everything else on an outer
/// band around the canvas center. One pass, no iteration, so any reduced graph
/// lays out in linear time. The result is indexed like `suspicious`.
pub fn radial_layout<R: Rng + ?Sized>(suspicious: &[bool], size: Vec2, rng: &mut R) -> Vec<Pos2> {
    let center = pos2(size.x * 0.5, size.y * 0.5);
    let extent = layout_extent(size);
    let cluster_radius = CLUSTER_RADIUS_FACTOR * extent;
    let outer_radius = OUTER_RADIUS_FACTOR * extent;

    let suspicious_total = suspicious.iter().filter(|flag| **flag).count();
    let normal_total = suspicious.len() - suspicious_total;
    let suspicious_step = TAU / suspicious_total.max(1) as f32;
    let normal_step = TAU / normal_total.max(1) as f32;

    let mut suspicious_seen = 0usize;
    let mut normal_seen = 0usize;

    suspicious
        .iter()
        .map(|&is_suspicious| {
            let (angle, radius) = if is_suspicious {
                let angle = suspicious_seen as f32 * suspicious_step;
                suspicious_seen += 1;
                let spread = CLUSTER_INNER_FRACTION
                    + (1.0 - CLUSTER_INNER_FRACTION) * rng.gen_range(0.0f32..1.0);
                (angle, cluster_radius * spread)
            } else {
                let angle = normal_seen as f32 * normal_step;
                normal_seen += 1;
                (angle, outer_radius + OUTER_JITTER * rng.gen_range(0.0f32..1.0))
            };
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}
