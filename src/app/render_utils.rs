use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(10, 15, 20);
pub(super) const SUSPICIOUS_FILL: Color32 = Color32::from_rgb(255, 77, 77);
pub(super) const NORMAL_FILL: Color32 = Color32::from_rgb(0, 245, 196);
pub(super) const HIGHLIGHT_STROKE: Color32 = Color32::WHITE;
pub(super) const NEUTRAL_STROKE: Color32 = Color32::from_rgb(34, 34, 34);
pub(super) const EDGE_COLOR: Color32 = Color32::from_rgb(51, 65, 85);
pub(super) const LABEL_COLOR: Color32 = Color32::from_gray(225);
pub(super) const OVERLAY_COLOR: Color32 = Color32::from_gray(200);
pub(super) const PLACEHOLDER_COLOR: Color32 = Color32::from_rgb(154, 164, 175);

/// Raster target for the graph renderer. Coordinates are canvas-local
/// pixels with the origin at the top-left corner of the drawing area.
pub(in crate::app) trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color32);
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke);
    fn text(&mut self, position: Pos2, anchor: Align2, text: &str, size: f32, color: Color32);
}

pub(super) struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> PainterSurface<'a> {
    pub(super) fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn to_screen(&self, position: Pos2) -> Pos2 {
        position + self.rect.min.to_vec2()
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> Vec2 {
        self.rect.size()
    }

    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.rect, 0.0, color);
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter
            .line_segment([self.to_screen(from), self.to_screen(to)], stroke);
    }

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke) {
        self.painter
            .circle(self.to_screen(center), radius, fill, stroke);
    }

    fn text(&mut self, position: Pos2, anchor: Align2, text: &str, size: f32, color: Color32) {
        self.painter.text(
            self.to_screen(position),
            anchor,
            text,
            FontId::proportional(size),
            color,
        );
    }
}

pub(super) fn fade(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

pub(super) fn risk_color(score: Option<f64>) -> Color32 {
    match score {
        Some(score) if score >= 90.0 => Color32::from_rgb(230, 57, 70),
        Some(score) if score >= 70.0 => Color32::from_rgb(255, 159, 28),
        Some(_) => Color32::from_rgb(76, 201, 240),
        None => PLACEHOLDER_COLOR,
    }
}

#[cfg(test)]
pub(in crate::app) mod testing {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub(in crate::app) enum DrawOp {
        Clear(Color32),
        Line {
            from: Pos2,
            to: Pos2,
            stroke: Stroke,
        },
        Circle {
            center: Pos2,
            radius: f32,
            fill: Color32,
            stroke: Stroke,
        },
        Text {
            position: Pos2,
            text: String,
            color: Color32,
        },
    }

    /// Records draw calls instead of rasterizing them.
    pub(in crate::app) struct RecordingSurface {
        pub(in crate::app) size: Vec2,
        pub(in crate::app) ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub(in crate::app) fn new(size: Vec2) -> Self {
            Self {
                size,
                ops: Vec::new(),
            }
        }

        pub(in crate::app) fn lines(&self) -> Vec<(Pos2, Pos2, Stroke)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Line { from, to, stroke } => Some((*from, *to, *stroke)),
                    _ => None,
                })
                .collect()
        }

        pub(in crate::app) fn circles(&self) -> Vec<(Pos2, f32, Color32, Stroke)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Circle {
                        center,
                        radius,
                        fill,
                        stroke,
                    } => Some((*center, *radius, *fill, *stroke)),
                    _ => None,
                })
                .collect()
        }

        pub(in crate::app) fn texts(&self) -> Vec<String> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, .. } => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> Vec2 {
            self.size
        }

        fn clear(&mut self, color: Color32) {
            self.ops.push(DrawOp::Clear(color));
        }

        fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
            self.ops.push(DrawOp::Line { from, to, stroke });
        }

        fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke) {
            self.ops.push(DrawOp::Circle {
                center,
                radius,
                fill,
                stroke,
            });
        }

        fn text(&mut self, position: Pos2, _anchor: Align2, text: &str, _size: f32, color: Color32) {
            self.ops.push(DrawOp::Text {
                position,
                text: text.to_owned(),
                color,
            });
        }
    }
}
