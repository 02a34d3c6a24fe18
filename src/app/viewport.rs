use eframe::egui::{Pos2, Vec2, pos2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel deltas follow the DOM convention: positive scrolls down, which
    /// zooms out.
    pub(in crate::app) fn from_wheel(delta_y: f32) -> Option<Self> {
        if delta_y < 0.0 {
            Some(Self::In)
        } else if delta_y > 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ZoomLimits {
    pub(crate) min_scale: f32,
    pub(crate) max_scale: f32,
    pub(crate) step: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 5.0,
            step: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct ViewportController {
    pan: Vec2,
    scale: f32,
    size: Vec2,
    limits: ZoomLimits,
}

impl ViewportController {
    pub(in crate::app) fn new(size: Vec2, limits: ZoomLimits) -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
            size,
            limits,
        }
    }

    pub(in crate::app) fn pan_offset(&self) -> Vec2 {
        self.pan
    }

    pub(in crate::app) fn scale(&self) -> f32 {
        self.scale
    }

    pub(in crate::app) fn size(&self) -> Vec2 {
        self.size
    }

    pub(in crate::app) fn center(&self) -> Pos2 {
        pos2(self.size.x * 0.5, self.size.y * 0.5)
    }

    pub(in crate::app) fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    pub(in crate::app) fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    pub(in crate::app) fn pan(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub(in crate::app) fn zoom(&mut self, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => 1.0 + self.limits.step,
            ZoomDirection::Out => 1.0 - self.limits.step,
        };
        self.scale = (self.scale * factor).clamp(self.limits.min_scale, self.limits.max_scale);
    }

    pub(in crate::app) fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.scale = 1.0;
    }

    pub(in crate::app) fn world_to_screen(&self, world: Pos2) -> Pos2 {
        let center = self.center();
        center + (world - center) * self.scale + self.pan
    }

    pub(in crate::app) fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        let center = self.center();
        center + (screen - center - self.pan) / self.scale
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;
    use proptest::prelude::*;

    use super::*;

    fn viewport() -> ViewportController {
        ViewportController::new(vec2(800.0, 600.0), ZoomLimits::default())
    }

    #[test]
    fn twenty_zoom_outs_clamp_at_the_floor() {
        let mut viewport = viewport();
        for _ in 0..20 {
            viewport.zoom(ZoomDirection::Out);
        }
        assert_eq!(viewport.scale(), 0.2);
    }

    #[test]
    fn zoom_in_is_ten_percent() {
        let mut viewport = viewport();
        viewport.zoom(ZoomDirection::In);
        assert!((viewport.scale() - 1.1).abs() < 1e-6);
        assert_eq!(viewport.zoom_percent(), 110);
    }

    #[test]
    fn wheel_sign_picks_direction() {
        assert_eq!(ZoomDirection::from_wheel(-3.0), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_wheel(120.0), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_wheel(0.0), None);
    }

    #[test]
    fn center_is_fixed_under_zoom() {
        let mut viewport = viewport();
        viewport.zoom(ZoomDirection::In);
        assert_eq!(viewport.world_to_screen(pos2(400.0, 300.0)), pos2(400.0, 300.0));
    }

    #[test]
    fn reset_restores_identity() {
        let mut viewport = viewport();
        viewport.pan(vec2(35.0, -12.0));
        viewport.zoom(ZoomDirection::In);
        viewport.reset();

        assert_eq!(viewport.pan_offset(), Vec2::ZERO);
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.world_to_screen(pos2(10.0, 20.0)), pos2(10.0, 20.0));
    }

    proptest! {
        #[test]
        fn scale_stays_within_bounds(steps in prop::collection::vec(any::<bool>(), 0..200)) {
            let mut viewport = viewport();
            for zoom_in in steps {
                viewport.zoom(if zoom_in { ZoomDirection::In } else { ZoomDirection::Out });
                prop_assert!((0.2..=5.0).contains(&viewport.scale()));
            }
        }

        #[test]
        fn screen_world_round_trip(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
            pan_x in -3000.0f32..3000.0,
            pan_y in -3000.0f32..3000.0,
            zooms in prop::collection::vec(any::<bool>(), 0..40),
        ) {
            let mut viewport = viewport();
            viewport.pan(vec2(pan_x, pan_y));
            for zoom_in in zooms {
                viewport.zoom(if zoom_in { ZoomDirection::In } else { ZoomDirection::Out });
            }

            let world = pos2(x, y);
            let back = viewport.screen_to_world(viewport.world_to_screen(world));
            prop_assert!((back - world).length() < 0.05);
        }
    }
}
