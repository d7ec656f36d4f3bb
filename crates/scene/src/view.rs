use foundation::math::Vec2;
use tracing::debug;

use crate::projection::{RA_REFERENCE_HOURS, SkyProjection, Viewport};

/// Tunables for navigation and hit-testing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom multiplier for one wheel tick towards the user.
    pub wheel_zoom_in: f64,
    /// Zoom multiplier for one wheel tick away from the user.
    pub wheel_zoom_out: f64,
    /// Click tolerance in pixels at zoom 1; scales with zoom.
    pub hit_radius_px: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 5.0,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            hit_radius_px: 10.0,
        }
    }
}

/// Pan/zoom state of the sky canvas.
///
/// `zoom` is private so every write goes through the clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub offset_x: f64,
    pub offset_y: f64,
    zoom: f64,
    /// Last pointer position while a drag is in progress.
    drag_last: Option<Vec2>,
    config: ViewConfig,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::with_config(ViewConfig::default())
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ViewConfig) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0_f64.clamp(config.min_zoom, config.max_zoom),
            drag_last: None,
            config,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom, clamped to the configured range. Non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_last.is_some()
    }

    /// Back to no pan and zoom 1. Any drag in progress is dropped.
    pub fn reset(&mut self) {
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.drag_last = None;
        self.set_zoom(1.0);
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.drag_last = Some(Vec2::new(x, y));
    }

    /// Moves the pan offset by the pointer delta since the previous call.
    ///
    /// Returns the applied delta, or `None` when no drag is active.
    pub fn update_drag(&mut self, x: f64, y: f64) -> Option<Vec2> {
        let last = self.drag_last?;
        let now = Vec2::new(x, y);
        let delta = now - last;
        self.offset_x += delta.x;
        self.offset_y += delta.y;
        self.drag_last = Some(now);
        Some(delta)
    }

    pub fn end_drag(&mut self) {
        self.drag_last = None;
    }

    /// Multiplies the zoom by `factor` while keeping the sky point under
    /// `(x, y)` fixed on screen.
    pub fn zoom_at(&mut self, viewport: Viewport, x: f64, y: f64, factor: f64) {
        let anchor = SkyProjection::new(viewport, self).screen_to_world(x, y);
        self.set_zoom(self.zoom * factor);

        // Solve world_to_screen(anchor) == (x, y) for the offset.
        let proj = SkyProjection::new(viewport, self);
        let center = viewport.center();
        self.offset_x = x - center.x - (anchor.ra - RA_REFERENCE_HOURS) * proj.ra_scale();
        self.offset_y = y - center.y + anchor.dec * proj.dec_scale();

        debug!(zoom = self.zoom, x, y, "zoom changed");
    }

    /// Applies one wheel event. Positive `delta_y` (scrolling down) zooms out.
    pub fn wheel(&mut self, viewport: Viewport, x: f64, y: f64, delta_y: f64) {
        let factor = if delta_y > 0.0 {
            self.config.wheel_zoom_out
        } else {
            self.config.wheel_zoom_in
        };
        self.zoom_at(viewport, x, y, factor);
    }

    /// Click tolerance in pixels at the current zoom.
    pub fn hit_radius(&self) -> f64 {
        self.config.hit_radius_px * self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewConfig, ViewState};
    use crate::projection::{SkyProjection, Viewport};
    use foundation::math::{Vec2, approx_eq};
    use proptest::prelude::*;

    #[test]
    fn drag_moves_offset_by_pointer_delta() {
        let mut view = ViewState::new();
        assert_eq!(view.update_drag(10.0, 10.0), None);

        view.begin_drag(100.0, 100.0);
        assert_eq!(view.update_drag(110.0, 95.0), Some(Vec2::new(10.0, -5.0)));
        assert_eq!(view.update_drag(120.0, 95.0), Some(Vec2::new(10.0, 0.0)));
        assert_eq!((view.offset_x, view.offset_y), (20.0, -5.0));

        view.end_drag();
        assert!(!view.is_dragging());
        assert_eq!(view.update_drag(500.0, 500.0), None);
        assert_eq!((view.offset_x, view.offset_y), (20.0, -5.0));
    }

    #[test]
    fn wheel_direction_selects_factor() {
        let vp = Viewport::new(800.0, 600.0);
        let mut view = ViewState::new();
        view.wheel(vp, 400.0, 300.0, -120.0);
        assert!(approx_eq(view.zoom(), 1.1, 1e-12));
        view.wheel(vp, 400.0, 300.0, 120.0);
        assert!(approx_eq(view.zoom(), 0.99, 1e-12));
    }

    #[test]
    fn zoom_at_center_keeps_offset_zero() {
        let vp = Viewport::new(800.0, 600.0);
        let mut view = ViewState::new();
        view.zoom_at(vp, 400.0, 300.0, 2.0);
        assert_eq!(view.zoom(), 2.0);
        assert!(approx_eq(view.offset_x, 0.0, 1e-9));
        assert!(approx_eq(view.offset_y, 0.0, 1e-9));
    }

    #[test]
    fn zoom_saturates_at_bounds() {
        let vp = Viewport::default();
        let mut view = ViewState::new();
        for _ in 0..200 {
            view.wheel(vp, 10.0, 10.0, 1.0);
        }
        assert_eq!(view.zoom(), 0.5);
        for _ in 0..200 {
            view.wheel(vp, 10.0, 10.0, -1.0);
        }
        assert_eq!(view.zoom(), 5.0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut view = ViewState::new();
        view.offset_x = 12.0;
        view.set_zoom(3.0);
        view.begin_drag(1.0, 1.0);
        view.reset();
        assert_eq!(view, ViewState::new());
    }

    #[test]
    fn custom_config_bounds_apply() {
        let mut view = ViewState::with_config(ViewConfig {
            min_zoom: 2.0,
            max_zoom: 3.0,
            ..ViewConfig::default()
        });
        assert_eq!(view.zoom(), 2.0);
        view.set_zoom(10.0);
        assert_eq!(view.zoom(), 3.0);
        view.set_zoom(f64::NAN);
        assert_eq!(view.zoom(), 3.0);
        assert_eq!(view.hit_radius(), 30.0);
    }

    proptest! {
        #[test]
        fn zoom_at_preserves_anchor(
            x in 0.0f64..=1280.0,
            y in 0.0f64..=720.0,
            offset_x in -3000.0f64..3000.0,
            offset_y in -3000.0f64..3000.0,
            start_zoom in 0.5f64..=5.0,
            factor in 0.1f64..10.0,
        ) {
            let vp = Viewport::new(1280.0, 720.0);
            let mut view = ViewState::new();
            view.offset_x = offset_x;
            view.offset_y = offset_y;
            view.set_zoom(start_zoom);

            let before = SkyProjection::new(vp, &view).screen_to_world(x, y);
            view.zoom_at(vp, x, y, factor);
            let after = SkyProjection::new(vp, &view).screen_to_world(x, y);

            prop_assert!(approx_eq(before.ra, after.ra, 1e-9));
            prop_assert!(approx_eq(before.dec, after.dec, 1e-9));
        }

        #[test]
        fn zoom_stays_clamped(ticks in proptest::collection::vec(-1.0f64..1.0, 0..300)) {
            let vp = Viewport::default();
            let mut view = ViewState::new();
            for dy in ticks {
                view.wheel(vp, 300.0, 200.0, dy);
                prop_assert!(view.zoom() >= 0.5 && view.zoom() <= 5.0);
            }
        }
    }
}
