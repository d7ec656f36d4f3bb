use foundation::math::Vec2;

use crate::view::ViewState;

/// Horizontal angular span mapped onto the short canvas side (hours).
pub const RA_SPAN_HOURS: f64 = 24.0;

/// Vertical angular span mapped onto the short canvas side (degrees).
pub const DEC_SPAN_DEG: f64 = 180.0;

/// Right ascension placed at the canvas center when the view is not panned.
pub const RA_REFERENCE_HOURS: f64 = 12.0;

/// Canvas size in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Sizes are clamped to at least one pixel so the scale never collapses.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn short_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() { v.max(1.0) } else { 1.0 }
}

/// A point on the sky: right ascension in hours, declination in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SkyCoord {
    pub ra: f64,
    pub dec: f64,
}

impl SkyCoord {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }
}

/// Flat equirectangular mapping between sky coordinates and canvas pixels.
///
/// The mapping is axis-aligned and affine, so `world_to_screen` and
/// `screen_to_world` are exact inverses up to rounding. Right ascension grows
/// to the right and declination grows upward (screen y grows downward).
///
/// No wraparound is applied at ra 0h/24h.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SkyProjection {
    viewport: Viewport,
    offset: Vec2,
    zoom: f64,
}

impl SkyProjection {
    pub fn new(viewport: Viewport, view: &ViewState) -> Self {
        Self {
            viewport,
            offset: Vec2::new(view.offset_x, view.offset_y),
            zoom: view.zoom(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Pixels per hour of right ascension.
    pub fn ra_scale(&self) -> f64 {
        self.viewport.short_side() / RA_SPAN_HOURS * self.zoom
    }

    /// Pixels per degree of declination.
    pub fn dec_scale(&self) -> f64 {
        self.viewport.short_side() / DEC_SPAN_DEG * self.zoom
    }

    /// Screen position of the projection origin (ra 12h, dec 0°).
    pub fn origin(&self) -> Vec2 {
        self.viewport.center() + self.offset
    }

    pub fn world_to_screen(&self, ra: f64, dec: f64) -> Vec2 {
        let o = self.origin();
        Vec2::new(
            o.x + (ra - RA_REFERENCE_HOURS) * self.ra_scale(),
            o.y - dec * self.dec_scale(),
        )
    }

    pub fn screen_to_world(&self, x: f64, y: f64) -> SkyCoord {
        let o = self.origin();
        SkyCoord::new(
            RA_REFERENCE_HOURS + (x - o.x) / self.ra_scale(),
            -(y - o.y) / self.dec_scale(),
        )
    }
}
