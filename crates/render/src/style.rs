/// Straight-alpha colour with 8-bit channels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS colour string, e.g. `rgba(74, 144, 217, 0.3)`.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub background: Rgba,
    pub grid_color: Rgba,
    pub grid_line_width: f64,
    /// Meridian spacing in hours of right ascension.
    pub grid_ra_step_hours: f64,
    /// Parallel spacing in degrees of declination.
    pub grid_dec_step_deg: f64,
    pub star_color: Rgba,
    /// Radius of the faintest star at zoom 1, in pixels.
    pub base_star_size: f64,
    /// Extra radius given to the brightest star at zoom 1.
    pub star_size_range: f64,
    /// Faint end of the magnitude scale.
    pub max_magnitude: f64,
    /// Bright end of the magnitude scale.
    pub min_magnitude: f64,
    pub min_opacity: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Rgba::opaque(0, 0, 0),
            grid_color: Rgba::new(74, 144, 217, 0.3),
            grid_line_width: 1.0,
            grid_ra_step_hours: 2.0,
            grid_dec_step_deg: 30.0,
            star_color: Rgba::opaque(255, 255, 255),
            base_star_size: 2.0,
            star_size_range: 8.0,
            max_magnitude: 8.0,
            min_magnitude: -1.5,
            min_opacity: 0.1,
        }
    }
}

impl RenderStyle {
    /// Radius at zoom 1. Grows linearly from `base_star_size` at the faint end
    /// to `base_star_size + star_size_range` at the bright end.
    pub fn star_radius(&self, mag: f64) -> f64 {
        let t = (mag - self.max_magnitude) / (self.min_magnitude - self.max_magnitude);
        (self.base_star_size + t * self.star_size_range).max(0.0)
    }

    pub fn star_opacity(&self, mag: f64) -> f64 {
        let t = (mag - self.min_magnitude) / (self.max_magnitude - self.min_magnitude);
        (1.0 - t).max(self.min_opacity).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderStyle, Rgba};
    use foundation::math::approx_eq;

    #[test]
    fn radius_spans_base_to_base_plus_range() {
        let style = RenderStyle::default();
        assert!(approx_eq(style.star_radius(8.0), 2.0, 1e-12));
        assert!(approx_eq(style.star_radius(-1.5), 10.0, 1e-12));
        assert!(approx_eq(style.star_radius(3.25), 6.0, 1e-12));
        assert!(style.star_radius(40.0) >= 0.0);
    }

    #[test]
    fn opacity_has_a_floor() {
        let style = RenderStyle::default();
        assert!(approx_eq(style.star_opacity(-1.5), 1.0, 1e-12));
        assert!(approx_eq(style.star_opacity(8.0), 0.1, 1e-12));
        assert!(approx_eq(style.star_opacity(7.9), 0.1, 1e-12));
        assert!(approx_eq(style.star_opacity(3.25), 0.5, 1e-12));
        assert_eq!(style.star_opacity(-26.7), 1.0);
    }

    #[test]
    fn css_formatting() {
        assert_eq!(Rgba::new(74, 144, 217, 0.3).to_css(), "rgba(74, 144, 217, 0.3)");
        assert_eq!(Rgba::opaque(0, 0, 0).to_css(), "rgba(0, 0, 0, 1)");
        assert_eq!(Rgba::opaque(1, 2, 3).with_alpha(2.0).a, 1.0);
    }
}
