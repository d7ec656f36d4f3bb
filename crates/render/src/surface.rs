use foundation::math::Vec2;

use crate::style::Rgba;

/// Immediate-mode drawing target.
///
/// Backends (an HTML canvas, a test recorder) implement this and receive the
/// commands of a [`crate::RenderFrame`] in order.
pub trait Surface {
    fn clear(&mut self, color: Rgba, width: f64, height: f64);
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f64);
    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgba);
}
