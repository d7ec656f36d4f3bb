use catalog::StarRecord;
use foundation::bounds::Aabb2;
use foundation::math::Vec2;

use crate::projection::SkyProjection;

/// Sky rectangle covered by the canvas, as `[ra, dec]` bounds.
///
/// The projection is axis-aligned, so the two diagonal corners are enough.
pub fn visible_sky_bounds(proj: &SkyProjection) -> Aabb2 {
    let vp = proj.viewport();
    let top_left = proj.screen_to_world(0.0, 0.0);
    let bottom_right = proj.screen_to_world(vp.width, vp.height);
    Aabb2::from_corners(
        [top_left.ra, top_left.dec],
        [bottom_right.ra, bottom_right.dec],
    )
}

/// A star that survived culling together with its screen position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisibleStar<'a> {
    pub star: &'a StarRecord,
    pub screen: Vec2,
}

/// Stars inside the visible sky rectangle, mapped to screen space.
///
/// Iteration follows catalog order.
pub fn stars_in_view(
    stars: &[StarRecord],
    proj: SkyProjection,
) -> impl Iterator<Item = VisibleStar<'_>> {
    let bounds = visible_sky_bounds(&proj);
    stars
        .iter()
        .filter(move |s| bounds.contains(s.sky()))
        .map(move |star| VisibleStar {
            star,
            screen: proj.world_to_screen(star.ra, star.dec),
        })
}

/// Like [`stars_in_view`], but also drops stars whose mapped position falls
/// outside the canvas pixels. Rounding at the corners can let a star through
/// the sky test that lands a hair off-canvas.
pub fn stars_on_canvas(
    stars: &[StarRecord],
    proj: SkyProjection,
) -> impl Iterator<Item = VisibleStar<'_>> {
    let vp = proj.viewport();
    stars_in_view(stars, proj).filter(move |v| vp.contains(v.screen))
}
