use catalog::StarRecord;
use foundation::math::Vec2;

use crate::projection::SkyProjection;
use crate::visibility::stars_in_view;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit<'a> {
    pub star: &'a StarRecord,
    /// Screen distance from the query point, in pixels.
    pub distance_px: f64,
}

/// Nearest star to a screen point among the stars inside the visible sky bounds.
///
/// Ordering contract:
/// - The smallest screen distance wins.
/// - On equal distance, the star that comes first in `stars` wins.
pub fn nearest_star<'a>(
    stars: &'a [StarRecord],
    proj: &SkyProjection,
    point: Vec2,
) -> Option<PickHit<'a>> {
    let mut best: Option<PickHit<'a>> = None;
    for visible in stars_in_view(stars, *proj) {
        let d = visible.screen.distance(point);
        if best.is_none_or(|b| d < b.distance_px) {
            best = Some(PickHit {
                star: visible.star,
                distance_px: d,
            });
        }
    }
    best
}

/// Screen picking for the quiz.
///
/// The nearest visible star is accepted only when it is strictly closer than
/// `radius_px` and carries a quiz name (non-empty, not the Sun). A nameless
/// star that is nearer than a named one shadows it.
pub fn pick_named_star<'a>(
    stars: &'a [StarRecord],
    proj: &SkyProjection,
    x: f64,
    y: f64,
    radius_px: f64,
) -> Option<PickHit<'a>> {
    let hit = nearest_star(stars, proj, Vec2::new(x, y))?;
    (hit.distance_px < radius_px && hit.star.has_quiz_name()).then_some(hit)
}
