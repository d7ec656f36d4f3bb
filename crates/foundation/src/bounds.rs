/// Axis-aligned bounding box in two dimensions.
///
/// Bounds are closed: points lying exactly on an edge are contained.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    /// Builds bounds from two opposite corners given in any order.
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Self {
        Aabb2 {
            min: [a[0].min(b[0]), a[1].min(b[1])],
            max: [a[0].max(b[0]), a[1].max(b[1])],
        }
    }

    pub fn contains(&self, p: [f64; 2]) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }
}
