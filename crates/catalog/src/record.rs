use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::lenient;

/// Display name reserved for the Sun. It never takes part in the quiz.
pub const SUN_NAME: &str = "Sol";

/// Default visibility cutoff for the named-star subset (apparent magnitude).
pub const NAMED_MAG_CUTOFF: f64 = 8.0;

/// One catalog entry.
///
/// Deserialization never fails on a single bad field: numbers that are missing
/// or unparseable become `0`, and a missing or non-string name becomes `""`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StarRecord {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub proper: String,
    /// Right ascension in hours.
    #[serde(default, deserialize_with = "lenient::number")]
    pub ra: f64,
    /// Declination in degrees.
    #[serde(default, deserialize_with = "lenient::number")]
    pub dec: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub dist: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub mag: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub y: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub z: f64,
}

impl StarRecord {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Sky coordinates as `[ra, dec]`.
    pub fn sky(&self) -> [f64; 2] {
        [self.ra, self.dec]
    }

    pub fn distance_to(&self, other: &StarRecord) -> f64 {
        self.position().distance(other.position())
    }

    /// True when the star carries a name that may be quizzed.
    ///
    /// The Sun is excluded even though it is named.
    pub fn has_quiz_name(&self) -> bool {
        !self.proper.is_empty() && self.proper != SUN_NAME
    }

    /// Membership test for the named-star subset.
    pub fn is_named(&self, mag_cutoff: f64) -> bool {
        self.has_quiz_name() && self.mag <= mag_cutoff
    }
}

#[cfg(test)]
mod tests {
    use super::{NAMED_MAG_CUTOFF, StarRecord};

    fn star(proper: &str, mag: f64) -> StarRecord {
        StarRecord {
            id: 1,
            proper: proper.to_string(),
            mag,
            ..StarRecord::default()
        }
    }

    #[test]
    fn named_subset_rules() {
        assert!(star("Vega", 0.03).is_named(NAMED_MAG_CUTOFF));
        assert!(star("Edge", 8.0).is_named(NAMED_MAG_CUTOFF));
        assert!(!star("Faint", 8.01).is_named(NAMED_MAG_CUTOFF));
        assert!(!star("", 1.0).is_named(NAMED_MAG_CUTOFF));
        assert!(!star("Sol", -26.7).is_named(NAMED_MAG_CUTOFF));
    }

    #[test]
    fn sun_has_no_quiz_name() {
        assert!(!star("Sol", -26.7).has_quiz_name());
        assert!(star("Sirius", -1.44).has_quiz_name());
    }

    #[test]
    fn distance_uses_cartesian_position() {
        let a = StarRecord {
            x: 1.0,
            y: 2.0,
            z: 2.0,
            ..StarRecord::default()
        };
        let b = StarRecord::default();
        assert_eq!(a.distance_to(&b), 3.0);
        assert_eq!(b.distance_to(&a), 3.0);
    }
}
