use std::fmt;

use catalog::StarCatalog;
use foundation::math::stable_total_cmp_f64;

/// Quick facts about a star document, printed by `starquiz stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSummary {
    pub stars: usize,
    pub named: usize,
    /// Name and magnitude of the brightest quiz-eligible star.
    pub brightest: Option<(String, f64)>,
    /// Magnitude range over all stars.
    pub mag_range: Option<(f64, f64)>,
}

impl CatalogSummary {
    pub fn of(catalog: &StarCatalog) -> Self {
        let brightest = catalog
            .named()
            .iter()
            .min_by(|a, b| stable_total_cmp_f64(a.mag, b.mag))
            .map(|s| (s.proper.clone(), s.mag));

        let mag_range = catalog.stars().iter().fold(None, |acc, s| match acc {
            None => Some((s.mag, s.mag)),
            Some((lo, hi)) => Some((f64::min(lo, s.mag), f64::max(hi, s.mag))),
        });

        Self {
            stars: catalog.len(),
            named: catalog.named().len(),
            brightest,
            mag_range,
        }
    }
}

impl fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "stars:       {}", self.stars)?;
        writeln!(f, "named stars: {}", self.named)?;
        if let Some((name, mag)) = &self.brightest {
            writeln!(f, "brightest:   {name} (mag {mag:.2})")?;
        }
        if let Some((lo, hi)) = self.mag_range {
            writeln!(f, "magnitudes:  {lo:.2} .. {hi:.2}")?;
        }
        Ok(())
    }
}
