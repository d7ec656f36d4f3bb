pub mod lenient;
pub mod record;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

pub use record::*;

/// Serialized form of a catalog: the full star list plus the quiz subset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StarDocument {
    pub stars: Vec<StarRecord>,
    #[serde(rename = "namedStars")]
    pub named_stars: Vec<StarRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The resource could not be retrieved at all.
    Fetch(String),
    /// The payload is not JSON.
    Parse(String),
    /// The payload is JSON but not an object with star arrays.
    NotAnObject,
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Fetch(msg) => write!(f, "failed to fetch star data: {msg}"),
            CatalogError::Parse(msg) => write!(f, "star data is not valid JSON: {msg}"),
            CatalogError::NotAnObject => write!(f, "star data must be a JSON object"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// What happened while turning a document into a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub stars: usize,
    pub named: usize,
    /// Array entries that were not objects.
    pub skipped_entries: usize,
    /// Records left out of the quiz because an earlier record had the same id.
    pub duplicate_ids: usize,
    /// `namedStars` entries that fail the named-star rule.
    pub rejected_named: usize,
}

/// Immutable in-memory star catalog.
///
/// Holds every renderable star and the named subset used for quiz questions.
/// `stars` keeps every record, even ones whose id collapsed to 0. Ids are
/// unique within `named` and in [`StarCatalog::get`]; the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct StarCatalog {
    stars: Vec<StarRecord>,
    named: Vec<StarRecord>,
    by_id: HashMap<i64, usize>,
}

impl StarCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog whose named subset is derived from `stars`.
    pub fn from_stars(stars: Vec<StarRecord>) -> Self {
        Self::from_parts(stars, None, NAMED_MAG_CUTOFF).0
    }

    /// Builds a catalog from explicit lists. `named` is filtered through the
    /// named-star rule so that every member is quiz-eligible.
    pub fn with_named(stars: Vec<StarRecord>, named: Vec<StarRecord>) -> Self {
        Self::from_parts(stars, Some(named), NAMED_MAG_CUTOFF).0
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        Self::from_json_str_with_cutoff(text, NAMED_MAG_CUTOFF).map(|(catalog, _)| catalog)
    }

    /// Parses a star document.
    ///
    /// Only a payload that is not a JSON object fails. Broken records are
    /// coerced or skipped and counted in the returned report.
    pub fn from_json_str_with_cutoff(
        text: &str,
        mag_cutoff: f64,
    ) -> Result<(Self, LoadReport), CatalogError> {
        let root: Value =
            serde_json::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let Value::Object(mut obj) = root else {
            return Err(CatalogError::NotAnObject);
        };

        let mut skipped = 0;
        let stars = records_from(obj.remove("stars"), &mut skipped);
        let named = match obj.remove("namedStars") {
            None | Some(Value::Null) => None,
            Some(v) => Some(records_from(Some(v), &mut skipped)),
        };

        let (catalog, mut report) = Self::from_parts(stars, named, mag_cutoff);
        report.skipped_entries = skipped;

        info!(
            stars = report.stars,
            named = report.named,
            "loaded {} stars, {} named stars",
            report.stars,
            report.named
        );
        if report.skipped_entries + report.rejected_named > 0 {
            warn!(
                skipped = report.skipped_entries,
                rejected_named = report.rejected_named,
                "star data contained malformed records"
            );
        }

        Ok((catalog, report))
    }

    fn from_parts(
        stars: Vec<StarRecord>,
        named: Option<Vec<StarRecord>>,
        mag_cutoff: f64,
    ) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        // Every record stays renderable; only the first record per id is
        // addressable and quiz-eligible.
        let mut by_id: HashMap<i64, usize> = HashMap::with_capacity(stars.len());
        for (idx, star) in stars.iter().enumerate() {
            match by_id.entry(star.id) {
                Entry::Occupied(_) => report.duplicate_ids += 1,
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
            }
        }

        let named = match named {
            Some(list) => {
                let before = list.len();
                let eligible: Vec<StarRecord> =
                    list.into_iter().filter(|s| s.is_named(mag_cutoff)).collect();
                report.rejected_named = before - eligible.len();
                first_per_id(eligible, &mut report.duplicate_ids)
            }
            None => stars
                .iter()
                .enumerate()
                .filter(|&(idx, s)| by_id.get(&s.id) == Some(&idx) && s.is_named(mag_cutoff))
                .map(|(_, s)| s.clone())
                .collect(),
        };

        if report.duplicate_ids > 0 {
            warn!(
                duplicates = report.duplicate_ids,
                "records sharing an id are drawn but left out of the quiz"
            );
        }

        report.stars = stars.len();
        report.named = named.len();

        (
            Self {
                stars,
                named,
                by_id,
            },
            report,
        )
    }

    /// Every star, in document order.
    pub fn stars(&self) -> &[StarRecord] {
        &self.stars
    }

    /// Quiz-eligible stars, in document order.
    pub fn named(&self) -> &[StarRecord] {
        &self.named
    }

    pub fn get(&self, id: i64) -> Option<&StarRecord> {
        self.by_id.get(&id).map(|&idx| &self.stars[idx])
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn to_document(&self) -> StarDocument {
        StarDocument {
            stars: self.stars.clone(),
            named_stars: self.named.clone(),
        }
    }
}

fn records_from(value: Option<Value>, skipped: &mut usize) -> Vec<StarRecord> {
    let items = match value {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Vec::new(),
        Some(_) => {
            *skipped += 1;
            return Vec::new();
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            *skipped += 1;
            continue;
        }
        match StarRecord::deserialize(item) {
            Ok(star) => out.push(star),
            Err(_) => *skipped += 1,
        }
    }
    out
}

fn first_per_id(stars: Vec<StarRecord>, dupes: &mut usize) -> Vec<StarRecord> {
    let mut seen: HashMap<i64, ()> = HashMap::with_capacity(stars.len());
    let mut out = Vec::with_capacity(stars.len());
    for star in stars {
        match seen.entry(star.id) {
            Entry::Occupied(_) => *dupes += 1,
            Entry::Vacant(slot) => {
                slot.insert(());
                out.push(star);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, LoadReport, NAMED_MAG_CUTOFF, StarCatalog, StarRecord};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "stars": [
            {"id": 32263, "proper": "Sirius", "ra": 6.752481, "dec": -16.716116,
             "dist": 2.6371, "mag": -1.44, "x": -0.494323, "y": 2.476731, "z": -0.758485},
            {"id": 0, "proper": "Sol", "ra": 0, "dec": 0, "dist": 0, "mag": -26.7,
             "x": 0, "y": 0, "z": 0},
            {"id": "91262", "proper": "Vega", "ra": "18.615649", "dec": 38.783692,
             "dist": 7.6787, "mag": 0.03, "x": 1.2, "y": -6.1, "z": 4.8},
            {"id": 5, "ra": 1.0, "dec": 2.0, "mag": "n/a"}
        ],
        "namedStars": [
            {"id": 32263, "proper": "Sirius", "ra": 6.752481, "dec": -16.716116,
             "dist": 2.6371, "mag": -1.44, "x": -0.494323, "y": 2.476731, "z": -0.758485},
            {"id": 91262, "proper": "Vega", "ra": 18.615649, "dec": 38.783692,
             "dist": 7.6787, "mag": 0.03, "x": 1.2, "y": -6.1, "z": 4.8}
        ]
    }"#;

    #[test]
    fn parses_document_and_coerces_fields() {
        let (catalog, report) =
            StarCatalog::from_json_str_with_cutoff(SAMPLE, NAMED_MAG_CUTOFF).expect("load");
        assert_eq!(
            report,
            LoadReport {
                stars: 4,
                named: 2,
                skipped_entries: 0,
                duplicate_ids: 0,
                rejected_named: 0,
            }
        );

        let vega = catalog.get(91262).expect("vega by numeric id");
        assert_eq!(vega.proper, "Vega");
        assert_eq!(vega.ra, 18.615649);

        let unnamed = catalog.get(5).expect("unnamed star");
        assert_eq!(unnamed.proper, "");
        assert_eq!(unnamed.mag, 0.0);
        assert_eq!(unnamed.dist, 0.0);
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let text = r#"{"stars": [null, 3, {"id": 1, "proper": 42, "ra": [1]}, {"id": 1}]}"#;
        let (catalog, report) =
            StarCatalog::from_json_str_with_cutoff(text, NAMED_MAG_CUTOFF).expect("load");
        assert_eq!(report.skipped_entries, 2);
        assert_eq!(report.duplicate_ids, 1);
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(1),
            Some(&StarRecord {
                id: 1,
                ..StarRecord::default()
            })
        );
    }

    #[test]
    fn records_without_ids_are_kept_for_rendering() {
        let text = r#"{"stars": [
            {"proper": "Alpha", "ra": 1.0, "dec": 10.0, "mag": 1.0},
            {"id": "n/a", "proper": "Beta", "ra": 2.0, "dec": 20.0, "mag": 2.0},
            {"id": null, "proper": "Gamma", "ra": 3.0, "dec": 30.0, "mag": 3.0},
            {"id": 7, "proper": "Delta", "ra": 4.0, "dec": 40.0, "mag": 4.0}
        ]}"#;
        let (catalog, report) =
            StarCatalog::from_json_str_with_cutoff(text, NAMED_MAG_CUTOFF).expect("load");

        let drawn: Vec<&str> = catalog.stars().iter().map(|s| s.proper.as_str()).collect();
        assert_eq!(drawn, vec!["Alpha", "Beta", "Gamma", "Delta"]);
        assert_eq!(report.duplicate_ids, 2);

        let quiz: Vec<&str> = catalog.named().iter().map(|s| s.proper.as_str()).collect();
        assert_eq!(quiz, vec!["Alpha", "Delta"]);
        assert_eq!(catalog.get(0).map(|s| s.proper.as_str()), Some("Alpha"));
    }

    #[test]
    fn explicit_named_list_keeps_first_record_per_id() {
        let stars = vec![
            StarRecord {
                id: 3,
                proper: "Deneb".into(),
                mag: 1.25,
                ..StarRecord::default()
            },
            StarRecord {
                id: 3,
                proper: "Altair".into(),
                mag: 0.76,
                ..StarRecord::default()
            },
        ];
        let catalog = StarCatalog::with_named(stars.clone(), stars);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.named().len(), 1);
        assert_eq!(catalog.named()[0].proper, "Deneb");
    }

    #[test]
    fn missing_named_list_is_derived_from_stars() {
        let text = r#"{"stars": [
            {"id": 1, "proper": "Sol", "mag": -26.7},
            {"id": 2, "proper": "Rigel", "mag": 0.18},
            {"id": 3, "proper": "", "mag": 1.0},
            {"id": 4, "proper": "Dim", "mag": 9.5}
        ]}"#;
        let catalog = StarCatalog::from_json_str(text).expect("load");
        let names: Vec<&str> = catalog.named().iter().map(|s| s.proper.as_str()).collect();
        assert_eq!(names, vec!["Rigel"]);
    }

    #[test]
    fn named_list_is_filtered_through_named_rule() {
        let text = r#"{"stars": [], "namedStars": [
            {"id": 1, "proper": "Sol", "mag": -26.7},
            {"id": 2, "proper": "Rigel", "mag": 0.18}
        ]}"#;
        let (catalog, report) =
            StarCatalog::from_json_str_with_cutoff(text, NAMED_MAG_CUTOFF).expect("load");
        assert_eq!(report.rejected_named, 1);
        assert_eq!(catalog.named().len(), 1);
        assert!(catalog.is_empty());
    }

    #[test]
    fn rejects_non_json_and_non_object_payloads() {
        assert!(matches!(
            StarCatalog::from_json_str("<html>404</html>"),
            Err(CatalogError::Parse(_))
        ));
        assert_eq!(
            StarCatalog::from_json_str("[1, 2, 3]").unwrap_err(),
            CatalogError::NotAnObject
        );
    }

    #[test]
    fn empty_object_is_an_empty_catalog() {
        let catalog = StarCatalog::from_json_str("{}").expect("load");
        assert!(catalog.is_empty());
        assert!(catalog.named().is_empty());
    }

    #[test]
    fn document_round_trips_through_serde() {
        let catalog = StarCatalog::from_json_str(SAMPLE).expect("load");
        let text = serde_json::to_string(&catalog.to_document()).expect("serialize");
        let again = StarCatalog::from_json_str(&text).expect("reload");
        assert_eq!(again.stars(), catalog.stars());
        assert_eq!(again.named(), catalog.named());
    }
}
