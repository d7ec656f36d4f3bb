use catalog::StarRecord;
use foundation::math::stable_total_cmp_f64;
use rand::Rng;
use tracing::debug;

use crate::stats::QuizStats;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Wrong answers offered next to the correct one.
    pub distractor_count: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            distractor_count: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// A question is already open.
    AlreadyActive,
    /// No question is open.
    NotActive,
    /// The answer form was submitted with nothing selected.
    NoSelection,
    /// The selected id is not one of the offered options.
    UnknownOption(i64),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::AlreadyActive => write!(f, "a question is already open"),
            QuizError::NotActive => write!(f, "no question is open"),
            QuizError::NoSelection => write!(f, "please select an answer"),
            QuizError::UnknownOption(id) => write!(f, "option {id} is not part of this question"),
        }
    }
}

impl std::error::Error for QuizError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    pub id: i64,
    pub name: String,
}

impl From<&StarRecord> for QuizOption {
    fn from(star: &StarRecord) -> Self {
        Self {
            id: star.id,
            name: star.proper.clone(),
        }
    }
}

/// One open "name this star" question.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// The star being asked about; also the correct answer.
    pub star: StarRecord,
    /// Shuffled options; contains `star` exactly once.
    pub options: Vec<QuizOption>,
}

impl Question {
    pub fn correct_id(&self) -> i64 {
        self.star.id
    }
}

/// Outcome of a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub is_correct: bool,
    pub selected_id: i64,
    pub correct_name: String,
}

/// The `count` named stars closest to `center` in 3D, nearest first.
///
/// `center` itself (matched by id) is never returned. Equal distances keep
/// the order of `named`.
pub fn nearest_named<'a>(
    center: &StarRecord,
    named: &'a [StarRecord],
    count: usize,
) -> Vec<&'a StarRecord> {
    let mut by_distance: Vec<(f64, &StarRecord)> = named
        .iter()
        .filter(|s| s.id != center.id)
        .map(|s| (center.distance_to(s), s))
        .collect();
    by_distance.sort_by(|a, b| stable_total_cmp_f64(a.0, b.0));
    by_distance.into_iter().take(count).map(|(_, s)| s).collect()
}

/// Unbiased in-place Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Question lifecycle and scoring.
///
/// Idle until [`QuizEngine::start`] opens a question; [`QuizEngine::submit`]
/// or [`QuizEngine::skip`] closes it again. Only one question is open at a
/// time.
#[derive(Debug, Clone, Default)]
pub struct QuizEngine {
    config: QuizConfig,
    current: Option<Question>,
    stats: QuizStats,
}

impl QuizEngine {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            config,
            current: None,
            stats: QuizStats::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> QuizStats {
        self.stats
    }

    /// Opens a question about `star`, drawing distractors from `named`.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        star: &StarRecord,
        named: &[StarRecord],
        rng: &mut R,
    ) -> Result<&Question, QuizError> {
        if self.current.is_some() {
            return Err(QuizError::AlreadyActive);
        }

        let mut options: Vec<QuizOption> = Vec::with_capacity(self.config.distractor_count + 1);
        options.push(QuizOption::from(star));
        options.extend(
            nearest_named(star, named, self.config.distractor_count)
                .into_iter()
                .map(QuizOption::from),
        );
        shuffle(&mut options, rng);

        debug!(star = star.id, options = options.len(), "question opened");
        Ok(self.current.insert(Question {
            star: star.clone(),
            options,
        }))
    }

    /// Scores the selected option and closes the question.
    ///
    /// A missing or unknown selection is rejected without touching any state,
    /// so the caller can prompt and let the user try again.
    pub fn submit(&mut self, selected: Option<i64>) -> Result<Feedback, QuizError> {
        let question = self.current.as_ref().ok_or(QuizError::NotActive)?;
        let selected_id = selected.ok_or(QuizError::NoSelection)?;
        if !question.options.iter().any(|o| o.id == selected_id) {
            return Err(QuizError::UnknownOption(selected_id));
        }

        let is_correct = selected_id == question.correct_id();
        let correct_name = question.star.proper.clone();
        self.stats.record(is_correct);
        self.current = None;

        debug!(
            selected = selected_id,
            is_correct,
            answered = self.stats.answered,
            "question answered"
        );
        Ok(Feedback {
            is_correct,
            selected_id,
            correct_name,
        })
    }

    /// Closes the open question without scoring it. Returns whether one was open.
    pub fn skip(&mut self) -> bool {
        let was_open = self.current.take().is_some();
        if was_open {
            debug!("question skipped");
        }
        was_open
    }

    /// Clears counters and any open question together.
    pub fn reset(&mut self) {
        self.current = None;
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::{QuizConfig, QuizEngine, QuizError, nearest_named, shuffle};
    use catalog::StarRecord;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn star(id: i64, proper: &str, pos: [f64; 3]) -> StarRecord {
        StarRecord {
            id,
            proper: proper.to_string(),
            x: pos[0],
            y: pos[1],
            z: pos[2],
            ..StarRecord::default()
        }
    }

    fn named() -> Vec<StarRecord> {
        vec![
            star(1, "Sirius", [0.0, 0.0, 0.0]),
            star(2, "Vega", [4.0, 0.0, 0.0]),
            star(3, "Procyon", [1.0, 0.0, 0.0]),
            star(4, "Altair", [0.0, 0.0, 3.0]),
            star(5, "Rigil Kentaurus", [0.0, 2.0, 0.0]),
            star(6, "Deneb", [0.0, -10.0, 0.0]),
        ]
    }

    #[test]
    fn nearest_excludes_center_and_sorts_by_distance() {
        let stars = named();
        let got: Vec<i64> = nearest_named(&stars[0], &stars, 3).iter().map(|s| s.id).collect();
        assert_eq!(got, vec![3, 5, 4]);
    }

    #[test]
    fn nearest_keeps_input_order_on_ties() {
        let stars = vec![
            star(1, "C", [0.0, 0.0, 0.0]),
            star(9, "X", [1.0, 0.0, 0.0]),
            star(4, "Y", [-1.0, 0.0, 0.0]),
            star(7, "Z", [0.0, 1.0, 0.0]),
        ];
        let got: Vec<i64> = nearest_named(&stars[0], &stars, 2).iter().map(|s| s.id).collect();
        assert_eq!(got, vec![9, 4]);
    }

    #[test]
    fn shuffle_keeps_membership_and_is_seed_deterministic() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        shuffle(&mut a, &mut StdRng::seed_from_u64(7));
        shuffle(&mut b, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<u32>>());

        let mut empty: Vec<u32> = Vec::new();
        shuffle(&mut empty, &mut StdRng::seed_from_u64(1));
        assert!(empty.is_empty());
    }

    #[test]
    fn shuffle_reaches_every_position() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut first_seen = HashSet::new();
        for _ in 0..200 {
            let mut v = [0, 1, 2, 3];
            shuffle(&mut v, &mut rng);
            first_seen.insert(v[0]);
        }
        assert_eq!(first_seen.len(), 4);
    }

    #[test]
    fn options_contain_correct_star_once_plus_nearest() {
        let stars = named();
        let mut engine = QuizEngine::default();
        let mut rng = StdRng::seed_from_u64(3);
        let q = engine.start(&stars[0], &stars, &mut rng).expect("start");

        assert_eq!(q.options.len(), 4);
        let ids: HashSet<i64> = q.options.iter().map(|o| o.id).collect();
        assert_eq!(ids, HashSet::from([1, 3, 4, 5]));
        assert_eq!(q.options.iter().filter(|o| o.id == 1).count(), 1);
        assert_eq!(q.correct_id(), 1);
    }

    #[test]
    fn option_count_is_capped_by_named_set() {
        for n in 1..=6 {
            let stars: Vec<StarRecord> = named().into_iter().take(n).collect();
            let mut engine = QuizEngine::default();
            let q = engine
                .start(&stars[0], &stars, &mut StdRng::seed_from_u64(n as u64))
                .expect("start");
            assert_eq!(q.options.len(), n.min(4));
            let unique: HashSet<i64> = q.options.iter().map(|o| o.id).collect();
            assert_eq!(unique.len(), q.options.len());
        }
    }

    #[test]
    fn same_seed_gives_same_option_order() {
        let stars = named();
        let mut a = QuizEngine::default();
        let mut b = QuizEngine::default();
        let qa = a
            .start(&stars[0], &stars, &mut StdRng::seed_from_u64(11))
            .expect("start")
            .clone();
        let qb = b
            .start(&stars[0], &stars, &mut StdRng::seed_from_u64(11))
            .expect("start")
            .clone();
        assert_eq!(qa, qb);
    }

    #[test]
    fn second_start_is_refused_while_active() {
        let stars = named();
        let mut engine = QuizEngine::default();
        let mut rng = StdRng::seed_from_u64(0);
        engine.start(&stars[0], &stars, &mut rng).expect("start");
        assert_eq!(
            engine.start(&stars[1], &stars, &mut rng).unwrap_err(),
            QuizError::AlreadyActive
        );
        assert_eq!(engine.current().expect("open").star.id, 1);
    }

    #[test]
    fn submit_scores_and_closes() {
        let stars = named();
        let mut engine = QuizEngine::default();
        let mut rng = StdRng::seed_from_u64(0);

        engine.start(&stars[0], &stars, &mut rng).expect("start");
        let fb = engine.submit(Some(1)).expect("submit");
        assert!(fb.is_correct);
        assert_eq!(fb.correct_name, "Sirius");
        assert!(!engine.is_active());
        assert_eq!((engine.stats().answered, engine.stats().correct), (1, 1));

        engine.start(&stars[0], &stars, &mut rng).expect("start");
        let fb = engine.submit(Some(3)).expect("submit");
        assert!(!fb.is_correct);
        assert_eq!(fb.selected_id, 3);
        assert_eq!((engine.stats().answered, engine.stats().correct), (2, 1));
    }

    #[test]
    fn invalid_submissions_change_nothing() {
        let stars = named();
        let mut engine = QuizEngine::default();
        assert_eq!(engine.submit(Some(1)).unwrap_err(), QuizError::NotActive);

        engine
            .start(&stars[0], &stars, &mut StdRng::seed_from_u64(0))
            .expect("start");
        assert_eq!(engine.submit(None).unwrap_err(), QuizError::NoSelection);
        assert_eq!(engine.submit(Some(6)).unwrap_err(), QuizError::UnknownOption(6));
        assert!(engine.is_active());
        assert_eq!(engine.stats().answered, 0);
    }

    #[test]
    fn skip_and_reset() {
        let stars = named();
        let mut engine = QuizEngine::new(QuizConfig::default());
        let mut rng = StdRng::seed_from_u64(0);

        assert!(!engine.skip());
        engine.start(&stars[0], &stars, &mut rng).expect("start");
        assert!(engine.skip());
        assert_eq!(engine.stats().answered, 0);

        engine.start(&stars[0], &stars, &mut rng).expect("start");
        engine.submit(Some(1)).expect("submit");
        engine.start(&stars[2], &stars, &mut rng).expect("start");
        engine.reset();
        assert!(!engine.is_active());
        assert_eq!(engine.stats().answered, 0);
        assert_eq!(engine.stats().correct, 0);
    }

    #[test]
    fn distractor_count_is_configurable() {
        let stars = named();
        let mut engine = QuizEngine::new(QuizConfig {
            distractor_count: 1,
        });
        let q = engine
            .start(&stars[0], &stars, &mut StdRng::seed_from_u64(0))
            .expect("start");
        let ids: HashSet<i64> = q.options.iter().map(|o| o.id).collect();
        assert_eq!(ids, HashSet::from([1, 3]));
    }
}
