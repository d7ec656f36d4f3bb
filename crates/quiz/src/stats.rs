/// Running answer counters.
///
/// Both counters only grow until [`QuizStats::reset`], which clears them together.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct QuizStats {
    pub answered: u32,
    pub correct: u32,
}

impl QuizStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, is_correct: bool) {
        self.answered = self.answered.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    /// Percentage of correct answers, rounded to the nearest integer.
    /// Zero before the first answer.
    pub fn success_rate(&self) -> u32 {
        if self.answered == 0 {
            return 0;
        }
        (f64::from(self.correct) / f64::from(self.answered) * 100.0).round() as u32
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
