use crate::params::ScoreWeights;

/// Tuning state that lives for the whole match rather than one simulation.
///
/// The expected chain depth counts down each turn a chain actually happened,
/// wrapping back to the initial depth, and drops to the disturbed depth as
/// soon as the board changes under us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    expected_depth: i32,
    disturbed: bool,
    initial_depth: i32,
    disturbed_depth: i32,
}

impl Session {
    pub fn new(weights: &ScoreWeights) -> Self {
        Self {
            expected_depth: weights.initial_expected_depth,
            disturbed: false,
            initial_depth: weights.initial_expected_depth,
            disturbed_depth: weights.disturbed_expected_depth,
        }
    }

    pub fn expected_depth(&self) -> i32 {
        self.expected_depth
    }

    pub fn disturbed(&self) -> bool {
        self.disturbed
    }

    /// Called once per real turn with whether the move just played chained.
    pub fn begin_turn(&mut self, chained: bool) {
        self.disturbed = false;
        if chained {
            self.expected_depth -= 1;
            if self.expected_depth <= 0 {
                self.expected_depth = self.initial_depth;
            }
        }
    }

    pub fn flag_disturbance(&mut self) {
        self.disturbed = true;
        self.expected_depth = self.disturbed_depth;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&ScoreWeights::default())
    }
}
