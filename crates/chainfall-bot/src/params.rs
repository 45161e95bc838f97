/// Tuned coefficients for the placement heuristic.
///
/// The defaults are the values the scorer was tuned with; changing them
/// changes play noticeably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    /// Reward for hitting the expected chain length, per remaining queue slot (default: 100)
    pub chain_target: i32,

    /// Number of queue slots the chain-target term counts down from (default: 8)
    pub queue_horizon: i32,

    /// Per chain step, per block of average cleared group size (default: 10)
    pub chain_bulk: i32,

    /// Per chain step, per skull removed (default: 100)
    pub skull: i32,

    /// Per row of average free height across columns (default: 30)
    pub height: i32,

    /// Subtracted from the average group size (default: 3)
    pub adjacency_offset: i32,

    /// Chain length targeted at session start and after a wrap (default: 4)
    pub initial_expected_depth: i32,

    /// Chain length targeted right after a board disturbance (default: 2)
    pub disturbed_expected_depth: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            chain_target: 100,
            queue_horizon: 8,
            chain_bulk: 10,
            skull: 100,
            height: 30,
            adjacency_offset: 3,
            initial_expected_depth: 4,
            disturbed_expected_depth: 2,
        }
    }
}
