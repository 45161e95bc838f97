use crate::params::ScoreWeights;
use chainfall_core::engine::ChainReport;
use chainfall_core::model::grid::{LandingRows, WIDTH};

/// Inputs for scoring one simulated placement.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub report: &'a ChainReport,
    /// Landing rows of the board before the pair was placed.
    pub landing: &'a LandingRows,
    /// Zero-based slot of the placed pair in the lookahead queue.
    pub queue_position: usize,
    pub expected_depth: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub chain_target: i32,
    pub chain_bulk: i32,
    pub skull: i32,
    pub height: i32,
    pub adjacency: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.chain_target + self.chain_bulk + self.skull + self.height + self.adjacency
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn score(&self, input: &ScoreInput<'_>) -> ScoreBreakdown {
        let w = &self.weights;
        let chains = input.report.chain_count() as i32;

        let miss = chains - input.expected_depth;
        let slots_left = w.queue_horizon - input.queue_position as i32;
        let chain_target = w.chain_target * slots_left * (1 - miss * miss);

        let chain_bulk = w.chain_bulk * chains * input.report.average_cleared_group_size() as i32;
        let skull = w.skull * chains * input.report.skulls_cleared() as i32;

        ScoreBreakdown {
            chain_target,
            chain_bulk,
            skull,
            height: w.height * average_headroom(input.landing),
            adjacency: input.report.average_group_size() as i32 - w.adjacency_offset,
        }
    }
}

/// Landing row counted for a column with no room left.
pub const FULL_COLUMN_ROW: i32 = -2;

/// Mean landing row across columns, rounded. A full column counts as
/// [`FULL_COLUMN_ROW`].
fn average_headroom(landing: &LandingRows) -> i32 {
    let sum: i32 = landing
        .iter()
        .map(|row| row.map_or(FULL_COLUMN_ROW, |y| y as i32))
        .sum();
    (f64::from(sum) / WIDTH as f64).round() as i32
}
