use crate::scoring::{ScoreBreakdown, ScoreInput, Scorer};
use chainfall_core::engine::{PlacementError, place_pair, resolve_chains};
use chainfall_core::model::action::ActionChoice;
use chainfall_core::model::grid::Grid;
use chainfall_core::model::queue::BlockPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simulation {
    pub grid: Grid,
    pub chain_count: u32,
    pub breakdown: ScoreBreakdown,
}

impl Simulation {
    pub fn score(&self) -> i32 {
        self.breakdown.total()
    }
}

/// Plays `choice` with `pair` on a copy of `parent_grid`, resolves every
/// cascade and scores the result. `parent_grid` is never modified.
pub fn simulate(
    parent_grid: &Grid,
    choice: ActionChoice,
    pair: BlockPair,
    queue_position: usize,
    scorer: &Scorer,
    expected_depth: i32,
) -> Result<Simulation, PlacementError> {
    let landing = parent_grid.landing_rows();
    let mut grid = *parent_grid;
    place_pair(&mut grid, choice.placement(), pair, &landing)?;
    let report = resolve_chains(&mut grid);

    let breakdown = scorer.score(&ScoreInput {
        report: &report,
        landing: &landing,
        queue_position,
        expected_depth,
    });

    Ok(Simulation {
        grid,
        chain_count: report.chain_count(),
        breakdown,
    })
}
