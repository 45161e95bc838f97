use crate::model::grid::Grid;
use crate::model::queue::NextQueue;

/// Everything the environment reveals at the start of a real turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    pub queue: NextQueue,
    pub player: Grid,
    pub opponent: Grid,
}

impl TurnState {
    pub fn new(queue: NextQueue, player: Grid, opponent: Grid) -> Self {
        Self {
            queue,
            player,
            opponent,
        }
    }
}
