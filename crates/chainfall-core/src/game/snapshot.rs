use super::turn::TurnState;
use crate::model::grid::{Grid, ParseError};
use crate::model::queue::NextQueue;
use serde::{Deserialize, Serialize};

/// JSON-friendly capture of a turn, with boards stored as protocol rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnSnapshot {
    pub turn: u32,
    pub queue: NextQueue,
    pub player: Vec<String>,
    pub opponent: Vec<String>,
}

impl TurnSnapshot {
    pub fn capture(turn: u32, state: &TurnState) -> Self {
        TurnSnapshot {
            turn,
            queue: state.queue,
            player: state.player.rows(),
            opponent: state.opponent.rows(),
        }
    }

    pub fn restore(&self) -> Result<TurnState, ParseError> {
        Ok(TurnState::new(
            self.queue,
            Grid::from_rows(&self.player)?,
            Grid::from_rows(&self.opponent)?,
        ))
    }

    pub fn to_json(turn: u32, state: &TurnState) -> serde_json::Result<String> {
        serde_json::to_string(&Self::capture(turn, state))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
