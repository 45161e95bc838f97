use crate::decision_log::{DecisionLog, DecisionLogError, DecisionRow};
use crate::protocol::{GAME_OVER_LINE, ProtocolError, TurnReader, format_decision};
use chainfall_bot::{PlanError, SearchConfig, TurnPlanner};
use chainfall_core::game::turn::TurnState;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing::{Level, event};

/// Totals for one match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub turns: usize,
    pub moves: usize,
    pub game_overs: usize,
    pub disturbances: usize,
    pub chains: usize,
    pub decision_log: Option<PathBuf>,
    pub rows_written: usize,
}

/// Drives the planner from the referee's turn input and answers each turn.
pub struct Controller {
    planner: TurnPlanner,
    decisions: Option<DecisionLog>,
    summary: RunSummary,
}

impl Controller {
    pub fn new(search: SearchConfig) -> Self {
        Self {
            planner: TurnPlanner::new(search),
            decisions: None,
            summary: RunSummary::default(),
        }
    }

    pub fn with_decision_log(mut self, log: DecisionLog) -> Self {
        self.summary.decision_log = Some(log.path().to_path_buf());
        self.decisions = Some(log);
        self
    }

    pub fn planner(&self) -> &TurnPlanner {
        &self.planner
    }

    /// Plans one turn and returns the line to send back.
    pub fn play_turn(&mut self, state: &TurnState) -> Result<String, ControllerError> {
        let start = Instant::now();
        let turn = self.planner.turn();
        let outcome = self.planner.plan_turn(&state.queue, &state.player);
        let elapsed = start.elapsed();
        self.summary.turns += 1;

        let (line, row) = match outcome {
            Ok(decision) => {
                self.summary.moves += 1;
                if decision.disturbed {
                    self.summary.disturbances += 1;
                }
                if decision.chain_count > 0 {
                    self.summary.chains += 1;
                }
                (
                    format_decision(&decision),
                    DecisionRow::from_decision(&decision, elapsed),
                )
            }
            Err(PlanError::NoLegalMoves { .. }) => {
                self.summary.game_overs += 1;
                (
                    GAME_OVER_LINE.to_string(),
                    DecisionRow::game_over(turn, GAME_OVER_LINE, elapsed),
                )
            }
        };

        if let Some(log) = self.decisions.as_mut() {
            log.record(row, state)?;
        }
        Ok(line)
    }

    /// Reads turns until the input is exhausted, writing and flushing one
    /// answer per turn.
    pub fn run<R: BufRead, W: Write>(
        mut self,
        input: R,
        mut output: W,
    ) -> Result<RunSummary, ControllerError> {
        let mut reader = TurnReader::new(input);
        while let Some(state) = reader.next_turn()? {
            let line = self.play_turn(&state)?;
            writeln!(output, "{line}")?;
            output.flush()?;
        }

        if let Some(log) = self.decisions.as_mut() {
            log.flush()?;
            self.summary.rows_written = log.rows_written();
        }

        event!(
            target: "chainfall_app::controller",
            Level::INFO,
            turns = self.summary.turns,
            moves = self.summary.moves,
            game_overs = self.summary.game_overs,
            disturbances = self.summary.disturbances,
            chains = self.summary.chains,
            lines_read = reader.line(),
            "input exhausted"
        );
        Ok(self.summary)
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("{0}")]
    Protocol(#[from] ProtocolError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("{0}")]
    DecisionLog(#[from] DecisionLogError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::render_turn;
    use chainfall_core::model::cell::{Cell, Colour};
    use chainfall_core::model::grid::{Grid, HEIGHT, WIDTH};
    use chainfall_core::model::queue::{BlockPair, NextQueue};
    use std::io::Cursor;

    fn search() -> SearchConfig {
        SearchConfig {
            samples: 40,
            max_depth: 3,
            ..SearchConfig::default()
        }
    }

    fn input(states: &[TurnState]) -> String {
        states
            .iter()
            .flat_map(render_turn)
            .map(|line| line + "\n")
            .collect()
    }

    #[test]
    fn answers_every_turn_with_one_line() {
        let state = TurnState::new(
            NextQueue::uniform(BlockPair::new(Colour::Green, Colour::Green)),
            Grid::empty(),
            Grid::empty(),
        );
        let mut out = Vec::new();
        let summary = Controller::new(search())
            .run(Cursor::new(input(&[state.clone(), state])), &mut out)
            .expect("run");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 2);
        assert_eq!(summary.turns, 2);
        for line in text.lines() {
            let mut parts = line.split_whitespace();
            let column: usize = parts.next().and_then(|p| p.parse().ok()).expect("column");
            let rotation: u8 = parts.next().and_then(|p| p.parse().ok()).expect("rotation");
            assert!(column < WIDTH);
            assert!(rotation < 4);
        }
    }

    #[test]
    fn full_board_prints_game_over() {
        let mut full = Grid::empty();
        for x in 0..WIDTH {
            for y in 0..HEIGHT {
                full.set(x, y, Cell::Skull);
            }
        }
        let state = TurnState::new(
            NextQueue::uniform(BlockPair::new(Colour::Red, Colour::Blue)),
            full,
            Grid::empty(),
        );
        let mut controller = Controller::new(search());
        let line = controller.play_turn(&state).expect("turn");
        assert_eq!(line, GAME_OVER_LINE);
        assert_eq!(controller.planner().turn(), 1);
    }

    #[test]
    fn malformed_input_surfaces_protocol_error() {
        let mut out = Vec::new();
        let err = Controller::new(search())
            .run(Cursor::new("1 2\nnot a pair\n"), &mut out)
            .expect_err("bad input");
        assert!(matches!(err, ControllerError::Protocol(_)));
    }
}
