//! Line protocol spoken with the game referee.
//!
//! Each turn the referee sends the eight upcoming pairs (`"a b"` per line),
//! then twelve rows for our board and twelve rows for the opponent's. We
//! answer with one line per turn: `"<column> <rotation>"`, optionally
//! followed by a short message.

use chainfall_bot::Decision;
use chainfall_core::game::turn::TurnState;
use chainfall_core::model::cell::Colour;
use chainfall_core::model::grid::{Grid, HEIGHT, ParseError};
use chainfall_core::model::queue::{BlockPair, NextQueue, QUEUE_LEN};
use std::io::BufRead;
use thiserror::Error;

pub const LINES_PER_TURN: usize = QUEUE_LEN + 2 * HEIGHT;
pub const GAME_OVER_LINE: &str = "0 0 It's game over, man! IT'S GAME OVER!";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("I/O error reading turn input: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("input ended mid-turn after {found} of {} lines", LINES_PER_TURN)]
    Truncated { found: usize },
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },
}

/// Reads whole turns from a buffered source, tracking line numbers for
/// error reports.
pub struct TurnReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> TurnReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns `None` once the input is exhausted at a turn boundary.
    pub fn next_turn(&mut self) -> Result<Option<TurnState>, ProtocolError> {
        let mut lines = Vec::with_capacity(LINES_PER_TURN);
        while lines.len() < LINES_PER_TURN {
            match self.next_line()? {
                Some(line) => lines.push(line),
                None if lines.is_empty() => return Ok(None),
                None => return Err(ProtocolError::Truncated { found: lines.len() }),
            }
        }
        let first_line = self.line + 1 - LINES_PER_TURN;
        parse_turn(&lines, first_line).map(Some)
    }

    /// Next non-blank line, trimmed. Blank lines between turns are skipped.
    fn next_line(&mut self) -> Result<Option<String>, ProtocolError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let trimmed = self.buf.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }
}

/// Parses one turn's worth of lines. `first_line` is the 1-based input line
/// of `lines[0]`, used in error messages.
pub fn parse_turn(lines: &[String], first_line: usize) -> Result<TurnState, ProtocolError> {
    if lines.len() != LINES_PER_TURN {
        return Err(ProtocolError::Truncated { found: lines.len() });
    }

    let mut pairs = [BlockPair::new(Colour::Blue, Colour::Blue); QUEUE_LEN];
    for (offset, (slot, line)) in pairs.iter_mut().zip(lines).enumerate() {
        *slot = line.parse().map_err(|source| ProtocolError::Parse {
            line: first_line + offset,
            source,
        })?;
    }

    let board = |start: usize| {
        Grid::from_rows(&lines[start..start + HEIGHT]).map_err(|source| {
            let row = match &source {
                ParseError::RowWidth { row, .. } | ParseError::BadCell { row, .. } => *row,
                _ => 0,
            };
            ProtocolError::Parse {
                line: first_line + start + row,
                source,
            }
        })
    };
    let player = board(QUEUE_LEN)?;
    let opponent = board(QUEUE_LEN + HEIGHT)?;

    Ok(TurnState::new(NextQueue::new(pairs), player, opponent))
}

pub fn format_decision(decision: &Decision) -> String {
    let placement = decision.placement;
    match decision.message() {
        Some(message) => format!(
            "{} {} {}",
            placement.column,
            placement.rotation.index(),
            message
        ),
        None => format!("{} {}", placement.column, placement.rotation.index()),
    }
}

/// Renders a turn back into protocol lines.
pub fn render_turn(state: &TurnState) -> Vec<String> {
    let mut lines = Vec::with_capacity(LINES_PER_TURN);
    lines.extend(state.queue.pairs().iter().map(|pair| pair.to_string()));
    lines.extend(state.player.rows());
    lines.extend(state.opponent.rows());
    lines
}
