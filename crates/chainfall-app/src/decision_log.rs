use chainfall_bot::Decision;
use chainfall_core::game::snapshot::TurnSnapshot;
use chainfall_core::game::turn::TurnState;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One JSONL row per real turn.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRow {
    pub turn: u32,
    pub column: usize,
    pub rotation: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<u8>,
    pub score: i32,
    pub chain_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub game_over: bool,
    pub random_pick: bool,
    pub disturbed: bool,
    pub nodes: usize,
    pub simulations: usize,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<TurnSnapshot>,
}

impl DecisionRow {
    pub fn from_decision(decision: &Decision, elapsed: Duration) -> Self {
        Self {
            turn: decision.turn,
            column: decision.placement.column,
            rotation: decision.placement.rotation.index(),
            choice: Some(decision.choice.id()),
            score: decision.score,
            chain_count: decision.chain_count,
            message: decision.message(),
            game_over: false,
            random_pick: decision.random_pick,
            disturbed: decision.disturbed,
            nodes: decision.nodes,
            simulations: decision.simulations,
            elapsed_ms: elapsed.as_millis() as u64,
            snapshot: None,
        }
    }

    pub fn game_over(turn: u32, message: &str, elapsed: Duration) -> Self {
        Self {
            turn,
            column: 0,
            rotation: 0,
            choice: None,
            score: 0,
            chain_count: 0,
            message: Some(message.to_string()),
            game_over: true,
            random_pick: false,
            disturbed: false,
            nodes: 0,
            simulations: 0,
            elapsed_ms: elapsed.as_millis() as u64,
            snapshot: None,
        }
    }
}

pub struct DecisionLog {
    writer: BufWriter<File>,
    path: PathBuf,
    include_boards: bool,
    rows_written: usize,
}

impl DecisionLog {
    pub fn create(path: impl AsRef<Path>, include_boards: bool) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let writer = BufWriter::new(File::create(&path)?);
        Ok(Self {
            writer,
            path,
            include_boards,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn record(
        &mut self,
        mut row: DecisionRow,
        state: &TurnState,
    ) -> Result<(), DecisionLogError> {
        if self.include_boards {
            row.snapshot = Some(TurnSnapshot::capture(row.turn, state));
        }
        serde_json::to_writer(&mut self.writer, &row)?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecisionLogError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize decision row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
