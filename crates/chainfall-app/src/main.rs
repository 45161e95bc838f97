use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, event};

use chainfall_app::config::AppConfig;
use chainfall_app::controller::Controller;
use chainfall_app::decision_log::DecisionLog;
use chainfall_app::logging::init_logging;
use chainfall_bot::SearchConfig;
use chainfall_core::AppInfo;

/// Turn-by-turn placement bot for the chainfall puzzle duel.
#[derive(Debug, Parser)]
#[command(
    name = "chainfall",
    author,
    version,
    about = "Reads turns on stdin and answers one placement per line"
)]
struct Cli {
    /// Path to a YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the number of rollouts per turn.
    #[arg(long, value_name = "COUNT")]
    samples: Option<usize>,

    /// Override the search depth in turns.
    #[arg(long, value_name = "TURNS")]
    depth: Option<u32>,

    /// Override the RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exploration mode: random or exhaustive.
    #[arg(long, value_name = "MODE")]
    explore: Option<String>,

    /// Write one JSON row per turn to this file.
    #[arg(long, value_name = "FILE")]
    decisions: Option<PathBuf>,

    /// Override the tracing level (trace, debug, info, warn, error).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Exit after validating the configuration (no turns are read).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };

    if let Some(samples) = cli.samples {
        config.search.samples = Some(samples);
    }

    if let Some(depth) = cli.depth {
        config.search.max_depth = Some(depth);
    }

    if let Some(seed) = cli.seed {
        config.search.seed = Some(seed);
    }

    if let Some(explore) = cli.explore {
        config.search.explore = Some(explore);
    }

    if let Some(path) = cli.decisions {
        config.outputs.decisions = Some(path);
    }

    if let Some(level) = cli.log_level {
        config.logging.tracing_level = level;
    }

    config.validate().context("validating configuration")?;
    let search = config.search_config(SearchConfig::from_env());

    if cli.validate_only {
        println!(
            "Configuration ok: {} samples, depth {}, {} exploration, seed {}",
            search.samples,
            search.max_depth,
            search.explore.as_str(),
            search.seed
        );
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging)?;
    event!(
        target: "chainfall_app",
        Level::INFO,
        name = AppInfo::name(),
        version = AppInfo::version(),
        samples = search.samples,
        max_depth = search.max_depth,
        explore = search.explore.as_str(),
        seed = search.seed,
        "starting"
    );

    let mut controller = Controller::new(search);
    if let Some(path) = config.outputs.decisions.as_ref() {
        let log = DecisionLog::create(path, config.outputs.include_boards)
            .with_context(|| format!("creating decision log at {}", path.display()))?;
        controller = controller.with_decision_log(log);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = controller.run(stdin.lock(), BufWriter::new(stdout.lock()))?;

    if let Some(path) = summary.decision_log.as_ref() {
        event!(
            target: "chainfall_app",
            Level::INFO,
            rows = summary.rows_written,
            path = %path.display(),
            "decision log written"
        );
    }

    Ok(())
}
