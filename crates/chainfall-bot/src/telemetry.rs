use crate::search::{ChildSlot, Decision, SamplingStats, SearchTree};
use chainfall_core::model::queue::ColourStats;
use tracing::{Level, event};

pub(crate) fn log_queue_stats(turn: u32, stats: &ColourStats) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let promising = stats.most_promising().map(|colour| colour.name()).unwrap_or("none");
    event!(
        target: "chainfall_bot::queue",
        Level::DEBUG,
        turn,
        queue = ?stats.queue,
        board = ?stats.board,
        possible_clears = ?stats.possible_clears,
        promising,
    );
}

pub(crate) fn log_disturbance(turn: u32, differing: usize, threshold: usize, expected_depth: i32) {
    event!(
        target: "chainfall_bot::disturbance",
        Level::WARN,
        turn,
        differing,
        threshold,
        expected_depth,
        "observed board diverged from prediction; root children invalidated"
    );
}

pub(crate) fn log_tree(turn: u32, tree: &SearchTree, stats: &SamplingStats) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    event!(
        target: "chainfall_bot::tree",
        Level::DEBUG,
        turn,
        nodes = tree.len(),
        rollouts = stats.rollouts,
        simulations = stats.simulations,
        capacity_errors = stats.capacity_errors,
        deepest = stats.deepest,
    );

    if !tracing::enabled!(Level::TRACE) {
        return;
    }
    let root = tree.root();
    for (choice, slot) in tree.node(root).slots() {
        let Some(id) = slot.node() else {
            continue;
        };
        let node = tree.node(id);
        let state = match slot {
            ChildSlot::Ready(_) => "ready",
            ChildSlot::Stale(_) => "stale",
            ChildSlot::Errored(_) => "errored",
            ChildSlot::Vacant => "vacant",
        };
        event!(
            target: "chainfall_bot::tree",
            Level::TRACE,
            turn,
            choice = choice.id(),
            state,
            score = node.score(),
            chain_count = node.chain_count(),
        );
    }
}

pub(crate) fn log_decision(decision: &Decision) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    let advisory = decision.advisory.map(|advisory| advisory.to_string());
    event!(
        target: "chainfall_bot::decision",
        Level::INFO,
        turn = decision.turn,
        choice = decision.choice.id(),
        column = decision.placement.column,
        rotation = decision.placement.rotation.index(),
        score = decision.score,
        chain_count = decision.chain_count,
        candidates = decision.candidates,
        random_pick = decision.random_pick,
        disturbed = decision.disturbed,
        advisory = advisory.as_deref().unwrap_or(""),
    );
}

pub(crate) fn log_game_over(turn: u32) {
    event!(
        target: "chainfall_bot::decision",
        Level::WARN,
        turn,
        "no legal placement left"
    );
}
