use super::sampler::Sampler;
use super::tree::{Advisory, SearchTree};
use crate::config::SearchConfig;
use crate::params::ScoreWeights;
use crate::scoring::Scorer;
use crate::session::Session;
use crate::telemetry;
use chainfall_core::model::action::{ActionChoice, Placement};
use chainfall_core::model::grid::Grid;
use chainfall_core::model::queue::{ColourStats, NextQueue};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// The move chosen for one real turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub turn: u32,
    pub choice: ActionChoice,
    pub placement: Placement,
    /// Best score found anywhere below the chosen child.
    pub score: i32,
    pub chain_count: u32,
    pub advisory: Option<Advisory>,
    /// Valid root children the choice was made from.
    pub candidates: usize,
    pub random_pick: bool,
    pub disturbed: bool,
    pub nodes: usize,
    pub simulations: usize,
}

impl Decision {
    pub fn message(&self) -> Option<String> {
        self.advisory.map(|advisory| advisory.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// Every placement from the current board is infeasible.
    NoLegalMoves { turn: u32 },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::NoLegalMoves { turn } => write!(f, "no legal placement at turn {turn}"),
        }
    }
}

impl std::error::Error for PlanError {}

/// Owns the search tree and session state across a whole match and turns one
/// observed board into one placement.
#[derive(Debug)]
pub struct TurnPlanner {
    tree: SearchTree,
    session: Session,
    config: SearchConfig,
    scorer: Scorer,
    rng: SmallRng,
    turn: u32,
    started: bool,
}

impl TurnPlanner {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_weights(config, ScoreWeights::default())
    }

    pub fn with_weights(config: SearchConfig, weights: ScoreWeights) -> Self {
        Self {
            tree: SearchTree::new(Grid::empty(), 0),
            session: Session::new(&weights),
            config,
            scorer: Scorer::new(weights),
            rng: SmallRng::seed_from_u64(config.seed),
            turn: 0,
            started: false,
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn plan_turn(&mut self, queue: &NextQueue, observed: &Grid) -> Result<Decision, PlanError> {
        let turn = self.turn;
        let disturbed = self.sync_root(observed);

        telemetry::log_queue_stats(turn, &ColourStats::gather(queue, observed));

        let stats = Sampler::new(
            &mut self.tree,
            queue,
            &self.scorer,
            &mut self.rng,
            self.session.expected_depth(),
            turn,
            self.config.max_depth,
        )
        .run(self.config.explore, self.config.samples);
        telemetry::log_tree(turn, &self.tree, &stats);

        let root = self.tree.root();
        let candidates = self.tree.valid_children(root);
        let Some((mut choice, mut chosen)) = self.tree.best_child(root) else {
            telemetry::log_game_over(turn);
            self.tree = SearchTree::new(*observed, turn + 1);
            self.turn += 1;
            return Err(PlanError::NoLegalMoves { turn });
        };

        let random_pick = self.tree.node(chosen).score() == 0;
        if random_pick {
            (choice, chosen) = candidates[self.rng.gen_range(0..candidates.len())];
            self.tree.set_advisory(chosen, Advisory::LuckOfTheDraw);
        }

        let node = self.tree.node(chosen);
        let decision = Decision {
            turn,
            choice,
            placement: choice.placement(),
            score: node.score(),
            chain_count: node.chain_count(),
            advisory: node.advisory(),
            candidates: candidates.len(),
            random_pick,
            disturbed,
            nodes: self.tree.len(),
            simulations: stats.simulations,
        };
        telemetry::log_decision(&decision);

        self.tree.promote(chosen);
        self.turn += 1;
        Ok(decision)
    }

    /// Reconciles the root with the observed board. Returns whether the
    /// board was disturbed.
    fn sync_root(&mut self, observed: &Grid) -> bool {
        if !self.started {
            self.started = true;
            self.tree.set_root_grid(*observed);
            return false;
        }

        let root = self.tree.root();
        let chained = self.tree.node(root).chain_count() > 0;
        self.session.begin_turn(chained);

        let differing = self.tree.node(root).grid().diff_count(observed);
        if differing <= self.config.disturbance_threshold {
            return false;
        }

        self.tree.set_root_grid(*observed);
        self.tree.invalidate_children(root);
        self.session.flag_disturbance();
        telemetry::log_disturbance(
            self.turn,
            differing,
            self.config.disturbance_threshold,
            self.session.expected_depth(),
        );
        true
    }
}
