use super::simulate::simulate;
use super::tree::{ChildSlot, NodeId, Outcome, SearchTree};
use crate::config::ExploreMode;
use crate::scoring::Scorer;
use chainfall_core::engine::PlacementError;
use chainfall_core::model::action::ActionChoice;
use chainfall_core::model::queue::{NextQueue, QUEUE_LEN};
use rand::Rng;

/// Counters for one turn of sampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingStats {
    pub rollouts: usize,
    pub simulations: usize,
    pub capacity_errors: usize,
    pub deepest: u32,
}

/// Drives rollouts through the tree for a single real turn.
pub struct Sampler<'a, R: Rng + ?Sized> {
    tree: &'a mut SearchTree,
    queue: &'a NextQueue,
    scorer: &'a Scorer,
    rng: &'a mut R,
    expected_depth: i32,
    current_turn: u32,
    max_depth: u32,
    stats: SamplingStats,
}

impl<'a, R: Rng + ?Sized> Sampler<'a, R> {
    pub fn new(
        tree: &'a mut SearchTree,
        queue: &'a NextQueue,
        scorer: &'a Scorer,
        rng: &'a mut R,
        expected_depth: i32,
        current_turn: u32,
        max_depth: u32,
    ) -> Self {
        Self {
            tree,
            queue,
            scorer,
            rng,
            expected_depth,
            current_turn,
            max_depth,
            stats: SamplingStats::default(),
        }
    }

    pub fn run(mut self, mode: ExploreMode, samples: usize) -> SamplingStats {
        let root = self.tree.root();
        match mode {
            ExploreMode::Random => {
                for _ in 0..samples {
                    self.rollout();
                }
            }
            ExploreMode::Exhaustive => self.sweep(root),
        }
        self.stats
    }

    fn depth(&self, id: NodeId) -> u32 {
        self.tree.node(id).turn().saturating_sub(self.current_turn)
    }

    /// Random walk from the root. An infeasible choice is replaced by another
    /// untried one at the same position; once all 22 fail the walk stops.
    pub fn rollout(&mut self) -> u32 {
        self.stats.rollouts += 1;
        let mut node = self.tree.root();

        while self.depth(node) < self.max_depth {
            let mut untried: Vec<ActionChoice> = ActionChoice::all().collect();
            let mut next = None;
            while !untried.is_empty() {
                let pick = self.rng.gen_range(0..untried.len());
                let choice = untried.swap_remove(pick);
                if let Ok(child) = self.visit(node, choice) {
                    next = Some(child);
                    break;
                }
            }
            let Some(child) = next else {
                break;
            };
            node = child;
        }

        let depth = self.depth(node);
        self.stats.deepest = self.stats.deepest.max(depth);
        depth
    }

    fn sweep(&mut self, node: NodeId) {
        if self.depth(node) >= self.max_depth {
            return;
        }
        for choice in ActionChoice::all() {
            if let Ok(child) = self.visit(node, choice) {
                let depth = self.depth(child);
                self.stats.deepest = self.stats.deepest.max(depth);
                self.sweep(child);
            }
        }
    }

    /// Returns the child for `choice`, simulating it if it is new, stale or
    /// was last simulated on an earlier turn.
    pub fn visit(
        &mut self,
        parent: NodeId,
        choice: ActionChoice,
    ) -> Result<NodeId, PlacementError> {
        let (id, was_invalid) = match self.tree.slot(parent, choice) {
            ChildSlot::Vacant => {
                let id = self.tree.attach_child(parent, choice, self.current_turn);
                (id, false)
            }
            ChildSlot::Ready(id) if self.is_fresh(id) => return Ok(id),
            ChildSlot::Errored(id) if self.is_fresh(id) => {
                let fallback = PlacementError::ColumnFull {
                    column: choice.placement().column,
                };
                return Err(self.tree.node(id).error().unwrap_or(fallback));
            }
            ChildSlot::Ready(id) | ChildSlot::Errored(id) => (id, false),
            ChildSlot::Stale(id) => (id, true),
        };
        self.resimulate(parent, choice, id, was_invalid)
    }

    fn is_fresh(&self, id: NodeId) -> bool {
        self.tree.node(id).turn_explored() == self.current_turn
    }

    fn resimulate(
        &mut self,
        parent: NodeId,
        choice: ActionChoice,
        id: NodeId,
        was_invalid: bool,
    ) -> Result<NodeId, PlacementError> {
        let parent_grid = *self.tree.node(parent).grid();
        let queue_position = (self.depth(id).max(1) as usize - 1) % QUEUE_LEN;
        let pair = self.queue.pair_at(queue_position);

        self.tree
            .begin_resimulation(id, parent_grid, self.current_turn, was_invalid);
        self.stats.simulations += 1;

        match simulate(
            &parent_grid,
            choice,
            pair,
            queue_position,
            self.scorer,
            self.expected_depth,
        ) {
            Ok(sim) => {
                self.tree.record_outcome(
                    id,
                    Outcome {
                        grid: sim.grid,
                        score: sim.score(),
                        chain_count: sim.chain_count,
                    },
                );
                self.tree.backpropagate(id);
                Ok(id)
            }
            Err(err) => {
                self.stats.capacity_errors += 1;
                self.tree.record_error(id, err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainfall_core::model::action::CHOICE_COUNT;
    use chainfall_core::model::cell::{Cell, Colour};
    use chainfall_core::model::grid::{Grid, HEIGHT, WIDTH};
    use chainfall_core::model::queue::BlockPair;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn queue() -> NextQueue {
        NextQueue::uniform(BlockPair::new(Colour::Blue, Colour::Green))
    }

    fn choice(id: u8) -> ActionChoice {
        ActionChoice::new(id).expect("valid choice")
    }

    #[test]
    fn revisiting_in_the_same_turn_reuses_the_node() {
        let mut tree = SearchTree::new(Grid::empty(), 0);
        let queue = queue();
        let scorer = Scorer::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sampler = Sampler::new(&mut tree, &queue, &scorer, &mut rng, 4, 0, 8);

        let root = sampler.tree.root();
        let first = sampler.visit(root, choice(1)).expect("room");
        let again = sampler.visit(root, choice(1)).expect("room");
        assert_eq!(first, again);
        assert_eq!(sampler.stats.simulations, 1);
    }

    #[test]
    fn next_turn_resimulates_in_place() {
        let mut tree = SearchTree::new(Grid::empty(), 0);
        let queue = queue();
        let scorer = Scorer::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let root = tree.root();
        let child = {
            let mut sampler = Sampler::new(&mut tree, &queue, &scorer, &mut rng, 4, 0, 8);
            let child = sampler.visit(root, choice(1)).expect("room");
            sampler.visit(child, choice(5)).expect("room")
        };

        // a real turn has passed without promoting
        let mut sampler = Sampler::new(&mut tree, &queue, &scorer, &mut rng, 4, 1, 8);
        let parent = sampler.tree.node(child).parent().expect("has parent");
        let again = sampler.visit(parent, choice(5)).expect("room");
        assert_eq!(again, child);
        assert_eq!(sampler.stats.simulations, 1);
        assert_eq!(sampler.tree.node(child).turn_explored(), 1);
    }

    #[test]
    fn infeasible_choice_is_cached_as_errored() {
        let mut grid = Grid::empty();
        for y in 0..HEIGHT {
            grid.set(0, y, Cell::Skull);
        }
        let mut tree = SearchTree::new(grid, 0);
        let queue = queue();
        let scorer = Scorer::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sampler = Sampler::new(&mut tree, &queue, &scorer, &mut rng, 4, 0, 8);

        let root = sampler.tree.root();
        // choice 17 is column 0, rotation up
        assert!(sampler.visit(root, choice(17)).is_err());
        assert!(sampler.visit(root, choice(17)).is_err());
        assert_eq!(sampler.stats.simulations, 1);
        assert!(matches!(sampler.tree.slot(root, choice(17)), ChildSlot::Errored(_)));
    }

    #[test]
    fn rollouts_respect_max_depth() {
        let mut tree = SearchTree::new(Grid::empty(), 0);
        let queue = queue();
        let scorer = Scorer::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let stats = Sampler::new(&mut tree, &queue, &scorer, &mut rng, 4, 0, 3)
            .run(ExploreMode::Random, 50);
        assert_eq!(stats.rollouts, 50);
        assert_eq!(stats.deepest, 3);
        assert!(!tree.valid_children(tree.root()).is_empty());
    }

    #[test]
    fn rollout_stops_when_every_choice_is_blocked() {
        let mut grid = Grid::empty();
        for x in 0..WIDTH {
            for y in 0..HEIGHT {
                grid.set(x, y, Cell::Skull);
            }
        }
        let mut tree = SearchTree::new(grid, 0);
        let queue = queue();
        let scorer = Scorer::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let stats = Sampler::new(&mut tree, &queue, &scorer, &mut rng, 4, 0, 8)
            .run(ExploreMode::Random, 5);
        assert_eq!(stats.deepest, 0);
        assert_eq!(stats.simulations, CHOICE_COUNT);
        assert_eq!(stats.capacity_errors, CHOICE_COUNT);
        assert!(tree.valid_children(tree.root()).is_empty());
    }

    #[test]
    fn exhaustive_sweep_visits_every_choice() {
        let mut tree = SearchTree::new(Grid::empty(), 0);
        let queue = queue();
        let scorer = Scorer::default();
        let mut rng = SmallRng::seed_from_u64(0);
        let stats = Sampler::new(&mut tree, &queue, &scorer, &mut rng, 4, 0, 2)
            .run(ExploreMode::Exhaustive, 0);
        assert_eq!(stats.simulations, CHOICE_COUNT + CHOICE_COUNT * CHOICE_COUNT);
        assert_eq!(tree.valid_children(tree.root()).len(), CHOICE_COUNT);
    }
}
