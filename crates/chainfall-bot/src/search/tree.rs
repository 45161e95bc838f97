//! Turn-spanning search tree stored in an arena.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. A parent owns
//! its children through its slots; the child's `parent` index is only used to
//! walk upward during backpropagation. Promoting a child to root compacts the
//! arena so discarded siblings are dropped.

use chainfall_core::engine::PlacementError;
use chainfall_core::model::action::{ActionChoice, CHOICE_COUNT};
use chainfall_core::model::grid::Grid;
use std::cmp::Reverse;
use std::fmt;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// State of one (parent, choice) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildSlot {
    /// Never visited.
    #[default]
    Vacant,
    /// Simulated and usable.
    Ready(NodeId),
    /// Must be resimulated before reuse.
    Stale(NodeId),
    /// Placement was infeasible when last simulated.
    Errored(NodeId),
}

impl ChildSlot {
    pub fn node(self) -> Option<NodeId> {
        match self {
            ChildSlot::Vacant => None,
            ChildSlot::Ready(id) | ChildSlot::Stale(id) | ChildSlot::Errored(id) => Some(id),
        }
    }

    pub fn is_ready(self) -> bool {
        matches!(self, ChildSlot::Ready(_))
    }
}

/// Human-readable note attached to a node and echoed with the chosen move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    Chain(u32),
    Disturbed,
    LuckOfTheDraw,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Chain(count) => write!(f, "Go! Go! Gadget Chain x{count}"),
            Advisory::Disturbed => f.write_str("Damn those skulls!"),
            Advisory::LuckOfTheDraw => f.write_str("Luck of the draw"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchNode {
    parent: Option<NodeId>,
    choice: Option<ActionChoice>,
    turn: u32,
    turn_explored: u32,
    grid: Grid,
    score: i32,
    chain_count: u32,
    advisory: Option<Advisory>,
    error: Option<PlacementError>,
    children: [ChildSlot; CHOICE_COUNT],
}

impl SearchNode {
    fn new(parent: Option<NodeId>, choice: Option<ActionChoice>, turn: u32, grid: Grid) -> Self {
        Self {
            parent,
            choice,
            turn,
            turn_explored: turn,
            grid,
            score: 0,
            chain_count: 0,
            advisory: None,
            error: None,
            children: [ChildSlot::Vacant; CHOICE_COUNT],
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn choice(&self) -> Option<ActionChoice> {
        self.choice
    }

    /// Absolute real turn this node's grid belongs to.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn turn_explored(&self) -> u32 {
        self.turn_explored
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn chain_count(&self) -> u32 {
        self.chain_count
    }

    pub fn advisory(&self) -> Option<Advisory> {
        self.advisory
    }

    pub fn error(&self) -> Option<PlacementError> {
        self.error
    }

    pub fn slot(&self, choice: ActionChoice) -> ChildSlot {
        self.children[choice.index()]
    }

    pub fn slots(&self) -> impl Iterator<Item = (ActionChoice, ChildSlot)> + '_ {
        ActionChoice::all().map(|choice| (choice, self.children[choice.index()]))
    }
}

/// Fresh simulation results to store on a node.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    pub grid: Grid,
    pub score: i32,
    pub chain_count: u32,
}

#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    root: NodeId,
}

impl SearchTree {
    pub fn new(grid: Grid, turn: u32) -> Self {
        Self {
            nodes: vec![SearchNode::new(None, None, turn, grid)],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.index()]
    }

    /// Arena size, including nodes orphaned since the last promotion.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn slot(&self, parent: NodeId, choice: ActionChoice) -> ChildSlot {
        self.node(parent).slot(choice)
    }

    pub fn set_root_grid(&mut self, grid: Grid) {
        let root = self.root;
        self.node_mut(root).grid = grid;
    }

    /// Allocates an unsimulated child for `choice`, starting from the
    /// parent's grid. The slot is left stale until a result is recorded.
    pub fn attach_child(
        &mut self,
        parent: NodeId,
        choice: ActionChoice,
        turn_explored: u32,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let (turn, grid) = {
            let parent_node = self.node(parent);
            (parent_node.turn + 1, parent_node.grid)
        };
        let mut node = SearchNode::new(Some(parent), Some(choice), turn, grid);
        node.turn_explored = turn_explored;
        self.nodes.push(node);
        self.node_mut(parent).children[choice.index()] = ChildSlot::Stale(id);
        id
    }

    /// Resets a node for resimulation against `parent_grid`. Children scored
    /// against the old contents go stale, so a parent never trails a ready
    /// child.
    pub fn begin_resimulation(
        &mut self,
        id: NodeId,
        parent_grid: Grid,
        turn_explored: u32,
        was_invalid: bool,
    ) {
        let node = self.node_mut(id);
        node.grid = parent_grid;
        node.turn_explored = turn_explored;
        node.advisory = was_invalid.then_some(Advisory::Disturbed);
        self.invalidate_children(id);
    }

    pub fn record_outcome(&mut self, id: NodeId, outcome: Outcome) {
        let node = self.node_mut(id);
        node.grid = outcome.grid;
        node.score = outcome.score;
        node.chain_count = outcome.chain_count;
        node.error = None;
        if outcome.chain_count > 0 {
            node.advisory = Some(Advisory::Chain(outcome.chain_count));
        }
        self.set_slot(id, ChildSlot::Ready(id));
    }

    /// Marks a node infeasible. Its subtree is cut loose and its score kept.
    pub fn record_error(&mut self, id: NodeId, error: PlacementError) {
        let node = self.node_mut(id);
        node.error = Some(error);
        node.children = [ChildSlot::Vacant; CHOICE_COUNT];
        self.set_slot(id, ChildSlot::Errored(id));
    }

    pub fn set_advisory(&mut self, id: NodeId, advisory: Advisory) {
        self.node_mut(id).advisory = Some(advisory);
    }

    fn set_slot(&mut self, id: NodeId, slot: ChildSlot) {
        let node = self.node(id);
        if let (Some(parent), Some(choice)) = (node.parent, node.choice) {
            self.node_mut(parent).children[choice.index()] = slot;
        }
    }

    pub fn invalidate_children(&mut self, id: NodeId) {
        for slot in self.node_mut(id).children.iter_mut() {
            if let Some(child) = slot.node() {
                *slot = ChildSlot::Stale(child);
            }
        }
    }

    /// Raises every ancestor's score to at least this node's score.
    pub fn backpropagate(&mut self, id: NodeId) {
        let score = self.node(id).score;
        let mut cursor = self.node(id).parent;
        while let Some(ancestor) = cursor {
            let node = self.node_mut(ancestor);
            if node.score < score {
                node.score = score;
            }
            cursor = node.parent;
        }
    }

    pub fn valid_children(&self, id: NodeId) -> Vec<(ActionChoice, NodeId)> {
        self.node(id)
            .slots()
            .filter_map(|(choice, slot)| match slot {
                ChildSlot::Ready(child) => Some((choice, child)),
                _ => None,
            })
            .collect()
    }

    /// Highest-scoring ready child; ties go to the lowest choice id.
    pub fn best_child(&self, id: NodeId) -> Option<(ActionChoice, NodeId)> {
        self.valid_children(id)
            .into_iter()
            .min_by_key(|(choice, child)| (Reverse(self.node(*child).score), choice.index()))
    }

    /// Makes `id` the new root and drops everything outside its subtree.
    pub fn promote(&mut self, id: NodeId) {
        let mut order = vec![id];
        let mut remap: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        remap[id.index()] = Some(NodeId(0));

        let mut cursor = 0;
        while cursor < order.len() {
            let current = order[cursor];
            for slot in self.node(current).children.iter() {
                if let Some(child) = slot.node() {
                    remap[child.index()] = Some(NodeId(order.len() as u32));
                    order.push(child);
                }
            }
            cursor += 1;
        }

        let mut old: Vec<Option<SearchNode>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut arena = Vec::with_capacity(order.len());
        for old_id in order {
            let Some(mut node) = old[old_id.index()].take() else {
                continue;
            };
            node.parent = node.parent.and_then(|parent| remap[parent.index()]);
            if node.parent.is_none() {
                node.choice = None;
            }
            for slot in node.children.iter_mut() {
                *slot = match *slot {
                    ChildSlot::Vacant => ChildSlot::Vacant,
                    ChildSlot::Ready(child) => remap_slot(&remap, child, ChildSlot::Ready),
                    ChildSlot::Stale(child) => remap_slot(&remap, child, ChildSlot::Stale),
                    ChildSlot::Errored(child) => remap_slot(&remap, child, ChildSlot::Errored),
                };
            }
            arena.push(node);
        }

        self.nodes = arena;
        self.root = NodeId(0);
    }
}

fn remap_slot(
    remap: &[Option<NodeId>],
    child: NodeId,
    wrap: fn(NodeId) -> ChildSlot,
) -> ChildSlot {
    remap[child.index()].map_or(ChildSlot::Vacant, wrap)
}
