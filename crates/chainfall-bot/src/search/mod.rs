//! Turn-spanning search: the node arena, the rollout sampler that grows it,
//! and the planner that picks one move per real turn.

mod planner;
mod sampler;
mod simulate;
mod tree;

pub use planner::{Decision, PlanError, TurnPlanner};
pub use sampler::{Sampler, SamplingStats};
pub use simulate::{Simulation, simulate};
pub use tree::{Advisory, ChildSlot, NodeId, Outcome, SearchNode, SearchTree};
