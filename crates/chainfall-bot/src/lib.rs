pub mod config;
pub mod params;
pub mod scoring;
pub mod search;
pub mod session;
mod telemetry;

pub use config::{ExploreMode, SearchConfig};
pub use params::ScoreWeights;
pub use scoring::{ScoreBreakdown, ScoreInput, Scorer};
pub use search::{Advisory, ChildSlot, Decision, NodeId, PlanError, SearchTree, TurnPlanner};
pub use session::Session;
