pub mod snapshot;
pub mod turn;
