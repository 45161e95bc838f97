pub mod action;
pub mod cell;
pub mod grid;
pub mod queue;
