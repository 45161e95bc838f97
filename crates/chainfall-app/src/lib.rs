pub mod config;
pub mod controller;
pub mod decision_log;
pub mod logging;
pub mod protocol;
