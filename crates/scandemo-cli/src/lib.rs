//! Library side of the `scandemo` runner.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod runner;
pub mod types;
