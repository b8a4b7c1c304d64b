//! 2OPT_GREEDY: nearest-neighbor construction followed by 2-opt.
//!
//! The in-place improver [`TwoOptRunner::optimize`] is also the local
//! search step of Tabu Search and VNS.

mod config;
mod runner;

pub use config::{TwoOptConfig, DEFAULT_EPSILON};
pub use runner::{TwoOptResult, TwoOptRunner, TwoOptStats};

pub(crate) use runner::for_each_candidate;
