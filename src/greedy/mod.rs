//! Construction heuristics: GREEDY and GREEDY_ITER.
//!
//! Both build tours with the nearest-neighbor rule. GREEDY starts from a
//! fixed node; GREEDY_ITER tries many start nodes within the time budget.
//!
//! # References
//!
//! - Rosenkrantz, D. J., Stearns, R. E. & Lewis, P. M. (1977). "An analysis
//!   of several heuristics for the traveling salesman problem",
//!   *SIAM Journal on Computing* 6(3), 563-581.

mod config;
mod runner;

pub use config::GreedyConfig;
pub use runner::{GreedyResult, GreedyRunner};
