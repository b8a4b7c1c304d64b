//! Tabu Search (TS) over 2-opt moves.
//!
//! Starts from a 2-optimal greedy tour and keeps moving to the best
//! neighbor-list 2-opt neighbor, even uphill. Edges removed by a move may
//! not be re-added for a number of iterations (the tenure), which keeps the
//! search from cycling back into the local optimum it just left.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod runner;
mod types;

pub use config::{TabuConfig, TenurePolicy, TenureSchedule};
pub use runner::{TabuResult, TabuRunner};
pub use types::{Edge, TabuList};
