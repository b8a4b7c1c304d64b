//! Variable Neighborhood Search (VNS).
//!
//! A single-solution metaheuristic that systematically changes
//! neighborhood structures during the search. At each step, a random
//! perturbation (shaking) of the incumbent tour is followed by 2-opt.
//! If improvement is found, the search resets to the first (weakest)
//! shaking level; otherwise, it moves to the next (stronger) one.
//!
//! # References
//!
//! - Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//!   *Computers & Operations Research* 24(11), 1097-1100.
//! - Hansen, P. & Mladenović, N. (2001). "Variable neighborhood search:
//!   Principles and applications", *European Journal of Operational Research* 130(3), 449-467.

mod config;
mod runner;
mod types;

pub use config::{Shake, ShakeKind, VnsConfig, DEFAULT_MAX_STRENGTH, DEFAULT_MIN_STRENGTH};
pub use runner::{VnsResult, VnsRunner};
pub use types::{shake, MIN_SHAKE_NODES};
