//! Heuristic and metaheuristic Traveling Salesman Problem solvers.
//!
//! Provides the following algorithms behind one run interface:
//!
//! - **GREEDY**: Nearest-neighbor construction from a fixed start node.
//! - **GREEDY_ITER**: Nearest-neighbor from every start node, keeping the
//!   shortest tour.
//! - **2OPT_GREEDY**: Nearest-neighbor followed by best-improvement 2-opt
//!   restricted to nearest-neighbor candidate lists.
//! - **Tabu Search (TS)**: 2-opt trajectory search with an edge-based tabu
//!   list and a tenure that follows a configurable policy.
//! - **Variable Neighborhood Search (VNS)**: Segment-exchange kicks of
//!   increasing strength, each followed by 2-opt.
//!
//! # Architecture
//!
//! An [`instance::Instance`] (loaded from TSPLIB or generated) is turned into
//! a [`distance::DistanceModel`] and [`distance::NeighborLists`]. Algorithms
//! work on a [`tour::Tour`], which evaluates moves by their length delta
//! before applying them. [`run::Runner`] ties these together under a time
//! limit and a single seeded random stream.

pub mod clock;
pub mod distance;
pub mod error;
pub mod greedy;
pub mod instance;
pub mod run;
pub mod tabu;
pub mod tour;
pub mod two_opt;
pub mod vns;

pub use error::{TspError, TspResult};
