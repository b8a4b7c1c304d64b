//! TSP instances and the TSPLIB loader.

mod loader;
mod types;

pub use loader::WeightFormat;
pub use types::{Instance, NodeData, Point, MAX_COORDINATE, MIN_COORDINATE};
