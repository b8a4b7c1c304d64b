//! Distance model and candidate neighbor lists.

mod model;
mod neighbors;

pub use model::{DistanceModel, DENSE_LIMIT};
pub use neighbors::{NeighborLists, DEFAULT_NEIGHBORS};
