//! Tour representation and local moves.
//!
//! A [`Tour`] keeps its visiting order, the position of every node and its
//! current length. Moves are evaluated first ([`Tour::evaluate`] returns a
//! [`Move`] carrying the length delta) and applied afterwards, so the
//! length is updated by the delta instead of being recomputed.

mod cycle;
mod moves;

pub use cycle::Tour;
pub use moves::{Direction, Move, MoveKind};
