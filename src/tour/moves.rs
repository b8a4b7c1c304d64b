//! Local tour transformations.

/// A transformation expressed on tour positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveKind {
    /// Removes edges `(o[i], o[i+1])` and `(o[j], o[j+1])` and reverses
    /// `o[i+1..=j]`. Requires `i < j`.
    TwoOpt { i: usize, j: usize },
    /// Exchanges the nodes at positions `i` and `j`.
    Swap { i: usize, j: usize },
    /// Removes the node at position `from` and reinserts it right after
    /// the node currently at position `after`.
    Relocate { from: usize, after: usize },
    /// Exchanges the adjacent segments `o[i+1..=j]` and `o[j+1..=k]`
    /// without reversing either. Requires `i < j < k`.
    SegmentExchange { i: usize, j: usize, k: usize },
}

/// A move with its precomputed length delta.
///
/// Build one with [`Tour::evaluate`](super::Tour::evaluate); it is only
/// meaningful for the tour it was evaluated on, until that tour changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub kind: MoveKind,
    /// Resulting length minus current length.
    pub delta: f64,
}

impl Move {
    /// Whether the move shortens the tour by more than `epsilon`.
    #[inline]
    pub fn improves(&self, epsilon: f64) -> bool {
        self.delta < -epsilon
    }
}

/// Orientation along the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}
