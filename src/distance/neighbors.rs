//! Candidate neighbor lists (the `k` nearest nodes of every node).

use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::model::DistanceModel;
use crate::clock::Clock;

/// List size used when a run does not choose one.
pub const DEFAULT_NEIGHBORS: usize = 10;

/// For each node, its `k` nearest other nodes by increasing distance.
///
/// Ties are broken by node index so the lists are deterministic.
#[derive(Debug, Clone)]
pub struct NeighborLists {
    k: usize,
    flat: Vec<usize>,
    offsets: Vec<usize>,
}

impl NeighborLists {
    /// Builds lists of length `min(k, n - 1)`; `None` keeps every other node.
    pub fn build(dist: &DistanceModel, k: Option<usize>) -> Self {
        Self::build_within(dist, k, &Clock::unlimited())
    }

    /// Like [`build`](Self::build), but checks `clock` before each node.
    /// Nodes reached after the limit get an empty list, so the local
    /// searches see no candidates there and stop at once.
    pub fn build_within(dist: &DistanceModel, k: Option<usize>, clock: &Clock) -> Self {
        let n = dist.len();
        let k = k.unwrap_or(n - 1).min(n - 1);
        let row = |i: usize| {
            if clock.expired() {
                Vec::new()
            } else {
                nearest(dist, i, k)
            }
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<usize>> = (0..n).into_par_iter().map(row).collect();

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<usize>> = (0..n).map(row).collect();

        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0);
        let mut flat = Vec::with_capacity(n * k);
        for r in rows {
            flat.extend(r);
            offsets.push(flat.len());
        }
        let complete = flat.len() == n * k;
        tracing::debug!(n, k, complete, "neighbor lists built");
        Self { k, flat, offsets }
    }

    /// Requested length of every list.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Nearest neighbors of `node`, closest first.
    #[inline]
    pub fn of(&self, node: usize) -> &[usize] {
        &self.flat[self.offsets[node]..self.offsets[node + 1]]
    }
}

fn nearest(dist: &DistanceModel, i: usize, k: usize) -> Vec<usize> {
    let by_distance = |a: &usize, b: &usize| {
        dist.distance(i, *a)
            .partial_cmp(&dist.distance(i, *b))
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(b))
    };
    let mut others: Vec<usize> = (0..dist.len()).filter(|&j| j != i).collect();
    if k < others.len() && k > 0 {
        others.select_nth_unstable_by(k - 1, by_distance);
    }
    others.truncate(k);
    others.sort_by(by_distance);
    others
}
