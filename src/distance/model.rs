//! Pairwise distance lookup.

use crate::error::{TspError, TspResult};
use crate::instance::{Instance, NodeData, Point};

/// Coordinate instances up to this many nodes get a dense precomputed
/// matrix (4096² f64 = 128 MiB). Larger ones compute on demand.
pub const DENSE_LIMIT: usize = 4096;

#[derive(Debug, Clone)]
enum Storage {
    Dense(Vec<f64>),
    Euclidean(Vec<Point>),
}

/// Distance oracle owned by a run.
///
/// `distance(i, i) == 0` and every lookup is O(1). Lookups are pure: the
/// same pair always yields the same value.
#[derive(Debug, Clone)]
pub struct DistanceModel {
    n: usize,
    storage: Storage,
}

impl DistanceModel {
    /// Builds the model with the default [`DENSE_LIMIT`].
    pub fn new(instance: &Instance) -> Self {
        Self::with_dense_limit(instance, DENSE_LIMIT)
    }

    /// Builds the model, precomputing a dense matrix for coordinate
    /// instances with at most `dense_limit` nodes.
    pub fn with_dense_limit(instance: &Instance, dense_limit: usize) -> Self {
        let n = instance.len();
        let storage = match instance.data() {
            NodeData::Matrix(m) => Storage::Dense(m.clone()),
            NodeData::Coordinates(points) if n <= dense_limit => {
                let mut m = vec![0.0; n * n];
                for i in 0..n {
                    for j in (i + 1)..n {
                        let d = points[i].distance(&points[j]);
                        m[i * n + j] = d;
                        m[j * n + i] = d;
                    }
                }
                Storage::Dense(m)
            }
            NodeData::Coordinates(points) => Storage::Euclidean(points.clone()),
        };
        tracing::debug!(
            n,
            dense = matches!(storage, Storage::Dense(_)),
            "distance model ready"
        );
        Self { n, storage }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Whether all distances are precomputed.
    pub fn is_dense(&self) -> bool {
        matches!(self.storage, Storage::Dense(_))
    }

    /// Distance between `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics when either index is `>= n`. Use [`try_distance`](Self::try_distance)
    /// for unchecked input.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.n && j < self.n,
            "node index out of range: ({i}, {j}) with n = {}",
            self.n
        );
        match &self.storage {
            Storage::Dense(m) => m[i * self.n + j],
            Storage::Euclidean(points) => points[i].distance(&points[j]),
        }
    }

    /// Checked variant of [`distance`](Self::distance).
    pub fn try_distance(&self, i: usize, j: usize) -> TspResult<f64> {
        if i >= self.n || j >= self.n {
            return Err(TspError::Index { i, j, n: self.n });
        }
        Ok(self.distance(i, j))
    }

    /// Cyclic length of `order`, including the closing edge.
    pub fn tour_length(&self, order: &[usize]) -> f64 {
        match order.len() {
            0 | 1 => 0.0,
            len => {
                let open: f64 = order.windows(2).map(|w| self.distance(w[0], w[1])).sum();
                open + self.distance(order[len - 1], order[0])
            }
        }
    }
}
