//! Instance data: node coordinates or an explicit distance matrix.

use rand::Rng;

use crate::error::{TspError, TspResult};

/// Lower bound of generated coordinates.
pub const MIN_COORDINATE: f64 = -10_000.0;
/// Upper bound of generated coordinates.
pub const MAX_COORDINATE: f64 = 10_000.0;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` (no TSPLIB rounding).
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Raw node data of an instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeData {
    /// One point per node; distances are Euclidean.
    Coordinates(Vec<Point>),
    /// Row-major `n x n` distance matrix with a zero diagonal.
    Matrix(Vec<f64>),
}

/// A TSP instance. Immutable once built.
///
/// Node indices are `0..n` and `n >= 2` always holds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    name: String,
    n: usize,
    data: NodeData,
    symmetric: bool,
}

impl Instance {
    /// Builds a coordinate instance.
    pub fn from_points(name: impl Into<String>, points: Vec<Point>) -> TspResult<Self> {
        let n = points.len();
        check_size(n)?;
        if let Some(i) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(TspError::parse(0, format!("node {} has a non-finite coordinate", i + 1)));
        }
        Ok(Self {
            name: name.into(),
            n,
            data: NodeData::Coordinates(points),
            symmetric: true,
        })
    }

    /// Builds a matrix instance from `n * n` row-major values.
    ///
    /// The diagonal is forced to zero. The instance is flagged symmetric
    /// when `m[i][j] == m[j][i]` for every pair.
    pub fn from_matrix(name: impl Into<String>, n: usize, mut values: Vec<f64>) -> TspResult<Self> {
        check_size(n)?;
        if n.checked_mul(n) != Some(values.len()) {
            return Err(TspError::parse(
                0,
                format!("expected {n} x {n} matrix entries, got {}", values.len()),
            ));
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(TspError::parse(
                0,
                format!(
                    "invalid edge weight {} between nodes {} and {}",
                    values[idx],
                    idx / n + 1,
                    idx % n + 1
                ),
            ));
        }
        for i in 0..n {
            values[i * n + i] = 0.0;
        }
        let symmetric =
            (0..n).all(|i| (i + 1..n).all(|j| (values[i * n + j] - values[j * n + i]).abs() < 1e-9));
        Ok(Self {
            name: name.into(),
            n,
            data: NodeData::Matrix(values),
            symmetric,
        })
    }

    /// Generates `n` uniform random points in
    /// `[MIN_COORDINATE, MAX_COORDINATE)^2` from `seed`.
    pub fn random(n: usize, seed: u64) -> TspResult<Self> {
        check_size(n)?;
        let mut rng = u_numflow::random::create_rng(seed);
        let points = (0..n)
            .map(|_| {
                Point::new(
                    rng.random_range(MIN_COORDINATE..MAX_COORDINATE),
                    rng.random_range(MIN_COORDINATE..MAX_COORDINATE),
                )
            })
            .collect();
        Self::from_points(format!("random_{n}_{seed}"), points)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false: an instance has at least two nodes.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Coordinates, when the instance has them.
    pub fn points(&self) -> Option<&[Point]> {
        match &self.data {
            NodeData::Coordinates(points) => Some(points),
            NodeData::Matrix(_) => None,
        }
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }
}

fn check_size(n: usize) -> TspResult<()> {
    if n < 2 {
        return Err(TspError::parse(0, format!("an instance needs at least 2 nodes, got {n}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_points_rejects_single_node() {
        let result = Instance::from_points("one", vec![Point::new(0.0, 0.0)]);
        assert!(matches!(result, Err(TspError::Parse { .. })));
    }

    #[test]
    fn test_from_matrix_zeroes_diagonal_and_checks_symmetry() {
        let inst = Instance::from_matrix("m", 2, vec![5.0, 1.0, 1.0, 7.0]).unwrap();
        match inst.data() {
            NodeData::Matrix(m) => assert_eq!(m, &vec![0.0, 1.0, 1.0, 0.0]),
            NodeData::Coordinates(_) => panic!("expected matrix data"),
        }
        assert!(inst.is_symmetric());

        let asym = Instance::from_matrix("a", 2, vec![0.0, 1.0, 2.0, 0.0]).unwrap();
        assert!(!asym.is_symmetric());
    }

    #[test]
    fn test_from_matrix_rejects_wrong_count_and_negative() {
        assert!(Instance::from_matrix("m", 3, vec![0.0; 8]).is_err());
        assert!(Instance::from_matrix("m", 2, vec![0.0, -1.0, -1.0, 0.0]).is_err());
    }

    #[test]
    fn test_random_is_seeded() {
        let a = Instance::random(50, 7).unwrap();
        let b = Instance::random(50, 7).unwrap();
        let c = Instance::random(50, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.points(), c.points());
        for p in a.points().unwrap() {
            assert!(p.x >= MIN_COORDINATE && p.x < MAX_COORDINATE);
            assert!(p.y >= MIN_COORDINATE && p.y < MAX_COORDINATE);
        }
    }
}
