//! Array-based cyclic tour with a position index.

use super::moves::{Direction, Move, MoveKind};
use crate::distance::DistanceModel;
use crate::error::{TspError, TspResult};

/// A Hamiltonian cycle over `0..n`, stored as a visiting order.
///
/// The length is maintained incrementally: [`apply`](Tour::apply) adds the
/// move's precomputed delta and never walks the whole tour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    order: Vec<usize>,
    pos: Vec<usize>,
    length: f64,
}

impl Tour {
    /// Builds a tour from a visiting order, rejecting anything that is not
    /// a permutation of `0..dist.len()`.
    pub fn from_order(order: Vec<usize>, dist: &DistanceModel) -> TspResult<Self> {
        let n = dist.len();
        if order.len() != n {
            return Err(TspError::InvalidTour(format!(
                "expected {n} nodes, got {}",
                order.len()
            )));
        }
        let mut pos = vec![usize::MAX; n];
        for (p, &node) in order.iter().enumerate() {
            if node >= n {
                return Err(TspError::InvalidTour(format!("node {node} out of range")));
            }
            if pos[node] != usize::MAX {
                return Err(TspError::InvalidTour(format!("node {node} visited twice")));
            }
            pos[node] = p;
        }
        let length = dist.tour_length(&order);
        Ok(Self { order, pos, length })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Current cyclic length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    /// Position of `node` in the visiting order.
    #[inline]
    pub fn position(&self, node: usize) -> usize {
        self.pos[node]
    }

    /// Node at position `p` (taken modulo `n`).
    #[inline]
    pub fn node_at(&self, p: usize) -> usize {
        self.order[p % self.order.len()]
    }

    /// The node visited right after (or before) `node`.
    #[inline]
    pub fn neighbor_of(&self, node: usize, direction: Direction) -> usize {
        let n = self.order.len();
        let p = self.pos[node];
        match direction {
            Direction::Next => self.order[(p + 1) % n],
            Direction::Prev => self.order[(p + n - 1) % n],
        }
    }

    /// Length recomputed from scratch. Used to verify the incremental value.
    pub fn recompute_length(&self, dist: &DistanceModel) -> f64 {
        dist.tour_length(&self.order)
    }

    /// Whether order and position index describe the same permutation.
    pub fn is_permutation(&self) -> bool {
        let n = self.order.len();
        let mut seen = vec![false; n];
        self.order.iter().enumerate().all(|(p, &node)| {
            node < n && !std::mem::replace(&mut seen[node], true) && self.pos[node] == p
        })
    }

    /// Computes the length delta of `kind` without changing the tour.
    ///
    /// # Panics
    ///
    /// Panics when the positions violate the preconditions documented on
    /// [`MoveKind`].
    pub fn evaluate(&self, kind: MoveKind, dist: &DistanceModel) -> Move {
        let n = self.order.len();
        let o = &self.order;
        let d = |a: usize, b: usize| dist.distance(a, b);
        let delta = match kind {
            MoveKind::TwoOpt { i, j } => {
                assert!(i < j && j < n, "invalid 2-opt positions ({i}, {j})");
                let (a, b) = (o[i], o[i + 1]);
                let (c, e) = (o[j], o[(j + 1) % n]);
                d(a, c) + d(b, e) - d(a, b) - d(c, e)
            }
            MoveKind::Swap { i, j } => {
                assert!(i != j && i < n && j < n, "invalid swap positions ({i}, {j})");
                self.swap_delta(i, j, dist)
            }
            MoveKind::Relocate { from, after } => {
                assert!(
                    n >= 3 && from < n && after < n && after != from && after != (from + n - 1) % n,
                    "invalid relocation ({from} after {after})"
                );
                let x = o[from];
                let p = o[(from + n - 1) % n];
                let s = o[(from + 1) % n];
                let u = o[after];
                let v = o[(after + 1) % n];
                d(p, s) - d(p, x) - d(x, s) + d(u, x) + d(x, v) - d(u, v)
            }
            MoveKind::SegmentExchange { i, j, k } => {
                assert!(i < j && j < k && k < n, "invalid segment exchange ({i}, {j}, {k})");
                let (a, a1) = (o[i], o[i + 1]);
                let (b, b1) = (o[j], o[j + 1]);
                let (c, c1) = (o[k], o[(k + 1) % n]);
                d(a, b1) + d(c, a1) + d(b, c1) - d(a, a1) - d(b, b1) - d(c, c1)
            }
        };
        Move { kind, delta }
    }

    /// Applies a move evaluated on this tour and adds its delta to the length.
    pub fn apply(&mut self, mv: &Move) {
        let n = self.order.len();
        match mv.kind {
            MoveKind::TwoOpt { i, j } => {
                let inner = j - i;
                if inner <= n - inner {
                    self.reverse_cyclic(i + 1, inner);
                } else {
                    // Reversing the complement yields the same cycle.
                    self.reverse_cyclic(j + 1, n - inner);
                }
            }
            MoveKind::Swap { i, j } => {
                self.order.swap(i, j);
                self.pos[self.order[i]] = i;
                self.pos[self.order[j]] = j;
            }
            MoveKind::Relocate { from, after } => {
                let node = self.order.remove(from);
                let at = if after > from { after } else { after + 1 };
                self.order.insert(at, node);
                self.reindex(from.min(at), from.max(at));
            }
            MoveKind::SegmentExchange { i, j, k } => {
                self.order[i + 1..=k].rotate_left(j - i);
                self.reindex(i + 1, k);
            }
        }
        self.length += mv.delta;
    }

    /// Reverses `len` consecutive positions starting at `start`, wrapping
    /// around the end of the order.
    fn reverse_cyclic(&mut self, start: usize, len: usize) {
        let n = self.order.len();
        for t in 0..len / 2 {
            let l = (start + t) % n;
            let r = (start + len - 1 - t) % n;
            self.order.swap(l, r);
            self.pos[self.order[l]] = l;
            self.pos[self.order[r]] = r;
        }
    }

    fn reindex(&mut self, lo: usize, hi: usize) {
        for p in lo..=hi {
            self.pos[self.order[p]] = p;
        }
    }

    fn swap_delta(&self, i: usize, j: usize, dist: &DistanceModel) -> f64 {
        let n = self.order.len();
        let after = |p: usize| {
            if p == i {
                self.order[j]
            } else if p == j {
                self.order[i]
            } else {
                self.order[p]
            }
        };
        // Edge `e` joins positions `e` and `e + 1`.
        let mut edges = [(i + n - 1) % n, i, (j + n - 1) % n, j];
        edges.sort_unstable();
        let mut delta = 0.0;
        for (idx, &e) in edges.iter().enumerate() {
            if idx > 0 && edges[idx - 1] == e {
                continue;
            }
            let f = (e + 1) % n;
            delta += dist.distance(after(e), after(f)) - dist.distance(self.order[e], self.order[f]);
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Instance, Point};
    use proptest::prelude::*;

    fn square_dm() -> DistanceModel {
        DistanceModel::new(
            &Instance::from_points(
                "sq",
                vec![
                    Point::new(0.0, 0.0),
                    Point::new(1.0, 0.0),
                    Point::new(1.0, 1.0),
                    Point::new(0.0, 1.0),
                ],
            )
            .unwrap(),
        )
    }

    fn assert_consistent(tour: &Tour, dist: &DistanceModel) {
        assert!(tour.is_permutation(), "not a permutation: {:?}", tour.order());
        let fresh = tour.recompute_length(dist);
        assert!(
            (tour.length() - fresh).abs() <= 1e-6 * fresh.max(1.0),
            "incremental {} vs recomputed {}",
            tour.length(),
            fresh
        );
    }

    #[test]
    fn test_from_order_validation() {
        let dm = square_dm();
        assert!(Tour::from_order(vec![0, 1, 2], &dm).is_err());
        assert!(Tour::from_order(vec![0, 1, 1, 2], &dm).is_err());
        assert!(Tour::from_order(vec![0, 1, 2, 7], &dm).is_err());
        let t = Tour::from_order(vec![0, 1, 2, 3], &dm).unwrap();
        assert!((t.length() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_opt_uncrosses() {
        let dm = square_dm();
        let mut t = Tour::from_order(vec![0, 2, 1, 3], &dm).unwrap();
        let mv = t.evaluate(MoveKind::TwoOpt { i: 0, j: 2 }, &dm);
        assert!(mv.improves(1e-9));
        t.apply(&mv);
        assert_eq!(t.order(), &[0, 1, 2, 3]);
        assert_consistent(&t, &dm);
    }

    #[test]
    fn test_two_opt_reverses_complement_when_shorter() {
        let dm = DistanceModel::new(&Instance::random(10, 5).unwrap());
        let mut t = Tour::from_order((0..10).collect(), &dm).unwrap();
        let mv = t.evaluate(MoveKind::TwoOpt { i: 0, j: 8 }, &dm);
        t.apply(&mv);
        assert_consistent(&t, &dm);
        // Edges (0,1) and (8,9) were replaced by (0,8) and (1,9).
        let next = t.neighbor_of(0, Direction::Next);
        let prev = t.neighbor_of(0, Direction::Prev);
        assert!([next, prev].contains(&8));
        let n1 = t.neighbor_of(1, Direction::Next);
        let p1 = t.neighbor_of(1, Direction::Prev);
        assert!([n1, p1].contains(&9));
    }

    #[test]
    fn test_neighbor_of_wraps() {
        let dm = square_dm();
        let t = Tour::from_order(vec![2, 0, 3, 1], &dm).unwrap();
        assert_eq!(t.neighbor_of(1, Direction::Next), 2);
        assert_eq!(t.neighbor_of(2, Direction::Prev), 1);
        assert_eq!(t.neighbor_of(0, Direction::Next), 3);
    }

    #[test]
    fn test_segment_exchange() {
        let dm = DistanceModel::new(&Instance::random(8, 9).unwrap());
        let mut t = Tour::from_order((0..8).collect(), &dm).unwrap();
        let mv = t.evaluate(MoveKind::SegmentExchange { i: 1, j: 3, k: 6 }, &dm);
        t.apply(&mv);
        assert_eq!(t.order(), &[0, 1, 4, 5, 6, 2, 3, 7]);
        assert_consistent(&t, &dm);
    }

    #[test]
    fn test_relocate_forward_and_backward() {
        let dm = DistanceModel::new(&Instance::random(7, 2).unwrap());
        let mut t = Tour::from_order((0..7).collect(), &dm).unwrap();
        let mv = t.evaluate(MoveKind::Relocate { from: 1, after: 4 }, &dm);
        t.apply(&mv);
        assert_eq!(t.order(), &[0, 2, 3, 4, 1, 5, 6]);
        assert_consistent(&t, &dm);

        let mv = t.evaluate(MoveKind::Relocate { from: 5, after: 0 }, &dm);
        t.apply(&mv);
        assert_eq!(t.order(), &[0, 5, 2, 3, 4, 1, 6]);
        assert_consistent(&t, &dm);
    }

    #[test]
    fn test_swap_adjacent_and_wrapping() {
        let dm = DistanceModel::new(&Instance::random(5, 4).unwrap());
        let mut t = Tour::from_order((0..5).collect(), &dm).unwrap();
        for (i, j) in [(0, 1), (0, 4), (1, 3), (4, 2)] {
            let mv = t.evaluate(MoveKind::Swap { i, j }, &dm);
            t.apply(&mv);
            assert_consistent(&t, &dm);
        }
    }

    fn arb_kind(n: usize) -> impl Strategy<Value = MoveKind> {
        prop_oneof![
            (0..n - 1, 0..n - 1).prop_map(|(a, b)| MoveKind::TwoOpt {
                i: a.min(b),
                j: a.max(b) + 1,
            }),
            (0..n, 1..n).prop_map(move |(i, off)| MoveKind::Swap { i, j: (i + off) % n }),
            (0..n, 1..n - 1).prop_map(move |(from, off)| MoveKind::Relocate {
                from,
                after: (from + off) % n,
            }),
            proptest::sample::subsequence((0..n).collect::<Vec<_>>(), 3).prop_map(|v| {
                MoveKind::SegmentExchange {
                    i: v[0],
                    j: v[1],
                    k: v[2],
                }
            }),
        ]
    }

    proptest! {
        #[test]
        fn prop_incremental_length_matches_recomputed(
            seed in 0u64..1000,
            kinds in proptest::collection::vec(arb_kind(12), 1..60),
        ) {
            let dm = DistanceModel::new(&Instance::random(12, seed).unwrap());
            let mut t = Tour::from_order((0..12).collect(), &dm).unwrap();
            for kind in kinds {
                let mv = t.evaluate(kind, &dm);
                let before = t.length();
                t.apply(&mv);
                prop_assert!(t.is_permutation());
                let fresh = t.recompute_length(&dm);
                prop_assert!((t.length() - fresh).abs() <= 1e-6 * fresh);
                prop_assert!((t.length() - (before + mv.delta)).abs() < 1e-9);
            }
        }
    }
}
