//! Shaking: random perturbation of a tour.

use rand::Rng;

use super::config::{Shake, ShakeKind};
use crate::distance::DistanceModel;
use crate::tour::{MoveKind, Tour};

/// Smallest tour on which every shake kind has a non-trivial move.
pub const MIN_SHAKE_NODES: usize = 4;

/// Applies `shake.strength` random moves of `shake.kind` to `tour`.
///
/// Tours shorter than [`MIN_SHAKE_NODES`] are left unchanged.
pub fn shake<R: Rng>(tour: &mut Tour, shake: Shake, dist: &DistanceModel, rng: &mut R) {
    let n = tour.len();
    if n < MIN_SHAKE_NODES {
        return;
    }
    for _ in 0..shake.strength {
        let kind = random_move(shake.kind, n, rng);
        let mv = tour.evaluate(kind, dist);
        tour.apply(&mv);
    }
}

/// Draws a random move of `kind` valid on a tour of `n >= 4` nodes.
fn random_move<R: Rng>(kind: ShakeKind, n: usize, rng: &mut R) -> MoveKind {
    match kind {
        ShakeKind::Swap => {
            let [i, j] = sorted_positions(n, rng);
            MoveKind::Swap { i, j }
        }
        ShakeKind::Relocate => {
            let from = rng.random_range(0..n);
            let after = (from + rng.random_range(1..n - 1)) % n;
            MoveKind::Relocate { from, after }
        }
        ShakeKind::SegmentReversal => {
            let [i, j] = sorted_positions(n, rng);
            MoveKind::TwoOpt { i, j }
        }
        ShakeKind::SegmentExchange => {
            let [i, j, k] = sorted_positions(n, rng);
            MoveKind::SegmentExchange { i, j, k }
        }
    }
}

/// `N` distinct positions in `0..n`, increasing.
fn sorted_positions<const N: usize, R: Rng>(n: usize, rng: &mut R) -> [usize; N] {
    let mut picked = [0; N];
    for (slot, p) in picked
        .iter_mut()
        .zip(rand::seq::index::sample(rng, n, N).into_iter())
    {
        *slot = p;
    }
    picked.sort_unstable();
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;

    #[test]
    fn test_shakes_keep_tour_valid() {
        let dm = DistanceModel::new(&Instance::random(30, 4).unwrap());
        let mut rng = u_numflow::random::create_rng(17);
        for kind in [
            ShakeKind::Swap,
            ShakeKind::Relocate,
            ShakeKind::SegmentReversal,
            ShakeKind::SegmentExchange,
        ] {
            let mut tour = Tour::from_order((0..30).collect(), &dm).unwrap();
            for _ in 0..20 {
                shake(&mut tour, Shake::new(kind, 3), &dm, &mut rng);
                assert!(tour.is_permutation(), "{kind:?} broke the tour");
            }
            let fresh = tour.recompute_length(&dm);
            assert!((tour.length() - fresh).abs() <= 1e-6 * fresh, "{kind:?} drifted");
        }
    }

    #[test]
    fn test_shake_changes_tour() {
        let dm = DistanceModel::new(&Instance::random(50, 2).unwrap());
        let mut rng = u_numflow::random::create_rng(5);
        let original = Tour::from_order((0..50).collect(), &dm).unwrap();
        let mut tour = original.clone();
        shake(&mut tour, Shake::new(ShakeKind::SegmentExchange, 1), &dm, &mut rng);
        assert_ne!(tour.order(), original.order());
    }

    #[test]
    fn test_tiny_tours_untouched() {
        let dm = DistanceModel::new(&Instance::random(3, 0).unwrap());
        let mut rng = u_numflow::random::create_rng(0);
        let mut tour = Tour::from_order(vec![0, 1, 2], &dm).unwrap();
        shake(&mut tour, Shake::new(ShakeKind::Swap, 5), &dm, &mut rng);
        assert_eq!(tour.order(), &[0, 1, 2]);
    }

    #[test]
    fn test_sorted_positions_distinct() {
        let mut rng = u_numflow::random::create_rng(8);
        for _ in 0..100 {
            let [a, b, c] = sorted_positions::<3, _>(5, &mut rng);
            assert!(a < b && b < c && c < 5);
        }
    }
}
