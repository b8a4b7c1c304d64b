//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Build a greedy tour and make it 2-optimal
//! 2. At each iteration:
//!    a. Evaluate every neighbor-list 2-opt move of the current tour
//!    b. Select the best move whose added edges are not tabu (or a tabu
//!       move that yields a new best tour)
//!    c. Apply it, even if it lengthens the tour, and make the two removed
//!       edges tabu for the current tenure
//!    d. Update the best tour if improved
//! 3. Terminate on time limit, iteration budget, or when every move is tabu
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

use rand::Rng;

use super::config::{TabuConfig, TenureSchedule};
use super::types::{Edge, TabuList};
use crate::clock::Clock;
use crate::distance::{DistanceModel, NeighborLists};
use crate::error::{TspError, TspResult};
use crate::greedy::GreedyConfig;
use crate::tour::{Move, MoveKind, Tour};
use crate::two_opt::{for_each_candidate, TwoOptConfig, TwoOptRunner};

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
pub struct TabuResult {
    /// Best tour found.
    pub tour: Tour,
    /// Length of the 2-optimal starting tour.
    pub initial_cost: f64,
    /// Total iterations executed.
    pub iterations: usize,
    /// 1-based iteration that found the best tour (0 when the starting
    /// tour was never beaten), so `cost_history[best_iteration - 1]` is its
    /// length.
    pub best_iteration: usize,
    /// Best length after each iteration.
    pub cost_history: Vec<f64>,
    /// Current length after each iteration.
    pub trajectory: Vec<f64>,
    /// Largest number of edges the tabu list held at once.
    pub peak_tabu_size: usize,
}

/// Tabu Search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes Tabu Search on the instance behind `dist`.
    ///
    /// `rng` is only drawn from by [`TenurePolicy::Random`](super::TenurePolicy::Random).
    #[tracing::instrument(level = "debug", name = "tabu_search", skip_all)]
    pub fn run<R: Rng>(
        dist: &DistanceModel,
        neighbors: &NeighborLists,
        greedy: &GreedyConfig,
        two_opt: &TwoOptConfig,
        config: &TabuConfig,
        clock: &Clock,
        rng: &mut R,
    ) -> TspResult<TabuResult> {
        config.validate().map_err(TspError::Config)?;
        let start = TwoOptRunner::run(dist, neighbors, greedy, two_opt, clock)?;

        let mut current = start.tour;
        let initial_cost = current.length();
        let mut best = current.clone();
        let mut best_iteration = 0;

        let n = dist.len();
        let mut schedule = TenureSchedule::new(config.tenure, n);
        // No more distinct edges than n(n-1)/2 can ever be tabu.
        let capacity = schedule
            .max()
            .saturating_mul(2)
            .min(n.saturating_mul(n - 1) / 2);
        let mut tabu = TabuList::new(capacity);

        let mut cost_history = Vec::new();
        let mut trajectory = Vec::new();
        let mut peak_tabu_size = 0;

        for iteration in 0..config.max_iterations {
            if clock.expired() {
                tracing::debug!(iteration, "time limit reached");
                break;
            }

            tabu.evict_expired(iteration);
            let Some((mv, [a, b, c, d])) = best_admissible_move(
                &current,
                dist,
                neighbors,
                &tabu,
                iteration,
                best.length() - two_opt.epsilon,
            ) else {
                tracing::debug!(iteration, "no admissible move");
                break;
            };

            let until = iteration.saturating_add(schedule.next_tenure(rng));
            current.apply(&mv);
            tabu.insert(Edge::new(a, b), until);
            tabu.insert(Edge::new(c, d), until);
            peak_tabu_size = peak_tabu_size.max(tabu.len());

            if current.length() < best.length() - two_opt.epsilon {
                best = current.clone();
                best_iteration = iteration + 1;
                tracing::trace!(iteration, cost = best.length(), "new best");
            }

            cost_history.push(best.length());
            trajectory.push(current.length());
        }

        tracing::debug!(
            initial_cost,
            cost = best.length(),
            iterations = cost_history.len(),
            "tabu search finished"
        );
        Ok(TabuResult {
            tour: best,
            initial_cost,
            iterations: cost_history.len(),
            best_iteration,
            cost_history,
            trajectory,
            peak_tabu_size,
        })
    }
}

/// Best move that does not re-add a tabu edge, with the endpoints
/// `[a, b, c, d]` of the removed edges `(a, b)` and `(c, d)`.
///
/// A tabu move is admissible too when its resulting length is below
/// `aspiration`.
fn best_admissible_move(
    tour: &Tour,
    dist: &DistanceModel,
    neighbors: &NeighborLists,
    tabu: &TabuList,
    iteration: usize,
    aspiration: f64,
) -> Option<(Move, [usize; 4])> {
    let mut best: Option<(Move, [usize; 4])> = None;
    for_each_candidate(tour, dist, neighbors, false, |kind| {
        let Some(ends @ [a, b, c, d]) = two_opt_endpoints(tour, kind) else {
            return;
        };
        let mv = tour.evaluate(kind, dist);
        if best.is_some_and(|(prev, _)| mv.delta >= prev.delta) {
            return;
        }
        let forbidden =
            tabu.is_tabu(Edge::new(a, c), iteration) || tabu.is_tabu(Edge::new(b, d), iteration);
        let aspires = tour.length() + mv.delta < aspiration;
        if !forbidden || aspires {
            best = Some((mv, ends));
        }
    });
    best
}

/// Nodes around the two edges a 2-opt move removes.
fn two_opt_endpoints(tour: &Tour, kind: MoveKind) -> Option<[usize; 4]> {
    let MoveKind::TwoOpt { i, j } = kind else {
        return None;
    };
    Some([
        tour.node_at(i),
        tour.node_at(i + 1),
        tour.node_at(j),
        tour.node_at((j + 1) % tour.len()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;
    use crate::tabu::TenurePolicy;
    use std::time::Duration;

    fn setup(n: usize, seed: u64, k: Option<usize>) -> (DistanceModel, NeighborLists) {
        let dm = DistanceModel::new(&Instance::random(n, seed).unwrap());
        let nl = NeighborLists::build(&dm, k);
        (dm, nl)
    }

    fn solve(dm: &DistanceModel, nl: &NeighborLists, config: &TabuConfig, seed: u64) -> TabuResult {
        let mut rng = u_numflow::random::create_rng(seed);
        TabuRunner::run(
            dm,
            nl,
            &GreedyConfig::default(),
            &TwoOptConfig::default(),
            config,
            &Clock::unlimited(),
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn test_tabu_not_worse_than_start() {
        let (dm, nl) = setup(60, 3, Some(10));
        let config = TabuConfig::default().with_max_iterations(300);
        let result = solve(&dm, &nl, &config, 42);
        assert!(result.tour.length() <= result.initial_cost);
        assert!(result.tour.is_permutation());
        let fresh = result.tour.recompute_length(&dm);
        assert!((result.tour.length() - fresh).abs() <= 1e-6 * fresh);
    }

    #[test]
    fn test_best_not_worse_than_any_visited_tour() {
        let (dm, nl) = setup(50, 9, Some(8));
        let config = TabuConfig::default().with_max_iterations(200);
        let result = solve(&dm, &nl, &config, 7);
        assert_eq!(result.iterations, result.trajectory.len());
        for (&current, &best) in result.trajectory.iter().zip(&result.cost_history) {
            assert!(best <= current + 1e-9, "best {best} above visited {current}");
            assert!(result.tour.length() <= current + 1e-9);
        }
    }

    #[test]
    fn test_search_leaves_local_optimum() {
        let (dm, nl) = setup(40, 5, Some(8));
        let config = TabuConfig::default().with_max_iterations(50);
        let result = solve(&dm, &nl, &config, 1);
        assert_eq!(result.iterations, 50);
        let mut costs = vec![result.initial_cost];
        costs.extend(&result.trajectory);
        assert!(costs.windows(2).any(|w| w[1] > w[0]), "never accepted an uphill move");
    }

    #[test]
    fn test_cost_history_non_increasing() {
        let (dm, nl) = setup(40, 6, Some(8));
        let config = TabuConfig::default()
            .with_max_iterations(150)
            .with_tenure_policy(TenurePolicy::Random);
        let result = solve(&dm, &nl, &config, 11);
        for window in result.cost_history.windows(2) {
            assert!(window[1] <= window[0]);
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let (dm, nl) = setup(45, 2, Some(8));
        let config = TabuConfig::default()
            .with_max_iterations(100)
            .with_tenure_policy(TenurePolicy::Random);
        let a = solve(&dm, &nl, &config, 99);
        let b = solve(&dm, &nl, &config, 99);
        assert_eq!(a.tour.order(), b.tour.order());
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_best_iteration_points_at_best_cost() {
        let (dm, nl) = setup(60, 3, Some(10));
        let config = TabuConfig::default().with_max_iterations(300);
        let result = solve(&dm, &nl, &config, 42);
        if result.best_iteration == 0 {
            assert!(result.cost_history.iter().all(|&c| c == result.initial_cost));
        } else {
            assert_eq!(result.cost_history[result.best_iteration - 1], result.tour.length());
            assert_eq!(result.trajectory[result.best_iteration - 1], result.tour.length());
            if result.best_iteration > 1 {
                assert!(result.cost_history[result.best_iteration - 2] > result.tour.length());
            }
        }
    }

    #[test]
    fn test_tabu_list_stays_within_capacity() {
        let n = 40;
        let (dm, nl) = setup(n, 10, Some(8));
        for policy in [
            TenurePolicy::Fixed(3),
            TenurePolicy::Size,
            TenurePolicy::Random,
            TenurePolicy::Linear,
        ] {
            let config = TabuConfig::default()
                .with_max_iterations(400)
                .with_tenure_policy(policy);
            let result = solve(&dm, &nl, &config, 5);
            let bound = 2 * TenureSchedule::new(policy, n).max();
            assert!(result.peak_tabu_size > 0, "{policy}");
            assert!(
                result.peak_tabu_size <= bound,
                "{policy}: {} edges held, capacity {bound}",
                result.peak_tabu_size
            );
        }
    }

    #[test]
    fn test_huge_fixed_tenure_runs() {
        let n = 30;
        let (dm, nl) = setup(n, 12, Some(6));
        let config = TabuConfig::default()
            .with_max_iterations(200)
            .with_tenure_policy(TenurePolicy::Fixed(usize::MAX));
        let result = solve(&dm, &nl, &config, 2);
        assert!(result.tour.is_permutation());
        assert!(result.tour.length() <= result.initial_cost);
        assert!(result.peak_tabu_size <= n * (n - 1) / 2);
    }

    #[test]
    fn test_expired_clock_returns_start_tour() {
        let (dm, nl) = setup(30, 8, Some(6));
        let mut rng = u_numflow::random::create_rng(0);
        let result = TabuRunner::run(
            &dm,
            &nl,
            &GreedyConfig::default(),
            &TwoOptConfig::default(),
            &TabuConfig::default(),
            &Clock::start(Some(Duration::ZERO)),
            &mut rng,
        )
        .unwrap();
        assert_eq!(result.iterations, 0);
        assert!(result.tour.is_permutation());
        assert_eq!(result.tour.length(), result.initial_cost);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (dm, nl) = setup(10, 1, None);
        let mut rng = u_numflow::random::create_rng(0);
        let config = TabuConfig::default().with_tenure_policy(TenurePolicy::Fixed(0));
        let result = TabuRunner::run(
            &dm,
            &nl,
            &GreedyConfig::default(),
            &TwoOptConfig::default(),
            &config,
            &Clock::unlimited(),
            &mut rng,
        );
        assert!(matches!(result, Err(TspError::Config(_))));
    }

    #[test]
    fn test_two_opt_endpoints() {
        let dm = DistanceModel::new(&Instance::random(6, 0).unwrap());
        let tour = Tour::from_order(vec![0, 1, 2, 3, 4, 5], &dm).unwrap();
        assert_eq!(
            two_opt_endpoints(&tour, MoveKind::TwoOpt { i: 1, j: 5 }),
            Some([1, 2, 5, 0])
        );
        assert_eq!(two_opt_endpoints(&tour, MoveKind::Swap { i: 1, j: 3 }), None);
    }
}
