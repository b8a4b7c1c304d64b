//! 2-opt local search with neighbor lists.
//!
//! # Algorithm (best improvement)
//!
//! 1. For every node `a` and every candidate `c` among its `k` nearest
//!    neighbors, evaluate the two 2-opt moves that add edge `(a, c)`
//! 2. Apply the move with the most negative delta, if it beats `-epsilon`
//! 3. Repeat until a pass finds no improving move or the time is up
//!
//! A pass costs O(n·k) evaluations plus one O(n) segment reversal.
//!
//! # Reference
//!
//! Croes, G. A. (1958). "A method for solving traveling-salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::config::TwoOptConfig;
use crate::clock::Clock;
use crate::distance::{DistanceModel, NeighborLists};
use crate::error::{TspError, TspResult};
use crate::greedy::{GreedyConfig, GreedyRunner};
use crate::tour::{Direction, Move, MoveKind, Tour};

/// Outcome of improving one tour in place.
#[derive(Debug, Clone)]
pub struct TwoOptStats {
    /// Passes started.
    pub passes: usize,
    /// Moves applied.
    pub moves: usize,
    /// True when the last pass found no improving move; false when the
    /// time limit or the pass budget stopped the search first.
    pub local_optimum: bool,
}

/// Result of 2OPT_GREEDY.
#[derive(Debug, Clone)]
pub struct TwoOptResult {
    /// Improved tour.
    pub tour: Tour,
    /// Start node of the greedy tour that was improved.
    pub start_node: usize,
    /// Length of the greedy tour before improvement.
    pub initial_cost: f64,
    /// Local search statistics.
    pub stats: TwoOptStats,
}

/// 2-opt runner.
pub struct TwoOptRunner;

impl TwoOptRunner {
    /// Builds a nearest-neighbor tour and improves it with 2-opt.
    #[tracing::instrument(level = "debug", name = "two_opt_greedy", skip_all)]
    pub fn run(
        dist: &DistanceModel,
        neighbors: &NeighborLists,
        greedy: &GreedyConfig,
        config: &TwoOptConfig,
        clock: &Clock,
    ) -> TspResult<TwoOptResult> {
        config.validate().map_err(TspError::Config)?;
        let constructed = GreedyRunner::run(dist, greedy, clock)?;
        let mut tour = constructed.tour;
        let initial_cost = tour.length();
        let stats = Self::optimize(&mut tour, dist, neighbors, config, clock);
        tracing::debug!(
            initial_cost,
            cost = tour.length(),
            passes = stats.passes,
            "2-opt finished"
        );
        Ok(TwoOptResult {
            tour,
            start_node: constructed.start_node,
            initial_cost,
            stats,
        })
    }

    /// Improves `tour` in place until it is 2-optimal with respect to the
    /// neighbor lists, or until the clock or pass budget runs out.
    ///
    /// The length never increases.
    pub fn optimize(
        tour: &mut Tour,
        dist: &DistanceModel,
        neighbors: &NeighborLists,
        config: &TwoOptConfig,
        clock: &Clock,
    ) -> TwoOptStats {
        let mut stats = TwoOptStats {
            passes: 0,
            moves: 0,
            local_optimum: false,
        };

        while stats.passes < config.max_passes {
            if clock.expired() {
                tracing::trace!(passes = stats.passes, "time limit reached");
                break;
            }
            stats.passes += 1;

            match best_improving_move(tour, dist, neighbors, config.epsilon) {
                Some(mv) => {
                    tour.apply(&mv);
                    stats.moves += 1;
                    tracing::trace!(delta = mv.delta, cost = tour.length(), "2-opt move");
                }
                None => {
                    stats.local_optimum = true;
                    break;
                }
            }
        }
        stats
    }
}

/// Most improving neighbor-list move, if any beats `-epsilon`.
fn best_improving_move(
    tour: &Tour,
    dist: &DistanceModel,
    neighbors: &NeighborLists,
    epsilon: f64,
) -> Option<Move> {
    let mut best: Option<Move> = None;
    for_each_candidate(tour, dist, neighbors, true, |kind| {
        let mv = tour.evaluate(kind, dist);
        if mv.improves(epsilon) && best.is_none_or(|b| mv.delta < b.delta) {
            best = Some(mv);
        }
    });
    best
}

/// Calls `visit` with every 2-opt move that adds an edge between a node and
/// one of its listed neighbors.
///
/// With `prune`, a candidate is skipped as soon as the new edge is not
/// shorter than the edge it replaces at that endpoint: such a move cannot
/// improve unless its other endpoint sees it first.
pub(crate) fn for_each_candidate(
    tour: &Tour,
    dist: &DistanceModel,
    neighbors: &NeighborLists,
    prune: bool,
    mut visit: impl FnMut(MoveKind),
) {
    let n = tour.len();
    if n < 4 {
        return;
    }
    let kind = |x: usize, y: usize| {
        let (px, py) = (tour.position(x), tour.position(y));
        MoveKind::TwoOpt {
            i: px.min(py),
            j: px.max(py),
        }
    };

    for a in 0..n {
        let succ = tour.neighbor_of(a, Direction::Next);
        let pred = tour.neighbor_of(a, Direction::Prev);
        let d_succ = dist.distance(a, succ);
        let d_pred = dist.distance(pred, a);
        let mut succ_open = true;
        let mut pred_open = true;

        for &c in neighbors.of(a) {
            let d_ac = dist.distance(a, c);
            if prune {
                succ_open &= d_ac < d_succ;
                pred_open &= d_ac < d_pred;
                if !succ_open && !pred_open {
                    break;
                }
            }

            // Adds (a, c) and (succ(a), succ(c)).
            if succ_open && c != succ {
                let c_succ = tour.neighbor_of(c, Direction::Next);
                if c_succ != a {
                    visit(kind(a, c));
                }
            }

            // Adds (a, c) and (pred(a), pred(c)).
            if pred_open && c != pred {
                let c_pred = tour.neighbor_of(c, Direction::Prev);
                if c_pred != a {
                    visit(kind(pred, c_pred));
                }
            }
        }
    }
}
