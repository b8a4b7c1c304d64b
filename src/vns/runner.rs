//! Variable Neighborhood Search execution engine.
//!
//! # Algorithm (Basic VNS)
//!
//! 1. Take the best GREEDY_ITER tour x and make it 2-optimal
//! 2. Set k = 0
//! 3. While k < k_max and the stopping criteria are not met:
//!    a. **Shaking**: copy x and apply ladder level k to the copy
//!    b. **Local search**: 2-opt the copy into x''
//!    c. **Move or not**: if f(x'') < f(x) - epsilon, set x = x'' and
//!    k = 0; otherwise k = k + 1
//! 4. Return x
//!
//! Unlike the textbook variant the ladder does not wrap around: a full
//! sweep of non-improving levels ends the search.
//!
//! # Reference
//!
//! Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//! *Computers & Operations Research* 24(11), 1097-1100.

use rand::Rng;

use super::config::VnsConfig;
use super::types::shake;
use crate::clock::Clock;
use crate::distance::{DistanceModel, NeighborLists};
use crate::error::{TspError, TspResult};
use crate::greedy::{GreedyConfig, GreedyRunner};
use crate::tour::Tour;
use crate::two_opt::{TwoOptConfig, TwoOptRunner};

/// Result of a VNS run.
#[derive(Debug, Clone)]
pub struct VnsResult {
    /// Best tour found.
    pub tour: Tour,
    /// Start node of the GREEDY_ITER tour the search began from.
    pub start_node: usize,
    /// Length of the 2-optimal starting tour.
    pub initial_cost: f64,
    /// Shake-and-optimize cycles executed.
    pub iterations: usize,
    /// Cycle at which the best tour was found (0 when the starting tour was
    /// never beaten).
    pub best_iteration: usize,
    /// Best length after each cycle.
    pub cost_history: Vec<f64>,
    /// Length of the shaken and re-optimized candidate at each cycle.
    pub trajectory: Vec<f64>,
    /// True when the search ended because every ladder level failed in a row.
    pub ladder_exhausted: bool,
}

/// Variable Neighborhood Search runner.
pub struct VnsRunner;

impl VnsRunner {
    /// Executes Basic VNS on the instance behind `dist`.
    ///
    /// `rng` drives both the GREEDY_ITER start order and the shakes.
    #[tracing::instrument(level = "debug", name = "vns", skip_all)]
    pub fn run<R: Rng>(
        dist: &DistanceModel,
        neighbors: &NeighborLists,
        greedy: &GreedyConfig,
        two_opt: &TwoOptConfig,
        config: &VnsConfig,
        clock: &Clock,
        rng: &mut R,
    ) -> TspResult<VnsResult> {
        config.validate().map_err(TspError::Config)?;
        two_opt.validate().map_err(TspError::Config)?;

        let start = GreedyRunner::run_iterated(dist, greedy, clock, rng)?;
        let mut best = start.tour;
        TwoOptRunner::optimize(&mut best, dist, neighbors, two_opt, clock);
        let initial_cost = best.length();

        let k_max = config.ladder.len();
        let mut k = 0;
        let mut iteration = 0;
        let mut best_iteration = 0;
        let mut cost_history = Vec::new();
        let mut trajectory = Vec::new();

        while k < k_max && iteration < config.max_iterations {
            if clock.expired() {
                tracing::debug!(iteration, "time limit reached");
                break;
            }
            iteration += 1;

            let mut candidate = best.clone();
            shake(&mut candidate, config.ladder[k], dist, rng);
            TwoOptRunner::optimize(&mut candidate, dist, neighbors, two_opt, clock);
            trajectory.push(candidate.length());

            if candidate.length() < best.length() - two_opt.epsilon {
                tracing::trace!(iteration, level = k, cost = candidate.length(), "new best");
                best = candidate;
                best_iteration = iteration;
                k = 0;
            } else {
                k += 1;
            }
            cost_history.push(best.length());
        }

        let ladder_exhausted = k >= k_max;
        tracing::debug!(
            initial_cost,
            cost = best.length(),
            iterations = iteration,
            ladder_exhausted,
            "vns finished"
        );
        Ok(VnsResult {
            tour: best,
            start_node: start.start_node,
            initial_cost,
            iterations: iteration,
            best_iteration,
            cost_history,
            trajectory,
            ladder_exhausted,
        })
    }
}
