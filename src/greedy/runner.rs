//! Nearest-neighbor construction.
//!
//! # Algorithm
//!
//! 1. Start at a node, mark it visited
//! 2. Move to the closest unvisited node (ties go to the lower index)
//! 3. Repeat until every node is visited, then close the cycle
//!
//! The iterated variant repeats this from every start node, in an order
//! shuffled with the run's seeded generator, and keeps the shortest tour.

use rand::Rng;

use super::config::GreedyConfig;
use crate::clock::Clock;
use crate::distance::DistanceModel;
use crate::error::{TspError, TspResult};
use crate::tour::Tour;

/// Result of a construction run.
#[derive(Debug, Clone)]
pub struct GreedyResult {
    /// Shortest tour built.
    pub tour: Tour,
    /// Start node of that tour.
    pub start_node: usize,
    /// Number of tours built.
    pub iterations: usize,
    /// Best length after each iteration.
    pub cost_history: Vec<f64>,
}

/// Nearest-neighbor construction runner.
pub struct GreedyRunner;

impl GreedyRunner {
    /// Builds one nearest-neighbor tour from `config.start_node`.
    ///
    /// Deterministic for a given instance and start node.
    #[tracing::instrument(level = "debug", name = "greedy", skip_all)]
    pub fn run(dist: &DistanceModel, config: &GreedyConfig, clock: &Clock) -> TspResult<GreedyResult> {
        config.validate(dist.len()).map_err(TspError::Config)?;
        let tour = Self::nearest_neighbor(dist, config.start_node, clock)?;
        tracing::debug!(start = config.start_node, cost = tour.length(), "greedy tour built");
        Ok(GreedyResult {
            cost_history: vec![tour.length()],
            tour,
            start_node: config.start_node,
            iterations: 1,
        })
    }

    /// Builds nearest-neighbor tours from distinct start nodes and keeps the
    /// shortest.
    ///
    /// Elapsed time is checked before every start except the first, so at
    /// least one tour always exists.
    #[tracing::instrument(level = "debug", name = "greedy_iter", skip_all)]
    pub fn run_iterated<R: Rng>(
        dist: &DistanceModel,
        config: &GreedyConfig,
        clock: &Clock,
        rng: &mut R,
    ) -> TspResult<GreedyResult> {
        config.validate(dist.len()).map_err(TspError::Config)?;

        let mut starts: Vec<usize> = (0..dist.len()).collect();
        u_numflow::random::shuffle(&mut starts, rng);

        let mut best: Option<(Tour, usize)> = None;
        let mut cost_history = Vec::new();

        for (iteration, &start) in starts.iter().take(config.max_iterations).enumerate() {
            if iteration > 0 && clock.expired() {
                tracing::debug!(iteration, "time limit reached");
                break;
            }

            let tour = Self::nearest_neighbor(dist, start, clock)?;
            let improved = best
                .as_ref()
                .is_none_or(|(incumbent, _)| tour.length() < incumbent.length());
            if improved {
                tracing::debug!(start, cost = tour.length(), "new best greedy tour");
                best = Some((tour, start));
            }
            if let Some((incumbent, _)) = &best {
                cost_history.push(incumbent.length());
            }
        }

        let (tour, start_node) = best.ok_or_else(|| TspError::config("no start node was tried"))?;
        Ok(GreedyResult {
            tour,
            start_node,
            iterations: cost_history.len(),
            cost_history,
        })
    }

    /// Nearest-neighbor tour from `start`.
    ///
    /// The clock is checked before each extension. When it expires the
    /// unvisited nodes are appended in index order, so the tour stays valid.
    pub fn nearest_neighbor(dist: &DistanceModel, start: usize, clock: &Clock) -> TspResult<Tour> {
        let n = dist.len();
        if start >= n {
            return Err(TspError::Index { i: start, j: start, n });
        }

        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        visited[start] = true;
        order.push(start);
        let mut current = start;

        while order.len() < n {
            if clock.expired() {
                tracing::debug!(built = order.len(), n, "time limit reached while building");
                order.extend((0..n).filter(|&j| !visited[j]));
                break;
            }

            let mut next = None;
            let mut next_dist = f64::INFINITY;
            for j in 0..n {
                if !visited[j] {
                    let d = dist.distance(current, j);
                    if next.is_none() || d < next_dist {
                        next = Some(j);
                        next_dist = d;
                    }
                }
            }

            // Some unvisited node exists while order.len() < n.
            let Some(j) = next else { break };
            visited[j] = true;
            order.push(j);
            current = j;
        }

        Tour::from_order(order, dist)
    }
}
