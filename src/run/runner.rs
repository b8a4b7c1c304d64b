//! Run controller: builds the distance model, seeds the random stream and
//! dispatches on [`Algorithm`].

use std::time::Duration;

use super::config::{Algorithm, RunConfig};
use crate::clock::Clock;
use crate::distance::{DistanceModel, NeighborLists, DEFAULT_NEIGHBORS};
use crate::error::{TspError, TspResult};
use crate::greedy::{GreedyConfig, GreedyRunner};
use crate::instance::Instance;
use crate::tabu::{TabuConfig, TabuRunner};
use crate::tour::Tour;
use crate::two_opt::{TwoOptConfig, TwoOptRunner};
use crate::vns::{VnsConfig, VnsRunner};

/// Outcome of one run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    pub algorithm: Algorithm,
    /// Human-readable description printed before the cost.
    pub label: String,
    /// Length of the returned tour.
    pub cost: f64,
    pub tour: Tour,
    /// Start node of the construction the tour came from, when there is one.
    pub start_node: Option<usize>,
    /// Iterations of the algorithm's main loop.
    pub iterations: usize,
    pub elapsed: Duration,
    /// Per-iteration cost: the current tour for TABU_SEARCH, the
    /// re-optimized candidate for VNS, the best so far for GREEDY_ITER.
    pub history: Vec<f64>,
}

impl RunReport {
    /// The line printed on stdout: `<label>: <cost>`.
    pub fn summary_line(&self) -> String {
        format!("{}: {:.6}", self.label, self.cost)
    }
}

/// Solver entry point.
pub struct Runner;

impl Runner {
    /// Runs `config.algorithm` on `instance`.
    ///
    /// The clock starts before the distance model is built, so matrix
    /// construction counts against the time limit.
    #[tracing::instrument(level = "info", name = "run", skip_all, fields(algorithm = %config.algorithm))]
    pub fn run(instance: &Instance, config: &RunConfig) -> TspResult<RunReport> {
        config.validate()?;
        let clock = Clock::start(config.time_limit());

        if config.algorithm.uses_neighbor_lists() && !instance.is_symmetric() {
            return Err(TspError::config(format!(
                "{} needs a symmetric distance matrix, instance {} is asymmetric",
                config.algorithm,
                instance.name()
            )));
        }
        let greedy = greedy_config(config);
        greedy
            .validate(instance.len())
            .map_err(TspError::Config)?;

        let dist = DistanceModel::new(instance);
        tracing::info!(
            instance = instance.name(),
            n = dist.len(),
            dense = dist.is_dense(),
            "distance model ready"
        );
        let neighbors = config
            .algorithm
            .uses_neighbor_lists()
            .then(|| {
                let k = config.neighbor_bound.unwrap_or(DEFAULT_NEIGHBORS);
                NeighborLists::build_within(&dist, Some(k), &clock)
            });
        let mut rng = u_numflow::random::create_rng(config.seed);
        let two_opt = TwoOptConfig::default();

        let solved = match (config.algorithm, neighbors.as_ref()) {
            (Algorithm::Greedy, _) => {
                let result = GreedyRunner::run(&dist, &greedy, &clock)?;
                Solved {
                    label: format!("Greedy from {}", result.start_node),
                    tour: result.tour,
                    start_node: Some(result.start_node),
                    iterations: result.iterations,
                    history: result.cost_history,
                }
            }
            (Algorithm::GreedyIter, _) => {
                let result = GreedyRunner::run_iterated(&dist, &greedy, &clock, &mut rng)?;
                Solved {
                    label: "Greedy from all nodes".to_string(),
                    tour: result.tour,
                    start_node: Some(result.start_node),
                    iterations: result.iterations,
                    history: result.cost_history,
                }
            }
            (Algorithm::TwoOptGreedy, Some(neighbors)) => {
                let result = TwoOptRunner::run(&dist, neighbors, &greedy, &two_opt, &clock)?;
                Solved {
                    label: format!("Greedy from {} + 2-opt", result.start_node),
                    history: vec![result.initial_cost, result.tour.length()],
                    tour: result.tour,
                    start_node: Some(result.start_node),
                    iterations: result.stats.passes,
                }
            }
            (Algorithm::TabuSearch, Some(neighbors)) => {
                let mut tabu = TabuConfig::default().with_tenure_policy(config.tenure);
                if let Some(n) = config.max_iterations {
                    tabu = tabu.with_max_iterations(n);
                }
                let result =
                    TabuRunner::run(&dist, neighbors, &greedy, &two_opt, &tabu, &clock, &mut rng)?;
                Solved {
                    label: "Tabu search".to_string(),
                    tour: result.tour,
                    start_node: Some(greedy.start_node),
                    iterations: result.iterations,
                    history: result.trajectory,
                }
            }
            (Algorithm::Vns, Some(neighbors)) => {
                let mut vns = VnsConfig::default();
                if let Some(n) = config.max_iterations {
                    vns = vns.with_max_iterations(n);
                }
                let iter_greedy = GreedyConfig::default();
                let result =
                    VnsRunner::run(&dist, neighbors, &iter_greedy, &two_opt, &vns, &clock, &mut rng)?;
                Solved {
                    label: "VNS".to_string(),
                    tour: result.tour,
                    start_node: Some(result.start_node),
                    iterations: result.iterations,
                    history: result.trajectory,
                }
            }
            (algorithm, None) => {
                return Err(TspError::config(format!(
                    "{algorithm} requires neighbor lists"
                )))
            }
        };

        let report = RunReport {
            algorithm: config.algorithm,
            label: solved.label,
            cost: solved.tour.length(),
            tour: solved.tour,
            start_node: solved.start_node,
            iterations: solved.iterations,
            elapsed: clock.elapsed(),
            history: solved.history,
        };
        tracing::info!(
            cost = report.cost,
            iterations = report.iterations,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "run finished"
        );
        Ok(report)
    }
}

/// Algorithm output before it is stamped with run-level fields.
struct Solved {
    label: String,
    tour: Tour,
    start_node: Option<usize>,
    iterations: usize,
    history: Vec<f64>,
}

fn greedy_config(config: &RunConfig) -> GreedyConfig {
    let mut greedy = GreedyConfig::default().with_start_node(config.start_node);
    if config.algorithm == Algorithm::GreedyIter {
        if let Some(n) = config.max_iterations {
            greedy = greedy.with_max_iterations(n);
        }
    }
    greedy
}
