//! Run configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{TspError, TspResult};
use crate::tabu::TenurePolicy;

/// Algorithms selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Nearest neighbor from one start node.
    Greedy,
    /// Nearest neighbor from every start node, best kept.
    GreedyIter,
    /// Nearest neighbor followed by 2-opt.
    TwoOptGreedy,
    /// Tabu Search over 2-opt moves.
    TabuSearch,
    /// Variable Neighborhood Search.
    Vns,
}

impl Algorithm {
    /// Every algorithm, in the order they are listed to users.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Greedy,
        Algorithm::GreedyIter,
        Algorithm::TwoOptGreedy,
        Algorithm::TabuSearch,
        Algorithm::Vns,
    ];

    /// Name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Greedy => "GREEDY",
            Algorithm::GreedyIter => "GREEDY_ITER",
            Algorithm::TwoOptGreedy => "2OPT_GREEDY",
            Algorithm::TabuSearch => "TABU_SEARCH",
            Algorithm::Vns => "VNS",
        }
    }

    /// Whether the algorithm uses neighbor lists.
    pub fn uses_neighbor_lists(&self) -> bool {
        matches!(
            self,
            Algorithm::TwoOptGreedy | Algorithm::TabuSearch | Algorithm::Vns
        )
    }

    /// Whether the algorithm produces a per-iteration history file.
    pub fn writes_history(&self) -> bool {
        matches!(self, Algorithm::TabuSearch | Algorithm::Vns)
    }
}

impl FromStr for Algorithm {
    type Err = TspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.name() == upper)
            .ok_or_else(|| {
                let names: Vec<&str> = Algorithm::ALL.iter().map(|a| a.name()).collect();
                TspError::config(format!(
                    "unknown algorithm {s:?} (expected one of {})",
                    names.join(", ")
                ))
            })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where results go besides the summary line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Summary line on stdout only.
    #[default]
    Stdout,
    /// Summary line plus a tour file (and history file) under `dir`.
    File { dir: PathBuf },
}

/// Configuration of one solver run.
///
/// # Examples
///
/// ```
/// use tsp_meta::run::{Algorithm, RunConfig};
///
/// let config = RunConfig::new(Algorithm::TabuSearch)
///     .with_time_limit(2.5)
///     .with_seed(7)
///     .with_neighbor_bound(10);
/// assert!(config.validate().is_ok());
/// assert!(RunConfig::new(Algorithm::Vns).with_neighbor_bound(0).validate().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub algorithm: Algorithm,
    /// Wall-clock limit in seconds; unlimited when `None`.
    pub time_limit: Option<f64>,
    /// Seed of the run's single random stream.
    pub seed: u64,
    /// Neighbor-list size; `DEFAULT_NEIGHBORS` when `None`.
    pub neighbor_bound: Option<usize>,
    /// Iteration budget for GREEDY_ITER, TABU_SEARCH and VNS; each
    /// algorithm's default when `None`.
    pub max_iterations: Option<usize>,
    /// Tabu tenure policy.
    pub tenure: TenurePolicy,
    /// Start node of GREEDY and 2OPT_GREEDY.
    pub start_node: usize,
    pub output: OutputMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(Algorithm::Greedy)
    }
}

impl RunConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            time_limit: None,
            seed: 0,
            neighbor_bound: None,
            max_iterations: None,
            tenure: TenurePolicy::default(),
            start_node: 0,
            output: OutputMode::default(),
        }
    }

    /// Sets the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the neighbor-list size `k`.
    pub fn with_neighbor_bound(mut self, k: usize) -> Self {
        self.neighbor_bound = Some(k);
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets the tabu tenure policy.
    pub fn with_tenure_policy(mut self, policy: TenurePolicy) -> Self {
        self.tenure = policy;
        self
    }

    /// Sets the greedy start node.
    pub fn with_start_node(mut self, node: usize) -> Self {
        self.start_node = node;
        self
    }

    /// Sets the output mode.
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// The time limit as a [`Duration`]. Call [`validate`](Self::validate)
    /// first: invalid limits map to `None`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Checks everything that does not depend on the instance.
    pub fn validate(&self) -> TspResult<()> {
        if let Some(secs) = self.time_limit {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(TspError::config(format!(
                    "time limit must be a positive number of seconds, got {secs}"
                )));
            }
        }
        if self.neighbor_bound == Some(0) {
            return Err(TspError::config("k must be positive"));
        }
        if self.max_iterations == Some(0) {
            return Err(TspError::config("iterations must be positive"));
        }
        if self.tenure == TenurePolicy::Fixed(0) {
            return Err(TspError::config("fixed tenure must be positive"));
        }
        Ok(())
    }
}
