//! Construction heuristic configuration.

/// Configuration for nearest-neighbor construction.
///
/// # Examples
///
/// ```
/// use tsp_meta::greedy::GreedyConfig;
///
/// let config = GreedyConfig::default()
///     .with_start_node(3)
///     .with_max_iterations(50);
/// assert_eq!(config.start_node, 3);
/// assert_eq!(config.max_iterations, 50);
/// ```
#[derive(Debug, Clone)]
pub struct GreedyConfig {
    /// Start node of the single-start heuristic.
    pub start_node: usize,
    /// Maximum number of starts for the iterated heuristic. Capped by the
    /// node count: every node is tried at most once.
    pub max_iterations: usize,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            start_node: 0,
            max_iterations: usize::MAX,
        }
    }
}

impl GreedyConfig {
    /// Sets the start node.
    pub fn with_start_node(mut self, node: usize) -> Self {
        self.start_node = node;
        self
    }

    /// Sets the maximum number of starts for the iterated heuristic.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Validates the configuration against an instance of `n` nodes.
    pub fn validate(&self, n: usize) -> Result<(), String> {
        if self.start_node >= n {
            return Err(format!(
                "start node {} out of range for {n} nodes",
                self.start_node
            ));
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be positive".into());
        }
        Ok(())
    }
}
