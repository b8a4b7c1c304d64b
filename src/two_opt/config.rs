//! 2-opt configuration.

/// Minimum gain for a move to count as an improvement.
pub const DEFAULT_EPSILON: f64 = 1e-7;

/// Configuration for the 2-opt local search.
///
/// # Examples
///
/// ```
/// use tsp_meta::two_opt::TwoOptConfig;
///
/// let config = TwoOptConfig::default().with_max_passes(100);
/// assert_eq!(config.max_passes, 100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TwoOptConfig {
    /// A move is applied only when it shortens the tour by more than this.
    pub epsilon: f64,
    /// Upper bound on improvement passes (one move is applied per pass).
    pub max_passes: usize,
}

impl Default for TwoOptConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_passes: usize::MAX,
        }
    }
}

impl TwoOptConfig {
    /// Sets the improvement threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the maximum number of passes.
    pub fn with_max_passes(mut self, n: usize) -> Self {
        self.max_passes = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(format!("epsilon must be finite and non-negative, got {}", self.epsilon));
        }
        if self.max_passes == 0 {
            return Err("max_passes must be positive".into());
        }
        Ok(())
    }
}
