//! Variable Neighborhood Search configuration.

/// Random move applied repeatedly by a shaking level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShakeKind {
    /// Exchange two nodes.
    Swap,
    /// Move one node elsewhere in the tour.
    Relocate,
    /// Reverse a segment (a random 2-opt move).
    SegmentReversal,
    /// Exchange two adjacent segments (a random 3-opt kick).
    SegmentExchange,
}

/// One rung of the neighborhood ladder: `strength` random moves of `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shake {
    pub kind: ShakeKind,
    pub strength: usize,
}

impl Shake {
    pub fn new(kind: ShakeKind, strength: usize) -> Self {
        Self { kind, strength }
    }
}

/// Fewest segment exchanges in the default ladder.
pub const DEFAULT_MIN_STRENGTH: usize = 2;
/// Most segment exchanges in the default ladder.
pub const DEFAULT_MAX_STRENGTH: usize = 10;

/// Configuration parameters for Variable Neighborhood Search.
///
/// # Examples
///
/// ```
/// use tsp_meta::vns::{Shake, ShakeKind, VnsConfig};
///
/// let config = VnsConfig::default()
///     .with_max_iterations(1000)
///     .with_ladder(vec![Shake::new(ShakeKind::SegmentReversal, 3)]);
/// assert_eq!(config.max_iterations, 1000);
/// assert_eq!(config.ladder.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct VnsConfig {
    /// Maximum number of shake-and-optimize cycles.
    pub max_iterations: usize,
    /// Shaking levels, weakest first.
    pub ladder: Vec<Shake>,
}

impl Default for VnsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            ladder: (DEFAULT_MIN_STRENGTH..=DEFAULT_MAX_STRENGTH)
                .map(|s| Shake::new(ShakeKind::SegmentExchange, s))
                .collect(),
        }
    }
}

impl VnsConfig {
    /// Sets the maximum number of shake-and-optimize cycles.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Replaces the neighborhood ladder.
    pub fn with_ladder(mut self, ladder: Vec<Shake>) -> Self {
        self.ladder = ladder;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be positive".into());
        }
        if self.ladder.is_empty() {
            return Err("neighborhood ladder must not be empty".into());
        }
        if let Some(level) = self.ladder.iter().position(|s| s.strength == 0) {
            return Err(format!("shake strength at level {level} must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ladder() {
        let config = VnsConfig::default();
        let strengths: Vec<usize> = config.ladder.iter().map(|s| s.strength).collect();
        assert_eq!(strengths, (2..=10).collect::<Vec<_>>());
        assert!(config.ladder.iter().all(|s| s.kind == ShakeKind::SegmentExchange));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(VnsConfig::default().with_max_iterations(0).validate().is_err());
        assert!(VnsConfig::default().with_ladder(vec![]).validate().is_err());
        assert!(VnsConfig::default()
            .with_ladder(vec![Shake::new(ShakeKind::Swap, 0)])
            .validate()
            .is_err());
    }
}
