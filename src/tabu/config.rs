//! Tabu Search configuration.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::TspError;

/// How the tabu tenure evolves over the iterations.
///
/// Bounds come from the instance size, see [`TenureSchedule::new`].
///
/// # Reference
///
/// Gendreau, M., Laporte, G. & Semet, F. (1998). "A tabu search heuristic
/// for the undirected selective travelling salesman problem",
/// *European Journal of Operational Research* 106(2-3), 539-545.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TenurePolicy {
    /// Constant tenure.
    Fixed(usize),
    /// Midpoint of the size-derived bounds.
    Size,
    /// Uniform in the bounds, redrawn every iteration.
    Random,
    /// Walks one step per iteration between the bounds and back.
    #[default]
    Linear,
}

impl FromStr for TenurePolicy {
    type Err = TspError;

    /// Parses `fixed:<T>`, `size`, `random` or `linear`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "size" => Ok(TenurePolicy::Size),
            "random" => Ok(TenurePolicy::Random),
            "linear" => Ok(TenurePolicy::Linear),
            other => match other.strip_prefix("fixed:") {
                Some(t) => t
                    .parse()
                    .map(TenurePolicy::Fixed)
                    .map_err(|_| TspError::config(format!("invalid fixed tenure {t:?}"))),
                None => Err(TspError::config(format!(
                    "unknown tenure policy {s:?} (expected fixed:<T>, size, random or linear)"
                ))),
            },
        }
    }
}

impl fmt::Display for TenurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenurePolicy::Fixed(t) => write!(f, "fixed:{t}"),
            TenurePolicy::Size => f.write_str("size"),
            TenurePolicy::Random => f.write_str("random"),
            TenurePolicy::Linear => f.write_str("linear"),
        }
    }
}

/// Produces the tenure for each iteration according to a [`TenurePolicy`].
#[derive(Debug, Clone)]
pub struct TenureSchedule {
    policy: TenurePolicy,
    min: usize,
    max: usize,
    current: usize,
    increasing: bool,
}

impl TenureSchedule {
    /// Schedule for an instance of `n` nodes.
    ///
    /// Bounds are `min = max(1, n / 8)` and `max = max(min, n / 4)`. A fixed
    /// tenure sets both bounds to its value.
    pub fn new(policy: TenurePolicy, n: usize) -> Self {
        let (min, max) = match policy {
            TenurePolicy::Fixed(t) => (t, t),
            _ => {
                let min = (n / 8).max(1);
                (min, (n / 4).max(min))
            }
        };
        Self {
            policy,
            min,
            max,
            current: min,
            increasing: true,
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Tenure for the next iteration, always within `[min, max]`.
    pub fn next_tenure<R: Rng>(&mut self, rng: &mut R) -> usize {
        match self.policy {
            TenurePolicy::Fixed(t) => t,
            TenurePolicy::Size => (self.min + self.max).div_ceil(2),
            TenurePolicy::Random => rng.random_range(self.min..=self.max),
            TenurePolicy::Linear => {
                if self.min == self.max {
                    return self.min;
                }
                if self.increasing && self.current >= self.max {
                    self.increasing = false;
                } else if !self.increasing && self.current <= self.min {
                    self.increasing = true;
                }
                if self.increasing {
                    self.current += 1;
                } else {
                    self.current -= 1;
                }
                self.current
            }
        }
    }
}

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use tsp_meta::tabu::{TabuConfig, TenurePolicy};
///
/// let config = TabuConfig::default()
///     .with_max_iterations(1000)
///     .with_tenure_policy(TenurePolicy::Fixed(7));
/// assert_eq!(config.max_iterations, 1000);
/// assert_eq!(config.tenure, TenurePolicy::Fixed(7));
/// ```
#[derive(Debug, Clone)]
pub struct TabuConfig {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Tenure policy.
    pub tenure: TenurePolicy,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            tenure: TenurePolicy::default(),
        }
    }
}

impl TabuConfig {
    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the tenure policy.
    pub fn with_tenure_policy(mut self, policy: TenurePolicy) -> Self {
        self.tenure = policy;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be positive".into());
        }
        if self.tenure == TenurePolicy::Fixed(0) {
            return Err("fixed tenure must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabu_config_defaults() {
        let config = TabuConfig::default();
        assert_eq!(config.max_iterations, 10_000);
        assert_eq!(config.tenure, TenurePolicy::Linear);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tabu_config_builder() {
        let config = TabuConfig::default()
            .with_max_iterations(1000)
            .with_tenure_policy(TenurePolicy::Random);

        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.tenure, TenurePolicy::Random);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zeros() {
        assert!(TabuConfig::default().with_max_iterations(0).validate().is_err());
        assert!(TabuConfig::default()
            .with_tenure_policy(TenurePolicy::Fixed(0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_policy_parse_and_display() {
        for s in ["fixed:9", "size", "random", "linear"] {
            let policy: TenurePolicy = s.parse().unwrap();
            assert_eq!(policy.to_string(), s);
        }
        assert_eq!("LINEAR".parse::<TenurePolicy>().unwrap(), TenurePolicy::Linear);
        assert!("fixed:x".parse::<TenurePolicy>().is_err());
        assert!("circular".parse::<TenurePolicy>().is_err());
    }

    #[test]
    fn test_schedules_stay_within_bounds() {
        let mut rng = u_numflow::random::create_rng(42);
        for policy in [TenurePolicy::Size, TenurePolicy::Random, TenurePolicy::Linear] {
            let mut schedule = TenureSchedule::new(policy, 100);
            assert_eq!((schedule.min(), schedule.max()), (12, 25));
            for _ in 0..200 {
                let t = schedule.next_tenure(&mut rng);
                assert!((12..=25).contains(&t), "{policy}: tenure {t} out of bounds");
            }
        }
    }

    #[test]
    fn test_linear_schedule_oscillates() {
        let mut rng = u_numflow::random::create_rng(0);
        let mut schedule = TenureSchedule::new(TenurePolicy::Linear, 24);
        // min = 3, max = 6
        let seq: Vec<usize> = (0..8).map(|_| schedule.next_tenure(&mut rng)).collect();
        assert_eq!(seq, vec![4, 5, 6, 5, 4, 3, 4, 5]);
    }

    #[test]
    fn test_small_instances_get_positive_tenure() {
        let mut rng = u_numflow::random::create_rng(0);
        let mut schedule = TenureSchedule::new(TenurePolicy::Linear, 4);
        assert_eq!(schedule.min(), 1);
        assert_eq!(schedule.max(), 1);
        assert_eq!(schedule.next_tenure(&mut rng), 1);
        let mut size = TenureSchedule::new(TenurePolicy::Size, 5);
        assert_eq!(size.next_tenure(&mut rng), 1);
    }
}
