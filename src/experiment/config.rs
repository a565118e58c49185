// Configuration for a simulated conversion-rate experiment
//
// Defaults reproduce the reference scenario: 1000 visitors per group,
// true rates 10% vs 12%, alpha 0.05, 95% interval.

use crate::experiment::error::{ExperimentError, Result};
use crate::experiment::statistics::{Alternative, VarianceAssumption};
use serde::{Deserialize, Serialize};

/// Configuration inputs for one experiment run
///
/// # Example
/// ```
/// use abtest_sim::experiment::ExperimentConfig;
///
/// let config = ExperimentConfig::default();
/// assert_eq!(config.sample_size, 1000);
/// assert_eq!(config.significance_level, 0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Visitors simulated per group
    pub sample_size: usize,

    /// True conversion probability of group A (control)
    ///
    /// Used only to generate data; the test never sees it.
    pub rate_a: f64,

    /// True conversion probability of group B (variant)
    pub rate_b: f64,

    /// Significance level (alpha) for the hypothesis decision
    ///
    /// - 0.05 (default): reject H0 when p < 0.05
    /// - 0.01: stricter, fewer false positives
    /// - 0.10: looser, fewer false negatives
    pub significance_level: f64,

    /// Confidence level of the interval for `rate_B - rate_A`
    pub confidence_level: f64,

    /// Seed for the random source
    ///
    /// `None` draws the seed from OS entropy and the run cannot be reproduced.
    pub seed: Option<u64>,

    /// Alternative hypothesis used for the p-value
    pub alternative: Alternative,

    /// Variance assumption of the two-sample t-test
    pub variance: VarianceAssumption,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            sample_size: 1000,
            rate_a: 0.10,
            rate_b: 0.12,
            significance_level: 0.05,
            confidence_level: 0.95,
            seed: None,
            alternative: Alternative::TwoSided,
            variance: VarianceAssumption::Welch,
        }
    }
}

impl ExperimentConfig {
    /// Reference scenario with a fixed seed, reproducible run to run
    pub fn reference() -> Self {
        Self {
            seed: Some(42),
            ..Self::default()
        }
    }

    /// Strict configuration: alpha 0.01 and a 99% interval
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            confidence_level: 0.99,
            ..Self::default()
        }
    }

    /// Permissive configuration: alpha 0.10 and a 90% interval
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            confidence_level: 0.90,
            ..Self::default()
        }
    }

    /// Fix the seed so the run is reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of visitors per group
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Set the true conversion probabilities of groups A and B
    pub fn with_rates(mut self, rate_a: f64, rate_b: f64) -> Self {
        self.rate_a = rate_a;
        self.rate_b = rate_b;
        self
    }

    /// Set the alternative hypothesis for the p-value
    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    /// Set the variance assumption of the t-test
    pub fn with_variance(mut self, variance: VarianceAssumption) -> Self {
        self.variance = variance;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(ExperimentError::invalid(
                "sample_size",
                "must be > 0, got 0",
            ));
        }

        check_probability("rate_a", self.rate_a)?;
        check_probability("rate_b", self.rate_b)?;
        check_open_unit("significance_level", self.significance_level)?;
        check_open_unit("confidence_level", self.confidence_level)?;

        Ok(())
    }
}

/// Require `value` in the closed interval [0, 1]
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ExperimentError::invalid(
            name,
            format!("must be in [0, 1], got {}", value),
        ));
    }
    Ok(())
}

/// Require `value` in the open interval (0, 1)
pub(crate) fn check_open_unit(name: &'static str, value: f64) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(ExperimentError::invalid(
            name,
            format!("must be in (0, 1), got {}", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExperimentConfig::default();
        assert_eq!(config.sample_size, 1000);
        assert_eq!(config.rate_a, 0.10);
        assert_eq!(config.rate_b, 0.12);
        assert_eq!(config.significance_level, 0.05);
        assert_eq!(config.confidence_level, 0.95);
        assert_eq!(config.seed, None);
        assert_eq!(config.alternative, Alternative::TwoSided);
        assert_eq!(config.variance, VarianceAssumption::Welch);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reference_config_is_seeded() {
        let config = ExperimentConfig::reference();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.sample_size, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_config() {
        let config = ExperimentConfig::strict();
        assert_eq!(config.significance_level, 0.01);
        assert_eq!(config.confidence_level, 0.99);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_permissive_config() {
        let config = ExperimentConfig::permissive();
        assert_eq!(config.significance_level, 0.10);
        assert_eq!(config.confidence_level, 0.90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = ExperimentConfig::default()
            .with_seed(7)
            .with_sample_size(50)
            .with_rates(0.2, 0.3)
            .with_alternative(Alternative::BGreater)
            .with_variance(VarianceAssumption::Pooled);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.sample_size, 50);
        assert_eq!(config.rate_a, 0.2);
        assert_eq!(config.rate_b, 0.3);
        assert_eq!(config.alternative, Alternative::BGreater);
        assert_eq!(config.variance, VarianceAssumption::Pooled);
    }

    #[test]
    fn test_invalid_sample_size() {
        let config = ExperimentConfig::default().with_sample_size(0);
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::InvalidParameter {
                name: "sample_size",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_rate() {
        let config = ExperimentConfig::default().with_rates(0.1, 1.5);
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::InvalidParameter { name: "rate_b", .. })
        ));
    }

    #[test]
    fn test_nan_rate_rejected() {
        let config = ExperimentConfig::default().with_rates(f64::NAN, 0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_significance_level() {
        let mut config = ExperimentConfig::default();
        config.significance_level = 1.0;
        assert!(config.validate().is_err());
        config.significance_level = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_confidence_level() {
        let mut config = ExperimentConfig::default();
        config.confidence_level = 95.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ExperimentConfig =
            serde_json::from_str(r#"{"sample_size": 200, "seed": 9}"#).unwrap();
        assert_eq!(config.sample_size, 200);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.rate_a, 0.10);
        assert_eq!(config.alternative, Alternative::TwoSided);
    }
}
