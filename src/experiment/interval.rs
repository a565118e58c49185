//! Normal-approximation confidence interval for the difference in rates
//!
//! `se = sqrt(p_A(1-p_A)/n_A + p_B(1-p_B)/n_B)`, `margin = z * se`, centred on
//! `rate_B - rate_A`. This is deliberately not a t-based or exact binomial interval.

use crate::experiment::config::{check_open_unit, check_probability};
use crate::experiment::error::{ExperimentError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Interval bounding `rate_B - rate_A` at `level` confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
    pub level: f64,
}

impl ConfidenceInterval {
    /// Point estimate at the centre of the interval
    pub fn difference(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// Half-width of the interval
    pub fn margin(&self) -> f64 {
        (self.high - self.low) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// True when zero lies outside the interval
    pub fn excludes_zero(&self) -> bool {
        !self.contains(0.0)
    }
}

/// Two-sided standard normal critical value for `confidence_level`
///
/// 0.95 gives ~1.96, 0.99 gives ~2.576.
pub fn z_critical(confidence_level: f64) -> Result<f64> {
    check_open_unit("confidence_level", confidence_level)?;

    let standard_normal = Normal::new(0.0, 1.0)
        .map_err(|e| ExperimentError::invalid("confidence_level", e.to_string()))?;

    Ok(standard_normal.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0))
}

/// Confidence interval for `rate_b - rate_a`
///
/// # Errors
/// `InvalidParameter` if `confidence_level` is outside (0, 1), either count is
/// zero, or either rate is outside [0, 1].
///
/// # Example
/// ```
/// use abtest_sim::experiment::confidence_interval;
///
/// let ci = confidence_interval(0.10, 0.132, 1000, 1000, 0.95).unwrap();
/// assert!((ci.low - 0.004).abs() < 1e-3);
/// assert!((ci.high - 0.060).abs() < 1e-3);
/// ```
pub fn confidence_interval(
    rate_a: f64,
    rate_b: f64,
    n_a: usize,
    n_b: usize,
    confidence_level: f64,
) -> Result<ConfidenceInterval> {
    check_probability("rate_a", rate_a)?;
    check_probability("rate_b", rate_b)?;
    if n_a == 0 {
        return Err(ExperimentError::invalid("n_a", "must be > 0, got 0"));
    }
    if n_b == 0 {
        return Err(ExperimentError::invalid("n_b", "must be > 0, got 0"));
    }
    let z = z_critical(confidence_level)?;

    let se = (rate_a * (1.0 - rate_a) / n_a as f64 + rate_b * (1.0 - rate_b) / n_b as f64).sqrt();
    let margin = z * se;
    let difference = rate_b - rate_a;

    Ok(ConfidenceInterval {
        low: difference - margin,
        high: difference + margin,
        level: confidence_level,
    })
}
