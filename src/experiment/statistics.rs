// Rate computation and the two-sample comparison test
//
// This module wraps aprender's hypothesis testing and trueno's vector primitives
// for binary (converted / not converted) outcome data.
//
// - Uses aprender's `ttest_ind()` for the independent two-sample t-test
// - Welch's variant (unequal variances) is the default; Student's pooled
//   variant is available through `VarianceAssumption::Pooled`
// - Uses trueno::Vector for SIMD-optimized variance
// - Rates are computed exactly from conversion counts in f64

use crate::experiment::error::{ExperimentError, Result};
use crate::experiment::sampling::{check_binary, count_conversions, to_f32};
use serde::{Deserialize, Serialize};
use std::fmt;
use trueno::Vector;

/// Alternative hypothesis the p-value is computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alternative {
    /// Ha: rate_A != rate_B
    #[default]
    TwoSided,
    /// Ha: rate_B > rate_A
    BGreater,
    /// Ha: rate_A > rate_B
    AGreater,
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alternative::TwoSided => write!(f, "two-sided (rate_B != rate_A)"),
            Alternative::BGreater => write!(f, "one-sided (rate_B > rate_A)"),
            Alternative::AGreater => write!(f, "one-sided (rate_A > rate_B)"),
        }
    }
}

/// Variance assumption for the t-test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceAssumption {
    /// Welch's t-test, unequal variances
    #[default]
    Welch,
    /// Student's t-test, pooled (equal) variance
    Pooled,
}

impl VarianceAssumption {
    fn equal_var(self) -> bool {
        matches!(self, VarianceAssumption::Pooled)
    }
}

/// Observed statistics for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Number of visitors
    pub size: usize,
    /// Number of conversions
    pub conversions: usize,
    /// Observed conversion rate (sample mean)
    pub rate: f64,
    /// Population variance of the outcomes
    pub variance: f64,
}

/// Result of comparing two outcome samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// t-statistic, numerator `mean(A) - mean(B)`
    pub statistic: f64,

    /// p-value under `alternative`
    /// - p < alpha: the difference is statistically significant
    /// - p >= alpha: consistent with random variation
    pub p_value: f64,

    /// Degrees of freedom
    pub df: f64,

    pub alternative: Alternative,

    pub variance: VarianceAssumption,
}

/// Observed conversion rate (arithmetic mean) of a binary sample
///
/// # Errors
/// `EmptyInput` for an empty sample, `InvalidParameter` if any value is not 0 or 1.
///
/// # Example
/// ```
/// use abtest_sim::experiment::compute_rate;
///
/// assert_eq!(compute_rate(&[0, 1, 1, 0]).unwrap(), 0.5);
/// assert!(compute_rate(&[]).is_err());
/// ```
pub fn compute_rate(sample: &[u8]) -> Result<f64> {
    if sample.is_empty() {
        return Err(ExperimentError::EmptyInput(
            "cannot compute conversion rate of an empty sample".to_string(),
        ));
    }
    check_binary("sample", sample)?;

    Ok(count_conversions(sample) as f64 / sample.len() as f64)
}

/// Summarize a binary sample: size, conversions, rate and variance
pub fn summarize(sample: &[u8]) -> Result<GroupSummary> {
    let rate = compute_rate(sample)?;

    let vector = Vector::from_slice(&to_f32(sample));
    // trueno uses population variance (divide by n)
    let variance = vector.variance().map_err(|e| {
        ExperimentError::DegenerateSample(format!("failed to compute variance: {}", e))
    })?;

    Ok(GroupSummary {
        size: sample.len(),
        conversions: count_conversions(sample),
        rate,
        variance: f64::from(variance),
    })
}

/// Two-sided Welch's t-test between two independent binary samples
///
/// # Example
/// ```
/// use abtest_sim::experiment::compare_groups;
///
/// let a = [0u8, 0, 0, 1, 0, 0, 0, 0, 1, 0];
/// let b = [1u8, 1, 0, 1, 1, 1, 0, 1, 1, 1];
/// let result = compare_groups(&a, &b).unwrap();
/// assert!(result.statistic < 0.0); // B converts more
/// assert!(result.p_value < 0.05);
/// ```
pub fn compare_groups(sample_a: &[u8], sample_b: &[u8]) -> Result<TestResult> {
    compare_groups_with(
        sample_a,
        sample_b,
        Alternative::TwoSided,
        VarianceAssumption::Welch,
    )
}

/// Independent two-sample t-test with an explicit alternative and variance assumption
///
/// One-sided p-values are derived from the two-sided one: `p/2` when the
/// statistic points in the direction of the alternative, `1 - p/2` otherwise.
///
/// # Errors
/// - `EmptyInput` if either sample is empty
/// - `InvalidParameter` if a value is not 0 or 1
/// - `DegenerateSample` if a sample has fewer than 2 observations, or both
///   samples have zero variance (the statistic would be 0/0). A single
///   zero-variance sample is fine.
pub fn compare_groups_with(
    sample_a: &[u8],
    sample_b: &[u8],
    alternative: Alternative,
    variance: VarianceAssumption,
) -> Result<TestResult> {
    if sample_a.is_empty() || sample_b.is_empty() {
        return Err(ExperimentError::EmptyInput(
            "cannot compare empty samples".to_string(),
        ));
    }
    check_binary("sample_a", sample_a)?;
    check_binary("sample_b", sample_b)?;

    if sample_a.len() < 2 || sample_b.len() < 2 {
        return Err(ExperimentError::DegenerateSample(format!(
            "need at least 2 observations per group for a t-test, got {} and {}",
            sample_a.len(),
            sample_b.len()
        )));
    }

    if is_constant(sample_a) && is_constant(sample_b) {
        return Err(ExperimentError::DegenerateSample(
            "both groups have zero variance; t-statistic is undefined".to_string(),
        ));
    }

    let ttest = aprender::stats::hypothesis::ttest_ind(
        &to_f32(sample_a),
        &to_f32(sample_b),
        variance.equal_var(),
    )
    .map_err(|e| ExperimentError::DegenerateSample(format!("t-test failed: {}", e)))?;

    let statistic = f64::from(ttest.statistic);
    let two_sided = f64::from(ttest.pvalue);
    if !statistic.is_finite() || !two_sided.is_finite() {
        return Err(ExperimentError::DegenerateSample(format!(
            "t-test produced a non-finite result (statistic={}, p={})",
            statistic, two_sided
        )));
    }

    let p_value = match alternative {
        Alternative::TwoSided => two_sided,
        Alternative::BGreater => one_sided(two_sided, statistic < 0.0),
        Alternative::AGreater => one_sided(two_sided, statistic > 0.0),
    };

    tracing::debug!(
        statistic,
        p_value,
        df = ttest.df,
        ?alternative,
        ?variance,
        "compared groups"
    );

    Ok(TestResult {
        statistic,
        p_value: p_value.clamp(0.0, 1.0),
        df: f64::from(ttest.df),
        alternative,
        variance,
    })
}

fn one_sided(two_sided: f64, matches_direction: bool) -> f64 {
    if matches_direction {
        two_sided / 2.0
    } else {
        1.0 - two_sided / 2.0
    }
}

fn is_constant(sample: &[u8]) -> bool {
    sample.windows(2).all(|w| w[0] == w[1])
}
