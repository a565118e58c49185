// Hypothesis decision and the end-to-end experiment run
//
// This module integrates:
// - Bernoulli outcome generation (explicit, seeded random source)
// - Rate summaries and the two-sample t-test (aprender)
// - The normal-approximation interval for rate_B - rate_A
//
// to produce a single report. Any violated precondition aborts the run before
// a report exists.

use crate::experiment::config::{check_open_unit, ExperimentConfig};
use crate::experiment::error::{ExperimentError, Result};
use crate::experiment::interval::{confidence_interval, ConfidenceInterval};
use crate::experiment::sampling::{generate_group, seeded_rng, OutcomeSample};
use crate::experiment::statistics::{
    compare_groups_with, summarize, Alternative, GroupSummary, TestResult,
};
use rand::Rng;
use serde::Serialize;

/// Outcome of the hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// p < alpha: the observed difference is statistically significant
    RejectNull,
    /// p >= alpha: no significant difference detected
    FailToReject,
}

/// Reject H0 when `p_value < alpha`
///
/// # Errors
/// `InvalidParameter` if `alpha` is outside (0, 1) or `p_value` is NaN.
///
/// # Example
/// ```
/// use abtest_sim::experiment::{decide, Decision};
///
/// assert_eq!(decide(0.025, 0.05).unwrap(), Decision::RejectNull);
/// assert_eq!(decide(0.5, 0.05).unwrap(), Decision::FailToReject);
/// ```
pub fn decide(p_value: f64, alpha: f64) -> Result<Decision> {
    check_open_unit("alpha", alpha)?;
    if p_value.is_nan() {
        return Err(ExperimentError::invalid("p_value", "must not be NaN"));
    }

    Ok(if p_value < alpha {
        Decision::RejectNull
    } else {
        Decision::FailToReject
    })
}

/// Complete result of one simulated experiment
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    /// Configuration the run used
    pub config: ExperimentConfig,

    pub group_a: GroupSummary,

    pub group_b: GroupSummary,

    pub test: TestResult,

    pub decision: Decision,

    /// Interval for `rate_B - rate_A`
    pub interval: ConfidenceInterval,

    /// `rate_B - rate_A`
    pub absolute_lift: f64,

    /// `(rate_B - rate_A) / rate_A`, `None` when group A never converted
    pub relative_lift: Option<f64>,
}

impl ExperimentReport {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        match self.decision {
            Decision::RejectNull => {
                let finding = match self.test.alternative {
                    Alternative::TwoSided => "conversion rates differ",
                    Alternative::BGreater => "rate_B > rate_A",
                    Alternative::AGreater => "rate_A > rate_B",
                };
                report.push_str(&format!(
                    "🔬 REJECT NULL HYPOTHESIS: {}\n\n",
                    finding
                ));
            }
            Decision::FailToReject => {
                report.push_str("🔬 FAIL TO REJECT NULL HYPOTHESIS: no significant difference\n\n");
            }
        }

        report.push_str(&format!(
            "Group A conversion rate: {:.2}% ({}/{})\n",
            self.group_a.rate * 100.0,
            self.group_a.conversions,
            self.group_a.size
        ));
        report.push_str(&format!(
            "Group B conversion rate: {:.2}% ({}/{})\n",
            self.group_b.rate * 100.0,
            self.group_b.conversions,
            self.group_b.size
        ));
        report.push_str(&format!("Absolute lift: {:.2}%\n", self.absolute_lift * 100.0));
        if let Some(relative) = self.relative_lift {
            report.push_str(&format!("Relative lift: {:.2}%\n", relative * 100.0));
        }

        report.push_str("\n📊 Statistical Test:\n");
        report.push_str(&format!("  Alternative: {}\n", self.test.alternative));
        report.push_str(&format!(
            "  t-statistic: {:.3} (df={:.1})\n",
            self.test.statistic, self.test.df
        ));
        report.push_str(&format!("  p-value: {:.4}\n", self.test.p_value));
        report.push_str(&format!(
            "  Significance level: {} ({}% confidence)\n",
            self.config.significance_level,
            (1.0 - self.config.significance_level) * 100.0
        ));

        report.push_str(&format!(
            "\n📏 {}% confidence interval for rate_B - rate_A: [{:.4}, {:.4}]\n",
            self.interval.level * 100.0,
            self.interval.low,
            self.interval.high
        ));

        report
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Generate both groups from `rng`, group A first
pub fn simulate_groups<R: Rng + ?Sized>(
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<(OutcomeSample, OutcomeSample)> {
    config.validate()?;

    let group_a = generate_group(config.sample_size, config.rate_a, rng)?;
    let group_b = generate_group(config.sample_size, config.rate_b, rng)?;

    tracing::debug!(
        size = config.sample_size,
        conversions_a = group_a.conversions(),
        conversions_b = group_b.conversions(),
        "generated outcome samples"
    );

    Ok((group_a, group_b))
}

/// Run one experiment using the random source described by `config.seed`
///
/// # Example
/// ```
/// use abtest_sim::experiment::{run_experiment, ExperimentConfig};
///
/// let config = ExperimentConfig::reference();
/// let first = run_experiment(&config).unwrap();
/// let second = run_experiment(&config).unwrap();
/// assert_eq!(first.group_a, second.group_a);
/// assert_eq!(first.decision, second.decision);
/// ```
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentReport> {
    config.validate()?;
    if config.seed.is_none() {
        tracing::warn!("no seed configured; this run cannot be reproduced");
    }

    let mut rng = seeded_rng(config.seed);
    run_with_source(config, &mut rng, config.seed)
}

/// Run one experiment drawing outcomes from an explicit random source
///
/// `config.seed` is ignored; the caller owns the random source. The report
/// records `seed: None` since the run cannot be reproduced from the config.
pub fn run_experiment_with_rng<R: Rng + ?Sized>(
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<ExperimentReport> {
    run_with_source(config, rng, None)
}

/// Shared run body; `recorded_seed` is the seed stored in the report's config
fn run_with_source<R: Rng + ?Sized>(
    config: &ExperimentConfig,
    rng: &mut R,
    recorded_seed: Option<u64>,
) -> Result<ExperimentReport> {
    let (sample_a, sample_b) = simulate_groups(config, rng)?;

    let group_a = summarize(sample_a.as_slice())?;
    let group_b = summarize(sample_b.as_slice())?;

    let test = compare_groups_with(
        sample_a.as_slice(),
        sample_b.as_slice(),
        config.alternative,
        config.variance,
    )?;
    let decision = decide(test.p_value, config.significance_level)?;

    let interval = confidence_interval(
        group_a.rate,
        group_b.rate,
        group_a.size,
        group_b.size,
        config.confidence_level,
    )?;

    let absolute_lift = group_b.rate - group_a.rate;
    let relative_lift = (group_a.rate > 0.0).then(|| absolute_lift / group_a.rate);

    tracing::info!(
        rate_a = group_a.rate,
        rate_b = group_b.rate,
        p_value = test.p_value,
        ?decision,
        "experiment complete"
    );

    Ok(ExperimentReport {
        config: ExperimentConfig {
            seed: recorded_seed,
            ..config.clone()
        },
        group_a,
        group_b,
        test,
        decision,
        interval,
        absolute_lift,
        relative_lift,
    })
}
