// Simulated A/B conversion-rate experiment with hypothesis testing
//
// Generates binary outcomes for two groups under assumed true conversion
// probabilities, summarizes them, runs an independent two-sample t-test and
// reports a decision plus a confidence interval for rate_B - rate_A.
//
// Implementation:
// - Uses rand's Bernoulli distribution with an explicitly passed, seedable source
// - Uses aprender (crates.io) for the two-sample t-test
// - Uses trueno (crates.io) for SIMD-optimized vector variance
// - Uses statrs for the standard normal quantile of the interval

mod config;
mod error;
mod interval;
mod sampling;
mod statistics;
mod verdict;

pub use config::ExperimentConfig;
pub use error::{ExperimentError, Result};
pub use interval::{confidence_interval, z_critical, ConfidenceInterval};
pub use sampling::{generate_group, seeded_rng, OutcomeSample};
pub use statistics::{
    compare_groups, compare_groups_with, compute_rate, summarize, Alternative, GroupSummary,
    TestResult, VarianceAssumption,
};
pub use verdict::{
    decide, run_experiment, run_experiment_with_rng, simulate_groups, Decision, ExperimentReport,
};
