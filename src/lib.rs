//! abtest-sim - Simulated two-group conversion-rate experiments
//!
//! This library generates synthetic conversion data for a control and a
//! variant group, tests whether the observed rates differ significantly, and
//! reports a decision together with a confidence interval for the difference.

pub mod experiment;
