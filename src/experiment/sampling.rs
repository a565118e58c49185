//! Bernoulli outcome generation for simulated visitors
//!
//! The random source is always passed in by the caller. Given the same seed and
//! parameters, `generate_group` yields the same sequence.

use crate::experiment::config::check_probability;
use crate::experiment::error::{ExperimentError, Result};
use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Binary outcomes for one group, one entry per visitor (1 = converted)
///
/// Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeSample {
    outcomes: Vec<u8>,
}

impl OutcomeSample {
    /// Wrap observed outcomes, rejecting any value other than 0 or 1
    pub fn new(outcomes: Vec<u8>) -> Result<Self> {
        check_binary("outcomes", &outcomes)?;
        Ok(Self { outcomes })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of converted visitors
    pub fn conversions(&self) -> usize {
        count_conversions(&self.outcomes)
    }

    /// Outcomes as f32, the element type of the vector/t-test back-ends
    pub fn to_f32(&self) -> Vec<f32> {
        to_f32(&self.outcomes)
    }
}

impl AsRef<[u8]> for OutcomeSample {
    fn as_ref(&self) -> &[u8] {
        &self.outcomes
    }
}

/// Reject any value other than 0 or 1, naming the offending index
pub(crate) fn check_binary(name: &'static str, outcomes: &[u8]) -> Result<()> {
    if let Some(pos) = outcomes.iter().position(|&v| v > 1) {
        return Err(ExperimentError::invalid(
            name,
            format!(
                "values must be 0 or 1, found {} at index {}",
                outcomes[pos], pos
            ),
        ));
    }
    Ok(())
}

pub(crate) fn count_conversions(outcomes: &[u8]) -> usize {
    outcomes.iter().filter(|&&v| v == 1).count()
}

pub(crate) fn to_f32(outcomes: &[u8]) -> Vec<f32> {
    outcomes.iter().map(|&v| f32::from(v)).collect()
}

/// Build the random source for a run
///
/// `Some(seed)` is reproducible for a given build of this crate. `None` seeds
/// from OS entropy, so the resulting sequences cannot be reproduced.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draw `size` independent Bernoulli(`probability`) outcomes
///
/// # Errors
/// `InvalidParameter` if `size == 0` or `probability` is outside [0, 1].
///
/// # Example
/// ```
/// use abtest_sim::experiment::{generate_group, seeded_rng};
///
/// let mut rng = seeded_rng(Some(42));
/// let group = generate_group(100, 0.1, &mut rng).unwrap();
/// assert_eq!(group.len(), 100);
/// assert!(group.as_slice().iter().all(|&v| v <= 1));
/// ```
pub fn generate_group<R: Rng + ?Sized>(
    size: usize,
    probability: f64,
    rng: &mut R,
) -> Result<OutcomeSample> {
    if size == 0 {
        return Err(ExperimentError::invalid("size", "must be > 0, got 0"));
    }
    check_probability("probability", probability)?;

    let bernoulli = Bernoulli::new(probability)
        .map_err(|e| ExperimentError::invalid("probability", e.to_string()))?;

    let outcomes = (0..size)
        .map(|_| u8::from(bernoulli.sample(rng)))
        .collect();

    Ok(OutcomeSample { outcomes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_group_length_and_values() {
        let mut rng = seeded_rng(Some(1));
        let group = generate_group(500, 0.3, &mut rng).unwrap();
        assert_eq!(group.len(), 500);
        assert!(group.as_slice().iter().all(|&v| v == 0 || v == 1));
    }

    #[test]
    fn test_generate_group_deterministic_with_seed() {
        let a = generate_group(1000, 0.12, &mut seeded_rng(Some(42))).unwrap();
        let b = generate_group(1000, 0.12, &mut seeded_rng(Some(42))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_group_different_seeds_differ() {
        let a = generate_group(1000, 0.5, &mut seeded_rng(Some(1))).unwrap();
        let b = generate_group(1000, 0.5, &mut seeded_rng(Some(2))).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_group_probability_extremes() {
        let mut rng = seeded_rng(Some(3));
        let never = generate_group(200, 0.0, &mut rng).unwrap();
        let always = generate_group(200, 1.0, &mut rng).unwrap();
        assert_eq!(never.conversions(), 0);
        assert_eq!(always.conversions(), 200);
    }

    #[test]
    fn test_generate_group_rate_near_probability() {
        let group = generate_group(20_000, 0.25, &mut seeded_rng(Some(11))).unwrap();
        let rate = group.conversions() as f64 / group.len() as f64;
        // 6 standard errors: sqrt(0.25 * 0.75 / 20000) ~ 0.003
        assert!((rate - 0.25).abs() < 0.02, "rate {} too far from 0.25", rate);
    }

    #[test]
    fn test_generate_group_zero_size() {
        let mut rng = seeded_rng(Some(1));
        assert!(matches!(
            generate_group(0, 0.5, &mut rng),
            Err(ExperimentError::InvalidParameter { name: "size", .. })
        ));
    }

    #[test]
    fn test_generate_group_invalid_probability() {
        let mut rng = seeded_rng(Some(1));
        assert!(matches!(
            generate_group(10, 1.5, &mut rng),
            Err(ExperimentError::InvalidParameter {
                name: "probability",
                ..
            })
        ));
        assert!(generate_group(10, -0.1, &mut rng).is_err());
        assert!(generate_group(10, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn test_check_binary_names_parameter_and_index() {
        assert!(check_binary("sample", &[0, 1, 0]).is_ok());
        match check_binary("sample", &[0, 1, 7]) {
            Err(ExperimentError::InvalidParameter { name, reason }) => {
                assert_eq!(name, "sample");
                assert!(reason.contains("index 2"));
            }
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_outcome_sample_rejects_non_binary() {
        assert!(OutcomeSample::new(vec![0, 1, 2]).is_err());
        let sample = OutcomeSample::new(vec![0, 1, 1]).unwrap();
        assert_eq!(sample.conversions(), 2);
        assert_eq!(sample.to_f32(), vec![0.0, 1.0, 1.0]);
    }
}
