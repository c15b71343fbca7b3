use crate::error::{Result, TTestError};
use crate::testing::utils::{SampleMoments, to_f64_sample};
use single_utilities::traits::FloatOps;

/// Calculate Cohen's d effect size between two samples.
///
/// Positive when the mean of `sample_a` exceeds the mean of `sample_b`, matching the
/// sign convention of the t-statistic.
pub fn cohens_d<T>(sample_a: &[T], sample_b: &[T]) -> Result<f64>
where
    T: FloatOps,
{
    let a = SampleMoments::from_values(&to_f64_sample(sample_a)?)?;
    let b = SampleMoments::from_values(&to_f64_sample(sample_b)?)?;
    cohens_d_from_moments(&a, &b)
}

pub fn cohens_d_from_moments(a: &SampleMoments, b: &SampleMoments) -> Result<f64> {
    let pooled_sd = SampleMoments::pooled_std_dev(a, b);

    if !(pooled_sd > 0.0) {
        return Err(TTestError::DegenerateVariance(
            "pooled standard deviation is zero".to_string(),
        ));
    }

    Ok((a.mean - b.mean) / pooled_sd)
}

/// Calculate Hedge's g (bias-corrected effect size)
pub fn hedges_g<T>(sample_a: &[T], sample_b: &[T]) -> Result<f64>
where
    T: FloatOps,
{
    let d = cohens_d(sample_a, sample_b)?;
    Ok(hedges_correction(sample_a.len(), sample_b.len()) * d)
}

/// Correction factor J for Hedge's g
fn hedges_correction(n1: usize, n2: usize) -> f64 {
    let n = (n1 + n2) as f64;
    1.0 - 3.0 / (4.0 * (n - 2.0) - 1.0)
}
