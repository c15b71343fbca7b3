use crate::error::{Result, TTestError};
use single_utilities::traits::FloatOps;

/// Count, mean and sample standard deviation (denominator n - 1) of one sample.
///
/// The spread is stored as a standard deviation rather than a variance so that samples
/// near the ends of the `f64` range stay representable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleMoments {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl SampleMoments {
    /// Compute moments of a sample with at least two finite observations.
    ///
    /// Observations are divided by their largest magnitude before the two-pass
    /// computation, so neither the sum nor the squared deviations overflow or underflow.
    /// A sample whose observations are all identical gets a standard deviation of exactly
    /// zero, regardless of rounding in the mean.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let n = values.len();
        if n < 2 {
            return Err(TTestError::InvalidInput(format!(
                "sample needs at least 2 observations, got {n}"
            )));
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(TTestError::InvalidInput(format!(
                "non-finite observation {} at index {pos}",
                values[pos]
            )));
        }

        let first = values[0];
        if values.iter().all(|&v| v == first) {
            return Ok(SampleMoments {
                n,
                mean: first,
                std_dev: 0.0,
            });
        }

        let n_f = n as f64;
        let scale = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        let scaled_mean = values.iter().map(|&v| v / scale).sum::<f64>() / n_f;
        let scaled_var = values
            .iter()
            .map(|&v| (v / scale - scaled_mean).powi(2))
            .sum::<f64>()
            / (n_f - 1.0);

        Ok(SampleMoments {
            n,
            mean: scaled_mean * scale,
            std_dev: scaled_var.sqrt() * scale,
        })
    }

    /// Build moments from precomputed summaries.
    pub fn from_summary(n: usize, mean: f64, variance: f64) -> Result<Self> {
        if n < 2 {
            return Err(TTestError::InvalidInput(format!(
                "sample needs at least 2 observations, got {n}"
            )));
        }
        if !mean.is_finite() || !variance.is_finite() || variance < 0.0 {
            return Err(TTestError::InvalidInput(format!(
                "summary must have a finite mean and a finite non-negative variance, got mean={mean}, variance={variance}"
            )));
        }
        Ok(SampleMoments {
            n,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Sample variance; may overflow to infinity for very large observations
    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    /// Standard error of the mean, `std_dev / sqrt(n)`
    pub fn standard_error(&self) -> f64 {
        self.std_dev / (self.n as f64).sqrt()
    }

    /// Pooled standard deviation of two samples (denominator n1 + n2 - 2)
    pub fn pooled_std_dev(a: &SampleMoments, b: &SampleMoments) -> f64 {
        let dof = (a.n + b.n) as f64 - 2.0;
        root_sum_squares(
            a.std_dev * ((a.n as f64 - 1.0) / dof).sqrt(),
            b.std_dev * ((b.n as f64 - 1.0) / dof).sqrt(),
        )
    }
}

/// `sqrt(a² + b²)` without intermediate overflow or underflow.
///
/// Symmetric in its arguments bit for bit, unlike a platform `hypot`.
pub(crate) fn root_sum_squares(a: f64, b: f64) -> f64 {
    let (a, b) = (a.abs(), b.abs());
    let largest = a.max(b);
    if largest == 0.0 {
        return 0.0;
    }
    largest * ((a / largest).powi(2) + (b / largest).powi(2)).sqrt()
}

/// Convert a generic float sample to `f64` values.
pub fn to_f64_sample<'a, T, I>(values: I) -> Result<Vec<f64>>
where
    T: FloatOps + 'a,
    I: IntoIterator<Item = &'a T>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.to_f64().ok_or_else(|| {
                TTestError::InvalidInput(format!("observation at index {i} is not representable as f64"))
            })
        })
        .collect()
}
