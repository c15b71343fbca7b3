//! Descriptive statistics for a single sample.
//!
//! Mirrors the columns of a dataframe `describe()` table: count, mean, standard
//! deviation, minimum, quartiles and maximum. Quartiles use linear interpolation
//! between the closest ranks.

use crate::error::{Result, TTestError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); `None` for a single observation
    pub std_dev: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl SampleSummary {
    pub fn describe(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(TTestError::InvalidInput(
                "cannot describe an empty sample".to_string(),
            ));
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(TTestError::InvalidInput(format!(
                "non-finite observation {} at index {pos}",
                values[pos]
            )));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = values.len();
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std_dev = if count > 1 {
            let var = values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            Some(var.sqrt())
        } else {
            None
        };

        let quartile = |q: f64| {
            quantile_sorted(&sorted, q)
                .ok_or_else(|| TTestError::InvalidInput(format!("cannot take quantile {q}")))
        };

        Ok(SampleSummary {
            count,
            mean,
            std_dev,
            min: sorted[0],
            q1: quartile(0.25)?,
            median: quartile(0.5)?,
            q3: quartile(0.75)?,
            max: sorted[count - 1],
        })
    }

    pub fn interquartile_range(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Linear-interpolated quantile of an already sorted slice.
///
/// Returns `None` if `sorted` is empty or `q` is outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}
