//! Parametric two-sample tests for campaign comparisons.
//!
//! This module implements Welch's unequal-variance t-test and Student's pooled-variance
//! t-test. P-values and confidence intervals come from Student's t-distribution with the
//! computed (possibly fractional) degrees of freedom.

use crate::error::{Result, TTestError};
use crate::testing::utils::{SampleMoments, root_sum_squares, to_f64_sample};
use crate::testing::{Alternative, TTestOptions, TTestType, TestResult};
use single_utilities::traits::FloatOps;
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

/// Evaluator for Welch's two-sample t-test.
///
/// Holds only the test options, so one evaluator can be shared freely across threads.
///
/// ```
/// use campaign_statistics::WelchTTestEvaluator;
///
/// let a = [5.1, 4.9, 5.2, 5.0, 4.8];
/// let b = [7.1, 6.9, 7.2, 7.0, 6.8];
/// let result = WelchTTestEvaluator::new().evaluate(&a, &b).unwrap();
/// assert!(result.t_statistic < 0.0);
/// assert!(result.p_value < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchTTestEvaluator {
    options: TTestOptions,
}

impl Default for WelchTTestEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl WelchTTestEvaluator {
    /// Two-sided Welch test with a 95% confidence interval
    pub fn new() -> Self {
        WelchTTestEvaluator {
            options: TTestOptions::welch(),
        }
    }

    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.options.alternative = alternative;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.options.confidence_level = confidence_level;
        self
    }

    pub fn options(&self) -> &TTestOptions {
        &self.options
    }

    /// Compare two samples.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if either sample has fewer than 2 observations or a non-finite value
    /// * `DegenerateVariance` if both samples are constant
    pub fn evaluate<T>(&self, sample_a: &[T], sample_b: &[T]) -> Result<TestResult>
    where
        T: FloatOps,
    {
        t_test(sample_a, sample_b, &self.options)
    }

    /// Compare two samples given their precomputed moments.
    pub fn evaluate_moments(&self, a: &SampleMoments, b: &SampleMoments) -> Result<TestResult> {
        t_test_from_moments(a, b, &self.options)
    }
}

/// Perform a t-test comparing two samples.
///
/// # Arguments
///
/// * `x` - First sample
/// * `y` - Second sample
/// * `options` - Test type, alternative hypothesis and confidence level
///
/// # Returns
///
/// `TestResult` whose t-statistic is positive when the mean of `x` exceeds the mean of `y`.
pub fn t_test<T>(x: &[T], y: &[T], options: &TTestOptions) -> Result<TestResult>
where
    T: FloatOps,
{
    let x = to_f64_sample(x)?;
    let y = to_f64_sample(y)?;

    let moments_x = SampleMoments::from_values(&x)?;
    let moments_y = SampleMoments::from_values(&y)?;

    t_test_from_moments(&moments_x, &moments_y, options)
}

/// Perform a t-test using precomputed summary statistics.
///
/// Useful when only the count, mean and variance of each group are known, as in a
/// grouped summary table.
pub fn t_test_from_moments(
    x: &SampleMoments,
    y: &SampleMoments,
    options: &TTestOptions,
) -> Result<TestResult> {
    options.validate()?;
    if x.n < 2 || y.n < 2 {
        return Err(TTestError::InvalidInput(format!(
            "each sample needs at least 2 observations, got {} and {}",
            x.n, y.n
        )));
    }

    let n1 = x.n as f64;
    let n2 = y.n as f64;
    let mean_diff = x.mean - y.mean;

    let (std_err, df) = match options.test_type {
        TTestType::Student => {
            let pooled_sd = SampleMoments::pooled_std_dev(x, y);
            (pooled_sd * (1.0 / n1 + 1.0 / n2).sqrt(), n1 + n2 - 2.0)
        }
        TTestType::Welch => {
            let se1 = x.standard_error();
            let se2 = y.standard_error();
            let combined_se = root_sum_squares(se1, se2);

            // Welch-Satterthwaite degrees of freedom from each sample's share of the
            // combined variance
            let w1 = (se1 / combined_se).powi(2);
            let w2 = (se2 / combined_se).powi(2);
            let df = 1.0 / (w1 * w1 / (n1 - 1.0) + w2 * w2 / (n2 - 1.0));
            (combined_se, df)
        }
    };

    if !(std_err > 0.0) {
        return Err(TTestError::DegenerateVariance(format!(
            "both samples have zero variance (means {} and {})",
            x.mean, y.mean
        )));
    }

    let t_stat = mean_diff / std_err;
    let t_dist = StudentsT::new(0.0, 1.0, df).map_err(|e| {
        TTestError::Distribution(format!("cannot build t-distribution with df={df}: {e}"))
    })?;

    let p_value = t_p_value(&t_dist, t_stat, options.alternative);
    let (lower, upper) = confidence_interval(
        &t_dist,
        mean_diff,
        std_err,
        options.confidence_level,
        options.alternative,
    );

    debug!(
        n1 = x.n,
        n2 = y.n,
        t = t_stat,
        df,
        p = p_value,
        test_type = ?options.test_type,
        "evaluated two-sample t-test"
    );

    Ok(TestResult::new(t_stat, p_value, df)
        .with_alternative(options.alternative)
        .with_mean_difference(mean_diff)
        .with_standard_error(std_err)
        .with_confidence_interval(lower, upper))
}

#[inline]
fn t_p_value(t_dist: &StudentsT, t_stat: f64, alternative: Alternative) -> f64 {
    // sf keeps precision in the upper tail where 1 - cdf would cancel
    let p = match alternative {
        Alternative::TwoSided => 2.0 * t_dist.sf(t_stat.abs()),
        Alternative::Less => t_dist.cdf(t_stat),
        Alternative::Greater => t_dist.sf(t_stat),
    };
    p.clamp(0.0, 1.0)
}

fn confidence_interval(
    t_dist: &StudentsT,
    mean_diff: f64,
    std_err: f64,
    level: f64,
    alternative: Alternative,
) -> (f64, f64) {
    let alpha = 1.0 - level;
    match alternative {
        Alternative::TwoSided => {
            let margin = t_dist.inverse_cdf(1.0 - alpha / 2.0) * std_err;
            (mean_diff - margin, mean_diff + margin)
        }
        Alternative::Less => {
            let margin = t_dist.inverse_cdf(level) * std_err;
            (f64::NEG_INFINITY, mean_diff + margin)
        }
        Alternative::Greater => {
            let margin = t_dist.inverse_cdf(level) * std_err;
            (mean_diff - margin, f64::INFINITY)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn welch_matches_reference_values() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];

        let result = WelchTTestEvaluator::new().evaluate(&a, &b).unwrap();
        assert_abs_diff_eq!(result.t_statistic, -1.8973665961010275, epsilon = 1e-12);
        assert_abs_diff_eq!(result.degrees_of_freedom, 5.882352941176471, epsilon = 1e-9);
        assert_abs_diff_eq!(result.p_value, 0.10753119493062728, epsilon = 1e-6);
        assert_abs_diff_eq!(result.mean_difference.unwrap(), -3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.standard_error.unwrap(), 2.5f64.sqrt(), epsilon = 1e-12);

        let (lower, upper) = result.confidence_interval.unwrap();
        assert_abs_diff_eq!(lower, -6.887741643736977, epsilon = 1e-4);
        assert_abs_diff_eq!(upper, 0.8877416437369763, epsilon = 1e-4);
    }

    #[test]
    fn student_matches_reference_values() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];

        let result = t_test(&a, &b, &TTestOptions::student()).unwrap();
        assert_abs_diff_eq!(result.t_statistic, -1.8973665961010275, epsilon = 1e-12);
        assert_abs_diff_eq!(result.degrees_of_freedom, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.p_value, 0.09434977284243769, epsilon = 1e-6);
    }

    #[test]
    fn one_sided_p_values_split_the_two_sided_one() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];

        let less = WelchTTestEvaluator::new()
            .with_alternative(Alternative::Less)
            .evaluate(&a, &b)
            .unwrap();
        let greater = WelchTTestEvaluator::new()
            .with_alternative(Alternative::Greater)
            .evaluate(&a, &b)
            .unwrap();

        assert_abs_diff_eq!(less.p_value, 0.05376559746531364, epsilon = 1e-6);
        assert_abs_diff_eq!(less.p_value + greater.p_value, 1.0, epsilon = 1e-12);
        assert_eq!(less.alternative, Alternative::Less);

        let (lower, upper) = less.confidence_interval.unwrap();
        assert!(lower.is_infinite() && lower < 0.0);
        assert!(upper > -3.0);
    }

    #[test]
    fn constant_samples_are_degenerate() {
        let a = [58.1; 10];
        let b = [47.33; 10];
        let err = WelchTTestEvaluator::new().evaluate(&a, &b).unwrap_err();
        assert!(matches!(err, TTestError::DegenerateVariance(_)));

        let err = WelchTTestEvaluator::new().evaluate(&a, &a).unwrap_err();
        assert!(matches!(err, TTestError::DegenerateVariance(_)));
    }

    #[test]
    fn one_constant_sample_is_fine() {
        let a = [5.0, 4.0, 6.0, 5.0, 5.0];
        let b = [1.0; 5];
        let result = WelchTTestEvaluator::new().evaluate(&a, &b).unwrap();
        // all variance comes from `a`, so df collapses to n_a - 1
        assert_abs_diff_eq!(result.degrees_of_freedom, 4.0, epsilon = 1e-12);
        assert!(result.t_statistic > 0.0);
    }

    #[test]
    fn single_observation_is_invalid() {
        let err = WelchTTestEvaluator::new()
            .evaluate(&[1.0], &[1.0, 2.0, 3.0])
            .unwrap_err();
        assert!(matches!(err, TTestError::InvalidInput(_)));
    }

    #[test]
    fn moments_path_agrees_with_sample_path() {
        let a = [5.0, 4.0, 6.0, 5.0, 5.0];
        let b = [0.0, 0.0, 0.0, 0.0, 1.0];
        let evaluator = WelchTTestEvaluator::new();

        let direct = evaluator.evaluate(&a, &b).unwrap();
        let via_moments = evaluator
            .evaluate_moments(
                &SampleMoments::from_values(&a).unwrap(),
                &SampleMoments::from_values(&b).unwrap(),
            )
            .unwrap();
        assert_eq!(direct, via_moments);
        assert_abs_diff_eq!(direct.t_statistic, 12.82853961179637, epsilon = 1e-10);
        assert_abs_diff_eq!(direct.p_value, 5.410736443164101e-06, epsilon = 1e-9);
    }

    #[test]
    fn extreme_scales_give_the_unit_scale_result() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 7.0];
        let evaluator = WelchTTestEvaluator::new();
        let unit = evaluator.evaluate(&a, &b).unwrap();
        assert_abs_diff_eq!(unit.t_statistic, -3.1622776601683795, epsilon = 1e-12);
        assert_abs_diff_eq!(unit.degrees_of_freedom, 3.4482758620689653, epsilon = 1e-12);
        assert_abs_diff_eq!(unit.p_value, 0.04191451747145403, epsilon = 1e-6);

        for scale in [1e-160, 1e200] {
            let scaled_a: Vec<f64> = a.iter().map(|v| v * scale).collect();
            let scaled_b: Vec<f64> = b.iter().map(|v| v * scale).collect();

            let welch = evaluator.evaluate(&scaled_a, &scaled_b).unwrap();
            assert!(welch.degrees_of_freedom.is_finite());
            assert!(welch.degrees_of_freedom >= 2.0 && welch.degrees_of_freedom <= 4.0);
            assert_abs_diff_eq!(welch.t_statistic, unit.t_statistic, epsilon = 1e-9);
            assert_abs_diff_eq!(welch.degrees_of_freedom, unit.degrees_of_freedom, epsilon = 1e-9);
            assert_abs_diff_eq!(welch.p_value, unit.p_value, epsilon = 1e-9);

            let student = t_test(&scaled_a, &scaled_b, &TTestOptions::student()).unwrap();
            assert!(student.t_statistic.is_finite());
            assert_eq!(student.degrees_of_freedom, 4.0);
        }
    }

    #[test]
    fn invalid_confidence_level_is_rejected() {
        let err = WelchTTestEvaluator::new()
            .with_confidence_level(1.0)
            .evaluate(&[1.0, 2.0], &[3.0, 4.0])
            .unwrap_err();
        assert!(matches!(err, TTestError::InvalidInput(_)));
    }
}
