use crate::error::{Result, TTestError};

pub mod effect;
pub mod inference;

pub mod utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TTestType {
    Student, // Equal variance
    #[default]
    Welch, // Unequal variance
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    #[default]
    TwoSided,
    /// Mean of the first sample is less than the mean of the second
    Less,
    /// Mean of the first sample is greater than the mean of the second
    Greater,
}

/// Options controlling a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTestOptions {
    pub test_type: TTestType,
    pub alternative: Alternative,
    /// Confidence level for the interval on the mean difference, in (0, 1)
    pub confidence_level: f64,
}

impl Default for TTestOptions {
    fn default() -> Self {
        TTestOptions {
            test_type: TTestType::Welch,
            alternative: Alternative::TwoSided,
            confidence_level: 0.95,
        }
    }
}

impl TTestOptions {
    /// Welch's test, two-sided, 95% interval
    pub fn welch() -> Self {
        Self::default()
    }

    /// Student's pooled-variance test, two-sided, 95% interval
    pub fn student() -> Self {
        TTestOptions {
            test_type: TTestType::Student,
            ..Self::default()
        }
    }

    pub fn with_test_type(mut self, test_type: TTestType) -> Self {
        self.test_type = test_type;
        self
    }

    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Check that the options describe a computable test
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(TTestError::InvalidInput(format!(
                "confidence level must lie in (0, 1), got {}",
                self.confidence_level
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    /// The t-statistic; its sign follows (mean of first - mean of second)
    pub t_statistic: f64,
    /// The p-value under `alternative`, always within [0, 1]
    pub p_value: f64,
    /// Degrees of freedom (fractional for Welch)
    pub degrees_of_freedom: f64,
    /// The alternative hypothesis `p_value` refers to
    pub alternative: Alternative,
    /// Difference of sample means (first - second)
    pub mean_difference: Option<f64>,
    /// Standard error of the mean difference
    pub standard_error: Option<f64>,
    /// Confidence interval for the mean difference
    pub confidence_interval: Option<(f64, f64)>,
}

impl TestResult {
    /// Create a new two-sided test result with minimal information
    pub fn new(t_statistic: f64, p_value: f64, degrees_of_freedom: f64) -> Self {
        TestResult {
            t_statistic,
            p_value,
            degrees_of_freedom,
            alternative: Alternative::TwoSided,
            mean_difference: None,
            standard_error: None,
            confidence_interval: None,
        }
    }

    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    pub fn with_mean_difference(mut self, difference: f64) -> Self {
        self.mean_difference = Some(difference);
        self
    }

    /// Add standard error to the result
    pub fn with_standard_error(mut self, se: f64) -> Self {
        self.standard_error = Some(se);
        self
    }

    /// Add confidence interval to the result
    pub fn with_confidence_interval(mut self, lower: f64, upper: f64) -> Self {
        self.confidence_interval = Some((lower, upper));
        self
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}
