use thiserror::Error;

/// Errors raised while evaluating a two-sample test or its inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TTestError {
    /// Sample too small, non-finite observations, or an invalid option.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The standard error (or pooled standard deviation) is zero, so the statistic is undefined.
    #[error("degenerate variance: {0}")]
    DegenerateVariance(String),

    /// The t-distribution could not be constructed for the computed degrees of freedom.
    #[error("distribution error: {0}")]
    Distribution(String),

    /// A label was requested that has no observations.
    #[error("unknown label: {0}")]
    UnknownLabel(String),
}

pub type Result<T> = std::result::Result<T, TTestError>;
