use crate::error::Result;
use crate::testing::{TTestOptions, TestResult};
use ndarray::{ArrayBase, Data, Ix1};
use single_utilities::traits::FloatOps;

pub mod parametric;

/// Two-sample tests on any one-dimensional container of observations.
pub trait SampleStatTests<T>
where
    T: FloatOps,
{
    fn t_test(&self, other: &Self, options: &TTestOptions) -> Result<TestResult>;

    /// Two-sided Welch test with default options
    fn welch_t_test(&self, other: &Self) -> Result<TestResult> {
        self.t_test(other, &TTestOptions::welch())
    }
}

impl<T> SampleStatTests<T> for [T]
where
    T: FloatOps,
{
    fn t_test(&self, other: &Self, options: &TTestOptions) -> Result<TestResult> {
        parametric::t_test(self, other, options)
    }
}

impl<S, T> SampleStatTests<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
    T: FloatOps,
{
    fn t_test(&self, other: &Self, options: &TTestOptions) -> Result<TestResult> {
        // views may be strided, so collect via iteration rather than as_slice
        let x: Vec<T> = self.iter().copied().collect();
        let y: Vec<T> = other.iter().copied().collect();
        parametric::t_test(&x, &y, options)
    }
}
