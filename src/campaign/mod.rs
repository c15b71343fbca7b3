//! Grouping of labelled observations and pairwise campaign comparisons.
//!
//! Observations arrive as `(label, value)` pairs, e.g. one row per outlet and week
//! with the campaign id and the sales figure. They are grouped once into one ordered
//! sample per label, after which every pair of labels can be compared. Frequency
//! tables over two labels live in [`crosstab`].

pub mod crosstab;

use crate::error::TTestError;
use crate::summary::SampleSummary;
use crate::testing::inference::parametric::t_test;
use crate::testing::{TTestOptions, TestResult};
use anyhow::Context;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::{debug, trace};

/// Samples keyed by campaign label, iterated in ascending label order.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignGroups<L> {
    groups: BTreeMap<L, Vec<f64>>,
}

/// Outcome of testing one pair of campaigns; `first` sorts before `second`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseComparison<L> {
    pub first: L,
    pub second: L,
    pub result: TestResult,
}

/// Sum of a label's observations and its share of the grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTotal<L> {
    pub label: L,
    pub total: f64,
    pub share: f64,
}

impl<L> Default for CampaignGroups<L>
where
    L: Ord,
{
    fn default() -> Self {
        CampaignGroups {
            groups: BTreeMap::new(),
        }
    }
}

impl<L> CampaignGroups<L>
where
    L: Ord + Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Group observations in a single pass, keeping their order within each label.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
    {
        let mut groups = Self::new();
        for (label, value) in observations {
            groups.push(label, value);
        }
        trace!(labels = groups.len(), "grouped observations by label");
        groups
    }

    pub fn push(&mut self, label: L, value: f64) {
        self.groups.entry(label).or_default().push(value);
    }

    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.groups.keys()
    }

    pub fn sample(&self, label: &L) -> Option<&[f64]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Descriptive statistics for every label
    pub fn summaries(&self) -> anyhow::Result<BTreeMap<L, SampleSummary>> {
        self.groups
            .iter()
            .map(|(label, values)| -> anyhow::Result<(L, SampleSummary)> {
                let summary = SampleSummary::describe(values)
                    .with_context(|| format!("describing group {label:?}"))?;
                Ok((label.clone(), summary))
            })
            .collect()
    }

    /// Per-label totals with their share of the grand total
    pub fn totals(&self) -> Vec<LabelTotal<L>> {
        let sums: Vec<(L, f64)> = self
            .groups
            .iter()
            .map(|(label, values)| (label.clone(), values.iter().sum::<f64>()))
            .collect();
        let grand_total: f64 = sums.iter().map(|(_, total)| total).sum();

        sums.into_iter()
            .map(|(label, total)| LabelTotal {
                label,
                total,
                share: if grand_total != 0.0 {
                    total / grand_total
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// Test the samples of two labels against each other.
    pub fn compare(
        &self,
        first: &L,
        second: &L,
        options: &TTestOptions,
    ) -> anyhow::Result<TestResult> {
        let a = self
            .sample(first)
            .ok_or_else(|| TTestError::UnknownLabel(format!("{first:?}")))?;
        let b = self
            .sample(second)
            .ok_or_else(|| TTestError::UnknownLabel(format!("{second:?}")))?;

        let result = t_test(a, b, options)
            .with_context(|| format!("comparing group {first:?} vs {second:?}"))?;
        debug!(
            first = ?first,
            second = ?second,
            t = result.t_statistic,
            p = result.p_value,
            "compared groups"
        );
        Ok(result)
    }

    /// Compare every unordered pair of labels.
    ///
    /// Pairs are evaluated in parallel and returned ordered by `(first, second)`.
    /// P-values are reported as computed, without multiple-testing adjustment.
    pub fn pairwise_comparisons(
        &self,
        options: &TTestOptions,
    ) -> anyhow::Result<Vec<PairwiseComparison<L>>>
    where
        L: Send + Sync,
    {
        let labels: Vec<&L> = self.groups.keys().collect();
        let mut pairs: Vec<(&L, &L)> = Vec::with_capacity(labels.len() * labels.len() / 2);
        for (i, &first) in labels.iter().enumerate() {
            for &second in &labels[i + 1..] {
                pairs.push((first, second));
            }
        }

        debug!(pairs = pairs.len(), "running pairwise comparisons");

        pairs
            .into_par_iter()
            .map(|(first, second)| -> anyhow::Result<PairwiseComparison<L>> {
                let result = self.compare(first, second, options)?;
                Ok(PairwiseComparison {
                    first: first.clone(),
                    second: second.clone(),
                    result,
                })
            })
            .collect()
    }
}

impl<L> FromIterator<(L, f64)> for CampaignGroups<L>
where
    L: Ord + Clone + Debug,
{
    fn from_iter<I: IntoIterator<Item = (L, f64)>>(iter: I) -> Self {
        Self::from_observations(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_groups() -> CampaignGroups<u32> {
        CampaignGroups::from_observations(vec![
            (2, 47.5),
            (1, 58.0),
            (3, 55.0),
            (1, 61.0),
            (2, 45.0),
            (3, 54.0),
            (1, 57.5),
            (2, 49.0),
            (3, 57.0),
        ])
    }

    #[test]
    fn grouping_keeps_order_within_label() {
        let groups = sample_groups();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups.labels().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(groups.sample(&1).unwrap(), &[58.0, 61.0, 57.5]);
        assert_eq!(groups.sample(&2).unwrap(), &[47.5, 45.0, 49.0]);
        assert!(groups.sample(&4).is_none());
    }

    #[test]
    fn totals_and_shares() {
        let totals = sample_groups().totals();
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].label, 1);
        assert_abs_diff_eq!(totals[0].total, 176.5, epsilon = 1e-12);
        let share_sum: f64 = totals.iter().map(|t| t.share).sum();
        assert_abs_diff_eq!(share_sum, 1.0, epsilon = 1e-12);

        let empty: CampaignGroups<u32> = CampaignGroups::new();
        assert!(empty.totals().is_empty());
        assert!(empty.is_empty());
    }

    #[test]
    fn zero_grand_total_gives_zero_shares() {
        let groups: CampaignGroups<&str> =
            vec![("a", 1.0), ("a", -1.0), ("b", 0.0)].into_iter().collect();
        assert!(groups.totals().iter().all(|t| t.share == 0.0));
    }

    #[test]
    fn pairwise_covers_every_pair_in_order() {
        let comparisons = sample_groups()
            .pairwise_comparisons(&TTestOptions::welch())
            .unwrap();
        let pairs: Vec<(u32, u32)> = comparisons.iter().map(|c| (c.first, c.second)).collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3), (2, 3)]);

        // campaign 1 sells more than campaign 2
        assert!(comparisons[0].result.t_statistic > 0.0);
    }

    #[test]
    fn unknown_label_surfaces_typed_error() {
        let err = sample_groups()
            .compare(&1, &9, &TTestOptions::welch())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TTestError>(),
            Some(TTestError::UnknownLabel(_))
        ));
    }

    #[test]
    fn too_small_group_fails_pairwise_run() {
        let mut groups = sample_groups();
        groups.push(4, 50.0);
        let err = groups
            .pairwise_comparisons(&TTestOptions::welch())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TTestError>(),
            Some(TTestError::InvalidInput(_))
        ));
    }
}
