//! Two-key frequency tables and right-closed interval binning.
//!
//! [`CrossTab`] counts observations per `(row, column)` pair, e.g. outlets per
//! campaign and market size. [`Bins`] maps a continuous value onto labelled
//! intervals `(e[i], e[i + 1]]`, so a table can be keyed by an age bracket.

use crate::error::{Result, TTestError};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Observation counts keyed by row label, then column label.
///
/// Only pairs that were observed are stored; [`CrossTab::count`] reports zero for the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab<R, C> {
    counts: BTreeMap<R, BTreeMap<C, usize>>,
}

impl<R, C> Default for CrossTab<R, C>
where
    R: Ord,
    C: Ord,
{
    fn default() -> Self {
        CrossTab {
            counts: BTreeMap::new(),
        }
    }
}

impl<R, C> CrossTab<R, C>
where
    R: Ord + Clone,
    C: Ord + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `(row, column)` observations in a single pass.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
    {
        let mut table = Self::new();
        for (row, column) in observations {
            table.push(row, column);
        }
        trace!(rows = table.counts.len(), "counted observations by two keys");
        table
    }

    pub fn push(&mut self, row: R, column: C) {
        *self
            .counts
            .entry(row)
            .or_default()
            .entry(column)
            .or_insert(0) += 1;
    }

    pub fn count(&self, row: &R, column: &C) -> usize {
        self.counts
            .get(row)
            .and_then(|columns| columns.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// The nested mapping of observed pairs
    pub fn counts(&self) -> &BTreeMap<R, BTreeMap<C, usize>> {
        &self.counts
    }

    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.counts.keys()
    }

    /// Every column label seen in any row, in ascending order
    pub fn columns(&self) -> Vec<&C> {
        self.counts
            .values()
            .flat_map(BTreeMap::keys)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn row_total(&self, row: &R) -> usize {
        self.counts
            .get(row)
            .map(|columns| columns.values().sum())
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().flat_map(BTreeMap::values).sum()
    }

    /// Wide layout: one row per row label with a count for every column, zeros included.
    pub fn unstacked(&self) -> (Vec<C>, Vec<(R, Vec<usize>)>) {
        let columns: Vec<C> = self.columns().into_iter().cloned().collect();
        let rows = self
            .counts
            .iter()
            .map(|(row, counts)| {
                let cells = columns
                    .iter()
                    .map(|column| counts.get(column).copied().unwrap_or(0))
                    .collect();
                (row.clone(), cells)
            })
            .collect();
        (columns, rows)
    }
}

impl<R, C> FromIterator<(R, C)> for CrossTab<R, C>
where
    R: Ord + Clone,
    C: Ord + Clone,
{
    fn from_iter<I: IntoIterator<Item = (R, C)>>(iter: I) -> Self {
        Self::from_observations(iter)
    }
}

/// Labelled right-closed intervals over strictly increasing edges.
///
/// Bin `i` covers `(edges[i], edges[i + 1]]`. Values at or below the first edge,
/// above the last edge, or NaN fall in no bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
    labels: Vec<String>,
}

impl Bins {
    /// Bins labelled by their interval, e.g. `(0, 5]`.
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        validate_edges(&edges)?;
        let labels = edges
            .windows(2)
            .map(|w| format!("({}, {}]", w[0], w[1]))
            .collect();
        Ok(Bins { edges, labels })
    }

    pub fn with_labels<S>(edges: Vec<f64>, labels: Vec<S>) -> Result<Self>
    where
        S: Into<String>,
    {
        validate_edges(&edges)?;
        if labels.len() != edges.len() - 1 {
            return Err(TTestError::InvalidInput(format!(
                "{} edges need {} labels, got {}",
                edges.len(),
                edges.len() - 1,
                labels.len()
            )));
        }
        Ok(Bins {
            edges,
            labels: labels.into_iter().map(Into::into).collect(),
        })
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of the bin containing `value`.
    pub fn assign(&self, value: f64) -> Option<usize> {
        // first edge >= value closes the bin
        let idx = self.edges.partition_point(|&edge| edge < value);
        if idx == 0 || idx == self.edges.len() {
            None
        } else {
            Some(idx - 1)
        }
    }

    pub fn label(&self, value: f64) -> Option<&str> {
        self.assign(value).map(|idx| self.labels[idx].as_str())
    }
}

fn validate_edges(edges: &[f64]) -> Result<()> {
    if edges.len() < 2 {
        return Err(TTestError::InvalidInput(format!(
            "bins need at least 2 edges, got {}",
            edges.len()
        )));
    }
    if edges.iter().any(|e| e.is_nan()) {
        return Err(TTestError::InvalidInput("bin edge is NaN".to_string()));
    }
    if !edges.windows(2).all(|w| w[0] < w[1]) {
        return Err(TTestError::InvalidInput(
            "bin edges must be strictly increasing".to_string(),
        ));
    }
    Ok(())
}
