//! # campaign-statistics
//!
//! A focused Rust library for A/B testing of marketing campaign sales.
//!
//! The crate compares the sales of campaigns run across randomly assigned outlets. It groups
//! labelled observations once into one sample per campaign, describes each sample, and runs
//! Welch's two-sample t-test on every pair of campaigns. P-values are computed from Student's
//! t-distribution with the Welch-Satterthwaite degrees of freedom, so results agree with the
//! common reference implementations.
//!
//! ## Core Features
//!
//! - **Welch's t-test**: [`WelchTTestEvaluator`] for two samples with unequal variances
//! - **Student's t-test and one-sided alternatives** through [`TTestOptions`]
//! - **Effect Size Calculations**: Cohen's d and Hedge's g
//! - **Campaign grouping**: [`CampaignGroups`] with per-label summaries, totals and pairwise tests
//!
//! ## Quick Start
//!
//! ```
//! use campaign_statistics::{CampaignGroups, TTestOptions};
//!
//! let rows = vec![
//!     (1, 58.0), (1, 61.2), (1, 55.9), (1, 60.4),
//!     (2, 47.1), (2, 45.8), (2, 49.6), (2, 46.3),
//! ];
//! let groups = CampaignGroups::from_observations(rows);
//! let comparisons = groups.pairwise_comparisons(&TTestOptions::welch()).unwrap();
//! assert_eq!(comparisons.len(), 1);
//! assert!(comparisons[0].result.is_significant(0.05));
//! ```
//!
//! ## Module Organization
//!
//! - **[`testing`]**: Two-sample t-tests, test options and effect sizes
//! - **[`summary`]**: Descriptive statistics of a single sample
//! - **[`campaign`]**: Grouping of labelled observations, pairwise comparisons and count tables
//! - **[`error`]**: The error type shared by all fallible operations

pub mod campaign;
pub mod error;
pub mod summary;
pub mod testing;

pub use campaign::crosstab::{Bins, CrossTab};
pub use campaign::{CampaignGroups, LabelTotal, PairwiseComparison};
pub use error::TTestError;
pub use summary::SampleSummary;
pub use testing::inference::SampleStatTests;
pub use testing::inference::parametric::WelchTTestEvaluator;
pub use testing::utils::SampleMoments;
pub use testing::{Alternative, TTestOptions, TTestType, TestResult};
