//! Frequency heat colouring.
//!
//! Distinct occurrence counts are ranked from most to least frequent and the
//! ranks are cut into a fixed number of buckets. Bucket `0` is the hottest
//! tier. Buckets carry no colour values of their own; the UI maps them.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of buckets used by the review UI.
pub const DEFAULT_BUCKETS: u8 = 6;

/// Mapping from an occurrence count to its bucket.
pub type ColourMap = BTreeMap<usize, u8>;

/// How the rank step between bucket thresholds is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StepMode {
    /// `step = distinct / buckets` as a real number. With fewer distinct
    /// counts than buckets the top count still lands in bucket 0.
    #[default]
    Fractional,
    /// `step` truncated to an integer. With fewer distinct counts than
    /// buckets every count lands in the last bucket.
    Truncated,
}

impl StepMode {
    /// Returns the mode as a kebab-case string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fractional => "fractional",
            Self::Truncated => "truncated",
        }
    }
}

/// Rank-based bucketing of occurrence counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colourizer {
    buckets: u8,
    step_mode: StepMode,
}

impl Default for Colourizer {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS, StepMode::default())
    }
}

impl Colourizer {
    /// Create a colourizer. A bucket count of zero is raised to one.
    pub fn new(buckets: u8, step_mode: StepMode) -> Self {
        Self {
            buckets: buckets.max(1),
            step_mode,
        }
    }

    /// Number of buckets.
    pub const fn buckets(&self) -> u8 {
        self.buckets
    }

    /// Step mode in use.
    pub const fn step_mode(&self) -> StepMode {
        self.step_mode
    }

    /// Assign every distinct count in `counts` to a bucket.
    ///
    /// Counts are deduplicated and ranked descending; rank `x` goes to the
    /// first bucket `i` with `x < (i + 1) * step`, else to the last bucket.
    #[tracing::instrument(skip_all, fields(buckets = self.buckets))]
    pub fn divide<I>(&self, counts: I) -> ColourMap
    where
        I: IntoIterator<Item = usize>,
    {
        let distinct: BTreeSet<usize> = counts.into_iter().collect();
        let step = self.step(distinct.len());

        let map: ColourMap = distinct
            .iter()
            .rev()
            .enumerate()
            .map(|(rank, &count)| (count, self.bucket_for_rank(rank, step)))
            .collect();
        tracing::debug!(distinct = map.len(), step, "counts divided into buckets");
        map
    }

    fn step(&self, distinct: usize) -> f64 {
        match self.step_mode {
            StepMode::Fractional => distinct as f64 / f64::from(self.buckets),
            StepMode::Truncated => (distinct / usize::from(self.buckets)) as f64,
        }
    }

    fn bucket_for_rank(&self, rank: usize, step: f64) -> u8 {
        let rank = rank as f64;
        (1..self.buckets)
            .find(|&i| rank < f64::from(i) * step)
            .map_or(self.buckets - 1, |i| i - 1)
    }
}

/// Number of distinct counts that fell into each bucket.
pub fn histogram(map: &ColourMap) -> BTreeMap<u8, usize> {
    let mut chart = BTreeMap::new();
    for &bucket in map.values() {
        *chart.entry(bucket).or_insert(0) += 1;
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets_for(n: usize, mode: StepMode) -> Vec<u8> {
        let map = Colourizer::new(DEFAULT_BUCKETS, mode).divide(1..=n);
        // highest count first
        map.values().rev().copied().collect()
    }

    #[test]
    fn empty_counts_give_empty_map() {
        assert!(Colourizer::default().divide(Vec::new()).is_empty());
    }

    #[test]
    fn fractional_small_distinct_sets() {
        assert_eq!(buckets_for(1, StepMode::Fractional), [0]);
        assert_eq!(buckets_for(2, StepMode::Fractional), [0, 3]);
        assert_eq!(buckets_for(3, StepMode::Fractional), [0, 2, 4]);
        assert_eq!(buckets_for(4, StepMode::Fractional), [0, 1, 3, 4]);
        assert_eq!(buckets_for(5, StepMode::Fractional), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn fractional_exact_multiples_split_evenly() {
        assert_eq!(buckets_for(6, StepMode::Fractional), [0, 1, 2, 3, 4, 5]);
        assert_eq!(
            buckets_for(12, StepMode::Fractional),
            [0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5]
        );
    }

    #[test]
    fn fractional_remainder_spreads_from_the_top() {
        assert_eq!(buckets_for(7, StepMode::Fractional), [0, 0, 1, 2, 3, 4, 5]);
        assert_eq!(
            buckets_for(13, StepMode::Fractional),
            [0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5]
        );
    }

    #[test]
    fn truncated_small_sets_fall_into_last_bucket() {
        for n in 1..6 {
            assert!(buckets_for(n, StepMode::Truncated).iter().all(|&b| b == 5));
        }
    }

    #[test]
    fn truncated_remainder_folds_into_last_bucket() {
        assert_eq!(buckets_for(7, StepMode::Truncated), [0, 1, 2, 3, 4, 5, 5]);
        assert_eq!(
            buckets_for(9, StepMode::Truncated),
            [0, 1, 2, 3, 4, 5, 5, 5, 5]
        );
    }

    #[test]
    fn duplicate_counts_share_a_rank() {
        let map = Colourizer::default().divide([5, 5, 5, 1]);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&5], 0);
        assert_eq!(map[&1], 3);
    }

    #[test]
    fn buckets_never_decrease_as_count_grows() {
        for mode in [StepMode::Fractional, StepMode::Truncated] {
            for n in 1..40 {
                let map = Colourizer::new(DEFAULT_BUCKETS, mode).divide(1..=n);
                let by_count_desc: Vec<u8> = map.values().rev().copied().collect();
                assert!(by_count_desc.windows(2).all(|w| w[0] <= w[1]));
                assert!(map.values().all(|&b| b < DEFAULT_BUCKETS));
            }
        }
    }

    #[test]
    fn last_bucket_used_once_enough_distinct_counts() {
        for n in 6..40 {
            let map = Colourizer::default().divide(1..=n);
            assert!(map.values().any(|&b| b == 5), "n = {n}");
        }
    }

    #[test]
    fn last_bucket_below_bucket_count_depends_on_step_mode() {
        for n in 1..usize::from(DEFAULT_BUCKETS) {
            let fractional = buckets_for(n, StepMode::Fractional);
            assert_eq!(fractional[0], 0, "n = {n}");
            assert!(!fractional.contains(&5), "n = {n}");

            let truncated = buckets_for(n, StepMode::Truncated);
            assert!(truncated.iter().all(|&b| b == 5), "n = {n}");
        }
    }

    #[test]
    fn zero_buckets_behaves_as_one() {
        let map = Colourizer::new(0, StepMode::Fractional).divide([3, 2, 1]);
        assert!(map.values().all(|&b| b == 0));
    }

    #[test]
    fn histogram_counts_distinct_values_per_bucket() {
        let map = Colourizer::default().divide(1..=7);
        let chart = histogram(&map);
        assert_eq!(chart[&0], 2);
        assert_eq!(chart.values().sum::<usize>(), 7);
    }
}
