//! Gini scoring and partitioning shared by both tree growers.

use std::collections::BTreeMap;

use crate::sample::{ClassLabel, Feature, Sample};

/// Class tallies keyed in ascending class order.
#[derive(Debug, Clone, Default)]
pub struct ClassCounts {
    counts: BTreeMap<ClassLabel, usize>,
    total: usize,
}

impl ClassCounts {
    /// Create an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `class`.
    pub fn add(&mut self, class: ClassLabel) {
        *self.counts.entry(class).or_insert(0) += 1;
        self.total += 1;
    }

    /// Return the total number of observations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Return the number of distinct classes observed.
    #[must_use]
    pub fn n_distinct(&self) -> usize {
        self.counts.len()
    }

    /// Return the count for `class` (zero when never seen).
    #[must_use]
    pub fn get(&self, class: ClassLabel) -> usize {
        self.counts.get(&class).copied().unwrap_or(0)
    }

    /// Return the counts keyed by class, in ascending class order.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<ClassLabel, usize> {
        &self.counts
    }

    /// Return the most frequent class, or `None` when empty.
    ///
    /// Ties go to the lowest class index.
    #[must_use]
    pub fn majority(&self) -> Option<ClassLabel> {
        let mut best: Option<(ClassLabel, usize)> = None;
        for (&class, &count) in &self.counts {
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((class, count));
            }
        }
        best.map(|(class, _)| class)
    }

    /// Gini impurity of the tallied group.
    ///
    /// Squared proportions are subtracted in ascending class order. An
    /// empty tally is pure.
    #[must_use]
    pub fn gini(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let n = self.total as f64;
        let mut g = 1.0;
        for &c in self.counts.values() {
            let p = c as f64 / n;
            g -= p * p;
        }
        g
    }
}

impl FromIterator<ClassLabel> for ClassCounts {
    fn from_iter<I: IntoIterator<Item = ClassLabel>>(iter: I) -> Self {
        let mut counts = Self::new();
        for class in iter {
            counts.add(class);
        }
        counts
    }
}

/// Tally the labels of a group of samples.
#[must_use]
pub fn class_counts(group: &[Sample]) -> ClassCounts {
    group.iter().map(|s| s.label).collect()
}

/// Gini impurity `1 - Σ p_i²` over the classes present in `group`.
#[must_use]
pub fn gini_impurity(group: &[Sample]) -> f64 {
    class_counts(group).gini()
}

/// Size-weighted mean of the Gini impurities of two partitions.
///
/// Lower is better. Must not be called with both partitions empty.
#[must_use]
pub fn split_score(left: &[Sample], right: &[Sample]) -> f64 {
    debug_assert!(
        !(left.is_empty() && right.is_empty()),
        "split_score is undefined for two empty partitions"
    );
    let n = (left.len() + right.len()) as f64;
    (left.len() as f64 / n) * gini_impurity(left) + (right.len() as f64 / n) * gini_impurity(right)
}

/// Split `samples` into `(value <= threshold, value > threshold)`, keeping input order.
#[must_use]
pub fn partition(samples: &[Sample], feature: Feature, threshold: f64) -> (Vec<Sample>, Vec<Sample>) {
    samples
        .iter()
        .partition(|s| feature.value(&s.point) <= threshold)
}

/// A scored candidate split with its two non-empty partitions.
#[derive(Debug, Clone)]
pub(crate) struct CandidateSplit {
    pub(crate) feature: Feature,
    pub(crate) threshold: f64,
    pub(crate) score: f64,
    pub(crate) left: Vec<Sample>,
    pub(crate) right: Vec<Sample>,
}

impl CandidateSplit {
    /// Partition and score a candidate. Returns `None` when either side is empty.
    pub(crate) fn evaluate(samples: &[Sample], feature: Feature, threshold: f64) -> Option<Self> {
        let (left, right) = partition(samples, feature, threshold);
        if left.is_empty() || right.is_empty() {
            return None;
        }
        let score = split_score(&left, &right);
        Some(Self {
            feature,
            threshold,
            score,
            left,
            right,
        })
    }
}

/// Keep `candidate` if it strictly beats the current best.
pub(crate) fn keep_better(best: &mut Option<CandidateSplit>, candidate: CandidateSplit) {
    if best.as_ref().is_none_or(|b| candidate.score < b.score) {
        *best = Some(candidate);
    }
}

/// Majority class of a non-empty sample.
pub(crate) fn majority_leaf_class(counts: &ClassCounts) -> ClassLabel {
    // Growers never reach a node with zero samples: partitions are non-empty.
    counts.majority().unwrap_or(ClassLabel::APPROVE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(income: f64, score: f64, class: usize) -> Sample {
        Sample::new(income, score, ClassLabel::new(class))
    }

    // --- Gini ---

    #[test]
    fn gini_pure() {
        let group = vec![s(1.0, 1.0, 2); 5];
        assert_eq!(gini_impurity(&group), 0.0);
    }

    #[test]
    fn gini_binary_balanced() {
        let group = [s(1.0, 1.0, 0), s(2.0, 1.0, 1)];
        assert!((gini_impurity(&group) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn gini_three_class_uniform() {
        let group = [s(1.0, 1.0, 0), s(2.0, 1.0, 1), s(3.0, 1.0, 2)];
        assert!((gini_impurity(&group) - (1.0 - 1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn gini_empty_is_zero() {
        assert_eq!(gini_impurity(&[]), 0.0);
    }

    // --- Split score ---

    #[test]
    fn perfect_split_scores_zero() {
        let left = [s(1.0, 1.0, 0), s(2.0, 1.0, 0)];
        let right = [s(9.0, 1.0, 1)];
        assert_eq!(split_score(&left, &right), 0.0);
    }

    #[test]
    fn split_score_weights_by_size() {
        // left: [0, 1] -> 0.5, right: [1, 1] -> 0.0, weights 1/2 each.
        let left = [s(1.0, 1.0, 0), s(2.0, 1.0, 1)];
        let right = [s(3.0, 1.0, 1), s(4.0, 1.0, 1)];
        assert!((split_score(&left, &right) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn one_sided_split_equals_parent_impurity() {
        let group = [s(1.0, 1.0, 0), s(2.0, 1.0, 1), s(3.0, 1.0, 1)];
        assert!((split_score(&group, &[]) - gini_impurity(&group)).abs() < 1e-12);
    }

    // --- Counts ---

    #[test]
    fn majority_tie_goes_to_lowest_class() {
        let counts: ClassCounts = [2, 0, 0, 2, 1]
            .into_iter()
            .map(ClassLabel::new)
            .collect();
        assert_eq!(counts.majority(), Some(ClassLabel::new(0)));

        // Arrival order does not matter.
        let counts: ClassCounts = [2, 1, 2, 1].into_iter().map(ClassLabel::new).collect();
        assert_eq!(counts.majority(), Some(ClassLabel::REVIEW));
    }

    #[test]
    fn majority_prefers_strictly_larger() {
        let counts: ClassCounts = [1, 0, 0].into_iter().map(ClassLabel::new).collect();
        assert_eq!(counts.majority(), Some(ClassLabel::new(0)));
    }

    #[test]
    fn majority_of_empty_is_none() {
        assert_eq!(ClassCounts::new().majority(), None);
    }

    #[test]
    fn counts_track_totals() {
        let counts: ClassCounts = [1, 1, 2].into_iter().map(ClassLabel::new).collect();
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.n_distinct(), 2);
        assert_eq!(counts.get(ClassLabel::new(1)), 2);
        assert_eq!(counts.get(ClassLabel::new(0)), 0);
    }

    // --- Partition ---

    #[test]
    fn partition_is_inclusive_left_and_stable() {
        let group = [s(5.0, 1.0, 0), s(1.0, 1.0, 1), s(3.0, 1.0, 2), s(9.0, 1.0, 0)];
        let (left, right) = partition(&group, Feature::Income, 3.0);
        let left_incomes: Vec<f64> = left.iter().map(|x| x.point.income).collect();
        let right_incomes: Vec<f64> = right.iter().map(|x| x.point.income).collect();
        assert_eq!(left_incomes, vec![1.0, 3.0]);
        assert_eq!(right_incomes, vec![5.0, 9.0]);
    }

    #[test]
    fn candidate_with_empty_side_is_discarded() {
        let group = [s(1.0, 1.0, 0), s(2.0, 1.0, 1)];
        assert!(CandidateSplit::evaluate(&group, Feature::Income, 10.0).is_none());
        assert!(CandidateSplit::evaluate(&group, Feature::Income, 1.5).is_some());
    }

    #[test]
    fn keep_better_is_first_seen_on_ties() {
        let group = [s(1.0, 1.0, 0), s(2.0, 2.0, 1)];
        let mut best = None;
        keep_better(&mut best, CandidateSplit::evaluate(&group, Feature::Income, 1.5).unwrap());
        keep_better(&mut best, CandidateSplit::evaluate(&group, Feature::Score, 1.5).unwrap());
        assert_eq!(best.unwrap().feature, Feature::Income);
    }
}
