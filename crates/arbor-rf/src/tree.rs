//! Randomized greedy tree growth for ensemble members.

use tracing::trace;

use crate::node::Node;
use crate::rng::ParkMiller;
use crate::sample::{Feature, Sample};
use crate::split::{CandidateSplit, class_counts, keep_better, majority_leaf_class};

/// Number of random candidate splits drawn at every interior node.
pub const RANDOM_SPLIT_ATTEMPTS: usize = 14;

/// Grow one randomized decision tree over a bootstrap sample.
///
/// A node becomes a leaf when its sample is pure or `depth == max_depth`.
/// Otherwise [`RANDOM_SPLIT_ATTEMPTS`] candidates are drawn. Each draws a
/// feature, then two sample positions, and thresholds at the midpoint of
/// their values. Candidates leaving either side empty are skipped but still
/// use up an attempt. The lowest split score wins, and earlier candidates
/// win ties. When no candidate is valid the node falls back to a majority
/// leaf.
///
/// The left subtree is grown before the right, so it draws from `rng`
/// first. `sample` must be non-empty.
pub fn grow_random_tree(
    sample: &[Sample],
    rng: &mut ParkMiller,
    depth: usize,
    max_depth: usize,
) -> Node {
    let counts = class_counts(sample);
    if counts.n_distinct() <= 1 || depth == max_depth {
        return Node::leaf(majority_leaf_class(&counts));
    }

    let mut best: Option<CandidateSplit> = None;
    for _ in 0..RANDOM_SPLIT_ATTEMPTS {
        let feature = Feature::ALL[rng.next_index(Feature::ALL.len())];
        let i1 = rng.next_index(sample.len());
        let i2 = rng.next_index(sample.len());
        let v1 = feature.value(&sample[i1].point);
        let v2 = feature.value(&sample[i2].point);
        let threshold = (v1 + v2) / 2.0;

        if let Some(candidate) = CandidateSplit::evaluate(sample, feature, threshold) {
            keep_better(&mut best, candidate);
        }
    }

    let Some(split) = best else {
        trace!(depth, n_samples = sample.len(), "no valid random split, emitting leaf");
        return Node::leaf(majority_leaf_class(&counts));
    };

    let left = grow_random_tree(&split.left, rng, depth + 1, max_depth);
    let right = grow_random_tree(&split.right, rng, depth + 1, max_depth);
    Node::split(split.feature, split.threshold, left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::ClassLabel;

    fn s(income: f64, score: f64, class: usize) -> Sample {
        Sample::new(income, score, ClassLabel::new(class))
    }

    fn separable() -> Vec<Sample> {
        vec![
            s(10.0, 400.0, 2),
            s(12.0, 420.0, 2),
            s(14.0, 410.0, 2),
            s(90.0, 780.0, 0),
            s(95.0, 790.0, 0),
            s(99.0, 800.0, 0),
        ]
    }

    #[test]
    fn pure_sample_is_single_leaf() {
        let sample = vec![s(1.0, 1.0, 1), s(5.0, 9.0, 1)];
        let mut rng = ParkMiller::new(42);
        assert_eq!(grow_random_tree(&sample, &mut rng, 0, 5), Node::leaf(ClassLabel::REVIEW));
    }

    #[test]
    fn pure_sample_consumes_no_draws() {
        let sample = vec![s(1.0, 1.0, 1)];
        let mut rng = ParkMiller::new(42);
        let _ = grow_random_tree(&sample, &mut rng, 0, 5);
        let mut fresh = ParkMiller::new(42);
        assert_eq!(rng.next_f64(), fresh.next_f64());
    }

    #[test]
    fn depth_zero_limit_gives_majority_leaf() {
        let sample = vec![s(1.0, 1.0, 2), s(2.0, 1.0, 0), s(3.0, 1.0, 2)];
        let mut rng = ParkMiller::new(1);
        assert_eq!(grow_random_tree(&sample, &mut rng, 0, 0), Node::leaf(ClassLabel::DENY));
    }

    #[test]
    fn majority_leaf_tie_goes_to_lowest_class() {
        let sample = vec![s(1.0, 1.0, 2), s(2.0, 1.0, 0)];
        let mut rng = ParkMiller::new(1);
        assert_eq!(grow_random_tree(&sample, &mut rng, 0, 0), Node::leaf(ClassLabel::APPROVE));
    }

    #[test]
    fn identical_points_fall_back_to_leaf() {
        // Every midpoint equals the shared value, so the right side is always empty.
        let sample = vec![s(5.0, 5.0, 1), s(5.0, 5.0, 0), s(5.0, 5.0, 1)];
        let mut rng = ParkMiller::new(99);
        assert_eq!(grow_random_tree(&sample, &mut rng, 0, 3), Node::leaf(ClassLabel::REVIEW));
    }

    #[test]
    fn respects_depth_limit() {
        let mut rng = ParkMiller::new(42);
        for max_depth in 0..4 {
            let tree = grow_random_tree(&separable(), &mut rng, 0, max_depth);
            assert!(tree.depth() <= max_depth, "depth {} > {max_depth}", tree.depth());
        }
    }

    #[test]
    fn deterministic_for_seed() {
        let a = grow_random_tree(&separable(), &mut ParkMiller::new(7), 0, 3);
        let b = grow_random_tree(&separable(), &mut ParkMiller::new(7), 0, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn leaves_only_predict_training_classes() {
        let sample = vec![s(10.0, 400.0, 2), s(20.0, 500.0, 2), s(90.0, 800.0, 1)];
        let mut rng = ParkMiller::new(3);
        let tree = grow_random_tree(&sample, &mut rng, 0, 4);
        for class in tree.leaf_classes() {
            assert!(class == ClassLabel::DENY || class == ClassLabel::REVIEW);
        }
    }

    #[test]
    fn split_thresholds_lie_between_observed_values() {
        let mut rng = ParkMiller::new(11);
        let tree = grow_random_tree(&separable(), &mut rng, 0, 1);
        if let Node::Split { feature, threshold, .. } = tree {
            let values: Vec<f64> = separable().iter().map(|x| feature.value(&x.point)).collect();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert!(threshold >= min && threshold < max);
        }
    }
}
