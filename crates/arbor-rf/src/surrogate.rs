//! Surrogate tree distillation: one exhaustive tree fit to the forest's votes.

use tracing::{debug, info, instrument};

use crate::confusion::ConfusionMatrix;
use crate::error::RfError;
use crate::forest::{RandomForest, check_depth};
use crate::node::Node;
use crate::predict::{VoteResult, vote};
use crate::rules::matching_rule;
use crate::sample::{ClassLabel, Feature, Point, Sample, validate_finite};
use crate::split::{CandidateSplit, class_counts, keep_better, majority_leaf_class};

/// Relabel every sample with the forest's majority vote.
///
/// # Errors
///
/// Returns [`RfError::EmptyForest`] when the forest holds no trees.
pub fn relabel_with_forest(data: &[Sample], forest: &RandomForest) -> Result<Vec<Sample>, RfError> {
    data.iter()
        .map(|s| Ok(s.relabeled(vote(forest, &s.point)?.class)))
        .collect()
}

/// Fit a single interpretable tree that mimics `forest` on `data`.
///
/// The tree is trained on the forest's votes, not the ground-truth labels.
/// Every midpoint between adjacent distinct values of every feature is
/// tried at each node.
///
/// # Errors
///
/// | Variant                      | When                                 |
/// |------------------------------|--------------------------------------|
/// | [`RfError::EmptyDataset`]    | `data` is empty                      |
/// | [`RfError::EmptyForest`]     | `forest` holds no trees              |
/// | [`RfError::InvalidMaxDepth`] | `depth_limit` exceeds the bound      |
/// | [`RfError::NonFiniteValue`]  | any feature value is NaN or infinite |
#[instrument(skip(data, forest), fields(n_samples = data.len(), n_trees = forest.n_trees()))]
pub fn build_surrogate(
    data: &[Sample],
    forest: &RandomForest,
    depth_limit: usize,
) -> Result<Node, RfError> {
    if data.is_empty() {
        return Err(RfError::EmptyDataset);
    }
    check_depth(depth_limit)?;
    validate_finite(data)?;

    let relabeled = relabel_with_forest(data, forest)?;
    let root = grow_exhaustive_tree(&relabeled, 0, depth_limit);

    info!(
        n_leaves = root.n_leaves(),
        depth = root.depth(),
        "surrogate tree fitted"
    );
    Ok(root)
}

/// Best split over every adjacent-value midpoint, features in [`Feature::ALL`] order.
fn best_exhaustive_split(sample: &[Sample]) -> Option<CandidateSplit> {
    let mut best = None;
    for feature in Feature::ALL {
        let mut values: Vec<f64> = sample.iter().map(|s| feature.value(&s.point)).collect();
        values.sort_by(f64::total_cmp);
        values.dedup();
        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            if let Some(candidate) = CandidateSplit::evaluate(sample, feature, threshold) {
                keep_better(&mut best, candidate);
            }
        }
    }
    best
}

/// Grow a tree by exhaustive greedy search. Leaf rules match [`crate::grow_random_tree`].
fn grow_exhaustive_tree(sample: &[Sample], depth: usize, depth_limit: usize) -> Node {
    let counts = class_counts(sample);
    if counts.n_distinct() <= 1 || depth == depth_limit {
        return Node::leaf(majority_leaf_class(&counts));
    }

    let Some(split) = best_exhaustive_split(sample) else {
        debug!(depth, n_samples = sample.len(), "no separating threshold, emitting leaf");
        return Node::leaf(majority_leaf_class(&counts));
    };

    debug!(
        depth,
        feature = %split.feature,
        threshold = split.threshold,
        score = split.score,
        "surrogate split chosen"
    );
    let left = grow_exhaustive_tree(&split.left, depth + 1, depth_limit);
    let right = grow_exhaustive_tree(&split.right, depth + 1, depth_limit);
    Node::split(split.feature, split.threshold, left, right)
}

/// Agreement between the surrogate and the forest on `data`.
///
/// Rows are the forest's votes, columns the surrogate's predictions; the
/// accuracy of the matrix is the surrogate's fidelity.
///
/// # Errors
///
/// | Variant                   | When                    |
/// |---------------------------|-------------------------|
/// | [`RfError::EmptyDataset`] | `data` is empty         |
/// | [`RfError::EmptyForest`]  | `forest` holds no trees |
pub fn fidelity(
    surrogate: &Node,
    forest: &RandomForest,
    data: &[Sample],
) -> Result<ConfusionMatrix, RfError> {
    if data.is_empty() {
        return Err(RfError::EmptyDataset);
    }
    let forest_votes: Vec<ClassLabel> = relabel_with_forest(data, forest)?
        .iter()
        .map(|s| s.label)
        .collect();
    let surrogate_preds: Vec<ClassLabel> = data.iter().map(|s| surrogate.predict(&s.point)).collect();
    ConfusionMatrix::from_labels(&forest_votes, &surrogate_preds)
}

/// A forest decision for one applicant alongside the surrogate's reasoning.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Explanation {
    /// The forest's vote for the applicant.
    pub vote: VoteResult,
    /// What the surrogate tree predicts for the applicant.
    pub surrogate_class: ClassLabel,
    /// The surrogate rule that fires for the applicant.
    pub rule: String,
}

impl Explanation {
    /// Whether the surrogate agrees with the forest for this applicant.
    #[must_use]
    pub fn agrees(&self) -> bool {
        self.vote.class == self.surrogate_class
    }
}

impl RandomForest {
    /// Vote on `point` and report the surrogate rule that covers it.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::EmptyForest`] when the forest holds no trees.
    pub fn explain(&self, surrogate: &Node, point: &Point) -> Result<Explanation, RfError> {
        Ok(Explanation {
            vote: vote(self, point)?,
            surrogate_class: surrogate.predict(point),
            rule: matching_rule(surrogate, point),
        })
    }
}
