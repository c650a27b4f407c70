//! Majority-vote inference across the ensemble.

use std::collections::BTreeMap;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::confusion::ConfusionMatrix;
use crate::error::RfError;
use crate::forest::RandomForest;
use crate::sample::{ClassLabel, Point, Sample};
use crate::split::ClassCounts;

/// Outcome of polling every tree for one query point.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct VoteResult {
    /// Winning class.
    pub class: ClassLabel,
    /// Votes per class that received at least one vote, ascending by class.
    pub votes: BTreeMap<ClassLabel, usize>,
}

impl VoteResult {
    /// Total number of votes cast (equals the forest's tree count).
    #[must_use]
    pub fn total(&self) -> usize {
        self.votes.values().sum()
    }

    /// Votes received by `class`.
    #[must_use]
    pub fn votes_for(&self, class: ClassLabel) -> usize {
        self.votes.get(&class).copied().unwrap_or(0)
    }

    /// Share of trees that voted for the winning class.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.votes_for(self.class) as f64 / total as f64
    }
}

/// Poll every tree in forest order and return the majority class.
///
/// Ties go to the lowest class index, whatever the tree order.
///
/// # Errors
///
/// Returns [`RfError::EmptyForest`] when the forest holds no trees.
pub fn vote(forest: &RandomForest, point: &Point) -> Result<VoteResult, RfError> {
    let tally: ClassCounts = forest.trees.iter().map(|tree| tree.predict(point)).collect();
    let class = tally.majority().ok_or(RfError::EmptyForest)?;
    Ok(VoteResult {
        class,
        votes: tally.as_map().clone(),
    })
}

impl RandomForest {
    /// Majority-vote a single point. See [`vote`].
    ///
    /// # Errors
    ///
    /// Returns [`RfError::EmptyForest`] when the forest holds no trees.
    pub fn vote(&self, point: &Point) -> Result<VoteResult, RfError> {
        vote(self, point)
    }

    /// Predict the winning class for a single point.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::EmptyForest`] when the forest holds no trees.
    pub fn predict(&self, point: &Point) -> Result<ClassLabel, RfError> {
        Ok(vote(self, point)?.class)
    }

    /// Vote on a batch of points in parallel, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::EmptyForest`] when the forest holds no trees.
    pub fn vote_batch(&self, points: &[Point]) -> Result<Vec<VoteResult>, RfError> {
        points.par_iter().map(|point| vote(self, point)).collect()
    }

    /// Predict winning classes for a batch of points in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::EmptyForest`] when the forest holds no trees.
    pub fn predict_batch(&self, points: &[Point]) -> Result<Vec<ClassLabel>, RfError> {
        points.par_iter().map(|point| self.predict(point)).collect()
    }

    /// Compare the forest's votes with the ground-truth labels of `data`.
    ///
    /// Rows of the returned matrix are true labels, columns are votes.
    ///
    /// # Errors
    ///
    /// | Variant                       | When                    |
    /// |-------------------------------|-------------------------|
    /// | [`RfError::EmptyPredictions`] | `data` is empty         |
    /// | [`RfError::EmptyForest`]      | the forest has no trees |
    pub fn evaluate(&self, data: &[Sample]) -> Result<ConfusionMatrix, RfError> {
        let points: Vec<Point> = data.iter().map(|s| s.point).collect();
        let truth: Vec<ClassLabel> = data.iter().map(|s| s.label).collect();
        let voted = self.predict_batch(&points)?;
        ConfusionMatrix::from_labels(&truth, &voted)
    }
}
