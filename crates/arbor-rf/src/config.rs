//! Configuration builders for forest and surrogate training.

use crate::error::RfError;
use crate::forest::{RandomForest, check_depth};
use crate::node::Node;
use crate::sample::Sample;

/// Configuration for Random Forest training.
///
/// Construct via [`RandomForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter   | Default |
/// |-------------|---------|
/// | `max_depth` | 2       |
/// | `seed`      | 42      |
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) max_depth: usize,
    pub(crate) seed: i64,
}

impl RandomForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, RfError> {
        if n_trees == 0 {
            return Err(RfError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            max_depth: 2,
            seed: 42,
        })
    }

    /// Set the per-tree depth limit (root is depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the seed for the Park-Miller stream shared by all trees.
    #[must_use]
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the per-tree depth limit.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the seed.
    #[must_use]
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Train a Random Forest on the provided labeled samples.
    ///
    /// # Errors
    ///
    /// | Variant                     | When                                      |
    /// |-----------------------------|-------------------------------------------|
    /// | [`RfError::EmptyDataset`]   | `data` is empty                           |
    /// | [`RfError::NonFiniteValue`] | any feature value is NaN or infinite      |
    /// | [`RfError::InvalidMaxDepth`]| `max_depth` exceeds the supported bound   |
    pub fn fit(&self, data: &[Sample]) -> Result<RandomForest, RfError> {
        crate::forest::build_forest(data, self.n_trees, self.seed, self.max_depth)
    }
}

/// Configuration for the surrogate tree that mimics a fitted forest.
///
/// # Defaults
///
/// | Parameter     | Default |
/// |---------------|---------|
/// | `depth_limit` | 3       |
#[derive(Debug, Clone)]
pub struct SurrogateConfig {
    pub(crate) depth_limit: usize,
}

impl SurrogateConfig {
    /// Create a config with the given depth limit.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidMaxDepth`] if `depth_limit` exceeds the supported bound.
    pub fn new(depth_limit: usize) -> Result<Self, RfError> {
        check_depth(depth_limit)?;
        Ok(Self { depth_limit })
    }

    /// Return the depth limit.
    #[must_use]
    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }

    /// Fit a surrogate tree to the forest's votes on `data`.
    ///
    /// # Errors
    ///
    /// | Variant                     | When                                 |
    /// |-----------------------------|--------------------------------------|
    /// | [`RfError::EmptyDataset`]   | `data` is empty                      |
    /// | [`RfError::EmptyForest`]    | `forest` holds no trees              |
    /// | [`RfError::NonFiniteValue`] | any feature value is NaN or infinite |
    pub fn fit(&self, data: &[Sample], forest: &RandomForest) -> Result<Node, RfError> {
        crate::surrogate::build_surrogate(data, forest, self.depth_limit)
    }
}

impl Default for SurrogateConfig {
    fn default() -> Self {
        Self { depth_limit: 3 }
    }
}
