//! Random Forest training over one shared Park-Miller stream.

use tracing::{debug, info, instrument};

use crate::error::RfError;
use crate::node::Node;
use crate::rng::ParkMiller;
use crate::sample::{Sample, validate_finite};
use crate::tree::grow_random_tree;

/// Largest depth limit accepted by the tree growers.
pub const MAX_SUPPORTED_DEPTH: usize = 32;

pub(crate) fn check_depth(max_depth: usize) -> Result<(), RfError> {
    if max_depth > MAX_SUPPORTED_DEPTH {
        return Err(RfError::InvalidMaxDepth {
            max_depth,
            limit: MAX_SUPPORTED_DEPTH,
        });
    }
    Ok(())
}

/// A fitted Random Forest ensemble: tree roots in construction order.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RandomForest {
    pub(crate) trees: Vec<Node>,
}

impl RandomForest {
    /// Wrap already-grown trees as a forest.
    #[must_use]
    pub fn from_trees(trees: Vec<Node>) -> Self {
        Self { trees }
    }

    /// Return the trees in construction order.
    #[must_use]
    pub fn trees(&self) -> &[Node] {
        &self.trees
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Draw a bootstrap sample of `data.len()` rows with replacement.
fn bootstrap_sample(data: &[Sample], rng: &mut ParkMiller) -> Vec<Sample> {
    (0..data.len())
        .map(|_| data[rng.next_index(data.len())])
        .collect()
}

/// Train the Random Forest ensemble.
///
/// One generator seeded from `seed` feeds every tree in turn and is never
/// reset. Each tree first draws its bootstrap indices, then grows from that
/// sample, so tree order changes the resulting forest.
///
/// # Errors
///
/// | Variant                       | When                                    |
/// |-------------------------------|-----------------------------------------|
/// | [`RfError::EmptyDataset`]     | `data` is empty                         |
/// | [`RfError::InvalidTreeCount`] | `tree_count` is zero                    |
/// | [`RfError::InvalidMaxDepth`]  | `per_tree_depth` exceeds the bound      |
/// | [`RfError::NonFiniteValue`]   | any feature value is NaN or infinite    |
#[instrument(skip(data), fields(n_samples = data.len()))]
pub fn build_forest(
    data: &[Sample],
    tree_count: usize,
    seed: i64,
    per_tree_depth: usize,
) -> Result<RandomForest, RfError> {
    if data.is_empty() {
        return Err(RfError::EmptyDataset);
    }
    if tree_count == 0 {
        return Err(RfError::InvalidTreeCount { n_trees: tree_count });
    }
    check_depth(per_tree_depth)?;
    validate_finite(data)?;

    info!(
        tree_count,
        n_samples = data.len(),
        per_tree_depth,
        seed,
        "training random forest"
    );

    let mut rng = ParkMiller::new(seed);
    let mut trees = Vec::with_capacity(tree_count);
    for tree_index in 0..tree_count {
        let sample = bootstrap_sample(data, &mut rng);
        let tree = grow_random_tree(&sample, &mut rng, 0, per_tree_depth);
        debug!(
            tree_index,
            n_leaves = tree.n_leaves(),
            depth = tree.depth(),
            "tree grown"
        );
        trees.push(tree);
    }

    info!(n_trees = trees.len(), "random forest training complete");
    Ok(RandomForest { trees })
}
