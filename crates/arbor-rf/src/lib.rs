//! Randomized-tree forests and surrogate rule extraction for loan applicants.
//!
//! Trains a bootstrap-aggregated ensemble of shallow randomized trees from a
//! single seeded Park-Miller stream, votes on applicants, and distills the
//! forest into one exhaustive surrogate tree whose leaves read as IF/THEN
//! rules.

mod config;
mod confusion;
pub mod dataset;
mod error;
mod forest;
mod grid;
mod node;
mod predict;
mod rng;
mod rules;
mod sample;
mod split;
mod surrogate;
mod tree;

pub use config::{RandomForestConfig, SurrogateConfig};
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use error::RfError;
pub use forest::{MAX_SUPPORTED_DEPTH, RandomForest, build_forest};
pub use grid::{Bounds, DecisionGrid, GridConfig};
pub use node::Node;
pub use predict::{VoteResult, vote};
pub use rng::ParkMiller;
pub use rules::{
    RULE_PREFIX, Rules, extract_rules, extract_rules_with_prefix, matching_rule, tidy_rule,
};
pub use sample::{CLASS_NAMES, ClassLabel, Feature, Point, Sample};
pub use split::{ClassCounts, class_counts, gini_impurity, partition, split_score};
pub use surrogate::{Explanation, build_surrogate, fidelity, relabel_with_forest};
pub use tree::{RANDOM_SPLIT_ATTEMPTS, grow_random_tree};
