use crate::sample::Feature;

/// Errors from forest training, surrogate fitting, and inference.
#[derive(Debug, thiserror::Error)]
pub enum RfError {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when a depth limit exceeds the supported recursion bound.
    #[error("max_depth must be at most {limit}, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid depth value provided.
        max_depth: usize,
        /// The largest supported depth.
        limit: usize,
    },

    /// Returned when the training dataset has zero samples.
    #[error("training dataset has zero samples")]
    EmptyDataset,

    /// Returned when voting on a forest that holds no trees.
    #[error("cannot vote on a forest with zero trees")]
    EmptyForest,

    /// Returned when a training value is NaN or infinite.
    #[error("non-finite {feature} value at sample {sample_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The feature holding the bad value.
        feature: Feature,
    },

    /// Returned when a decision grid has fewer than two rows or columns.
    #[error("decision grid must be at least 2x2, got {rows}x{cols}")]
    InvalidGrid {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// Returned when agreement metrics are requested over zero predictions.
    #[error("cannot compare zero predictions")]
    EmptyPredictions,

    /// Returned when two prediction sequences differ in length.
    #[error("prediction sequences differ in length: {expected} vs {got}")]
    LengthMismatch {
        /// Length of the reference sequence.
        expected: usize,
        /// Length of the compared sequence.
        got: usize,
    },
}
