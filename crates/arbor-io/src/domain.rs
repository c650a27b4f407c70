//! Domain types for arbor-io.

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        let valid = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Training parameters recorded alongside every report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RunParameters {
    /// Seed of the Park-Miller stream.
    pub seed: i64,
    /// Number of trees in the forest.
    pub n_trees: usize,
    /// Per-tree depth limit.
    pub max_depth: usize,
    /// Surrogate depth limit.
    pub surrogate_depth: usize,
    /// Number of training applicants.
    pub n_samples: usize,
}
