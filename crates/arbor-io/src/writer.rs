//! JSON artifact writer for applicant reports and decision grids.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use arbor_rf::{ClassLabel, ClassMetrics, ConfusionMatrix, DecisionGrid, Explanation};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{ExperimentName, RunParameters};

/// Everything that goes into `{experiment}_report.json`.
#[derive(Debug, Clone, Copy)]
pub struct ReportContents<'a> {
    /// Settings the forest and surrogate were built with.
    pub parameters: &'a RunParameters,
    /// Forest vote and matching surrogate rule for the queried applicant.
    pub explanation: &'a Explanation,
    /// Tidied surrogate rules, left-first.
    pub rules: &'a [String],
    /// Surrogate predictions against forest votes.
    pub fidelity: &'a ConfusionMatrix,
    /// Forest votes against ground-truth labels.
    pub training: &'a ConfusionMatrix,
}

/// Writes report and grid artifacts to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_report.json` and
/// `{experiment}_grid.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Path of the artifact with the given suffix, e.g. `report`.
    #[must_use]
    pub fn artifact_path(&self, suffix: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{suffix}.json", self.experiment.as_str()))
    }

    fn write_json<T: Serialize>(&self, path: &Path, artifact: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the applicant report to `{experiment}_report.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The report cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_report(&self, contents: &ReportContents<'_>) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("report");
        let vote = &contents.explanation.vote;

        let artifact = ReportArtifact {
            experiment: self.experiment.as_str(),
            parameters: contents.parameters,
            applicant: ApplicantEntry {
                class: vote.class,
                class_name: vote.class.name(),
                votes: &vote.votes,
                confidence: vote.confidence(),
                surrogate_class: contents.explanation.surrogate_class,
                rule: &contents.explanation.rule,
                surrogate_agrees: contents.explanation.agrees(),
            },
            rules: contents.rules,
            fidelity: AgreementEntry::from(contents.fidelity),
            training: AgreementEntry::from(contents.training),
        };
        self.write_json(&path, &artifact)?;

        info!(path = %path.display(), "report written");
        Ok(path)
    }

    /// Write the decision-region grid to `{experiment}_grid.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The grid cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(rows = grid.rows(), cols = grid.cols()))]
    pub fn write_grid(&self, grid: &DecisionGrid) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("grid");
        let artifact = GridArtifact {
            experiment: self.experiment.as_str(),
            class_shares: grid.class_shares(),
            grid,
        };
        self.write_json(&path, &artifact)?;

        info!(path = %path.display(), "grid written");
        Ok(path)
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct ReportArtifact<'a> {
    experiment: &'a str,
    parameters: &'a RunParameters,
    applicant: ApplicantEntry<'a>,
    rules: &'a [String],
    fidelity: AgreementEntry<'a>,
    training: AgreementEntry<'a>,
}

#[derive(Serialize)]
struct ApplicantEntry<'a> {
    class: ClassLabel,
    class_name: Option<&'static str>,
    votes: &'a BTreeMap<ClassLabel, usize>,
    confidence: f64,
    surrogate_class: ClassLabel,
    rule: &'a str,
    surrogate_agrees: bool,
}

#[derive(Serialize)]
struct AgreementEntry<'a> {
    accuracy: f64,
    confusion_matrix: &'a [Vec<usize>],
    class_metrics: Vec<ClassMetrics>,
}

impl<'a> From<&'a ConfusionMatrix> for AgreementEntry<'a> {
    fn from(matrix: &'a ConfusionMatrix) -> Self {
        Self {
            accuracy: matrix.accuracy(),
            confusion_matrix: matrix.as_rows(),
            class_metrics: matrix.class_metrics(),
        }
    }
}

#[derive(Serialize)]
struct GridArtifact<'a> {
    experiment: &'a str,
    class_shares: BTreeMap<ClassLabel, f64>,
    #[serde(flatten)]
    grid: &'a DecisionGrid,
}
