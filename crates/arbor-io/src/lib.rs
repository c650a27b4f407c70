//! File I/O, validation, and JSON artifacts for the arbor pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ExperimentName, RunParameters};
pub use error::IoError;
pub use reader::{EXPECTED_COLUMNS, SampleReader};
pub use writer::{ReportContents, ResultWriter};
