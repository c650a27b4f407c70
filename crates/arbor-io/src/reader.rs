//! CSV applicant reader with full input validation.

use std::path::{Path, PathBuf};

use arbor_rf::{CLASS_NAMES, ClassLabel, Sample};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Header columns every applicant file must carry.
pub const EXPECTED_COLUMNS: [&str; 3] = ["income", "score", "label"];

/// Reads labeled applicants from a CSV file.
///
/// Expected CSV format:
/// - Header row required, naming `income`, `score`, and `label` in any order
/// - One row per applicant, all rows with the header's column count
/// - `income` and `score` finite floats, `label` one of `0`, `1`, `2`
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | No header, or zero data rows after it |
/// | [`IoError::MissingColumn`] | Header lacks a required column |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Feature cell is NaN, Inf, or unparseable |
/// | [`IoError::InvalidLabel`] | Label is not a known class index |
pub struct SampleReader {
    path: PathBuf,
}

impl SampleReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }

    fn parse_feature(&self, raw: &str, row_index: usize, column: &'static str) -> Result<f64, IoError> {
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(IoError::NonFiniteValue {
                path: self.path.clone(),
                row_index,
                column,
                raw: raw.to_string(),
            }),
        }
    }

    fn parse_label(&self, raw: &str, row_index: usize) -> Result<ClassLabel, IoError> {
        match raw.parse::<usize>() {
            Ok(index) if index < CLASS_NAMES.len() => Ok(ClassLabel::new(index)),
            _ => Err(IoError::InvalidLabel {
                path: self.path.clone(),
                row_index,
                raw: raw.to_string(),
            }),
        }
    }

    /// Read and validate the CSV file, returning applicants in file order.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Vec<Sample>, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets our own InconsistentRowLength check fire instead
        // of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        if header.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }
        let mut positions = [0usize; 3];
        for (slot, column) in positions.iter_mut().zip(EXPECTED_COLUMNS) {
            *slot = header
                .iter()
                .position(|h| h.eq_ignore_ascii_case(column))
                .ok_or_else(|| IoError::MissingColumn {
                    path: self.path.clone(),
                    column,
                })?;
        }
        let [income_col, score_col, label_col] = positions;
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let mut samples = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let cell = |i: usize| record.get(i).unwrap_or("");
            let income = self.parse_feature(cell(income_col), row_index, "income")?;
            let score = self.parse_feature(cell(score_col), row_index, "score")?;
            let label = self.parse_label(cell(label_col), row_index)?;
            samples.push(Sample::new(income, score, label));
        }

        if samples.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_samples = samples.len(), "applicant dataset loaded");
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn read(content: &str) -> Result<Vec<Sample>, IoError> {
        let f = write_csv(content);
        SampleReader::new(f.path()).read()
    }

    // --- Valid input ---

    #[test]
    fn read_valid_applicants() {
        let samples = read("income,score,label\n95,780,0\n45,640,1\n20,450,2\n").unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], Sample::new(95.0, 780.0, ClassLabel::APPROVE));
        assert_eq!(samples[2].label, ClassLabel::DENY);
    }

    #[test]
    fn columns_in_any_order_with_padding() {
        let samples = read("label, score ,income\n1, 640.5 , 45\n").unwrap();
        assert_eq!(samples, vec![Sample::new(45.0, 640.5, ClassLabel::REVIEW)]);
    }

    // --- Rejected input ---

    #[test]
    fn missing_file() {
        let err = SampleReader::new(Path::new("/nonexistent/applicants.csv")).read().unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn header_only_is_empty() {
        assert!(matches!(read("income,score,label\n"), Err(IoError::EmptyDataset { .. })));
        assert!(matches!(read(""), Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn missing_label_column() {
        let err = read("income,score\n1,2\n").unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { column: "label", .. }));
    }

    #[test]
    fn jagged_row() {
        let err = read("income,score,label\n1,2,0\n3,4\n").unwrap_err();
        assert!(matches!(
            err,
            IoError::InconsistentRowLength { row_index: 1, expected: 3, got: 2, .. }
        ));
    }

    #[test]
    fn non_finite_feature() {
        let err = read("income,score,label\n1,inf,0\n").unwrap_err();
        assert!(matches!(err, IoError::NonFiniteValue { column: "score", .. }));
        let err = read("income,score,label\nabc,2,0\n").unwrap_err();
        assert!(matches!(err, IoError::NonFiniteValue { column: "income", .. }));
    }

    #[test]
    fn out_of_range_label() {
        for bad in ["3", "-1", "1.0", "Approve"] {
            let err = read(&format!("income,score,label\n1,2,{bad}\n")).unwrap_err();
            assert!(matches!(err, IoError::InvalidLabel { row_index: 0, .. }), "{bad}");
        }
    }
}
