//! Agreement matrix between two labelings of the same applicants.

use std::fmt;

use crate::error::RfError;
use crate::sample::{CLASS_NAMES, ClassLabel};

/// Square count matrix over applicant classes.
///
/// `matrix[r][c]` counts applicants whose reference label is `r` and whose
/// compared label is `c`. The matrix always covers the three named classes
/// and grows if a label beyond them appears.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConfusionMatrix {
    matrix: Vec<Vec<usize>>,
    n_classes: usize,
}

/// Per-class precision, recall, and F1 against the reference labeling.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClassMetrics {
    /// The class these metrics describe.
    pub class: ClassLabel,
    /// `TP / (TP + FP)`, or 0.0 if nothing was assigned this class.
    pub precision: f64,
    /// `TP / (TP + FN)`, or 0.0 if no reference sample has this class.
    pub recall: f64,
    /// Harmonic mean of precision and recall, or 0.0 if both are zero.
    pub f1: f64,
    /// Reference samples carrying this class.
    pub support: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl ConfusionMatrix {
    /// Tally `reference` against `compared`, position by position.
    ///
    /// # Errors
    ///
    /// | Variant                       | When                            |
    /// |-------------------------------|---------------------------------|
    /// | [`RfError::EmptyPredictions`] | `reference` is empty            |
    /// | [`RfError::LengthMismatch`]   | the two slices differ in length |
    pub fn from_labels(reference: &[ClassLabel], compared: &[ClassLabel]) -> Result<Self, RfError> {
        if reference.is_empty() {
            return Err(RfError::EmptyPredictions);
        }
        if reference.len() != compared.len() {
            return Err(RfError::LengthMismatch {
                expected: reference.len(),
                got: compared.len(),
            });
        }

        let largest = reference
            .iter()
            .chain(compared)
            .map(|c| c.index())
            .max()
            .unwrap_or(0);
        let n_classes = CLASS_NAMES.len().max(largest + 1);

        let mut matrix = vec![vec![0usize; n_classes]; n_classes];
        for (r, c) in reference.iter().zip(compared) {
            matrix[r.index()][c.index()] += 1;
        }
        Ok(Self { matrix, n_classes })
    }

    /// Share of positions where both labelings agree.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let agreed: usize = (0..self.n_classes).map(|i| self.matrix[i][i]).sum();
        ratio(agreed, self.total())
    }

    /// Number of compared positions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    /// Precision, recall, F1, and support for every class in index order.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        (0..self.n_classes)
            .map(|c| {
                let tp = self.matrix[c][c];
                let assigned: usize = self.matrix.iter().map(|row| row[c]).sum();
                let support: usize = self.matrix[c].iter().sum();
                let precision = ratio(tp, assigned);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: ClassLabel::new(c),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Return the underlying matrix rows.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Return the number of classes covered.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

fn class_heading(index: usize) -> String {
    ClassLabel::new(index)
        .name()
        .map_or_else(|| format!("class {index}"), str::to_string)
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10}", "")?;
        for j in 0..self.n_classes {
            write!(f, " {:>9}", class_heading(j))?;
        }
        writeln!(f)?;

        for (i, row) in self.matrix.iter().enumerate() {
            write!(f, "{:>10}", class_heading(i))?;
            for val in row {
                write!(f, " {val:>9}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[usize]) -> Vec<ClassLabel> {
        raw.iter().copied().map(ClassLabel::new).collect()
    }

    // --- Construction ---

    #[test]
    fn empty_is_rejected() {
        let err = ConfusionMatrix::from_labels(&[], &[]).unwrap_err();
        assert!(matches!(err, RfError::EmptyPredictions));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = ConfusionMatrix::from_labels(&labels(&[0, 1]), &labels(&[0])).unwrap_err();
        assert!(matches!(err, RfError::LengthMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn always_covers_named_classes() {
        let cm = ConfusionMatrix::from_labels(&labels(&[0]), &labels(&[0])).unwrap();
        assert_eq!(cm.n_classes(), 3);
        let wide = ConfusionMatrix::from_labels(&labels(&[4]), &labels(&[0])).unwrap();
        assert_eq!(wide.n_classes(), 5);
    }

    // --- Metrics ---

    #[test]
    fn full_agreement() {
        let l = labels(&[0, 0, 1, 1, 2, 2]);
        let cm = ConfusionMatrix::from_labels(&l, &l).unwrap();
        assert!((cm.accuracy() - 1.0).abs() < f64::EPSILON);
        for m in cm.class_metrics() {
            assert!((m.f1 - 1.0).abs() < f64::EPSILON);
            assert_eq!(m.support, 2);
        }
    }

    #[test]
    fn rotated_disagreement() {
        let reference = labels(&[0, 0, 0, 1, 1, 1, 2, 2, 2]);
        let compared = labels(&[0, 0, 1, 1, 1, 2, 2, 2, 0]);
        let cm = ConfusionMatrix::from_labels(&reference, &compared).unwrap();

        assert!((cm.accuracy() - 6.0 / 9.0).abs() < 1e-10);
        let deny = &cm.class_metrics()[2];
        assert_eq!(deny.class, ClassLabel::DENY);
        assert!((deny.precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((deny.recall - 2.0 / 3.0).abs() < 1e-10);
        assert_eq!(cm.as_rows()[0], vec![2, 1, 0]);
        assert_eq!(cm.total(), 9);
    }

    #[test]
    fn absent_class_has_zero_metrics() {
        let l = labels(&[0, 1]);
        let cm = ConfusionMatrix::from_labels(&l, &l).unwrap();
        let deny = &cm.class_metrics()[2];
        assert_eq!(deny.support, 0);
        assert_eq!(deny.precision, 0.0);
        assert_eq!(deny.f1, 0.0);
    }

    // --- Display ---

    #[test]
    fn display_uses_class_names() {
        let l = labels(&[0, 2]);
        let output = ConfusionMatrix::from_labels(&l, &l).unwrap().to_string();
        assert!(output.contains("Approve"));
        assert!(output.contains("Deny"));
        assert_eq!(output.lines().count(), 4);
    }
}
